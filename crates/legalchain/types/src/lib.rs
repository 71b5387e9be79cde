//! LegalChain Types - shared vocabulary for the agreement registry
#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};

/// External actor identity, one per legal entity record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);
impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}
impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short fixed-format jurisdiction code, e.g. `US-NY`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JurisdictionCode(pub String);
impl JurisdictionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}
impl std::fmt::Display for JurisdictionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequential template identifier, first assigned id is 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateId(pub u64);
impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequential contract identifier, first assigned id is 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractId(pub u64);
impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host-provided monotonic logical time. All lifecycle comparisons
/// (creation, expiry, verification) use this counter, never wall clocks.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChainHeight(pub u64);
impl ChainHeight {
    pub fn new(height: u64) -> Self {
        Self(height)
    }
}
impl std::fmt::Display for ChainHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Legal-system family of a jurisdiction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegalSystem {
    CommonLaw,
    CivilLaw,
    ReligiousLaw,
    CustomaryLaw,
    Mixed,
}

/// Per-jurisdiction compliance thresholds. These are configuration data
/// consumed by the evaluator; adding a jurisdiction never touches engine
/// logic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompliancePolicy {
    /// Witnessing required at or above this contract value. `None` = never.
    pub witness_threshold: Option<u64>,
    /// Notarization required at or above this value. `Some(0)` = always.
    pub notarization_threshold: Option<u64>,
    /// Maximum enforceable contract value. `None` = unlimited.
    pub value_limit: Option<u64>,
}

impl CompliancePolicy {
    pub fn witness_required(&self, value: u64) -> bool {
        self.witness_threshold.is_some_and(|t| value >= t)
    }

    pub fn notarization_required(&self, value: u64) -> bool {
        self.notarization_threshold.is_some_and(|t| value >= t)
    }

    pub fn value_within_limit(&self, value: u64) -> bool {
        self.value_limit.map_or(true, |limit| value <= limit)
    }
}

/// A recognized legal region. Codes are immutable once seeded; entries are
/// toggled unsupported rather than deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Jurisdiction {
    pub code: JurisdictionCode,
    pub name: String,
    pub legal_system: LegalSystem,
    pub compliance_requirements: String,
    pub is_supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regulatory_body: Option<String>,
    pub policy: CompliancePolicy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    Individual,
    Corporation,
    Partnership,
    Llc,
    Nonprofit,
    Government,
}

/// Registered profile for an actor identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LegalEntity {
    pub entity_id: EntityId,
    pub entity_type: EntityType,
    pub jurisdiction: JurisdictionCode,
    pub registration_number: String,
    pub legal_name: String,
    pub verified_at: ChainHeight,
    pub is_verified: bool,
}

/// Reusable, hashed blueprint for a category of agreement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContractTemplate {
    pub template_id: TemplateId,
    pub name: String,
    pub category: String,
    pub jurisdiction: JurisdictionCode,
    pub creator: EntityId,
    pub template_hash: String,
    pub compliance_level: String,
    pub usage_count: u64,
    pub is_verified: bool,
    pub created_at: ChainHeight,
}

/// Stored contract status. Expiry is derived at read time and is never a
/// stored transition; `Active` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
    Pending,
    Active,
}

/// An instantiated multi-party agreement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LegalContract {
    pub contract_id: ContractId,
    pub template_id: TemplateId,
    pub creator: EntityId,
    pub parties: Vec<EntityId>,
    pub jurisdiction: JurisdictionCode,
    pub contract_type: String,
    pub created_at: ChainHeight,
    pub expires_at: ChainHeight,
    pub status: ContractStatus,
    pub terms_hash: String,
    pub metadata_uri: String,
    pub total_value: u64,
    pub required_signatures: u32,
    pub current_signatures: u32,
}

impl LegalContract {
    pub fn is_party(&self, entity: &EntityId) -> bool {
        self.parties.iter().any(|party| party == entity)
    }

    pub fn is_expired(&self, at: ChainHeight) -> bool {
        at > self.expires_at
    }
}

/// One signing record per (contract, party) pair. Immutable once created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Signature {
    pub contract_id: ContractId,
    pub signer: EntityId,
    pub signature_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub witness: Option<EntityId>,
    pub recorded_at: ChainHeight,
}

/// Outcome of a successful signing action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningOutcome {
    /// Signature stored; the contract still awaits further parties.
    Recorded,
    /// Signature stored and the threshold reached; the contract is active.
    Finalized,
}

/// Four-flag compliance evaluation, recomputed fresh on every query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    pub signatures_met: bool,
    pub witness_requirement_met: bool,
    pub notarization_requirement_met: bool,
    pub value_limit_met: bool,
}

impl ComplianceVerdict {
    /// All-false verdict, used by the not-found sentinel summary.
    pub fn non_compliant() -> Self {
        Self::default()
    }

    pub fn is_fully_compliant(&self) -> bool {
        self.signatures_met
            && self.witness_requirement_met
            && self.notarization_requirement_met
            && self.value_limit_met
    }
}

/// Status label in a contract summary. Unknown ids report `NotFound`
/// instead of failing, so read paths keep a uniform shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatusKind {
    NotFound,
    Pending,
    Active,
}

impl From<ContractStatus> for ContractStatusKind {
    fn from(status: ContractStatus) -> Self {
        match status {
            ContractStatus::Pending => Self::Pending,
            ContractStatus::Active => Self::Active,
        }
    }
}

/// Uniform read shape for contract status queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStatusSummary {
    pub status: ContractStatusKind,
    pub current_signatures: u32,
    pub required_signatures: u32,
    pub expires_at: ChainHeight,
    /// Advisory read-time expiry; never a stored transition.
    pub is_expired: bool,
    pub compliance: ComplianceVerdict,
}

impl ContractStatusSummary {
    /// Zeroed sentinel returned for unknown contract ids.
    pub fn not_found() -> Self {
        Self {
            status: ContractStatusKind::NotFound,
            current_signatures: 0,
            required_signatures: 0,
            expires_at: ChainHeight(0),
            is_expired: false,
            compliance: ComplianceVerdict::non_compliant(),
        }
    }
}
