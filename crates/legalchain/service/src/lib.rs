//! LegalChain Service - unified registry and lifecycle surface
//!
//! [`LegalChain`] composes the jurisdiction, entity, and template
//! registries with the contract ledger over one shared store, and owns
//! the logical height counter the host would normally provide.
//!
//! The surface splits in two:
//! - state-changing calls (`register_legal_entity`,
//!   `create_contract_template`, `create_legal_contract`, `sign_contract`
//!   and the administrative actions) return typed [`ChainError`]s and
//!   advance the logical height;
//! - read paths never fail: absence is an `Option::None` or, for status
//!   summaries, the zeroed not-found sentinel, and backend faults degrade
//!   to absence with a logged warning.

#![deny(unsafe_code)]

use legalchain_contract::{ContractError, ContractLedger, ContractRequest};
use legalchain_entity::{EntityError, EntityRegistry};
use legalchain_jurisdiction::{
    default_seeds, JurisdictionError, JurisdictionRegistry, JurisdictionSeed,
};
use legalchain_storage::memory::InMemoryLegalStore;
use legalchain_storage::{AuditRecord, AuditStore, LegalStore, QueryWindow};
use legalchain_template::{TemplateError, TemplateRegistry};
use legalchain_types::{
    ChainHeight, ComplianceVerdict, ContractId, ContractStatusSummary, ContractTemplate, EntityId,
    EntityType, Jurisdiction, JurisdictionCode, LegalContract, LegalEntity, SigningOutcome,
    TemplateId,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Host logical time. Every state-changing call observes a strictly
/// larger height than the previous one.
pub trait HeightSource: Send + Sync {
    /// Height visible to read paths.
    fn current(&self) -> ChainHeight;

    /// Advance to the next height and return it. Called once per
    /// state-changing operation.
    fn advance(&self) -> ChainHeight;
}

/// In-process monotonic counter standing in for the host's block height.
pub struct BlockCounter {
    height: AtomicU64,
}

impl BlockCounter {
    pub fn starting_at(height: u64) -> Self {
        Self {
            height: AtomicU64::new(height),
        }
    }
}

impl Default for BlockCounter {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl HeightSource for BlockCounter {
    fn current(&self) -> ChainHeight {
        ChainHeight(self.height.load(Ordering::SeqCst))
    }

    fn advance(&self) -> ChainHeight {
        ChainHeight(self.height.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// The unified registry surface.
pub struct LegalChain {
    store: Arc<dyn LegalStore>,
    height: Arc<dyn HeightSource>,
    jurisdictions: JurisdictionRegistry,
    entities: EntityRegistry,
    templates: TemplateRegistry,
    contracts: ContractLedger,
}

impl LegalChain {
    /// Compose the surface over an explicit store and height source.
    pub fn new(store: Arc<dyn LegalStore>, height: Arc<dyn HeightSource>) -> Self {
        Self {
            jurisdictions: JurisdictionRegistry::new(store.clone()),
            entities: EntityRegistry::new(store.clone()),
            templates: TemplateRegistry::new(store.clone()),
            contracts: ContractLedger::new(store.clone()),
            store,
            height,
        }
    }

    /// In-memory instance with the default deployment seeds applied
    /// (`US-NY`, `UK-ENG`, `DE-BW`).
    pub async fn in_memory() -> Result<Self, ChainError> {
        let chain = Self::new(
            Arc::new(InMemoryLegalStore::new()),
            Arc::new(BlockCounter::default()),
        );
        for seed in default_seeds() {
            chain.jurisdictions.seed(seed).await?;
        }
        Ok(chain)
    }

    // ── administrative actions ──────────────────────────────────────

    /// Seed a jurisdiction. Codes are immutable once seeded.
    pub async fn seed_jurisdiction(&self, seed: JurisdictionSeed) -> Result<(), ChainError> {
        self.height.advance();
        Ok(self.jurisdictions.seed(seed).await?)
    }

    /// Toggle a jurisdiction's supported flag; the entry is retained for
    /// audit either way.
    pub async fn set_jurisdiction_supported(
        &self,
        code: &JurisdictionCode,
        supported: bool,
    ) -> Result<(), ChainError> {
        self.height.advance();
        Ok(self.jurisdictions.set_supported(code, supported).await?)
    }

    /// Privileged entity verification.
    pub async fn verify_entity(&self, entity_id: &EntityId) -> Result<(), ChainError> {
        let at = self.height.advance();
        Ok(self.entities.verify(entity_id, at).await?)
    }

    // ── state-changing surface ──────────────────────────────────────

    /// Register the caller's legal entity profile. One record per
    /// identity; a second attempt is rejected.
    pub async fn register_legal_entity(
        &self,
        caller: EntityId,
        entity_type: EntityType,
        jurisdiction: JurisdictionCode,
        registration_number: String,
        legal_name: String,
    ) -> Result<(), ChainError> {
        let at = self.height.advance();
        Ok(self
            .entities
            .register(
                caller,
                entity_type,
                jurisdiction,
                registration_number,
                legal_name,
                at,
            )
            .await?)
    }

    /// Create a reusable contract template under a supported jurisdiction.
    pub async fn create_contract_template(
        &self,
        creator: EntityId,
        name: String,
        category: String,
        jurisdiction: JurisdictionCode,
        template_hash: String,
        compliance_level: String,
    ) -> Result<TemplateId, ChainError> {
        let at = self.height.advance();
        Ok(self
            .templates
            .create(
                creator,
                name,
                category,
                jurisdiction,
                template_hash,
                compliance_level,
                at,
            )
            .await?)
    }

    /// Instantiate a contract from a template.
    pub async fn create_legal_contract(
        &self,
        creator: EntityId,
        request: ContractRequest,
    ) -> Result<ContractId, ChainError> {
        let at = self.height.advance();
        Ok(self.contracts.create_contract(creator, request, at).await?)
    }

    /// Record a party's signature; finalizes the contract at the
    /// threshold.
    pub async fn sign_contract(
        &self,
        party: EntityId,
        contract_id: ContractId,
        signature_hash: String,
        witness: Option<EntityId>,
    ) -> Result<SigningOutcome, ChainError> {
        let at = self.height.advance();
        Ok(self
            .contracts
            .sign_contract(party, contract_id, signature_hash, witness, at)
            .await?)
    }

    // ── read-only surface (never fails) ─────────────────────────────

    pub async fn get_jurisdiction_info(&self, code: &JurisdictionCode) -> Option<Jurisdiction> {
        self.jurisdictions.get(code).await.unwrap_or_else(|err| {
            warn!(code = %code, %err, "jurisdiction read degraded to absence");
            None
        })
    }

    pub async fn is_jurisdiction_supported(&self, code: &JurisdictionCode) -> bool {
        self.jurisdictions.is_supported(code).await.unwrap_or_else(|err| {
            warn!(code = %code, %err, "jurisdiction support read degraded to false");
            false
        })
    }

    pub async fn get_legal_entity(&self, entity_id: &EntityId) -> Option<LegalEntity> {
        self.entities.get(entity_id).await.unwrap_or_else(|err| {
            warn!(entity = %entity_id, %err, "entity read degraded to absence");
            None
        })
    }

    pub async fn get_contract_template(&self, template_id: &TemplateId) -> Option<ContractTemplate> {
        self.templates.get(template_id).await.unwrap_or_else(|err| {
            warn!(template = %template_id, %err, "template read degraded to absence");
            None
        })
    }

    pub async fn get_legal_contract(&self, contract_id: &ContractId) -> Option<LegalContract> {
        self.contracts.get(contract_id).await.unwrap_or_else(|err| {
            warn!(contract = %contract_id, %err, "contract read degraded to absence");
            None
        })
    }

    /// Uniform status read shape; unknown ids yield the zeroed not-found
    /// sentinel.
    pub async fn get_contract_status_summary(
        &self,
        contract_id: &ContractId,
    ) -> ContractStatusSummary {
        self.contracts
            .status_summary(contract_id, self.height.current())
            .await
            .unwrap_or_else(|err| {
                warn!(contract = %contract_id, %err, "summary read degraded to sentinel");
                ContractStatusSummary::not_found()
            })
    }

    /// Fresh compliance verdict, `None` for unknown contracts.
    pub async fn check_compliance(&self, contract_id: &ContractId) -> Option<ComplianceVerdict> {
        self.contracts
            .check_compliance(contract_id)
            .await
            .unwrap_or_else(|err| {
                warn!(contract = %contract_id, %err, "compliance read degraded to absence");
                None
            })
    }

    /// Audit chain newest-first.
    pub async fn audit_trail(&self) -> Vec<AuditRecord> {
        self.store
            .list_audit(QueryWindow::default())
            .await
            .unwrap_or_else(|err| {
                warn!(%err, "audit read degraded to empty");
                Vec::new()
            })
    }

    /// Height visible to read paths.
    pub fn current_height(&self) -> ChainHeight {
        self.height.current()
    }
}

/// Unified error taxonomy of the state-changing surface.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("jurisdiction unknown or unsupported: {0}")]
    InvalidJurisdiction(String),

    #[error("contract or template not found: {0}")]
    ContractNotFound(u64),

    #[error("expiry must be strictly in the future")]
    ContractExpired,

    #[error("party already signed: {0}")]
    AlreadySigned(String),

    #[error("not a listed party: {0}")]
    InvalidParty(String),

    #[error("required signatures out of range: {required} required for {parties} parties")]
    InsufficientSignatures { required: u32, parties: u32 },

    #[error("entity already registered: {0}")]
    AlreadyRegistered(String),

    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("jurisdiction code already seeded: {0}")]
    DuplicateJurisdiction(String),

    #[error("contract already active: {0}")]
    AlreadyActive(u64),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<JurisdictionError> for ChainError {
    fn from(value: JurisdictionError) -> Self {
        match value {
            JurisdictionError::NotFound(code) => Self::InvalidJurisdiction(code),
            JurisdictionError::DuplicateCode(code) => Self::DuplicateJurisdiction(code),
            JurisdictionError::Backend(msg) => Self::Backend(msg),
        }
    }
}

impl From<EntityError> for ChainError {
    fn from(value: EntityError) -> Self {
        match value {
            EntityError::InvalidJurisdiction(code) => Self::InvalidJurisdiction(code),
            EntityError::AlreadyRegistered(id) => Self::AlreadyRegistered(id),
            EntityError::NotFound(id) => Self::EntityNotFound(id),
            EntityError::Backend(msg) => Self::Backend(msg),
        }
    }
}

impl From<TemplateError> for ChainError {
    fn from(value: TemplateError) -> Self {
        match value {
            TemplateError::InvalidJurisdiction(code) => Self::InvalidJurisdiction(code),
            TemplateError::NotFound(id) => Self::Backend(id),
            TemplateError::Backend(msg) => Self::Backend(msg),
        }
    }
}

impl From<ContractError> for ChainError {
    fn from(value: ContractError) -> Self {
        match value {
            ContractError::InvalidJurisdiction(code) => Self::InvalidJurisdiction(code),
            ContractError::ContractNotFound(id) => Self::ContractNotFound(id),
            ContractError::ContractExpired => Self::ContractExpired,
            ContractError::InsufficientSignatures { required, parties } => {
                Self::InsufficientSignatures { required, parties }
            }
            ContractError::InvalidParty(id) => Self::InvalidParty(id),
            ContractError::AlreadySigned(id) => Self::AlreadySigned(id),
            ContractError::AlreadyActive(id) => Self::AlreadyActive(id),
            ContractError::Backend(msg) => Self::Backend(msg),
        }
    }
}
