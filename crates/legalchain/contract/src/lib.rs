//! LegalChain Contract Ledger
//!
//! The central state machine of the registry. A contract is instantiated
//! from a template, collects one signature per listed party, and flips
//! from `Pending` to `Active` the moment the signature count reaches the
//! required threshold. `Active` is terminal; expiry is a derived read-time
//! condition, never a stored transition.
//!
//! Validation fully precedes mutation in every operation: a rejected
//! creation leaves no bumped usage counter, a rejected signature leaves
//! no count change.

#![deny(unsafe_code)]

use chrono::Utc;
use legalchain_storage::{
    AuditAppend, AuditStore, ContractDraft, ContractStore, JurisdictionStore, LegalStore,
    StorageError, TemplateStore,
};
use legalchain_types::{
    ChainHeight, ComplianceVerdict, ContractId, ContractStatus, ContractStatusSummary, EntityId,
    JurisdictionCode, LegalContract, Signature, SigningOutcome, TemplateId,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Caller-supplied fields for a new contract.
#[derive(Clone, Debug)]
pub struct ContractRequest {
    pub template_id: TemplateId,
    pub parties: Vec<EntityId>,
    pub jurisdiction: JurisdictionCode,
    pub contract_type: String,
    pub expires_at: ChainHeight,
    pub terms_hash: String,
    pub metadata_uri: String,
    pub total_value: u64,
    pub required_signatures: u32,
}

/// Ledger facade over the shared store.
pub struct ContractLedger {
    store: Arc<dyn LegalStore>,
}

impl ContractLedger {
    pub fn new(store: Arc<dyn LegalStore>) -> Self {
        Self { store }
    }

    /// Instantiate a contract from a template.
    ///
    /// Validation order and error mapping:
    /// 1. template exists, else [`ContractError::ContractNotFound`]
    /// 2. jurisdiction supported, else [`ContractError::InvalidJurisdiction`]
    /// 3. expiry strictly in the future, else [`ContractError::ContractExpired`]
    /// 4. `1 <= required_signatures <= parties.len()`, else
    ///    [`ContractError::InsufficientSignatures`]
    /// 5. party list free of duplicates, else [`ContractError::InvalidParty`]
    ///
    /// On success the referenced template's usage count is bumped in the
    /// same committed step as the contract insert.
    pub async fn create_contract(
        &self,
        creator: EntityId,
        request: ContractRequest,
        at: ChainHeight,
    ) -> Result<ContractId, ContractError> {
        if self.store.get_template(&request.template_id).await?.is_none() {
            warn!(creator = %creator, template = %request.template_id, "contract rejected: template missing");
            return Err(ContractError::ContractNotFound(request.template_id.0));
        }

        let supported = self
            .store
            .get_jurisdiction(&request.jurisdiction)
            .await?
            .map(|j| j.is_supported)
            .unwrap_or(false);
        if !supported {
            warn!(creator = %creator, code = %request.jurisdiction, "contract rejected: jurisdiction unsupported");
            return Err(ContractError::InvalidJurisdiction(request.jurisdiction.0));
        }

        if request.expires_at <= at {
            warn!(creator = %creator, expires_at = %request.expires_at, height = %at, "contract rejected: expiry not in the future");
            return Err(ContractError::ContractExpired);
        }

        let party_count = request.parties.len() as u32;
        if request.required_signatures == 0 || request.required_signatures > party_count {
            warn!(
                creator = %creator,
                required = request.required_signatures,
                parties = party_count,
                "contract rejected: signature requirement out of range"
            );
            return Err(ContractError::InsufficientSignatures {
                required: request.required_signatures,
                parties: party_count,
            });
        }

        for (index, party) in request.parties.iter().enumerate() {
            if request.parties[..index].contains(party) {
                warn!(creator = %creator, party = %party, "contract rejected: duplicate party");
                return Err(ContractError::InvalidParty(party.0.clone()));
            }
        }

        let contract_id = self
            .store
            .insert_contract(ContractDraft {
                template_id: request.template_id,
                creator: creator.clone(),
                parties: request.parties,
                jurisdiction: request.jurisdiction.clone(),
                contract_type: request.contract_type,
                created_at: at,
                expires_at: request.expires_at,
                terms_hash: request.terms_hash,
                metadata_uri: request.metadata_uri,
                total_value: request.total_value,
                required_signatures: request.required_signatures,
            })
            .await?;

        self.store
            .append_audit(AuditAppend {
                timestamp: Utc::now(),
                actor: creator.0.clone(),
                stage: "create_contract".to_string(),
                success: true,
                message: format!(
                    "contract {} created from template {} under {}",
                    contract_id, request.template_id, request.jurisdiction
                ),
                contract_id: Some(contract_id),
                payload: serde_json::json!({
                    "template_id": request.template_id.0,
                    "jurisdiction": request.jurisdiction.0,
                    "required_signatures": request.required_signatures,
                }),
            })
            .await?;

        info!(contract = %contract_id, creator = %creator, "legal contract created");
        Ok(contract_id)
    }

    /// Record a party's signature.
    ///
    /// Validation order: contract exists → caller is a listed party →
    /// caller has not signed before → the contract is still pending.
    /// Reaching the threshold flips the contract to `Active` and reports
    /// [`SigningOutcome::Finalized`]; the transition is one-way.
    pub async fn sign_contract(
        &self,
        party: EntityId,
        contract_id: ContractId,
        signature_hash: String,
        witness: Option<EntityId>,
        at: ChainHeight,
    ) -> Result<SigningOutcome, ContractError> {
        let contract = self
            .store
            .get_contract(&contract_id)
            .await?
            .ok_or(ContractError::ContractNotFound(contract_id.0))?;

        if !contract.is_party(&party) {
            warn!(contract = %contract_id, party = %party, "signature rejected: not a listed party");
            return Err(ContractError::InvalidParty(party.0));
        }

        if self.store.get_signature(&contract_id, &party).await?.is_some() {
            warn!(contract = %contract_id, party = %party, "signature rejected: already signed");
            return Err(ContractError::AlreadySigned(party.0));
        }

        if contract.status == ContractStatus::Active {
            warn!(contract = %contract_id, party = %party, "signature rejected: contract already active");
            return Err(ContractError::AlreadyActive(contract_id.0));
        }

        let updated = self
            .store
            .apply_signature(Signature {
                contract_id,
                signer: party.clone(),
                signature_hash,
                witness,
                recorded_at: at,
            })
            .await?;

        let outcome = if updated.status == ContractStatus::Active {
            SigningOutcome::Finalized
        } else {
            SigningOutcome::Recorded
        };

        self.store
            .append_audit(AuditAppend {
                timestamp: Utc::now(),
                actor: party.0.clone(),
                stage: "sign_contract".to_string(),
                success: true,
                message: format!(
                    "party {} signed contract {} ({}/{})",
                    party, contract_id, updated.current_signatures, updated.required_signatures
                ),
                contract_id: Some(contract_id),
                payload: serde_json::json!({
                    "signer": party.0,
                    "current_signatures": updated.current_signatures,
                    "finalized": outcome == SigningOutcome::Finalized,
                }),
            })
            .await?;

        info!(
            contract = %contract_id,
            party = %party,
            signatures = updated.current_signatures,
            ?outcome,
            "signature recorded"
        );
        Ok(outcome)
    }

    /// Get one contract by id.
    pub async fn get(&self, contract_id: &ContractId) -> Result<Option<LegalContract>, ContractError> {
        Ok(self.store.get_contract(contract_id).await?)
    }

    /// A contract's signature records in recording order.
    pub async fn signatures(
        &self,
        contract_id: &ContractId,
    ) -> Result<Vec<Signature>, ContractError> {
        Ok(self.store.list_signatures(contract_id).await?)
    }

    /// Fresh compliance verdict for an existing contract, `None` for
    /// unknown ids. Recomputed on every call, never cached.
    pub async fn check_compliance(
        &self,
        contract_id: &ContractId,
    ) -> Result<Option<ComplianceVerdict>, ContractError> {
        let Some(contract) = self.store.get_contract(contract_id).await? else {
            return Ok(None);
        };
        let Some(jurisdiction) = self.store.get_jurisdiction(&contract.jurisdiction).await? else {
            return Ok(None);
        };
        let signatures = self.store.list_signatures(contract_id).await?;
        Ok(Some(legalchain_compliance::evaluate(
            &contract,
            &jurisdiction,
            &signatures,
        )))
    }

    /// Uniform status read shape. Unknown ids yield the zeroed not-found
    /// sentinel so read paths never branch on absence.
    pub async fn status_summary(
        &self,
        contract_id: &ContractId,
        at: ChainHeight,
    ) -> Result<ContractStatusSummary, ContractError> {
        let Some(contract) = self.store.get_contract(contract_id).await? else {
            return Ok(ContractStatusSummary::not_found());
        };

        let compliance = self
            .check_compliance(contract_id)
            .await?
            .unwrap_or_else(ComplianceVerdict::non_compliant);

        Ok(ContractStatusSummary {
            status: contract.status.into(),
            current_signatures: contract.current_signatures,
            required_signatures: contract.required_signatures,
            expires_at: contract.expires_at,
            is_expired: contract.is_expired(at),
            compliance,
        })
    }
}

/// Contract ledger errors.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("jurisdiction unknown or unsupported: {0}")]
    InvalidJurisdiction(String),

    #[error("contract or template not found: {0}")]
    ContractNotFound(u64),

    #[error("expiry must be strictly in the future")]
    ContractExpired,

    #[error("required signatures out of range: {required} required for {parties} parties")]
    InsufficientSignatures { required: u32, parties: u32 },

    #[error("not a listed party: {0}")]
    InvalidParty(String),

    #[error("party already signed: {0}")]
    AlreadySigned(String),

    #[error("contract already active: {0}")]
    AlreadyActive(u64),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<StorageError> for ContractError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound(msg) => {
                // Storage not-found on a validated path is a race the host
                // serialization rules out; surface it as a backend fault.
                Self::Backend(msg)
            }
            StorageError::Conflict(msg) => Self::AlreadySigned(msg),
            StorageError::InvariantViolation(msg) => Self::Backend(msg),
            StorageError::InvalidInput(msg)
            | StorageError::Serialization(msg)
            | StorageError::Backend(msg) => Self::Backend(msg),
        }
    }
}
