use crate::model::{AuditAppend, AuditRecord, ContractDraft, TemplateDraft};
use crate::StorageResult;
use async_trait::async_trait;
use legalchain_types::{
    ChainHeight, ContractId, ContractTemplate, EntityId, Jurisdiction, JurisdictionCode,
    LegalContract, LegalEntity, Signature, TemplateId,
};

/// Generic query window for paged reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryWindow {
    pub limit: usize,
    pub offset: usize,
}

/// Storage interface for jurisdiction reference data.
#[async_trait]
pub trait JurisdictionStore: Send + Sync {
    /// Insert a newly seeded jurisdiction. Codes are immutable; a duplicate
    /// code is a conflict.
    async fn insert_jurisdiction(&self, jurisdiction: Jurisdiction) -> StorageResult<()>;

    /// Toggle the supported flag. Entries are never deleted.
    async fn set_jurisdiction_supported(
        &self,
        code: &JurisdictionCode,
        supported: bool,
    ) -> StorageResult<()>;

    /// Get one jurisdiction by code.
    async fn get_jurisdiction(&self, code: &JurisdictionCode)
        -> StorageResult<Option<Jurisdiction>>;

    /// List jurisdictions ordered by code.
    async fn list_jurisdictions(&self, window: QueryWindow) -> StorageResult<Vec<Jurisdiction>>;
}

/// Storage interface for legal entity profiles.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Insert a new entity record. Exactly one record per identity; a
    /// second insert for the same identity is a conflict.
    async fn insert_entity(&self, entity: LegalEntity) -> StorageResult<()>;

    /// Mark an entity as verified at the given height.
    async fn set_entity_verified(
        &self,
        entity_id: &EntityId,
        verified_at: ChainHeight,
    ) -> StorageResult<()>;

    /// Get one entity by identity.
    async fn get_entity(&self, entity_id: &EntityId) -> StorageResult<Option<LegalEntity>>;
}

/// Storage interface for contract templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Insert a template, assigning the next sequential id (first id is 1).
    async fn insert_template(&self, draft: TemplateDraft) -> StorageResult<TemplateId>;

    /// Get one template by id.
    async fn get_template(&self, template_id: &TemplateId)
        -> StorageResult<Option<ContractTemplate>>;
}

/// Storage interface for legal contracts and their signature records.
#[async_trait]
pub trait ContractStore: Send + Sync {
    /// Insert a contract, assigning the next sequential id, and bump the
    /// referenced template's usage count in the same atomic step.
    async fn insert_contract(&self, draft: ContractDraft) -> StorageResult<ContractId>;

    /// Get one contract by id.
    async fn get_contract(&self, contract_id: &ContractId)
        -> StorageResult<Option<LegalContract>>;

    /// Record a signature: insert the (contract, party) record, increment
    /// the signature count, and activate the contract when the count
    /// reaches the requirement — all in one atomic step. Returns the
    /// updated contract.
    async fn apply_signature(&self, signature: Signature) -> StorageResult<LegalContract>;

    /// Get one signature record by (contract, party).
    async fn get_signature(
        &self,
        contract_id: &ContractId,
        signer: &EntityId,
    ) -> StorageResult<Option<Signature>>;

    /// List a contract's signatures in recording order.
    async fn list_signatures(&self, contract_id: &ContractId) -> StorageResult<Vec<Signature>>;
}

/// Storage interface for append-only audit events.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append an event and return the canonical, hash-linked stored record.
    async fn append_audit(&self, event: AuditAppend) -> StorageResult<AuditRecord>;

    /// Read events newest-first.
    async fn list_audit(&self, window: QueryWindow) -> StorageResult<Vec<AuditRecord>>;

    /// Get the latest audit hash anchor.
    async fn latest_audit_hash(&self) -> StorageResult<Option<String>>;
}

/// Unified storage bundle used by the registry surfaces.
pub trait LegalStore:
    JurisdictionStore + EntityStore + TemplateStore + ContractStore + AuditStore + Send + Sync
{
}

impl<T> LegalStore for T where
    T: JurisdictionStore + EntityStore + TemplateStore + ContractStore + AuditStore + Send + Sync
{
}
