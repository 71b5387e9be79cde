//! In-memory reference implementation for LegalChain storage traits.
//!
//! All registry state lives behind a single lock, so every storage call
//! commits or fails as one unit. This stands in for the global operation
//! serialization a hosting ledger provides; a transactional backend would
//! carry the same guarantee with database transactions.

use crate::model::{AuditAppend, AuditRecord, ContractDraft, TemplateDraft};
use crate::traits::{
    AuditStore, ContractStore, EntityStore, JurisdictionStore, QueryWindow, TemplateStore,
};
use crate::{StorageError, StorageResult};
use async_trait::async_trait;
use legalchain_types::{
    ChainHeight, ContractId, ContractStatus, ContractTemplate, EntityId, Jurisdiction,
    JurisdictionCode, LegalContract, LegalEntity, Signature, TemplateId,
};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct RegistryState {
    jurisdictions: HashMap<JurisdictionCode, Jurisdiction>,
    entities: HashMap<EntityId, LegalEntity>,
    templates: HashMap<TemplateId, ContractTemplate>,
    contracts: HashMap<ContractId, LegalContract>,
    signatures: Vec<Signature>,
    audits: Vec<AuditRecord>,
    // Owned monotonic counters, deliberately not derived from map sizes.
    last_template_id: u64,
    last_contract_id: u64,
}

/// In-memory LegalChain storage adapter.
#[derive(Default)]
pub struct InMemoryLegalStore {
    state: RwLock<RegistryState>,
}

impl InMemoryLegalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_state(&self) -> StorageResult<std::sync::RwLockWriteGuard<'_, RegistryState>> {
        self.state
            .write()
            .map_err(|_| StorageError::Backend("registry lock poisoned".to_string()))
    }

    fn read_state(&self) -> StorageResult<std::sync::RwLockReadGuard<'_, RegistryState>> {
        self.state
            .read()
            .map_err(|_| StorageError::Backend("registry lock poisoned".to_string()))
    }
}

#[async_trait]
impl JurisdictionStore for InMemoryLegalStore {
    async fn insert_jurisdiction(&self, jurisdiction: Jurisdiction) -> StorageResult<()> {
        let mut state = self.write_state()?;
        if state.jurisdictions.contains_key(&jurisdiction.code) {
            return Err(StorageError::Conflict(format!(
                "jurisdiction {} already seeded",
                jurisdiction.code
            )));
        }
        state
            .jurisdictions
            .insert(jurisdiction.code.clone(), jurisdiction);
        Ok(())
    }

    async fn set_jurisdiction_supported(
        &self,
        code: &JurisdictionCode,
        supported: bool,
    ) -> StorageResult<()> {
        let mut state = self.write_state()?;
        let jurisdiction = state
            .jurisdictions
            .get_mut(code)
            .ok_or_else(|| StorageError::NotFound(format!("jurisdiction {} not found", code)))?;
        jurisdiction.is_supported = supported;
        Ok(())
    }

    async fn get_jurisdiction(
        &self,
        code: &JurisdictionCode,
    ) -> StorageResult<Option<Jurisdiction>> {
        let state = self.read_state()?;
        Ok(state.jurisdictions.get(code).cloned())
    }

    async fn list_jurisdictions(&self, window: QueryWindow) -> StorageResult<Vec<Jurisdiction>> {
        let state = self.read_state()?;
        let mut values = state.jurisdictions.values().cloned().collect::<Vec<_>>();
        values.sort_by(|a, b| a.code.0.cmp(&b.code.0));
        Ok(apply_window(values, window))
    }
}

#[async_trait]
impl EntityStore for InMemoryLegalStore {
    async fn insert_entity(&self, entity: LegalEntity) -> StorageResult<()> {
        let mut state = self.write_state()?;
        if state.entities.contains_key(&entity.entity_id) {
            return Err(StorageError::Conflict(format!(
                "entity {} already registered",
                entity.entity_id
            )));
        }
        state.entities.insert(entity.entity_id.clone(), entity);
        Ok(())
    }

    async fn set_entity_verified(
        &self,
        entity_id: &EntityId,
        verified_at: ChainHeight,
    ) -> StorageResult<()> {
        let mut state = self.write_state()?;
        let entity = state
            .entities
            .get_mut(entity_id)
            .ok_or_else(|| StorageError::NotFound(format!("entity {} not found", entity_id)))?;
        entity.is_verified = true;
        entity.verified_at = verified_at;
        Ok(())
    }

    async fn get_entity(&self, entity_id: &EntityId) -> StorageResult<Option<LegalEntity>> {
        let state = self.read_state()?;
        Ok(state.entities.get(entity_id).cloned())
    }
}

#[async_trait]
impl TemplateStore for InMemoryLegalStore {
    async fn insert_template(&self, draft: TemplateDraft) -> StorageResult<TemplateId> {
        let mut state = self.write_state()?;
        let template_id = TemplateId(state.last_template_id + 1);
        let template = ContractTemplate {
            template_id,
            name: draft.name,
            category: draft.category,
            jurisdiction: draft.jurisdiction,
            creator: draft.creator,
            template_hash: draft.template_hash,
            compliance_level: draft.compliance_level,
            usage_count: 0,
            is_verified: false,
            created_at: draft.created_at,
        };
        state.templates.insert(template_id, template);
        state.last_template_id = template_id.0;
        Ok(template_id)
    }

    async fn get_template(
        &self,
        template_id: &TemplateId,
    ) -> StorageResult<Option<ContractTemplate>> {
        let state = self.read_state()?;
        Ok(state.templates.get(template_id).cloned())
    }
}

#[async_trait]
impl ContractStore for InMemoryLegalStore {
    async fn insert_contract(&self, draft: ContractDraft) -> StorageResult<ContractId> {
        let mut state = self.write_state()?;

        // Template lookup precedes id assignment so a rejected insert
        // consumes nothing.
        if !state.templates.contains_key(&draft.template_id) {
            return Err(StorageError::NotFound(format!(
                "template {} not found",
                draft.template_id
            )));
        }

        let contract_id = ContractId(state.last_contract_id + 1);
        let contract = LegalContract {
            contract_id,
            template_id: draft.template_id,
            creator: draft.creator,
            parties: draft.parties,
            jurisdiction: draft.jurisdiction,
            contract_type: draft.contract_type,
            created_at: draft.created_at,
            expires_at: draft.expires_at,
            status: ContractStatus::Pending,
            terms_hash: draft.terms_hash,
            metadata_uri: draft.metadata_uri,
            total_value: draft.total_value,
            required_signatures: draft.required_signatures,
            current_signatures: 0,
        };

        if let Some(template) = state.templates.get_mut(&draft.template_id) {
            template.usage_count += 1;
        }
        state.contracts.insert(contract_id, contract);
        state.last_contract_id = contract_id.0;
        Ok(contract_id)
    }

    async fn get_contract(
        &self,
        contract_id: &ContractId,
    ) -> StorageResult<Option<LegalContract>> {
        let state = self.read_state()?;
        Ok(state.contracts.get(contract_id).cloned())
    }

    async fn apply_signature(&self, signature: Signature) -> StorageResult<LegalContract> {
        let mut state = self.write_state()?;

        let duplicate = state.signatures.iter().any(|existing| {
            existing.contract_id == signature.contract_id && existing.signer == signature.signer
        });
        if duplicate {
            return Err(StorageError::Conflict(format!(
                "party {} already signed contract {}",
                signature.signer, signature.contract_id
            )));
        }

        let contract = state.contracts.get_mut(&signature.contract_id).ok_or_else(|| {
            StorageError::NotFound(format!("contract {} not found", signature.contract_id))
        })?;

        if contract.status == ContractStatus::Active {
            return Err(StorageError::InvariantViolation(format!(
                "contract {} is already active",
                contract.contract_id
            )));
        }

        contract.current_signatures += 1;
        if contract.current_signatures == contract.required_signatures {
            contract.status = ContractStatus::Active;
        }
        let updated = contract.clone();
        state.signatures.push(signature);
        Ok(updated)
    }

    async fn get_signature(
        &self,
        contract_id: &ContractId,
        signer: &EntityId,
    ) -> StorageResult<Option<Signature>> {
        let state = self.read_state()?;
        Ok(state
            .signatures
            .iter()
            .find(|s| s.contract_id == *contract_id && s.signer == *signer)
            .cloned())
    }

    async fn list_signatures(&self, contract_id: &ContractId) -> StorageResult<Vec<Signature>> {
        let state = self.read_state()?;
        Ok(state
            .signatures
            .iter()
            .filter(|s| s.contract_id == *contract_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AuditStore for InMemoryLegalStore {
    async fn append_audit(&self, event: AuditAppend) -> StorageResult<AuditRecord> {
        let mut state = self.write_state()?;

        let previous_hash = state.audits.last().map(|e| e.hash.clone());
        let sequence = state.audits.len() as u64 + 1;
        let hash = compute_audit_hash(&event, previous_hash.as_deref(), sequence)?;

        let record = AuditRecord {
            event_id: format!("audit-{}", Uuid::new_v4()),
            sequence,
            timestamp: event.timestamp,
            actor: event.actor,
            stage: event.stage,
            success: event.success,
            message: event.message,
            contract_id: event.contract_id,
            payload: event.payload,
            previous_hash,
            hash,
        };

        state.audits.push(record.clone());
        Ok(record)
    }

    async fn list_audit(&self, window: QueryWindow) -> StorageResult<Vec<AuditRecord>> {
        let state = self.read_state()?;
        let mut values = state.audits.clone();
        values.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        Ok(apply_window(values, window))
    }

    async fn latest_audit_hash(&self) -> StorageResult<Option<String>> {
        let state = self.read_state()?;
        Ok(state.audits.last().map(|e| e.hash.clone()))
    }
}

fn compute_audit_hash(
    event: &AuditAppend,
    previous_hash: Option<&str>,
    sequence: u64,
) -> StorageResult<String> {
    let serializable = serde_json::json!({
        "previous_hash": previous_hash,
        "sequence": sequence,
        "timestamp": event.timestamp,
        "actor": event.actor,
        "stage": event.stage,
        "success": event.success,
        "message": event.message,
        "contract_id": event.contract_id.map(|id| id.0),
        "payload": event.payload,
    });
    let serialized = serde_json::to_vec(&serializable)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(blake3::hash(&serialized).to_hex().to_string())
}

fn apply_window<T>(items: Vec<T>, window: QueryWindow) -> Vec<T> {
    let iter = items.into_iter().skip(window.offset);
    if window.limit == 0 {
        iter.collect()
    } else {
        iter.take(window.limit).collect()
    }
}
