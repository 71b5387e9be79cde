use chrono::{DateTime, Utc};
use legalchain_types::{ChainHeight, ContractId, EntityId, JurisdictionCode, TemplateId};
use serde::{Deserialize, Serialize};

/// Template fields supplied by the caller; storage assigns the sequential
/// id and the zeroed usage/verification state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    pub category: String,
    pub jurisdiction: JurisdictionCode,
    pub creator: EntityId,
    pub template_hash: String,
    pub compliance_level: String,
    pub created_at: ChainHeight,
}

/// Contract fields supplied by the caller; storage assigns the sequential
/// id, sets the pending status, and bumps the referenced template's usage
/// count in the same committed step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContractDraft {
    pub template_id: TemplateId,
    pub creator: EntityId,
    pub parties: Vec<EntityId>,
    pub jurisdiction: JurisdictionCode,
    pub contract_type: String,
    pub created_at: ChainHeight,
    pub expires_at: ChainHeight,
    pub terms_hash: String,
    pub metadata_uri: String,
    pub total_value: u64,
    pub required_signatures: u32,
}

/// Audit event as submitted by a registry surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditAppend {
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub stage: String,
    pub success: bool,
    pub message: String,
    pub contract_id: Option<ContractId>,
    pub payload: serde_json::Value,
}

/// Stored audit event. Each record hashes its predecessor, forming a
/// tamper-evident chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditRecord {
    pub event_id: String,
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub stage: String,
    pub success: bool,
    pub message: String,
    pub contract_id: Option<ContractId>,
    pub payload: serde_json::Value,
    pub previous_hash: Option<String>,
    pub hash: String,
}
