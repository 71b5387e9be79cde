//! LegalChain Contract Template Registry
//!
//! Reusable contract blueprints keyed by a sequential id. Templates track
//! how many contracts instantiated them; the usage counter is bumped by
//! contract creation as part of that operation's atomic commit, never
//! through an independent public path.

#![deny(unsafe_code)]

use chrono::Utc;
use legalchain_storage::{
    AuditAppend, AuditStore, JurisdictionStore, LegalStore, StorageError, TemplateDraft,
    TemplateStore,
};
use legalchain_types::{ChainHeight, ContractTemplate, EntityId, JurisdictionCode, TemplateId};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Registry facade over the shared store.
pub struct TemplateRegistry {
    store: Arc<dyn LegalStore>,
}

impl TemplateRegistry {
    pub fn new(store: Arc<dyn LegalStore>) -> Self {
        Self { store }
    }

    /// Create a template under a supported jurisdiction. Returns the
    /// assigned sequential id (first template is id 1).
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        creator: EntityId,
        name: String,
        category: String,
        jurisdiction: JurisdictionCode,
        template_hash: String,
        compliance_level: String,
        at: ChainHeight,
    ) -> Result<TemplateId, TemplateError> {
        let supported = self
            .store
            .get_jurisdiction(&jurisdiction)
            .await?
            .map(|j| j.is_supported)
            .unwrap_or(false);
        if !supported {
            warn!(creator = %creator, code = %jurisdiction, "template rejected: jurisdiction unsupported");
            return Err(TemplateError::InvalidJurisdiction(jurisdiction.0));
        }

        let template_id = self
            .store
            .insert_template(TemplateDraft {
                name: name.clone(),
                category,
                jurisdiction: jurisdiction.clone(),
                creator: creator.clone(),
                template_hash,
                compliance_level,
                created_at: at,
            })
            .await?;

        self.store
            .append_audit(AuditAppend {
                timestamp: Utc::now(),
                actor: creator.0.clone(),
                stage: "create_template".to_string(),
                success: true,
                message: format!("template {} ({}) created under {}", template_id, name, jurisdiction),
                contract_id: None,
                payload: serde_json::json!({
                    "template_id": template_id.0,
                    "jurisdiction": jurisdiction.0,
                }),
            })
            .await?;

        info!(template = %template_id, creator = %creator, "contract template created");
        Ok(template_id)
    }

    /// Get one template by id.
    pub async fn get(
        &self,
        template_id: &TemplateId,
    ) -> Result<Option<ContractTemplate>, TemplateError> {
        Ok(self.store.get_template(template_id).await?)
    }
}

/// Template registry errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("jurisdiction unknown or unsupported: {0}")]
    InvalidJurisdiction(String),

    #[error("template not found: {0}")]
    NotFound(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<StorageError> for TemplateError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound(msg) => Self::NotFound(msg),
            StorageError::Conflict(msg)
            | StorageError::InvariantViolation(msg)
            | StorageError::InvalidInput(msg)
            | StorageError::Serialization(msg)
            | StorageError::Backend(msg) => Self::Backend(msg),
        }
    }
}
