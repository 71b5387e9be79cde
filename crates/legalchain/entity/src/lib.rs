//! LegalChain Legal Entity Registry
//!
//! One profile per actor identity: entity type, home jurisdiction,
//! registration number, legal name, and verification state. Registration
//! is a one-time create by the actor itself; the verified flag is flipped
//! only by a separate privileged action.

#![deny(unsafe_code)]

use chrono::Utc;
use legalchain_storage::{
    AuditAppend, AuditStore, EntityStore, JurisdictionStore, LegalStore, StorageError,
};
use legalchain_types::{ChainHeight, EntityId, EntityType, JurisdictionCode, LegalEntity};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Registry facade over the shared store.
pub struct EntityRegistry {
    store: Arc<dyn LegalStore>,
}

impl EntityRegistry {
    pub fn new(store: Arc<dyn LegalStore>) -> Self {
        Self { store }
    }

    /// Register the caller's entity profile. Fails if the jurisdiction is
    /// unknown or unsupported, or if the identity already has a record.
    /// New records are unverified.
    pub async fn register(
        &self,
        caller: EntityId,
        entity_type: EntityType,
        jurisdiction: JurisdictionCode,
        registration_number: String,
        legal_name: String,
        at: ChainHeight,
    ) -> Result<(), EntityError> {
        let supported = self
            .store
            .get_jurisdiction(&jurisdiction)
            .await?
            .map(|j| j.is_supported)
            .unwrap_or(false);
        if !supported {
            warn!(entity = %caller, code = %jurisdiction, "registration rejected: jurisdiction unsupported");
            return Err(EntityError::InvalidJurisdiction(jurisdiction.0));
        }

        self.store
            .insert_entity(LegalEntity {
                entity_id: caller.clone(),
                entity_type,
                jurisdiction: jurisdiction.clone(),
                registration_number,
                legal_name,
                verified_at: at,
                is_verified: false,
            })
            .await?;

        self.store
            .append_audit(AuditAppend {
                timestamp: Utc::now(),
                actor: caller.0.clone(),
                stage: "register_entity".to_string(),
                success: true,
                message: format!("entity {} registered under {}", caller, jurisdiction),
                contract_id: None,
                payload: serde_json::json!({
                    "entity_id": caller.0,
                    "jurisdiction": jurisdiction.0,
                }),
            })
            .await?;

        info!(entity = %caller, code = %jurisdiction, "legal entity registered");
        Ok(())
    }

    /// Privileged verification action: flips the verified flag and
    /// refreshes the verification height.
    pub async fn verify(&self, entity_id: &EntityId, at: ChainHeight) -> Result<(), EntityError> {
        self.store.set_entity_verified(entity_id, at).await?;

        self.store
            .append_audit(AuditAppend {
                timestamp: Utc::now(),
                actor: "administrator".to_string(),
                stage: "verify_entity".to_string(),
                success: true,
                message: format!("entity {} verified", entity_id),
                contract_id: None,
                payload: serde_json::json!({ "entity_id": entity_id.0 }),
            })
            .await?;

        info!(entity = %entity_id, "legal entity verified");
        Ok(())
    }

    /// Get one entity profile by identity.
    pub async fn get(&self, entity_id: &EntityId) -> Result<Option<LegalEntity>, EntityError> {
        Ok(self.store.get_entity(entity_id).await?)
    }
}

/// Entity registry errors.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("jurisdiction unknown or unsupported: {0}")]
    InvalidJurisdiction(String),

    #[error("entity already registered: {0}")]
    AlreadyRegistered(String),

    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<StorageError> for EntityError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound(msg) => Self::NotFound(msg),
            StorageError::Conflict(msg) => Self::AlreadyRegistered(msg),
            StorageError::InvariantViolation(msg)
            | StorageError::InvalidInput(msg)
            | StorageError::Serialization(msg)
            | StorageError::Backend(msg) => Self::Backend(msg),
        }
    }
}
