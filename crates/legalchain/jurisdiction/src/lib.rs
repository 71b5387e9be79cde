//! LegalChain Jurisdiction Registry
//!
//! Administrator-seeded reference data describing which jurisdictions are
//! recognized and their compliance profile. Codes are immutable once
//! seeded; entries are toggled unsupported for audit retention, never
//! deleted. Unsupported entries reject new template and contract creation
//! downstream.

#![deny(unsafe_code)]

use chrono::Utc;
use legalchain_storage::{
    AuditAppend, AuditStore, JurisdictionStore, LegalStore, QueryWindow, StorageError,
};
use legalchain_types::{CompliancePolicy, Jurisdiction, JurisdictionCode, LegalSystem};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Seed payload for a new jurisdiction. Seeded entries start supported.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JurisdictionSeed {
    pub code: JurisdictionCode,
    pub name: String,
    pub legal_system: LegalSystem,
    pub compliance_requirements: String,
    pub regulatory_body: Option<String>,
    pub policy: CompliancePolicy,
}

/// Registry facade over the shared store.
pub struct JurisdictionRegistry {
    store: Arc<dyn LegalStore>,
}

impl JurisdictionRegistry {
    pub fn new(store: Arc<dyn LegalStore>) -> Self {
        Self { store }
    }

    /// Seed one jurisdiction. Rejects duplicate codes.
    pub async fn seed(&self, seed: JurisdictionSeed) -> Result<(), JurisdictionError> {
        let code = seed.code.clone();
        self.store
            .insert_jurisdiction(Jurisdiction {
                code: seed.code,
                name: seed.name,
                legal_system: seed.legal_system,
                compliance_requirements: seed.compliance_requirements,
                is_supported: true,
                regulatory_body: seed.regulatory_body,
                policy: seed.policy,
            })
            .await?;

        self.store
            .append_audit(AuditAppend {
                timestamp: Utc::now(),
                actor: "administrator".to_string(),
                stage: "seed_jurisdiction".to_string(),
                success: true,
                message: format!("seeded jurisdiction {}", code),
                contract_id: None,
                payload: serde_json::json!({ "code": code.0 }),
            })
            .await?;

        info!(code = %code, "jurisdiction seeded");
        Ok(())
    }

    /// Toggle the supported flag for an existing code.
    pub async fn set_supported(
        &self,
        code: &JurisdictionCode,
        supported: bool,
    ) -> Result<(), JurisdictionError> {
        self.store.set_jurisdiction_supported(code, supported).await?;

        self.store
            .append_audit(AuditAppend {
                timestamp: Utc::now(),
                actor: "administrator".to_string(),
                stage: "set_jurisdiction_supported".to_string(),
                success: true,
                message: format!("jurisdiction {} supported={}", code, supported),
                contract_id: None,
                payload: serde_json::json!({ "code": code.0, "supported": supported }),
            })
            .await?;

        info!(code = %code, supported, "jurisdiction support toggled");
        Ok(())
    }

    /// Get one jurisdiction by code.
    pub async fn get(
        &self,
        code: &JurisdictionCode,
    ) -> Result<Option<Jurisdiction>, JurisdictionError> {
        Ok(self.store.get_jurisdiction(code).await?)
    }

    /// False for unknown codes as well as explicitly unsupported ones.
    pub async fn is_supported(&self, code: &JurisdictionCode) -> Result<bool, JurisdictionError> {
        Ok(self
            .store
            .get_jurisdiction(code)
            .await?
            .map(|j| j.is_supported)
            .unwrap_or(false))
    }

    /// List all seeded jurisdictions ordered by code.
    pub async fn list(&self) -> Result<Vec<Jurisdiction>, JurisdictionError> {
        Ok(self
            .store
            .list_jurisdictions(QueryWindow::default())
            .await?)
    }
}

/// Default deployment seeds.
pub fn default_seeds() -> Vec<JurisdictionSeed> {
    vec![
        JurisdictionSeed {
            code: JurisdictionCode::new("US-NY"),
            name: "New York, United States".to_string(),
            legal_system: LegalSystem::CommonLaw,
            compliance_requirements: "UCC-compliant".to_string(),
            regulatory_body: None,
            policy: CompliancePolicy {
                witness_threshold: Some(100_000),
                notarization_threshold: Some(1_000_000),
                value_limit: None,
            },
        },
        JurisdictionSeed {
            code: JurisdictionCode::new("UK-ENG"),
            name: "England and Wales".to_string(),
            legal_system: LegalSystem::CommonLaw,
            compliance_requirements: "UK-contract-law".to_string(),
            regulatory_body: None,
            policy: CompliancePolicy {
                witness_threshold: Some(100_000),
                notarization_threshold: Some(1_000_000),
                value_limit: None,
            },
        },
        JurisdictionSeed {
            code: JurisdictionCode::new("DE-BW"),
            name: "Baden-Wurttemberg, Germany".to_string(),
            legal_system: LegalSystem::CivilLaw,
            compliance_requirements: "BGB-compliant".to_string(),
            regulatory_body: None,
            policy: CompliancePolicy {
                witness_threshold: Some(50_000),
                notarization_threshold: Some(0),
                value_limit: None,
            },
        },
    ]
}

/// Jurisdiction registry errors.
#[derive(Debug, Error)]
pub enum JurisdictionError {
    #[error("jurisdiction not found: {0}")]
    NotFound(String),

    #[error("jurisdiction code already seeded: {0}")]
    DuplicateCode(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<StorageError> for JurisdictionError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound(msg) => Self::NotFound(msg),
            StorageError::Conflict(msg) => Self::DuplicateCode(msg),
            StorageError::InvariantViolation(msg)
            | StorageError::InvalidInput(msg)
            | StorageError::Serialization(msg)
            | StorageError::Backend(msg) => Self::Backend(msg),
        }
    }
}
