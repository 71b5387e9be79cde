//! LegalChain unified storage abstractions.
//!
//! This crate defines the storage contract for the agreement registry:
//! - jurisdiction reference data (seeded, never deleted)
//! - legal entity profiles (one per actor identity)
//! - contract templates with owned sequential id assignment
//! - legal contracts plus their per-party signature records
//! - an append-only, hash-linked audit chain
//!
//! Design stance:
//! - Each state-changing operation commits or fails atomically. The
//!   in-memory backend keeps all registries behind one lock, standing in
//!   for the transaction boundary a hosting ledger would provide.
//! - Composite steps (contract insert + template usage bump, signature
//!   insert + count + activation) are single storage calls so a failed
//!   validation can never leave a half-applied write.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod error;
pub mod memory;
mod model;
mod traits;

pub use error::{StorageError, StorageResult};
pub use model::{AuditAppend, AuditRecord, ContractDraft, TemplateDraft};
pub use traits::{
    AuditStore, ContractStore, EntityStore, JurisdictionStore, LegalStore, QueryWindow,
    TemplateStore,
};
