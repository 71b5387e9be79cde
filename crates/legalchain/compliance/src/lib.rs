//! LegalChain Compliance Evaluator
//!
//! A pure function from a contract's current state and its jurisdiction's
//! compliance policy to a four-flag verdict. Nothing is cached or stored;
//! every query recomputes the verdict from the records handed in.
//!
//! The thresholds driving the witness, notarization, and value-limit flags
//! live in each jurisdiction's [`CompliancePolicy`] — configuration data,
//! not engine conditionals — so adding a jurisdiction never changes this
//! crate.

#![deny(unsafe_code)]

use legalchain_types::{ComplianceVerdict, Jurisdiction, LegalContract, Signature};

/// Evaluate a contract against its jurisdiction's compliance policy.
///
/// Flag semantics:
/// - `signatures_met` — the recorded signature count has reached the
///   contract's requirement.
/// - `witness_requirement_met` — witnessing is not required at this
///   contract value, or at least one recorded signature names a witness.
/// - `notarization_requirement_met` — notarization is not required at
///   this value, or notarial evidence is present. The witness reference
///   on a signature is the register's only notarial evidence channel.
/// - `value_limit_met` — the contract value is within the jurisdiction's
///   enforceable limit.
pub fn evaluate(
    contract: &LegalContract,
    jurisdiction: &Jurisdiction,
    signatures: &[Signature],
) -> ComplianceVerdict {
    let policy = &jurisdiction.policy;
    let witnessed = signatures.iter().any(|s| s.witness.is_some());

    ComplianceVerdict {
        signatures_met: contract.current_signatures >= contract.required_signatures,
        witness_requirement_met: !policy.witness_required(contract.total_value) || witnessed,
        notarization_requirement_met: !policy.notarization_required(contract.total_value)
            || witnessed,
        value_limit_met: policy.value_within_limit(contract.total_value),
    }
}
