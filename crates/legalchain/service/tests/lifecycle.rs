//! End-to-end lifecycle suite: deployment seeds, entity registration,
//! template and contract creation, the signing walk to activation, and
//! the uniform read surface.

use legalchain_contract::ContractRequest;
use legalchain_jurisdiction::JurisdictionSeed;
use legalchain_service::{ChainError, LegalChain};
use legalchain_types::{
    ChainHeight, CompliancePolicy, ContractId, ContractStatus, ContractStatusKind,
    ContractStatusSummary, EntityId, EntityType, JurisdictionCode, LegalSystem, SigningOutcome,
    TemplateId,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .try_init();
}

fn employment_request(template_id: TemplateId, expires_at: ChainHeight) -> ContractRequest {
    ContractRequest {
        template_id,
        parties: vec![EntityId::new("wallet-1"), EntityId::new("wallet-2")],
        jurisdiction: JurisdictionCode::new("US-NY"),
        contract_type: "employment".to_string(),
        expires_at,
        terms_hash: "terms-hash".to_string(),
        metadata_uri: "ipfs://agreement".to_string(),
        total_value: 50_000,
        required_signatures: 2,
    }
}

#[tokio::test]
async fn deployment_has_the_expected_seeds() {
    init_tracing();
    let chain = LegalChain::in_memory().await.unwrap();

    let us_ny = chain
        .get_jurisdiction_info(&JurisdictionCode::new("US-NY"))
        .await
        .unwrap();
    assert_eq!(us_ny.name, "New York, United States");
    assert_eq!(us_ny.legal_system, LegalSystem::CommonLaw);
    assert_eq!(us_ny.compliance_requirements, "UCC-compliant");
    assert!(us_ny.is_supported);
    assert!(us_ny.regulatory_body.is_none());

    let uk_eng = chain
        .get_jurisdiction_info(&JurisdictionCode::new("UK-ENG"))
        .await
        .unwrap();
    assert_eq!(uk_eng.name, "England and Wales");
    assert_eq!(uk_eng.compliance_requirements, "UK-contract-law");

    let de_bw = chain
        .get_jurisdiction_info(&JurisdictionCode::new("DE-BW"))
        .await
        .unwrap();
    assert_eq!(de_bw.name, "Baden-Wurttemberg, Germany");
    assert_eq!(de_bw.legal_system, LegalSystem::CivilLaw);
    assert_eq!(de_bw.compliance_requirements, "BGB-compliant");

    assert!(chain
        .is_jurisdiction_supported(&JurisdictionCode::new("US-NY"))
        .await);
    assert!(!chain
        .is_jurisdiction_supported(&JurisdictionCode::new("INVALID"))
        .await);
}

#[tokio::test]
async fn unknown_ids_read_gracefully() {
    init_tracing();
    let chain = LegalChain::in_memory().await.unwrap();

    assert!(chain.get_legal_contract(&ContractId(999)).await.is_none());
    assert!(chain.get_contract_template(&TemplateId(999)).await.is_none());
    assert!(chain
        .get_legal_entity(&EntityId::new("wallet-1"))
        .await
        .is_none());

    let summary = chain.get_contract_status_summary(&ContractId(999)).await;
    assert_eq!(summary, ContractStatusSummary::not_found());
    assert_eq!(summary.status, ContractStatusKind::NotFound);
    assert!(!summary.compliance.signatures_met);
    assert!(!summary.compliance.witness_requirement_met);
    assert!(!summary.compliance.notarization_requirement_met);
    assert!(!summary.compliance.value_limit_met);
}

#[tokio::test]
async fn entity_registration_round_trip() {
    init_tracing();
    let chain = LegalChain::in_memory().await.unwrap();

    chain
        .register_legal_entity(
            EntityId::new("wallet-1"),
            EntityType::Corporation,
            JurisdictionCode::new("US-NY"),
            "12345678".to_string(),
            "Test Corporation Inc.".to_string(),
        )
        .await
        .unwrap();

    let entity = chain
        .get_legal_entity(&EntityId::new("wallet-1"))
        .await
        .unwrap();
    assert_eq!(entity.entity_type, EntityType::Corporation);
    assert_eq!(entity.jurisdiction, JurisdictionCode::new("US-NY"));
    assert_eq!(entity.registration_number, "12345678");
    assert_eq!(entity.legal_name, "Test Corporation Inc.");
    assert!(!entity.is_verified);

    let rejected = chain
        .register_legal_entity(
            EntityId::new("wallet-2"),
            EntityType::Corporation,
            JurisdictionCode::new("INVALID"),
            "12345678".to_string(),
            "Test Corporation Inc.".to_string(),
        )
        .await;
    assert!(matches!(rejected, Err(ChainError::InvalidJurisdiction(_))));

    let repeat = chain
        .register_legal_entity(
            EntityId::new("wallet-1"),
            EntityType::Individual,
            JurisdictionCode::new("UK-ENG"),
            "99".to_string(),
            "Someone Else".to_string(),
        )
        .await;
    assert!(matches!(repeat, Err(ChainError::AlreadyRegistered(_))));
}

#[tokio::test]
async fn full_contract_lifecycle() {
    init_tracing();
    let chain = LegalChain::in_memory().await.unwrap();

    chain
        .register_legal_entity(
            EntityId::new("wallet-1"),
            EntityType::Corporation,
            JurisdictionCode::new("US-NY"),
            "12345678".to_string(),
            "Test Corporation Inc.".to_string(),
        )
        .await
        .unwrap();

    let template_id = chain
        .create_contract_template(
            EntityId::new("wallet-1"),
            "Employment Agreement".to_string(),
            "employment".to_string(),
            JurisdictionCode::new("US-NY"),
            "template-hash".to_string(),
            "standard".to_string(),
        )
        .await
        .unwrap();
    assert_eq!(template_id, TemplateId(1));
    let template = chain.get_contract_template(&template_id).await.unwrap();
    assert_eq!(template.usage_count, 0);

    let expires_at = ChainHeight(chain.current_height().0 + 100);
    let contract_id = chain
        .create_legal_contract(
            EntityId::new("wallet-1"),
            employment_request(template_id, expires_at),
        )
        .await
        .unwrap();
    assert_eq!(contract_id, ContractId(1));

    let contract = chain.get_legal_contract(&contract_id).await.unwrap();
    assert_eq!(contract.status, ContractStatus::Pending);
    assert_eq!(contract.current_signatures, 0);
    let template = chain.get_contract_template(&template_id).await.unwrap();
    assert_eq!(template.usage_count, 1);

    // First signature: recorded, still pending.
    let outcome = chain
        .sign_contract(
            EntityId::new("wallet-1"),
            contract_id,
            "sig-1".to_string(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(outcome, SigningOutcome::Recorded);
    let summary = chain.get_contract_status_summary(&contract_id).await;
    assert_eq!(summary.status, ContractStatusKind::Pending);
    assert_eq!(summary.current_signatures, 1);
    assert!(!summary.compliance.signatures_met);

    // Second signature reaches the threshold: finalized and active.
    let outcome = chain
        .sign_contract(
            EntityId::new("wallet-2"),
            contract_id,
            "sig-2".to_string(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(outcome, SigningOutcome::Finalized);

    let contract = chain.get_legal_contract(&contract_id).await.unwrap();
    assert_eq!(contract.status, ContractStatus::Active);
    assert_eq!(contract.current_signatures, 2);

    let summary = chain.get_contract_status_summary(&contract_id).await;
    assert_eq!(summary.status, ContractStatusKind::Active);
    assert_eq!(summary.current_signatures, 2);
    assert_eq!(summary.required_signatures, 2);
    assert!(!summary.is_expired);

    // Low-value US-NY employment contract is fully compliant once signed.
    let verdict = chain.check_compliance(&contract_id).await.unwrap();
    assert!(verdict.signatures_met);
    assert!(verdict.is_fully_compliant());
}

#[tokio::test]
async fn signing_errors_are_typed_at_the_surface() {
    init_tracing();
    let chain = LegalChain::in_memory().await.unwrap();

    let template_id = chain
        .create_contract_template(
            EntityId::new("wallet-1"),
            "Employment Agreement".to_string(),
            "employment".to_string(),
            JurisdictionCode::new("US-NY"),
            "template-hash".to_string(),
            "standard".to_string(),
        )
        .await
        .unwrap();

    let expires_at = ChainHeight(chain.current_height().0 + 100);
    let contract_id = chain
        .create_legal_contract(
            EntityId::new("wallet-1"),
            employment_request(template_id, expires_at),
        )
        .await
        .unwrap();

    let unknown = chain
        .sign_contract(EntityId::new("wallet-1"), ContractId(999), "s".to_string(), None)
        .await;
    assert!(matches!(unknown, Err(ChainError::ContractNotFound(999))));

    let outsider = chain
        .sign_contract(EntityId::new("wallet-3"), contract_id, "s".to_string(), None)
        .await;
    assert!(matches!(outsider, Err(ChainError::InvalidParty(_))));

    chain
        .sign_contract(EntityId::new("wallet-1"), contract_id, "s1".to_string(), None)
        .await
        .unwrap();
    let repeat = chain
        .sign_contract(EntityId::new("wallet-1"), contract_id, "s1-b".to_string(), None)
        .await;
    assert!(matches!(repeat, Err(ChainError::AlreadySigned(_))));
}

#[tokio::test]
async fn creation_rejections_reach_the_caller() {
    init_tracing();
    let chain = LegalChain::in_memory().await.unwrap();

    let template_id = chain
        .create_contract_template(
            EntityId::new("wallet-1"),
            "Service Agreement".to_string(),
            "services".to_string(),
            JurisdictionCode::new("UK-ENG"),
            "template-hash".to_string(),
            "standard".to_string(),
        )
        .await
        .unwrap();

    let missing_template = chain
        .create_legal_contract(
            EntityId::new("wallet-1"),
            employment_request(TemplateId(42), ChainHeight(chain.current_height().0 + 10)),
        )
        .await;
    assert!(matches!(
        missing_template,
        Err(ChainError::ContractNotFound(42))
    ));

    let stale = chain
        .create_legal_contract(
            EntityId::new("wallet-1"),
            employment_request(template_id, chain.current_height()),
        )
        .await;
    assert!(matches!(stale, Err(ChainError::ContractExpired)));

    let mut overdrawn = employment_request(template_id, ChainHeight(chain.current_height().0 + 10));
    overdrawn.required_signatures = 3;
    let result = chain
        .create_legal_contract(EntityId::new("wallet-1"), overdrawn)
        .await;
    assert!(matches!(
        result,
        Err(ChainError::InsufficientSignatures {
            required: 3,
            parties: 2
        })
    ));

    let template_rejected = chain
        .create_contract_template(
            EntityId::new("wallet-1"),
            "Lease".to_string(),
            "property".to_string(),
            JurisdictionCode::new("INVALID"),
            "template-hash".to_string(),
            "standard".to_string(),
        )
        .await;
    assert!(matches!(
        template_rejected,
        Err(ChainError::InvalidJurisdiction(_))
    ));
}

#[tokio::test]
async fn civil_law_policy_drives_the_verdict() {
    init_tracing();
    let chain = LegalChain::in_memory().await.unwrap();

    let template_id = chain
        .create_contract_template(
            EntityId::new("wallet-1"),
            "Kaufvertrag".to_string(),
            "sales".to_string(),
            JurisdictionCode::new("DE-BW"),
            "template-hash".to_string(),
            "notarized".to_string(),
        )
        .await
        .unwrap();

    let mut request = employment_request(
        template_id,
        ChainHeight(chain.current_height().0 + 100),
    );
    request.jurisdiction = JurisdictionCode::new("DE-BW");
    request.contract_type = "sales".to_string();
    request.total_value = 75_000;
    let contract_id = chain
        .create_legal_contract(EntityId::new("wallet-1"), request)
        .await
        .unwrap();

    // DE-BW requires notarization always and a witness at this value;
    // unwitnessed signatures leave both flags unmet.
    chain
        .sign_contract(EntityId::new("wallet-1"), contract_id, "s1".to_string(), None)
        .await
        .unwrap();
    let verdict = chain.check_compliance(&contract_id).await.unwrap();
    assert!(!verdict.witness_requirement_met);
    assert!(!verdict.notarization_requirement_met);
    assert!(verdict.value_limit_met);

    // A witnessed signature satisfies both evidence-driven flags.
    chain
        .sign_contract(
            EntityId::new("wallet-2"),
            contract_id,
            "s2".to_string(),
            Some(EntityId::new("notary-1")),
        )
        .await
        .unwrap();
    let verdict = chain.check_compliance(&contract_id).await.unwrap();
    assert!(verdict.signatures_met);
    assert!(verdict.witness_requirement_met);
    assert!(verdict.notarization_requirement_met);
    assert!(verdict.is_fully_compliant());
}

#[tokio::test]
async fn unsupported_jurisdictions_block_new_work_but_keep_records() {
    init_tracing();
    let chain = LegalChain::in_memory().await.unwrap();
    let code = JurisdictionCode::new("UK-ENG");

    chain.set_jurisdiction_supported(&code, false).await.unwrap();
    assert!(!chain.is_jurisdiction_supported(&code).await);
    assert!(chain.get_jurisdiction_info(&code).await.is_some());

    let rejected = chain
        .create_contract_template(
            EntityId::new("wallet-1"),
            "Lease".to_string(),
            "property".to_string(),
            code.clone(),
            "template-hash".to_string(),
            "standard".to_string(),
        )
        .await;
    assert!(matches!(rejected, Err(ChainError::InvalidJurisdiction(_))));
}

#[tokio::test]
async fn custom_seed_with_value_limit() {
    init_tracing();
    let chain = LegalChain::in_memory().await.unwrap();

    chain
        .seed_jurisdiction(JurisdictionSeed {
            code: JurisdictionCode::new("SG-SG"),
            name: "Singapore".to_string(),
            legal_system: LegalSystem::CommonLaw,
            compliance_requirements: "SG-contract-law".to_string(),
            regulatory_body: Some("MinLaw".to_string()),
            policy: CompliancePolicy {
                witness_threshold: None,
                notarization_threshold: None,
                value_limit: Some(10_000),
            },
        })
        .await
        .unwrap();

    let template_id = chain
        .create_contract_template(
            EntityId::new("wallet-1"),
            "Consulting".to_string(),
            "services".to_string(),
            JurisdictionCode::new("SG-SG"),
            "template-hash".to_string(),
            "standard".to_string(),
        )
        .await
        .unwrap();

    let mut request = employment_request(
        template_id,
        ChainHeight(chain.current_height().0 + 100),
    );
    request.jurisdiction = JurisdictionCode::new("SG-SG");
    request.total_value = 25_000;
    let contract_id = chain
        .create_legal_contract(EntityId::new("wallet-1"), request)
        .await
        .unwrap();

    let verdict = chain.check_compliance(&contract_id).await.unwrap();
    assert!(!verdict.value_limit_met);
    assert!(verdict.witness_requirement_met);
    assert!(verdict.notarization_requirement_met);

    let duplicate = chain
        .seed_jurisdiction(JurisdictionSeed {
            code: JurisdictionCode::new("SG-SG"),
            name: "Singapore".to_string(),
            legal_system: LegalSystem::CommonLaw,
            compliance_requirements: "SG-contract-law".to_string(),
            regulatory_body: None,
            policy: CompliancePolicy::default(),
        })
        .await;
    assert!(matches!(duplicate, Err(ChainError::DuplicateJurisdiction(_))));
}

#[tokio::test]
async fn verification_flow_and_audit_chain() {
    init_tracing();
    let chain = LegalChain::in_memory().await.unwrap();

    chain
        .register_legal_entity(
            EntityId::new("wallet-1"),
            EntityType::Llc,
            JurisdictionCode::new("DE-BW"),
            "HRB-1".to_string(),
            "Beispiel GmbH".to_string(),
        )
        .await
        .unwrap();
    chain.verify_entity(&EntityId::new("wallet-1")).await.unwrap();

    let entity = chain
        .get_legal_entity(&EntityId::new("wallet-1"))
        .await
        .unwrap();
    assert!(entity.is_verified);

    let ghost = chain.verify_entity(&EntityId::new("ghost")).await;
    assert!(matches!(ghost, Err(ChainError::EntityNotFound(_))));

    // Audit trail is newest-first and hash-linked oldest-to-newest.
    let trail = chain.audit_trail().await;
    assert!(trail.len() >= 2);
    for pair in trail.windows(2) {
        assert_eq!(pair[1].hash, pair[0].previous_hash.clone().unwrap());
    }
}
