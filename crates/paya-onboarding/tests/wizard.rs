//! Wizard submissions against a mocked marketplace API.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use paya_client::{MerchantClient, PartnerClient, Session};
use paya_core::store::ONBOARDING_RESTORED_KEY;
use paya_core::{
    AddressDraft, BusinessDocumentSlot, DirectorDocumentSlot, KeyValueStore, MerchantSession,
    OnboardingProgress, Step,
};
use paya_onboarding::{machine, OnboardingError, OnboardingWizard, ProgressStore};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json(business_info: serde_json::Value) -> serde_json::Value {
    json!({
        "_id": "u1",
        "email": "amina@example.com",
        "role": "merchant",
        "firstName": "Amina",
        "lastName": "Otieno",
        "businessInfo": business_info
    })
}

fn session(base_url: &str) -> Session {
    let client = MerchantClient::new(&format!("{base_url}/api"), 5, "paya-test/0.1")
        .expect("client construction should not fail")
        .with_token("tok-1");
    let user: MerchantSession =
        serde_json::from_value(user_json(json!({}))).expect("user should parse");
    Session::new(client, user)
}

fn wizard(server: &MockServer, dir: &TempDir, partner: Option<PartnerClient>) -> OnboardingWizard {
    let store = ProgressStore::new(state(dir));
    OnboardingWizard::open(&session(&server.uri()), partner, store).expect("wizard should open")
}

fn state(dir: &TempDir) -> KeyValueStore {
    KeyValueStore::open(&dir.path().join("state"))
}

fn reload(dir: &TempDir) -> OnboardingProgress {
    ProgressStore::new(state(dir))
        .load()
        .expect("progress should load")
}

/// Steps 1 and 2 done, wizard parked on the documents step.
fn seed_documents_step(dir: &TempDir) {
    let mut progress = OnboardingProgress {
        current_step: Step::Documents,
        address: AddressDraft {
            address_line1: "1 Moi Ave".to_string(),
            city: "Nairobi".to_string(),
            county: "Nairobi".to_string(),
            ..AddressDraft::default()
        },
        ..OnboardingProgress::default()
    };
    progress.completed_steps.insert(Step::BusinessInfo);
    progress.completed_steps.insert(Step::Address);
    ProgressStore::new(state(dir)).save(&progress).unwrap();
}

fn write_file(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, format!("contents of {name}")).unwrap();
    path
}

fn fill_business_info(wizard: &mut OnboardingWizard) {
    wizard
        .edit_business_info(|info| {
            info.business_name = "Acme Ltd".to_string();
            info.company_number = "PVT-123".to_string();
            info.phone_number = "712345678".to_string();
            info.business_email = "info@acme.co.ke".to_string();
            info.tax_number = "P051234567X".to_string();
            info.business_type = "Limited Company".to_string();
            info.type_of_business = "Retail".to_string();
        })
        .unwrap();
}

fn upload_ok(filename: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "message": "Document uploaded successfully",
        "file": { "filename": filename, "path": format!("/uploads/{filename}") }
    }))
}

async fn mount_profile_put(server: &MockServer) {
    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Profile updated successfully",
            "user": user_json(json!({ "businessName": "Acme Ltd" }))
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn validation_failure_issues_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut wizard = wizard(&server, &dir, None);
    let err = wizard.submit_step(Step::BusinessInfo).await.unwrap_err();

    assert!(matches!(err, OnboardingError::Validation { step: Step::BusinessInfo, ref missing } if missing.len() == 7));
    assert_eq!(wizard.progress().current_step, Step::BusinessInfo);
}

#[tokio::test]
async fn submitting_a_step_other_than_current_is_rejected() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut wizard = wizard(&server, &dir, None);

    let err = wizard.submit_step(Step::Address).await.unwrap_err();
    assert!(matches!(
        err,
        OnboardingError::StepMismatch { requested: Step::Address, current: Step::BusinessInfo }
    ));
}

#[tokio::test]
async fn business_info_advances_after_successful_save() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .and(header("Authorization", "Bearer tok-1"))
        .and(body_partial_json(json!({
            "businessInfo": {
                "businessName": "Acme Ltd",
                "phone": "+254712345678",
                "businessEmail": "info@acme.co.ke"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Profile updated successfully",
            "user": user_json(json!({ "businessName": "Acme Ltd" }))
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut wizard = wizard(&server, &dir, None);
    fill_business_info(&mut wizard);

    let outcome = wizard.submit_step(Step::BusinessInfo).await.expect("step 1 should submit");
    assert_eq!(outcome.current, Step::Address);
    assert!(!outcome.complete);

    let saved = reload(&dir);
    assert_eq!(saved.current_step, Step::Address);
    assert!(machine::is_step_completed(&saved, Step::BusinessInfo));
}

#[tokio::test]
async fn network_failure_leaves_step_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "Server error" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut wizard = wizard(&server, &dir, None);
    fill_business_info(&mut wizard);

    let err = wizard.submit_step(Step::BusinessInfo).await.unwrap_err();
    assert!(matches!(err, OnboardingError::Api(_)), "got: {err:?}");
    assert_eq!(wizard.progress().current_step, Step::BusinessInfo);
    assert!(!machine::is_step_completed(wizard.progress(), Step::BusinessInfo));
    assert_eq!(reload(&dir).current_step, Step::BusinessInfo);
}

#[tokio::test]
async fn unauthorized_submit_is_reported_as_such() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut wizard = wizard(&server, &dir, None);
    fill_business_info(&mut wizard);

    let err = wizard.submit_step(Step::BusinessInfo).await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn failed_upload_blocks_step_but_keeps_successful_one() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/uploads/business-doc"))
        .and(body_string_contains("businessPermit"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "Storage unavailable" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/uploads/business-doc"))
        .respond_with(upload_ok("stored.pdf"))
        .mount(&server)
        .await;
    mount_profile_put(&server).await;

    let mut wizard = wizard(&server, &dir, None);
    wizard.go_to_step(Step::Documents).unwrap();
    for (slot, name) in [
        (BusinessDocumentSlot::CertificateOfIncorporation, "coi.pdf"),
        (BusinessDocumentSlot::KraPinCertificate, "kra.pdf"),
        (BusinessDocumentSlot::Cr12, "cr12.pdf"),
        (BusinessDocumentSlot::BusinessPermit, "permit.pdf"),
    ] {
        let file = write_file(&dir, name);
        wizard.select_business_document(slot, file).unwrap();
    }

    let err = wizard.submit_step(Step::Documents).await.unwrap_err();
    match err {
        OnboardingError::PartialUpload { uploaded, ref failures } => {
            assert_eq!(uploaded, 3);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].document, "Business Permit");
        }
        other => panic!("expected partial upload, got: {other:?}"),
    }
    assert_eq!(wizard.progress().current_step, Step::Documents);

    // The three successful uploads are persisted.
    let saved = reload(&dir);
    let uploaded: Vec<_> = saved
        .business_documents
        .iter()
        .filter(|(_, selection)| selection.is_uploaded())
        .map(|(slot, _)| *slot)
        .collect();
    assert_eq!(uploaded.len(), 3);
    assert!(!saved.business_documents[&BusinessDocumentSlot::BusinessPermit].is_uploaded());

    // Retrying only re-sends the failed document.
    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/uploads/business-doc"))
        .respond_with(upload_ok("permit-2.pdf"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .and(body_partial_json(json!({
            "businessInfo": { "documents": { "businessPermit": { "filename": "permit-2.pdf" } } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json(json!({ "businessName": "Acme Ltd" }))
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = wizard.submit_step(Step::Documents).await.expect("retry should succeed");
    assert_eq!(outcome.current, Step::Directors);
}

#[tokio::test]
async fn directors_submit_completes_onboarding() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/uploads/business-doc"))
        .and(body_string_contains("director"))
        .respond_with(upload_ok("director-doc.jpg"))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .and(body_partial_json(json!({
            "businessInfo": {
                "approvalStatus": "pending",
                "directors": [{ "name": "Jane Doe", "kraPin": "A123456789B", "dob": "1985-02-14" }]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json(json!({
                "businessName": "Acme Ltd",
                "companyNumber": "PVT-123",
                "directors": [{ "name": "Jane Doe" }],
                "payaApproval": { "status": "pending" }
            }))
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut wizard = wizard(&server, &dir, None);
    wizard.go_to_step(Step::Directors).unwrap();
    wizard.set_director_count(1).unwrap();
    wizard
        .edit_director(0, |director| {
            director.name = "Jane Doe".to_string();
            director.dob = NaiveDate::from_ymd_opt(1985, 2, 14);
            director.kra_pin = "A123456789B".to_string();
            director.address = "1 Moi Ave, Nairobi".to_string();
        })
        .unwrap();
    for (slot, name) in [
        (DirectorDocumentSlot::PhotoIdFront, "front.jpg"),
        (DirectorDocumentSlot::PhotoIdBack, "back.jpg"),
        (DirectorDocumentSlot::Selfie, "selfie.jpg"),
    ] {
        let file = write_file(&dir, name);
        wizard.select_director_document(0, slot, file).unwrap();
    }

    let outcome = wizard.submit_step(Step::Directors).await.expect("step 4 should submit");
    assert_eq!(outcome.current, Step::Review);
    assert!(outcome.complete);
    assert!(wizard.user().business_complete());
}

#[tokio::test]
async fn incomplete_director_is_rejected_without_touching_server() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let mut wizard = wizard(&server, &dir, None);
    wizard.go_to_step(Step::Directors).unwrap();
    wizard.set_director_count(1).unwrap();
    wizard
        .select_director_document(0, DirectorDocumentSlot::PhotoIdFront, Path::new("/nope/front.jpg"))
        .unwrap();
    // Name, date of birth, KRA PIN, address and two documents are missing.
    let err = wizard.submit_step(Step::Directors).await.unwrap_err();
    assert!(matches!(err, OnboardingError::Validation { step: Step::Directors, .. }));
}

#[tokio::test]
async fn partner_owner_is_created_once_and_sent_with_business_info() {
    let server = MockServer::start().await;
    let partner_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/external/organizations/owners"))
        .and(header("X-API-Key", "partner-key"))
        .and(body_partial_json(json!({ "firstName": "Amina", "phone": "+254712345678" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "userId": "own-42" })))
        .expect(1)
        .mount(&partner_server)
        .await;
    // First attempt fails at the marketplace, second succeeds.
    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "message": "Try again" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .and(body_partial_json(json!({ "businessInfo": { "ownerId": "own-42" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json(json!({ "businessName": "Acme Ltd", "ownerId": "own-42" }))
        })))
        .mount(&server)
        .await;

    let partner = || PartnerClient::new(&partner_server.uri(), "partner-key", 5, "paya-test/0.1").unwrap();
    let mut first = wizard(&server, &dir, Some(partner()));
    assert!(first.restore().unwrap().is_some());
    fill_business_info(&mut first);

    assert!(first.submit_step(Step::BusinessInfo).await.is_err());
    assert_eq!(first.progress().owner_id.as_deref(), Some("own-42"));
    assert_eq!(reload(&dir).owner_id.as_deref(), Some("own-42"));

    // The saved owner id must not count as a finished step 1 for the rest
    // of this session.
    let mut next = wizard(&server, &dir, Some(partner()));
    assert!(next.restore().unwrap().is_none());
    assert_eq!(next.progress().current_step, Step::BusinessInfo);
    assert!(!machine::is_step_completed(next.progress(), Step::BusinessInfo));

    let outcome = next.submit_step(Step::BusinessInfo).await.expect("retry should succeed");
    assert_eq!(outcome.current, Step::Address);
}

#[tokio::test]
async fn saved_owner_id_implies_step_one_in_a_new_session() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let progress = OnboardingProgress {
        owner_id: Some("own-42".to_string()),
        ..OnboardingProgress::default()
    };
    ProgressStore::new(state(&dir)).save(&progress).unwrap();

    let mut wizard = wizard(&server, &dir, None);
    let outcome = wizard.restore().unwrap().expect("fresh session should reconcile");

    assert_eq!(outcome.inferred_steps, vec![Step::BusinessInfo]);
    assert_eq!(wizard.progress().current_step, Step::Address);
}

#[tokio::test]
async fn back_navigation_survives_the_next_wizard_in_the_same_session() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_profile_put(&server).await;
    seed_documents_step(&dir);

    let mut first = wizard(&server, &dir, None);
    assert!(first.restore().unwrap().is_some());
    assert!(first.back().unwrap());
    assert_eq!(first.progress().current_step, Step::Address);
    drop(first);

    let mut next = wizard(&server, &dir, None);
    assert!(next.restore().unwrap().is_none());
    assert_eq!(next.progress().current_step, Step::Address);

    let outcome = next
        .submit_step(Step::Address)
        .await
        .expect("address should resubmit after going back");
    assert_eq!(outcome.submitted, Step::Address);
    assert_eq!(outcome.current, Step::Documents);
}

#[tokio::test]
async fn goto_survives_the_next_wizard_in_the_same_session() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    seed_documents_step(&dir);

    let mut first = wizard(&server, &dir, None);
    first.restore().unwrap();
    first.go_to_step(Step::BusinessInfo).unwrap();
    drop(first);

    let mut next = wizard(&server, &dir, None);
    next.restore().unwrap();
    assert_eq!(next.progress().current_step, Step::BusinessInfo);
    assert_eq!(reload(&dir).current_step, Step::BusinessInfo);
}

#[tokio::test]
async fn restoration_runs_again_once_the_marker_is_gone_or_foreign() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    seed_documents_step(&dir);

    let mut first = wizard(&server, &dir, None);
    first.restore().unwrap();
    first.back().unwrap();
    drop(first);
    assert_eq!(
        state(&dir).get::<String>(ONBOARDING_RESTORED_KEY).unwrap().as_deref(),
        Some("u1")
    );

    // Signing in again drops the marker.
    state(&dir).remove(ONBOARDING_RESTORED_KEY).unwrap();
    let mut fresh = wizard(&server, &dir, None);
    let outcome = fresh.restore().unwrap().expect("new session should reconcile");
    assert_eq!(outcome.step, Some(Step::Documents));

    fresh.back().unwrap();
    state(&dir).set(ONBOARDING_RESTORED_KEY, "someone-else").unwrap();
    let mut other = wizard(&server, &dir, None);
    assert!(other.restore().unwrap().is_some());
    assert_eq!(other.progress().current_step, Step::Documents);
}

#[tokio::test]
async fn restore_runs_once_and_persists() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let client = MerchantClient::new(&format!("{}/api", server.uri()), 5, "paya-test/0.1").unwrap();
    let user: MerchantSession = serde_json::from_value(user_json(json!({
        "businessName": "Acme Ltd",
        "companyNumber": "PVT-123",
        "directors": [{ "name": "Jane Doe" }],
        "organizationId": "org-9"
    })))
    .unwrap();
    let store = ProgressStore::new(state(&dir));
    let mut wizard = OnboardingWizard::open(&Session::new(client, user), None, store).unwrap();

    let outcome = wizard.restore().unwrap().expect("first restore should run");
    assert_eq!(outcome.step, Some(Step::Review));
    assert!(wizard.restore().unwrap().is_none());

    let saved = reload(&dir);
    assert!(saved.is_complete);
    assert_eq!(saved.current_step, Step::Review);
    assert_eq!(saved.organization_id.as_deref(), Some("org-9"));
}
