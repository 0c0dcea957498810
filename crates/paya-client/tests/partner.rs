//! Integration tests for `PartnerClient` using wiremock HTTP mocks.

use paya_client::{
    AddDirectorRequest, ApiError, CreateOrganizationRequest, CreateOwnerRequest, PartnerAddress,
    PartnerClient,
};
use paya_core::{BusinessDocumentSlot, DirectorDocumentSlot};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PartnerClient {
    PartnerClient::new(base_url, "partner-key", 5, "paya-test/0.1")
        .expect("client construction should not fail")
}

#[tokio::test]
async fn create_owner_sends_api_key_and_returns_user_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/external/organizations/owners"))
        .and(header("X-API-Key", "partner-key"))
        .and(body_partial_json(json!({ "firstName": "Amina", "email": "amina@example.com" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "userId": "own-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let owner = CreateOwnerRequest {
        first_name: "Amina".to_string(),
        last_name: "Otieno".to_string(),
        email: "amina@example.com".to_string(),
        phone: "+254712345678".to_string(),
        ..CreateOwnerRequest::default()
    };
    let id = test_client(&server.uri())
        .create_owner(&owner)
        .await
        .expect("owner creation should succeed");
    assert_eq!(id, "own-1");
}

#[tokio::test]
async fn create_organization_posts_to_collection_root() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/external/organizations"))
        .and(body_partial_json(json!({
            "ownerId": "own-1",
            "companyNumber": "PVT-1",
            "address": { "city": "Nairobi", "country": "Kenya" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "organizationId": "org-7" })))
        .mount(&server)
        .await;

    let request = CreateOrganizationRequest {
        owner_id: "own-1".to_string(),
        name: "Acme Ltd".to_string(),
        company_number: "PVT-1".to_string(),
        address: PartnerAddress {
            address_line1: "1 Moi Ave".to_string(),
            city: "Nairobi".to_string(),
            county: "Nairobi".to_string(),
            country: "Kenya".to_string(),
            ..PartnerAddress::default()
        },
        ..CreateOrganizationRequest::default()
    };
    let id = test_client(&server.uri())
        .create_organization(&request)
        .await
        .expect("organization creation should succeed");
    assert_eq!(id, "org-7");
}

#[tokio::test]
async fn add_director_posts_under_organization_and_returns_director_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/external/organizations/org-7/directors"))
        .and(header("X-API-Key", "partner-key"))
        .and(body_partial_json(json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "kraPin": "A012345678Z",
            "idNumber": "12345678"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "directorId": "dir-2" })))
        .expect(1)
        .mount(&server)
        .await;

    let request = AddDirectorRequest {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        id_number: Some("12345678".to_string()),
        kra_pin: "A012345678Z".to_string(),
        ..AddDirectorRequest::default()
    };
    let id = test_client(&server.uri())
        .add_director("org-7", &request)
        .await
        .expect("director creation should succeed");
    assert_eq!(id, "dir-2");
}

#[tokio::test]
async fn add_director_omits_unset_optional_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/external/organizations/org-7/directors"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "directorId": "dir-3" })))
        .mount(&server)
        .await;

    let request = AddDirectorRequest {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        kra_pin: "A012345678Z".to_string(),
        ..AddDirectorRequest::default()
    };
    test_client(&server.uri())
        .add_director("org-7", &request)
        .await
        .expect("director creation should succeed");

    let received = server.received_requests().await.expect("recording is on");
    let body: serde_json::Value = received[0].body_json().expect("json body");
    assert!(body.get("email").is_none());
    assert!(body.get("position").is_none());
}

#[tokio::test]
async fn organization_document_upload_sends_file_and_document_type() {
    let server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("cr12.pdf");
    std::fs::write(&file, b"%PDF-1.4").unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/external/organizations/org-7/documents"))
        .and(header("X-API-Key", "partner-key"))
        .and(body_string_contains("name=\"file\"; filename=\"cr12.pdf\""))
        .and(body_string_contains("name=\"documentType\""))
        .and(body_string_contains("BUSINESS_CERTIFICATE"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "documentId": "doc-9" })))
        .expect(1)
        .mount(&server)
        .await;

    let body = test_client(&server.uri())
        .upload_organization_document("org-7", BusinessDocumentSlot::Cr12, &file)
        .await
        .expect("upload should succeed");
    assert_eq!(body["documentId"], "doc-9");
}

#[tokio::test]
async fn organization_document_upload_fails_before_request_for_missing_file() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .upload_organization_document(
            "org-7",
            BusinessDocumentSlot::KraPinCertificate,
            std::path::Path::new("/nonexistent/kra.pdf"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Io { .. }), "got: {err:?}");
}

#[tokio::test]
async fn director_document_upload_uses_partner_type_code() {
    let server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("id-front.jpg");
    std::fs::write(&file, b"jpeg bytes").unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/external/organizations/org-7/directors/dir-2/documents"))
        .and(body_string_contains("NATIONAL_IDENTITY"))
        .and(body_string_contains("name=\"file\"; filename=\"id-front.jpg\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "documentId": "doc-1" })))
        .mount(&server)
        .await;

    let body = test_client(&server.uri())
        .upload_director_document("org-7", "dir-2", DirectorDocumentSlot::PhotoIdFront, &file)
        .await
        .expect("upload should succeed");
    assert_eq!(body["documentId"], "doc-1");
}

#[tokio::test]
async fn rejected_api_key_is_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/external/organizations/org-7"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid API key" })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .get_organization("org-7")
        .await
        .unwrap_err();
    assert!(err.is_unauthorized(), "got: {err:?}");
}

#[tokio::test]
async fn get_organization_keeps_unknown_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/external/organizations/org-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organizationId": "org-7",
            "name": "Acme Ltd",
            "status": "PENDING_REVIEW",
            "kybLevel": 2
        })))
        .mount(&server)
        .await;

    let org = test_client(&server.uri())
        .get_organization("org-7")
        .await
        .expect("lookup should succeed");
    assert_eq!(org.status.as_deref(), Some("PENDING_REVIEW"));
    assert_eq!(org.extra.get("kybLevel"), Some(&json!(2)));
    assert_eq!(org.organization_id.as_deref(), Some("org-7"));
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/external/organizations/owners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .create_owner(&CreateOwnerRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Deserialize { .. }), "got: {err:?}");
}
