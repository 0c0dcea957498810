//! Client for the banking partner's organization API.
//!
//! A separate host authenticated with an `X-API-Key` header instead of the
//! merchant's bearer token. Used during onboarding to register the business
//! owner and organization with the partner.

use std::path::Path;
use std::time::Duration;

use paya_core::{BusinessDocumentSlot, DirectorDocumentSlot, PartnerApiConfig};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::{check_status, join_segments, normalise_base_url};
use crate::client::uploads::file_part;
use crate::error::ApiError;

const ORGANIZATIONS: [&str; 3] = ["v1", "external", "organizations"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOwnerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kra_pin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerAddress {
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub county: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    pub owner_id: String,
    pub name: String,
    pub company_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,
    pub address: PartnerAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDirectorRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    pub kra_pin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnerCreated {
    user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrganizationCreated {
    organization_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectorCreated {
    director_id: String,
}

/// Organization as the partner reports it. Only the fields the client
/// reads are typed; the rest is kept verbatim.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerOrganization {
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Client for the partner organization API.
#[derive(Clone)]
pub struct PartnerClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for PartnerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartnerClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl PartnerClient {
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: normalise_base_url(base_url)?,
            api_key: api_key.to_owned(),
        })
    }

    /// # Errors
    ///
    /// See [`PartnerClient::new`].
    pub fn from_config(
        config: &PartnerApiConfig,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        Self::new(&config.base_url, &config.api_key, timeout_secs, user_agent)
    }

    /// Registers the business owner. Returns the partner's user id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when the API key is rejected,
    /// [`ApiError::Api`] on any other non-2xx status, and the usual
    /// transport/decoding errors otherwise.
    pub async fn create_owner(&self, request: &CreateOwnerRequest) -> Result<String, ApiError> {
        let created: OwnerCreated = self.post_json(&["owners"], request).await?;
        tracing::info!(owner_id = %created.user_id, "partner owner created");
        Ok(created.user_id)
    }

    /// Registers the organization. Returns the partner's organization id.
    ///
    /// # Errors
    ///
    /// Same as [`PartnerClient::create_owner`].
    pub async fn create_organization(
        &self,
        request: &CreateOrganizationRequest,
    ) -> Result<String, ApiError> {
        let created: OrganizationCreated = self.post_json(&[], request).await?;
        tracing::info!(organization_id = %created.organization_id, "partner organization created");
        Ok(created.organization_id)
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown ids, and otherwise the same
    /// errors as [`PartnerClient::create_owner`].
    pub async fn get_organization(&self, organization_id: &str) -> Result<PartnerOrganization, ApiError> {
        let url = self.endpoint(&[organization_id])?;
        let request = self.request(Method::GET, url);
        self.send(request, "GET organization").await
    }

    /// Adds a director to the organization. Returns the partner's director id.
    ///
    /// # Errors
    ///
    /// Same as [`PartnerClient::get_organization`].
    pub async fn add_director(
        &self,
        organization_id: &str,
        request: &AddDirectorRequest,
    ) -> Result<String, ApiError> {
        let created: DirectorCreated = self
            .post_json(&[organization_id, "directors"], request)
            .await?;
        tracing::info!(organization_id, director_id = %created.director_id, "partner director added");
        Ok(created.director_id)
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Io`] if the file cannot be read, and otherwise the
    /// same errors as [`PartnerClient::get_organization`].
    pub async fn upload_organization_document(
        &self,
        organization_id: &str,
        slot: BusinessDocumentSlot,
        path: &Path,
    ) -> Result<serde_json::Value, ApiError> {
        self.upload(&[organization_id, "documents"], slot.partner_type(), path)
            .await
    }

    /// # Errors
    ///
    /// Same as [`PartnerClient::upload_organization_document`].
    pub async fn upload_director_document(
        &self,
        organization_id: &str,
        director_id: &str,
        slot: DirectorDocumentSlot,
        path: &Path,
    ) -> Result<serde_json::Value, ApiError> {
        self.upload(
            &[organization_id, "directors", director_id, "documents"],
            slot.partner_type(),
            path,
        )
        .await
    }

    fn endpoint(&self, rest: &[&str]) -> Result<Url, ApiError> {
        let mut segments: Vec<&str> = ORGANIZATIONS.to_vec();
        segments.extend_from_slice(rest);
        join_segments(&self.base_url, &segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("X-API-Key", &self.api_key)
    }

    async fn post_json<B, T>(&self, rest: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(rest)?;
        let context = format!("POST {}", url.path());
        let request = self.request(Method::POST, url).json(body);
        self.send(request, &context).await
    }

    async fn upload(
        &self,
        rest: &[&str],
        document_type: &str,
        path: &Path,
    ) -> Result<serde_json::Value, ApiError> {
        let form = Form::new()
            .part("file", file_part(path).await?)
            .text("documentType", document_type.to_string());
        let url = self.endpoint(rest)?;
        let context = format!("POST {}", url.path());
        let request = self.request(Method::POST, url).multipart(form);
        let body = self.send(request, &context).await?;
        tracing::info!(document_type, "partner document uploaded");
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, ApiError> {
        let response = check_status(request.send().await?).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Deserialize {
            context: context.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_live_under_external_organizations() {
        let client = PartnerClient::new("https://partner.example.com/", "k", 5, "paya-test/0.1")
            .expect("client construction should not fail");
        let url = client.endpoint(&["org-1", "directors"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://partner.example.com/v1/external/organizations/org-1/directors"
        );
        let root = client.endpoint(&[]).unwrap();
        assert_eq!(root.as_str(), "https://partner.example.com/v1/external/organizations");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let client = PartnerClient::new("https://partner.example.com", "super-secret", 5, "ua")
            .expect("client construction should not fail");
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
