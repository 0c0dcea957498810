//! HTTP client for the marketplace REST API.
//!
//! Every call is issued exactly once. There is no retry or backoff layer:
//! a failed request surfaces as an [`ApiError`] and the caller decides
//! whether the user tries again.

mod auth;
mod orders;
mod products;
mod profile;
mod shopify;
mod support;
pub(crate) mod uploads;

use std::time::Duration;

use paya_core::AppConfig;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub use orders::OrderFilter;
pub use products::ProductFilter;
pub use shopify::normalise_shop_domain;

/// Client for the marketplace API.
///
/// Holds the bearer token of the current session, if any, and attaches it
/// to every request. Use [`MerchantClient::new`] with the configured base
/// URL, or point it at a mock server in tests.
#[derive(Clone)]
pub struct MerchantClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl std::fmt::Debug for MerchantClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerchantClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

impl MerchantClient {
    /// Creates an unauthenticated client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` does not
    /// parse as an absolute URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: normalise_base_url(base_url)?,
            token: None,
        })
    }

    /// Creates an unauthenticated client from the loaded configuration.
    ///
    /// # Errors
    ///
    /// See [`MerchantClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Returns a copy of this client that sends `Authorization: Bearer <token>`.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        join_segments(&self.base_url, segments)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request, maps non-2xx statuses to [`ApiError`], and decodes
    /// the body as `T`.
    pub(crate) async fn send_json<T: DeserializeOwned>(
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

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let context = format!("GET {}", url.path());
        let request = self.request(Method::GET, url).query(query);
        self.send_json(request, &context).await
    }

    pub(crate) async fn send_body<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let context = format!("{method} {}", url.path());
        let request = self.request(method, url).json(body);
        self.send_json(request, &context).await
    }
}

pub(crate) fn normalise_base_url(base_url: &str) -> Result<Url, ApiError> {
    // Exactly one trailing slash so joined segments extend the path instead
    // of replacing its last segment.
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ApiError::InvalidBaseUrl {
            url: base.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Maps the response status to the error taxonomy: 401 is always
/// [`ApiError::Unauthorized`], 404 is [`ApiError::NotFound`], and any other
/// non-2xx becomes [`ApiError::Api`] carrying the server's `message`.
pub(crate) async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    let message = server_message(&body)
        .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));

    tracing::debug!(status = status.as_u16(), %url, %message, "request rejected");

    match status {
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound { url, message }),
        _ => Err(ApiError::Api {
            status: status.as_u16(),
            message,
        }),
    }
}

fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
