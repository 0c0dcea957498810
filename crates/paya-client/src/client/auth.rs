//! `/auth` endpoints.

use paya_core::MerchantSession;
use reqwest::Method;

use crate::error::ApiError;
use crate::types::{AuthResponse, LoginRequest, RegisterRequest, UserEnvelope};

use super::MerchantClient;

impl MerchantClient {
    /// Creates an account and returns its token and user record.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Api`] with the server's validation message (status 400)
    ///   or on any other non-2xx status.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body does not match [`AuthResponse`].
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = self
            .send_body(Method::POST, &["auth", "register"], request)
            .await?;
        tracing::info!(email = %request.email, "account registered");
        Ok(response)
    }

    /// Exchanges credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] or [`ApiError::Api`] when the credentials
    ///   are rejected.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body does not match [`AuthResponse`].
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest { email, password };
        self.send_body(Method::POST, &["auth", "login"], &body).await
    }

    /// Fetches the account the current token belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when no token is held or the token
    /// was rejected, and the usual transport/decoding errors otherwise.
    pub async fn me(&self) -> Result<MerchantSession, ApiError> {
        let envelope: UserEnvelope = self.get_json(&["auth", "me"], &[]).await?;
        Ok(envelope.user)
    }
}
