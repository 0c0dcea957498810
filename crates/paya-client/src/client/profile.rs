//! `/users/profile` endpoints.

use paya_core::MerchantSession;
use reqwest::Method;

use crate::error::ApiError;
use crate::types::{ProfilePatch, UserEnvelope};

use super::MerchantClient;

impl MerchantClient {
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] on 401 and the usual
    /// transport/decoding errors otherwise.
    pub async fn get_profile(&self) -> Result<MerchantSession, ApiError> {
        let envelope: UserEnvelope = self.get_json(&["users", "profile"], &[]).await?;
        Ok(envelope.user)
    }

    /// Sends a partial profile update. The server merges `businessInfo` and
    /// `address` into the stored record and returns the updated account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] on 401, [`ApiError::Api`] with the
    /// server's validation message on 400, and the usual transport/decoding
    /// errors otherwise.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<MerchantSession, ApiError> {
        let envelope: UserEnvelope = self
            .send_body(Method::PUT, &["users", "profile"], patch)
            .await?;
        tracing::debug!(
            business_info = patch.business_info.is_some(),
            address = patch.address.is_some(),
            "profile updated"
        );
        Ok(envelope.user)
    }
}
