//! Storefront (Shopify) integration endpoints.

use reqwest::Method;

use crate::error::ApiError;
use crate::types::{
    AuthUrlResponse, FeedbackMessage, FeedbackState, ImportSummary, MessageResponse,
    ResourceFeedback, ShopifyStatus,
};

use super::MerchantClient;

const SHOPIFY: [&str; 2] = ["integrations", "shopify"];

fn shopify_path<'a>(rest: &[&'a str]) -> Vec<&'a str> {
    let mut path: Vec<&'a str> = SHOPIFY.to_vec();
    path.extend_from_slice(rest);
    path
}

/// Normalises user input such as `my-store` or `https://my-store.myshopify.com/`
/// into the bare `my-store.myshopify.com` domain the server expects.
#[must_use]
pub fn normalise_shop_domain(input: &str) -> String {
    let trimmed = input
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    if trimmed.ends_with(".myshopify.com") {
        trimmed.to_lowercase()
    } else {
        format!("{}.myshopify.com", trimmed.to_lowercase())
    }
}

impl MerchantClient {
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] on 401 and the usual
    /// transport/decoding errors otherwise.
    pub async fn shopify_status(&self) -> Result<ShopifyStatus, ApiError> {
        self.get_json(&shopify_path(&["status"]), &[]).await
    }

    /// Starts the OAuth connect flow and returns the URL the merchant must
    /// open in a browser.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] when the server rejects the shop domain
    /// (400) or the integration is not configured (503), and the usual
    /// transport/decoding errors otherwise.
    pub async fn shopify_auth_url(&self, shop: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({ "shop": normalise_shop_domain(shop) });
        let response: AuthUrlResponse = self
            .send_body(Method::POST, &shopify_path(&["auth-url"]), &body)
            .await?;
        Ok(response.auth_url)
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no store is connected, and the
    /// usual transport/decoding errors otherwise.
    pub async fn shopify_import_products(&self) -> Result<ImportSummary, ApiError> {
        let summary: ImportSummary = self
            .send_body(Method::POST, &shopify_path(&["import-products"]), &serde_json::json!({}))
            .await?;
        tracing::info!(
            imported = summary.imported,
            updated = summary.updated,
            failed = summary.failed,
            "storefront import finished"
        );
        Ok(summary)
    }

    /// # Errors
    ///
    /// Returns the usual transport errors.
    pub async fn shopify_disconnect(&self) -> Result<(), ApiError> {
        let _: MessageResponse = self
            .send_body(Method::POST, &shopify_path(&["disconnect"]), &serde_json::json!({}))
            .await?;
        tracing::info!("storefront disconnected");
        Ok(())
    }

    /// Publishes a storefront product to the marketplace sales channel.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no store is connected, and the
    /// usual transport errors otherwise.
    pub async fn shopify_publish_product(&self, product_id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .send_body(
                Method::POST,
                &shopify_path(&["product-listings", product_id]),
                &serde_json::json!({}),
            )
            .await?;
        tracing::info!(product_id, "storefront product published");
        Ok(())
    }

    /// # Errors
    ///
    /// Same as [`MerchantClient::shopify_publish_product`].
    pub async fn shopify_unpublish_product(&self, product_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&shopify_path(&["product-listings", product_id]))?;
        let request = self.request(Method::DELETE, url);
        let _: MessageResponse = self
            .send_json(request, "DELETE /integrations/shopify/product-listings")
            .await?;
        tracing::info!(product_id, "storefront product unpublished");
        Ok(())
    }

    /// Sends resource feedback that the storefront shows next to a product.
    ///
    /// # Errors
    ///
    /// Same as [`MerchantClient::shopify_publish_product`].
    pub async fn shopify_resource_feedback(&self, feedback: &ResourceFeedback) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .send_body(Method::POST, &shopify_path(&["resource-feedback"]), feedback)
            .await?;
        Ok(())
    }

    /// Reports that publishing a product failed.
    ///
    /// # Errors
    ///
    /// Same as [`MerchantClient::shopify_publish_product`].
    pub async fn shopify_report_product_error(
        &self,
        product_id: &str,
        error_message: &str,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "error_message": error_message });
        let _: serde_json::Value = self
            .send_body(
                Method::POST,
                &shopify_path(&["products", product_id, "feedback", "error"]),
                &body,
            )
            .await?;
        tracing::warn!(product_id, error_message, "storefront publishing error reported");
        Ok(())
    }
}

impl ResourceFeedback {
    #[must_use]
    pub fn success(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            state: FeedbackState::Success,
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn requires_action(product_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            state: FeedbackState::RequiresAction,
            messages: vec![FeedbackMessage {
                message: message.into(),
                code: None,
            }],
        }
    }
}
