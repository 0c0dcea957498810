//! Merchant product endpoints.

use paya_core::{Product, ProductCategory, ProductInput, ProductStatus};
use reqwest::Method;

use crate::error::ApiError;
use crate::types::{MessageResponse, Page, ProductEnvelope, ProductsEnvelope};

use super::MerchantClient;

/// Query of `GET /products/merchant/my-products`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub status: Option<ProductStatus>,
    pub category: Option<ProductCategory>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductFilter {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(category) = self.category {
            query.push(("category", category.as_str().to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

impl MerchantClient {
    /// Lists the merchant's own products.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] on 401, [`ApiError::Api`] on any
    /// other non-2xx status (e.g. 403 before approval), and the usual
    /// transport/decoding errors otherwise.
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Page<Product>, ApiError> {
        let envelope: ProductsEnvelope = self
            .get_json(&["products", "merchant", "my-products"], &filter.query())
            .await?;
        Ok(Page {
            items: envelope.products,
            pagination: envelope.pagination,
        })
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the product does not exist or is
    /// not visible, and the usual transport/decoding errors otherwise.
    pub async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        self.get_json(&["products", id], &[]).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with the server's validation message on 400,
    /// and the usual transport/decoding errors otherwise.
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        let envelope: ProductEnvelope = self.send_body(Method::POST, &["products"], input).await?;
        tracing::info!(product_id = %envelope.product.id, name = %envelope.product.name, "product created");
        Ok(envelope.product)
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the product is not the merchant's,
    /// and the usual transport/decoding errors otherwise.
    pub async fn update_product(&self, id: &str, input: &ProductInput) -> Result<Product, ApiError> {
        let envelope: ProductEnvelope = self
            .send_body(Method::PUT, &["products", id], input)
            .await?;
        tracing::info!(product_id = %id, "product updated");
        Ok(envelope.product)
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the product is not the merchant's,
    /// and the usual transport errors otherwise.
    pub async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["products", id])?;
        let request = self.request(Method::DELETE, url);
        let _: MessageResponse = self
            .send_json(request, &format!("DELETE /products/{id}"))
            .await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the product is not the merchant's,
    /// and the usual transport/decoding errors otherwise.
    pub async fn set_product_status(
        &self,
        id: &str,
        status: ProductStatus,
    ) -> Result<Product, ApiError> {
        let body = serde_json::json!({ "status": status });
        let envelope: ProductEnvelope = self
            .send_body(Method::PATCH, &["products", id, "status"], &body)
            .await?;
        tracing::info!(product_id = %id, %status, "product status changed");
        Ok(envelope.product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_query_skips_unset_fields() {
        let filter = ProductFilter {
            status: Some(ProductStatus::OutOfStock),
            category: Some(ProductCategory::MedicalCare),
            ..ProductFilter::default()
        };
        assert_eq!(
            filter.query(),
            vec![
                ("status", "out_of_stock".to_string()),
                ("category", "Medical Care".to_string())
            ]
        );
        assert!(ProductFilter::default().query().is_empty());
    }
}
