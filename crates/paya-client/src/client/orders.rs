//! Merchant order endpoints.

use chrono::{DateTime, Utc};
use paya_core::{FulfillmentStatus, Order, OrderStatus};
use reqwest::Method;
use serde::Serialize;

use crate::error::ApiError;
use crate::types::{OrderEnvelope, OrdersEnvelope, Page};

use super::MerchantClient;

/// Query of `GET /orders/merchant/orders`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl OrderFilter {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(from) = self.date_from {
            query.push(("dateFrom", from.to_rfc3339()));
        }
        if let Some(to) = self.date_to {
            query.push(("dateTo", to.to_rfc3339()));
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

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FulfillmentUpdate<'a> {
    status: FulfillmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    tracking_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

impl MerchantClient {
    /// Lists orders containing the merchant's items.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] on 401, [`ApiError::Api`] on any
    /// other non-2xx status, and the usual transport/decoding errors otherwise.
    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Page<Order>, ApiError> {
        let envelope: OrdersEnvelope = self
            .get_json(&["orders", "merchant", "orders"], &filter.query())
            .await?;
        Ok(Page {
            items: envelope.orders,
            pagination: envelope.pagination,
        })
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the order does not contain the
    /// merchant's items, and the usual transport/decoding errors otherwise.
    pub async fn get_order(&self, id: &str) -> Result<Order, ApiError> {
        self.get_json(&["orders", "merchant", "orders", id], &[])
            .await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown orders, [`ApiError::Api`]
    /// when the server refuses the transition, and the usual
    /// transport/decoding errors otherwise.
    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<Order, ApiError> {
        let body = serde_json::json!({ "status": status });
        let envelope: OrderEnvelope = self
            .send_body(Method::PATCH, &["orders", id, "status"], &body)
            .await?;
        tracing::info!(order_id = %id, %status, "order status changed");
        Ok(envelope.order)
    }

    /// Records the merchant's fulfillment progress on an order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with the server's validation message when
    /// the status is not accepted (the server takes processing, shipped and
    /// delivered), and the usual transport/decoding errors otherwise.
    pub async fn update_fulfillment(
        &self,
        id: &str,
        status: FulfillmentStatus,
        tracking_number: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Order, ApiError> {
        let body = FulfillmentUpdate {
            status,
            tracking_number,
            notes,
        };
        let envelope: OrderEnvelope = self
            .send_body(Method::PATCH, &["orders", id, "fulfillment"], &body)
            .await?;
        tracing::info!(order_id = %id, %status, "fulfillment updated");
        Ok(envelope.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_query_formats_dates() {
        let filter = OrderFilter {
            status: Some(OrderStatus::Paid),
            date_from: "2025-01-01T00:00:00Z".parse().ok(),
            ..OrderFilter::default()
        };
        assert_eq!(
            filter.query(),
            vec![
                ("status", "paid".to_string()),
                ("dateFrom", "2025-01-01T00:00:00+00:00".to_string())
            ]
        );
    }

    #[test]
    fn fulfillment_body_omits_missing_tracking() {
        let body = FulfillmentUpdate {
            status: FulfillmentStatus::Shipped,
            tracking_number: None,
            notes: Some("left at gate"),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "status": "shipped", "notes": "left at gate" })
        );
    }
}
