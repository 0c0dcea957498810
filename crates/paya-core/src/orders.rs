use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::listing::Identified;

/// Order lifecycle as the server reports it. Statuses introduced server-side
/// after this client was built land in [`OrderStatus::Other`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    PendingPayment,
    Underwriting,
    Approved,
    Rejected,
    HrVerificationPending,
    HrVerified,
    HrUnverified,
    OrderComplete,
    PaymentProcessing,
    Paid,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
    #[serde(other)]
    Other,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 15] = [
        OrderStatus::PendingPayment,
        OrderStatus::Underwriting,
        OrderStatus::Approved,
        OrderStatus::Rejected,
        OrderStatus::HrVerificationPending,
        OrderStatus::HrVerified,
        OrderStatus::HrUnverified,
        OrderStatus::OrderComplete,
        OrderStatus::PaymentProcessing,
        OrderStatus::Paid,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::Underwriting => "underwriting",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
            OrderStatus::HrVerificationPending => "hr_verification_pending",
            OrderStatus::HrVerified => "hr_verified",
            OrderStatus::HrUnverified => "hr_unverified",
            OrderStatus::OrderComplete => "order_complete",
            OrderStatus::PaymentProcessing => "payment_processing",
            OrderStatus::Paid => "paid",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Other => "other",
        }
    }

    /// Orders whose money has been collected and counts toward revenue.
    #[must_use]
    pub fn counts_as_revenue(self) -> bool {
        matches!(
            self,
            OrderStatus::Paid | OrderStatus::Shipped | OrderStatus::Delivered
        )
    }

    /// Orders still waiting on the merchant or the customer.
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            OrderStatus::PendingPayment | OrderStatus::Processing
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| format!("unknown order status '{s}'"))
    }
}

/// Per-merchant fulfillment progress on an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
}

impl std::fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FulfillmentStatus::Pending => write!(f, "pending"),
            FulfillmentStatus::Processing => write!(f, "processing"),
            FulfillmentStatus::Shipped => write!(f, "shipped"),
            FulfillmentStatus::Delivered => write!(f, "delivered"),
        }
    }
}

impl std::str::FromStr for FulfillmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(FulfillmentStatus::Pending),
            "processing" => Ok(FulfillmentStatus::Processing),
            "shipped" => Ok(FulfillmentStatus::Shipped),
            "delivered" => Ok(FulfillmentStatus::Delivered),
            other => Err(format!(
                "unknown fulfillment status '{other}'; expected pending, processing, shipped or delivered"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub product_price: Decimal,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl CustomerInfo {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fulfillment {
    #[serde(default)]
    pub status: FulfillmentStatus,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub shipped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub order_number: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub customer_info: CustomerInfo,
    #[serde(default)]
    pub fulfillment: Vec<Fulfillment>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// The merchant's fulfillment entry; the server only returns the
    /// requesting merchant's entries, so the first one is ours.
    #[must_use]
    pub fn fulfillment_status(&self) -> FulfillmentStatus {
        self.fulfillment
            .first()
            .map(|f| f.status)
            .unwrap_or_default()
    }
}

impl Identified for Order {
    fn id(&self) -> &str {
        &self.id
    }
}
