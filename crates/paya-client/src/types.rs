//! Request bodies and response envelopes of the marketplace API.
//!
//! The server wraps most payloads: lists come as `{ "<items>": [...],
//! "pagination": {...} }`, single mutations as `{ "message", "<item>" }`.
//! Bare domain types live in `paya-core`; only the wrappers are here.

use std::collections::BTreeMap;

use paya_core::{
    Address, ApprovalStatus, Director, MerchantSession, Order, Product, Role, StoredFile,
    SupportTicket,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub items_per_page: u32,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsEnvelope {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
    pub product: Product,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrdersEnvelope {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderEnvelope {
    pub order: Order,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TicketsEnvelope {
    #[serde(default)]
    pub tickets: Vec<SupportTicket>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TicketEnvelope {
    pub ticket: SupportTicket,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: MerchantSession,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadEnvelope {
    pub file: StoredFile,
}

/// Bodies that only carry a confirmation message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

/// Returned by login and registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: MerchantSession,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub requires_verification: bool,
}

impl std::fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub role: Role,
}

impl RegisterRequest {
    /// Registration body for a merchant account; the role is fixed.
    #[must_use]
    pub fn merchant(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
            phone_number: None,
            role: Role::Merchant,
        }
    }
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("phone_number", &self.phone_number)
            .field("role", &self.role)
            .finish()
    }
}

/// Partial update of the server's `businessInfo`. Only the fields that are
/// set are sent; the server merges them into the stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInfoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trading_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_of_business: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industrial_classification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industrial_sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<BTreeMap<String, StoredFile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directors: Option<Vec<Director>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

/// Body of `PUT /users/profile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_info: Option<BusinessInfoPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl ProfilePatch {
    #[must_use]
    pub fn business(patch: BusinessInfoPatch) -> Self {
        Self {
            business_info: Some(patch),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn address(address: Address) -> Self {
        Self {
            address: Some(address),
            ..Self::default()
        }
    }
}

/// Storefront connection state from `GET /integrations/shopify/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyStatus {
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub store_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthUrlResponse {
    pub auth_url: String,
}

/// Counters reported by `POST /integrations/shopify/import-products`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ImportSummary {
    #[serde(default)]
    pub imported: u32,
    #[serde(default)]
    pub updated: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub total: u32,
}

/// Outcome the storefront shows next to a published product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackState {
    Success,
    RequiresAction,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Body of `POST /integrations/shopify/resource-feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceFeedback {
    pub product_id: String,
    pub state: FeedbackState,
    pub messages: Vec<FeedbackMessage>,
}
