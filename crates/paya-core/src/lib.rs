pub mod app_config;
pub mod business;
pub mod config;
pub mod dashboard;
pub mod documents;
pub mod listing;
pub mod onboarding;
pub mod orders;
pub mod products;
pub mod session;
pub mod store;
pub mod support;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, PartnerApiConfig};
pub use business::{
    Address, ApprovalGate, ApprovalSnapshot, ApprovalStatus, BusinessRecord, Director, Nationality,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use dashboard::{chart_series, ChartPoint, ChartWindow, DashboardStats};
pub use documents::{BusinessDocumentSlot, DirectorDocumentSlot, StoredFile};
pub use listing::{Identified, LocalList};
pub use onboarding::{
    AddressDraft, BusinessInfoDraft, DirectorDraft, DocumentSelection, OnboardingProgress, Step,
    MAX_DIRECTORS,
};
pub use orders::{FulfillmentStatus, Order, OrderStatus};
pub use products::{Product, ProductCategory, ProductInput, ProductStatus};
pub use session::{MerchantSession, Role};
pub use store::{KeyValueStore, StoreError};
pub use support::{Priority, SupportTicket, TicketStatus};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
