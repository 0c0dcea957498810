pub mod client;
pub mod error;
pub mod partner;
pub mod session;
pub mod types;

pub use client::{normalise_shop_domain, MerchantClient, OrderFilter, ProductFilter};
pub use error::ApiError;
pub use partner::{
    AddDirectorRequest, CreateOrganizationRequest, CreateOwnerRequest, PartnerAddress,
    PartnerClient, PartnerOrganization,
};
pub use session::{GuardError, Session, SessionEvent, SessionManager, LOGIN_LOCATION};
pub use types::{
    AuthResponse, BusinessInfoPatch, FeedbackState, ImportSummary, Page, Pagination,
    ProfilePatch, RegisterRequest, ResourceFeedback, ShopifyStatus,
};
