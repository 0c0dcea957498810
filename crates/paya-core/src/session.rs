use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::business::{Address, BusinessRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Merchant,
    Customer,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Merchant => write!(f, "merchant"),
            Role::Customer => write!(f, "customer"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// The logged-in account as returned by `/auth/me` and `/users/profile`.
///
/// Held for the lifetime of one session; dropped on logout or on any 401.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSession {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub business_info: Option<BusinessRecord>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MerchantSession {
    #[must_use]
    pub fn is_merchant(&self) -> bool {
        self.role == Role::Merchant
    }

    /// Business name when known, otherwise the person's full name, otherwise
    /// the email address.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = self
            .business_info
            .as_ref()
            .and_then(|b| b.business_name.as_deref())
            .filter(|n| !n.trim().is_empty())
        {
            return name.to_string();
        }
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.email.clone()
        } else {
            full
        }
    }

    #[must_use]
    pub fn business_complete(&self) -> bool {
        self.business_info
            .as_ref()
            .is_some_and(BusinessRecord::is_complete)
    }

    /// When the server last touched the business data: the record's own
    /// `lastUpdated` if present, otherwise the account's `updatedAt`.
    #[must_use]
    pub fn business_updated_at(&self) -> Option<DateTime<Utc>> {
        self.business_info
            .as_ref()
            .and_then(|b| b.last_updated)
            .or(self.updated_at)
    }
}
