//! Server-owned business record attached to a merchant account.
//!
//! The client never creates these; it fetches them from the profile
//! endpoints and treats them as the source of truth for identifiers and
//! approval state.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::documents::{BusinessDocumentSlot, DirectorDocumentSlot, StoredFile};

/// Server-determined state of an approval gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "pending"),
            ApprovalStatus::Approved => write!(f, "approved"),
            ApprovalStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// One of the two independent approval gates (platform, banking partner).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalGate {
    #[serde(default)]
    pub status: ApprovalStatus,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// Compact view of both approval gates plus the payout wallet flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalSnapshot {
    pub platform: ApprovalStatus,
    pub bank: ApprovalStatus,
    pub wallet_connected: bool,
}

impl ApprovalSnapshot {
    /// The payout wallet is only usable once both gates have approved.
    #[must_use]
    pub fn wallet_enabled(&self) -> bool {
        self.platform == ApprovalStatus::Approved && self.bank == ApprovalStatus::Approved
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.platform == ApprovalStatus::Rejected || self.bank == ApprovalStatus::Rejected
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nationality {
    #[default]
    Kenyan,
    #[serde(rename = "USA")]
    Usa,
    #[serde(rename = "UK")]
    Uk,
    Tanzanian,
    #[serde(rename = "South African")]
    SouthAfrican,
}

impl std::str::FromStr for Nationality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kenyan" => Ok(Nationality::Kenyan),
            "usa" => Ok(Nationality::Usa),
            "uk" => Ok(Nationality::Uk),
            "tanzanian" => Ok(Nationality::Tanzanian),
            "south african" | "south-african" => Ok(Nationality::SouthAfrican),
            other => Err(format!(
                "unknown nationality '{other}'; expected Kenyan, USA, UK, Tanzanian or South African"
            )),
        }
    }
}

/// Server copy of a company director.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Director {
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "lenient_date")]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub nationality: Nationality,
    #[serde(default)]
    pub kra_pin: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub documents: BTreeMap<DirectorDocumentSlot, StoredFile>,
}

/// Postal address. Absent fields are left out on the wire because the
/// server merges address patches into what it already has.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Business details as the server last stored them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRecord {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub company_number: Option<String>,
    #[serde(default)]
    pub business_email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub tax_number: Option<String>,
    #[serde(default)]
    pub trading_name: Option<String>,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub type_of_business: Option<String>,
    #[serde(default)]
    pub registration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub documents: BTreeMap<String, StoredFile>,
    #[serde(default)]
    pub directors: Vec<Director>,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub paya_approval: Option<ApprovalGate>,
    #[serde(default)]
    pub bank_approval: Option<ApprovalGate>,
    #[serde(default)]
    pub wallet_connected: bool,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

fn non_blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl BusinessRecord {
    /// The single signal the client trusts for "onboarding finished on the
    /// server": a business name, a company number and at least one director.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        non_blank(self.business_name.as_deref())
            && non_blank(self.company_number.as_deref())
            && !self.directors.is_empty()
    }

    /// Approval state of both gates. A missing platform gate falls back to
    /// the legacy top-level `approvalStatus`; a missing bank gate is pending.
    #[must_use]
    pub fn approval(&self) -> ApprovalSnapshot {
        ApprovalSnapshot {
            platform: self
                .paya_approval
                .as_ref()
                .map_or(self.approval_status, |gate| gate.status),
            bank: self
                .bank_approval
                .as_ref()
                .map(|gate| gate.status)
                .unwrap_or_default(),
            wallet_connected: self.wallet_connected,
        }
    }

    /// Stored descriptor for a business document slot, ignoring empty
    /// placeholders.
    #[must_use]
    pub fn document(&self, slot: BusinessDocumentSlot) -> Option<&StoredFile> {
        self.documents
            .get(slot.key())
            .filter(|file| file.is_stored())
    }

    #[must_use]
    pub fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref().filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Accepts both `"1980-05-01"` and full timestamps such as
/// `"1980-05-01T00:00:00.000Z"`, keeping only the calendar date.
mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };
        let date_part = raw.get(..10).unwrap_or(&raw);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: serde_json::Value) -> BusinessRecord {
        serde_json::from_value(json).expect("business record should parse")
    }

    #[test]
    fn complete_requires_name_number_and_directors() {
        let full = record(serde_json::json!({
            "businessName": "Acme Ltd",
            "companyNumber": "PVT-123",
            "directors": [{ "name": "Jane Doe" }]
        }));
        assert!(full.is_complete());

        let no_directors = record(serde_json::json!({
            "businessName": "Acme Ltd",
            "companyNumber": "PVT-123",
            "directors": []
        }));
        assert!(!no_directors.is_complete());

        let blank_name = record(serde_json::json!({
            "businessName": "   ",
            "companyNumber": "PVT-123",
            "directors": [{ "name": "Jane Doe" }]
        }));
        assert!(!blank_name.is_complete());
    }

    #[test]
    fn approval_falls_back_to_legacy_status() {
        let rec = record(serde_json::json!({ "approvalStatus": "approved" }));
        let snapshot = rec.approval();
        assert_eq!(snapshot.platform, ApprovalStatus::Approved);
        assert_eq!(snapshot.bank, ApprovalStatus::Pending);
        assert!(!snapshot.wallet_enabled());
    }

    #[test]
    fn wallet_enabled_only_when_both_gates_approved() {
        let rec = record(serde_json::json!({
            "payaApproval": { "status": "approved" },
            "bankApproval": { "status": "approved" },
            "walletConnected": true
        }));
        assert!(rec.approval().wallet_enabled());
    }

    #[test]
    fn director_dob_accepts_full_timestamp() {
        let director: Director = serde_json::from_value(serde_json::json!({
            "name": "Jane Doe",
            "dob": "1980-05-01T00:00:00.000Z",
            "nationality": "South African",
            "kraPin": "A123456789B"
        }))
        .unwrap();
        assert_eq!(director.dob, NaiveDate::from_ymd_opt(1980, 5, 1));
        assert_eq!(director.nationality, Nationality::SouthAfrican);
    }

    #[test]
    fn placeholder_documents_are_ignored() {
        let rec = record(serde_json::json!({
            "documents": {
                "cr12": { "filename": null },
                "businessPermit": { "filename": "permit.pdf", "path": "/uploads/permit.pdf" }
            }
        }));
        assert!(rec.document(BusinessDocumentSlot::Cr12).is_none());
        assert!(rec.document(BusinessDocumentSlot::BusinessPermit).is_some());
    }

    #[test]
    fn nationality_parses_case_insensitively() {
        assert_eq!("usa".parse::<Nationality>(), Ok(Nationality::Usa));
        assert!("martian".parse::<Nationality>().is_err());
    }
}
