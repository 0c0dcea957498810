//! Client-owned onboarding progress and the drafts entered in each step.
//!
//! Nothing here has a server mirror; the record is persisted locally and
//! reconciled against [`BusinessRecord`](crate::business::BusinessRecord)
//! when a session starts.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::business::{ApprovalSnapshot, Nationality};
use crate::documents::{BusinessDocumentSlot, DirectorDocumentSlot, StoredFile};

/// Upper bound on the user-selected director count.
pub const MAX_DIRECTORS: usize = 10;

/// The five wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    BusinessInfo,
    Address,
    Documents,
    Directors,
    Review,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::BusinessInfo,
        Step::Address,
        Step::Documents,
        Step::Directors,
        Step::Review,
    ];

    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Step::BusinessInfo => 1,
            Step::Address => 2,
            Step::Documents => 3,
            Step::Directors => 4,
            Step::Review => 5,
        }
    }

    #[must_use]
    pub fn from_number(n: u8) -> Option<Step> {
        Step::ALL.into_iter().find(|step| step.number() == n)
    }

    #[must_use]
    pub fn next(self) -> Option<Step> {
        Step::from_number(self.number() + 1)
    }

    #[must_use]
    pub fn previous(self) -> Option<Step> {
        self.number().checked_sub(1).and_then(Step::from_number)
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Step::BusinessInfo => "Business information",
            Step::Address => "Business address",
            Step::Documents => "Business documents",
            Step::Directors => "Directors",
            Step::Review => "Review",
        }
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Step::from_number(value).ok_or_else(|| format!("step must be between 1 and 5, got {value}"))
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> u8 {
        step.number()
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

/// Step 1 form. Empty strings mean "not filled in yet".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessInfoDraft {
    pub business_name: String,
    pub company_number: String,
    pub registration_date: Option<NaiveDate>,
    pub phone_country_code: String,
    pub phone_number: String,
    pub business_email: String,
    pub tax_number: String,
    pub trading_name: String,
    pub business_type: String,
    pub type_of_business: String,
    pub industrial_classification: String,
    pub industrial_sector: String,
    pub website: String,
    pub description: String,
}

impl Default for BusinessInfoDraft {
    fn default() -> Self {
        Self {
            business_name: String::new(),
            company_number: String::new(),
            registration_date: None,
            phone_country_code: "+254".to_string(),
            phone_number: String::new(),
            business_email: String::new(),
            tax_number: String::new(),
            trading_name: String::new(),
            business_type: String::new(),
            type_of_business: String::new(),
            industrial_classification: String::new(),
            industrial_sector: String::new(),
            website: String::new(),
            description: String::new(),
        }
    }
}

impl BusinessInfoDraft {
    /// Full international phone number, e.g. `+254712345678`.
    #[must_use]
    pub fn full_phone(&self) -> String {
        format!("{}{}", self.phone_country_code.trim(), self.phone_number.trim())
    }
}

/// Step 2 form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressDraft {
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub county: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for AddressDraft {
    fn default() -> Self {
        Self {
            address_line1: String::new(),
            address_line2: String::new(),
            city: String::new(),
            county: String::new(),
            postal_code: String::new(),
            country: "Kenya".to_string(),
        }
    }
}

/// A file the merchant picked for a document slot, and the server
/// descriptor once it has been uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSelection {
    pub path: PathBuf,
    #[serde(default)]
    pub uploaded: Option<StoredFile>,
}

impl DocumentSelection {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            uploaded: None,
        }
    }

    #[must_use]
    pub fn is_uploaded(&self) -> bool {
        self.uploaded.as_ref().is_some_and(StoredFile::is_stored)
    }
}

/// Step 4 form for one director.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectorDraft {
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub nationality: Nationality,
    pub kra_pin: String,
    pub address: String,
    pub documents: BTreeMap<DirectorDocumentSlot, DocumentSelection>,
}

/// Locally persisted wizard state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingProgress {
    pub current_step: Step,
    pub completed_steps: BTreeSet<Step>,
    pub is_complete: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub organization_id: Option<String>,
    pub owner_id: Option<String>,
    pub approval: ApprovalSnapshot,
    pub business_info: BusinessInfoDraft,
    pub address: AddressDraft,
    pub business_documents: BTreeMap<BusinessDocumentSlot, DocumentSelection>,
    pub directors: Vec<DirectorDraft>,
}

impl Default for OnboardingProgress {
    fn default() -> Self {
        Self {
            current_step: Step::BusinessInfo,
            completed_steps: BTreeSet::new(),
            is_complete: false,
            last_saved_at: None,
            organization_id: None,
            owner_id: None,
            approval: ApprovalSnapshot::default(),
            business_info: BusinessInfoDraft::default(),
            address: AddressDraft::default(),
            business_documents: BTreeMap::new(),
            directors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_numbers_round_trip_and_reject_out_of_range() {
        for step in Step::ALL {
            assert_eq!(Step::from_number(step.number()), Some(step));
        }
        assert!(Step::try_from(0).is_err());
        assert!(Step::try_from(6).is_err());
        assert_eq!(Step::BusinessInfo.previous(), None);
        assert_eq!(Step::Review.next(), None);
        assert_eq!(Step::Documents.next(), Some(Step::Directors));
    }

    #[test]
    fn progress_serializes_steps_as_numbers() {
        let mut progress = OnboardingProgress::default();
        progress.completed_steps.insert(Step::BusinessInfo);
        progress.completed_steps.insert(Step::Address);
        progress.current_step = Step::Documents;

        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["currentStep"], 3);
        assert_eq!(json["completedSteps"], serde_json::json!([1, 2]));
    }

    #[test]
    fn progress_tolerates_missing_fields() {
        let progress: OnboardingProgress =
            serde_json::from_str(r#"{"currentStep": 3}"#).expect("partial record should parse");
        assert_eq!(progress.current_step, Step::Documents);
        assert!(progress.completed_steps.is_empty());
        assert_eq!(progress.address.country, "Kenya");
        assert_eq!(progress.business_info.phone_country_code, "+254");
    }

    #[test]
    fn progress_rejects_invalid_step() {
        let result = serde_json::from_str::<OnboardingProgress>(r#"{"currentStep": 9}"#);
        assert!(result.is_err());
    }
}
