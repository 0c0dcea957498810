//! Required-field checks run before a step's network side effect.

use std::sync::LazyLock;

use paya_core::{
    AddressDraft, BusinessDocumentSlot, BusinessInfoDraft, DirectorDocumentSlot, DirectorDraft,
    OnboardingProgress, Step, MAX_DIRECTORS,
};
use regex::Regex;

use crate::error::OnboardingError;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("valid regex")
});

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Checks the fields `step` requires.
///
/// # Errors
///
/// Returns [`OnboardingError::Validation`] listing every missing or invalid
/// field.
pub fn validate_step(progress: &OnboardingProgress, step: Step) -> Result<(), OnboardingError> {
    let missing = match step {
        Step::BusinessInfo => business_info(&progress.business_info),
        Step::Address => address(&progress.address),
        Step::Documents => documents(progress),
        Step::Directors => directors(&progress.directors),
        Step::Review => Vec::new(),
    };
    if missing.is_empty() {
        Ok(())
    } else {
        Err(OnboardingError::Validation { step, missing })
    }
}

#[must_use]
pub fn business_info(draft: &BusinessInfoDraft) -> Vec<String> {
    let mut missing = Vec::new();
    let required = [
        ("business name", &draft.business_name),
        ("company number", &draft.company_number),
        ("phone number", &draft.phone_number),
        ("business email", &draft.business_email),
        ("tax number", &draft.tax_number),
        ("business type", &draft.business_type),
        ("type of business", &draft.type_of_business),
    ];
    for (label, value) in required {
        if blank(value) {
            missing.push(label.to_string());
        }
    }
    if !blank(&draft.business_email) && !is_valid_email(&draft.business_email) {
        missing.push("business email (invalid format)".to_string());
    }
    missing
}

#[must_use]
pub fn address(draft: &AddressDraft) -> Vec<String> {
    [
        ("address line 1", &draft.address_line1),
        ("city", &draft.city),
        ("county", &draft.county),
    ]
    .into_iter()
    .filter(|(_, value)| blank(value))
    .map(|(label, _)| label.to_string())
    .collect()
}

/// Every business document needs a selected file or an earlier upload.
#[must_use]
pub fn documents(progress: &OnboardingProgress) -> Vec<String> {
    BusinessDocumentSlot::ALL
        .into_iter()
        .filter(|slot| !progress.business_documents.contains_key(slot))
        .map(|slot| slot.label().to_string())
        .collect()
}

#[must_use]
pub fn directors(drafts: &[DirectorDraft]) -> Vec<String> {
    if drafts.is_empty() || drafts.len() > MAX_DIRECTORS {
        return vec![format!("between 1 and {MAX_DIRECTORS} directors")];
    }
    let mut missing = Vec::new();
    for (index, draft) in drafts.iter().enumerate() {
        let who = format!("director {}", index + 1);
        for (label, value) in [
            ("name", &draft.name),
            ("KRA PIN", &draft.kra_pin),
            ("address", &draft.address),
        ] {
            if blank(value) {
                missing.push(format!("{who}: {label}"));
            }
        }
        if draft.dob.is_none() {
            missing.push(format!("{who}: date of birth"));
        }
        for slot in DirectorDocumentSlot::ALL {
            if slot.is_required() && !draft.documents.contains_key(&slot) {
                missing.push(format!("{who}: {}", slot.label()));
            }
        }
    }
    missing
}
