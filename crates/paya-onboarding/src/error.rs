use paya_client::ApiError;
use paya_core::{Step, StoreError};
use thiserror::Error;

/// One document whose upload failed while its siblings may have succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    /// Human-readable slot, e.g. `CR-12` or `director 2: Selfie`.
    pub document: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("step {step} is incomplete; missing or invalid: {}", .missing.join(", "))]
    Validation { step: Step, missing: Vec<String> },

    #[error("cannot submit step {requested} while the wizard is on step {current}")]
    StepMismatch { requested: Step, current: Step },

    #[error("{} document upload(s) failed ({uploaded} succeeded and were kept)", .failures.len())]
    PartialUpload {
        uploaded: usize,
        failures: Vec<UploadFailure>,
    },

    #[error("director count must be between 1 and {max}, got {requested}")]
    DirectorCount { requested: usize, max: usize },

    #[error("no director at position {0}")]
    UnknownDirector(usize),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OnboardingError {
    /// `true` when the server rejected the bearer token; callers must tear
    /// the session down.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, OnboardingError::Api(e) if e.is_unauthorized())
    }
}
