pub mod error;
pub mod machine;
pub mod restore;
pub mod store;
pub mod validate;
pub mod wizard;

pub use error::{OnboardingError, UploadFailure};
pub use restore::{reconcile, RestoreOutcome, Restoration};
pub use store::ProgressStore;
pub use validate::{is_valid_email, validate_step};
pub use wizard::{OnboardingWizard, SubmitOutcome};
