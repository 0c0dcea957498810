//! Persistence of [`OnboardingProgress`] in the durable key/value store.
//!
//! The full record lives under `onboarding:state`. The current step number
//! and the last-save timestamp are mirrored under their own keys so they can
//! be read without decoding the record, and so a store that only ever held
//! the step number still resumes at that step.
//!
//! `onboarding:restoredFor` records which user was reconciled in the current
//! session. The session manager drops it on login and logout, so it outlives
//! a single wizard but not the session. `reset` leaves it alone.

use chrono::{DateTime, Utc};
use paya_core::store::{
    ONBOARDING_LAST_SAVED_KEY, ONBOARDING_RESTORED_KEY, ONBOARDING_STATE_KEY, ONBOARDING_STEP_KEY,
};
use paya_core::{KeyValueStore, OnboardingProgress, Step, StoreError};

#[derive(Debug, Clone)]
pub struct ProgressStore {
    store: KeyValueStore,
}

impl ProgressStore {
    #[must_use]
    pub fn new(store: KeyValueStore) -> Self {
        Self { store }
    }

    /// Loads the saved record, or a fresh one when nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the state file cannot be read or a stored
    /// value does not decode.
    pub fn load(&self) -> Result<OnboardingProgress, StoreError> {
        if let Some(progress) = self.store.get::<OnboardingProgress>(ONBOARDING_STATE_KEY)? {
            return Ok(progress);
        }

        let mut progress = OnboardingProgress::default();
        if let Some(step) = self
            .store
            .get::<u8>(ONBOARDING_STEP_KEY)?
            .and_then(Step::from_number)
        {
            progress.current_step = step;
        }
        progress.last_saved_at = self.last_saved()?;
        Ok(progress)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the state file cannot be rewritten.
    pub fn save(&self, progress: &OnboardingProgress) -> Result<(), StoreError> {
        self.store.set(ONBOARDING_STATE_KEY, progress)?;
        self.store
            .set(ONBOARDING_STEP_KEY, &progress.current_step.number())?;
        match progress.last_saved_at {
            Some(at) => self.store.set(ONBOARDING_LAST_SAVED_KEY, &at)?,
            None => {
                self.store.remove(ONBOARDING_LAST_SAVED_KEY)?;
            }
        }
        tracing::debug!(
            step = progress.current_step.number(),
            completed = progress.completed_steps.len(),
            "onboarding progress saved"
        );
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the stored timestamp does not decode.
    pub fn last_saved(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        self.store.get(ONBOARDING_LAST_SAVED_KEY)
    }

    /// Id of the user already reconciled in this session, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the stored marker does not decode.
    pub fn restored_for(&self) -> Result<Option<String>, StoreError> {
        self.store.get(ONBOARDING_RESTORED_KEY)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the state file cannot be rewritten.
    pub fn mark_restored(&self, user_id: &str) -> Result<(), StoreError> {
        self.store.set(ONBOARDING_RESTORED_KEY, user_id)
    }

    /// Forgets all onboarding progress.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the state file cannot be rewritten.
    pub fn reset(&self) -> Result<(), StoreError> {
        for key in [
            ONBOARDING_STATE_KEY,
            ONBOARDING_STEP_KEY,
            ONBOARDING_LAST_SAVED_KEY,
        ] {
            self.store.remove(key)?;
        }
        tracing::info!("onboarding progress reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> ProgressStore {
        ProgressStore::new(KeyValueStore::open(dir.path()))
    }

    #[test]
    fn empty_store_loads_fresh_progress() {
        let dir = TempDir::new().unwrap();
        let progress = store(&dir).load().unwrap();
        assert_eq!(progress, OnboardingProgress::default());
    }

    #[test]
    fn save_then_load_keeps_record_and_mirrors_keys() {
        let dir = TempDir::new().unwrap();
        let progress_store = store(&dir);
        let saved_at = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();

        let mut progress = OnboardingProgress {
            current_step: Step::Directors,
            last_saved_at: Some(saved_at),
            organization_id: Some("org-1".to_string()),
            ..OnboardingProgress::default()
        };
        progress.completed_steps.insert(Step::BusinessInfo);
        progress_store.save(&progress).unwrap();

        assert_eq!(progress_store.load().unwrap(), progress);
        assert_eq!(progress_store.last_saved().unwrap(), Some(saved_at));

        let raw = KeyValueStore::open(dir.path());
        assert_eq!(raw.get::<u8>(ONBOARDING_STEP_KEY).unwrap(), Some(4));
    }

    #[test]
    fn step_mirror_alone_restores_current_step() {
        let dir = TempDir::new().unwrap();
        KeyValueStore::open(dir.path())
            .set(ONBOARDING_STEP_KEY, &3u8)
            .unwrap();

        let progress = store(&dir).load().unwrap();
        assert_eq!(progress.current_step, Step::Documents);
        assert!(progress.completed_steps.is_empty());
    }

    #[test]
    fn reset_removes_every_key() {
        let dir = TempDir::new().unwrap();
        let progress_store = store(&dir);
        let progress = OnboardingProgress {
            last_saved_at: Some(Utc::now()),
            ..OnboardingProgress::default()
        };
        progress_store.save(&progress).unwrap();
        progress_store.reset().unwrap();

        let raw = KeyValueStore::open(dir.path());
        for key in [ONBOARDING_STATE_KEY, ONBOARDING_STEP_KEY, ONBOARDING_LAST_SAVED_KEY] {
            assert!(!raw.contains(key).unwrap(), "{key} survived reset");
        }
    }

    #[test]
    fn restoration_marker_survives_reset() {
        let dir = TempDir::new().unwrap();
        let progress_store = store(&dir);
        assert_eq!(progress_store.restored_for().unwrap(), None);

        progress_store.mark_restored("u-1").unwrap();
        progress_store.reset().unwrap();

        assert_eq!(progress_store.restored_for().unwrap().as_deref(), Some("u-1"));
        assert_eq!(store(&dir).restored_for().unwrap().as_deref(), Some("u-1"));
    }
}
