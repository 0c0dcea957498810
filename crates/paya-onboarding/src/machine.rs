//! Navigation over [`OnboardingProgress`].
//!
//! Plain functions with no I/O. Transitions are not validated here; field
//! validation happens when a step is submitted. Every mutation stamps
//! `last_saved_at` with the caller's clock.

use chrono::{DateTime, Utc};
use paya_core::{DirectorDraft, OnboardingProgress, Step, MAX_DIRECTORS};

use crate::error::OnboardingError;

/// Jumps to `step` unconditionally. Later-step data is kept.
pub fn go_to_step(progress: &mut OnboardingProgress, step: Step, now: DateTime<Utc>) {
    progress.current_step = step;
    progress.last_saved_at = Some(now);
}

/// Moves one step back. Returns `false` on the first step.
pub fn back(progress: &mut OnboardingProgress, now: DateTime<Utc>) -> bool {
    match progress.current_step.previous() {
        Some(step) => {
            go_to_step(progress, step, now);
            true
        }
        None => false,
    }
}

pub fn mark_completed(progress: &mut OnboardingProgress, step: Step, now: DateTime<Utc>) {
    progress.completed_steps.insert(step);
    progress.last_saved_at = Some(now);
}

pub fn set_complete(progress: &mut OnboardingProgress, complete: bool, now: DateTime<Utc>) {
    progress.is_complete = complete;
    progress.last_saved_at = Some(now);
}

#[must_use]
pub fn is_step_completed(progress: &OnboardingProgress, step: Step) -> bool {
    progress.completed_steps.contains(&step)
}

/// Step 1 is always reachable; any other step needs its predecessor done.
#[must_use]
pub fn can_proceed_to(progress: &OnboardingProgress, step: Step) -> bool {
    step.previous()
        .map_or(true, |previous| is_step_completed(progress, previous))
}

/// Where the wizard should open: the review step once onboarding is
/// complete, otherwise the step after the furthest completed one.
#[must_use]
pub fn initial_step(progress: &OnboardingProgress) -> Step {
    if progress.is_complete {
        return Step::Review;
    }
    Step::ALL
        .into_iter()
        .rev()
        .find(|step| is_step_completed(progress, *step))
        .map_or(Step::BusinessInfo, |done| done.next().unwrap_or(Step::Review))
}

/// Share of the wizard reached, in percent of the five steps.
#[must_use]
pub fn progress_percentage(progress: &OnboardingProgress) -> u8 {
    progress.current_step.number() * 20
}

/// Resizes the director list to `count`, keeping the drafts already entered
/// for the first `count` directors.
///
/// # Errors
///
/// Returns [`OnboardingError::DirectorCount`] unless `1 <= count <= 10`.
pub fn set_director_count(
    progress: &mut OnboardingProgress,
    count: usize,
    now: DateTime<Utc>,
) -> Result<(), OnboardingError> {
    if !(1..=MAX_DIRECTORS).contains(&count) {
        return Err(OnboardingError::DirectorCount {
            requested: count,
            max: MAX_DIRECTORS,
        });
    }
    progress.directors.resize_with(count, DirectorDraft::default);
    progress.last_saved_at = Some(now);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn go_to_step_is_unconditional_and_stamps() {
        let mut progress = OnboardingProgress::default();
        go_to_step(&mut progress, Step::Directors, now());
        assert_eq!(progress.current_step, Step::Directors);
        assert_eq!(progress.last_saved_at, Some(now()));
    }

    #[test]
    fn back_stops_at_first_step_and_keeps_later_data() {
        let mut progress = OnboardingProgress::default();
        progress.current_step = Step::Address;
        progress.address.city = "Nairobi".to_string();

        assert!(back(&mut progress, now()));
        assert_eq!(progress.current_step, Step::BusinessInfo);
        assert_eq!(progress.address.city, "Nairobi");
        assert!(!back(&mut progress, now()));
    }

    #[test]
    fn can_proceed_requires_previous_step() {
        let mut progress = OnboardingProgress::default();
        assert!(can_proceed_to(&progress, Step::BusinessInfo));
        assert!(!can_proceed_to(&progress, Step::Address));

        mark_completed(&mut progress, Step::BusinessInfo, now());
        assert!(can_proceed_to(&progress, Step::Address));
        assert!(!can_proceed_to(&progress, Step::Documents));
    }

    #[test]
    fn initial_step_follows_furthest_completed() {
        let mut progress = OnboardingProgress::default();
        assert_eq!(initial_step(&progress), Step::BusinessInfo);

        mark_completed(&mut progress, Step::BusinessInfo, now());
        mark_completed(&mut progress, Step::Address, now());
        assert_eq!(initial_step(&progress), Step::Documents);

        mark_completed(&mut progress, Step::Directors, now());
        assert_eq!(initial_step(&progress), Step::Review);
    }

    #[test]
    fn initial_step_is_review_once_complete() {
        let mut progress = OnboardingProgress::default();
        set_complete(&mut progress, true, now());
        assert_eq!(initial_step(&progress), Step::Review);
    }

    #[test]
    fn percentage_tracks_current_step() {
        let mut progress = OnboardingProgress::default();
        assert_eq!(progress_percentage(&progress), 20);
        progress.current_step = Step::Review;
        assert_eq!(progress_percentage(&progress), 100);
    }

    #[test]
    fn director_count_is_bounded_and_preserves_drafts() {
        let mut progress = OnboardingProgress::default();
        assert!(matches!(
            set_director_count(&mut progress, 0, now()),
            Err(OnboardingError::DirectorCount { requested: 0, .. })
        ));
        assert!(set_director_count(&mut progress, 11, now()).is_err());

        set_director_count(&mut progress, 3, now()).unwrap();
        progress.directors[0].name = "Jane Doe".to_string();
        set_director_count(&mut progress, 1, now()).unwrap();
        assert_eq!(progress.directors.len(), 1);
        assert_eq!(progress.directors[0].name, "Jane Doe");
    }
}
