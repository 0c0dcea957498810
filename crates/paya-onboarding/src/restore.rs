//! Reconciles locally persisted progress with the server's business record
//! when a session becomes available.
//!
//! Identifiers come from the server whenever it has them. Business-info
//! drafts are only overwritten when the server copy is strictly newer than
//! the last local save. The pass runs once per session load; callers that
//! outlive a process persist that fact, see [`crate::ProgressStore::mark_restored`].

use chrono::{DateTime, Utc};
use paya_core::{BusinessRecord, MerchantSession, OnboardingProgress, Step};

use crate::machine;

/// What a restoration pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreOutcome {
    /// Step the wizard was positioned on.
    pub step: Option<Step>,
    /// The server record shows onboarding finished.
    pub server_complete: bool,
    /// A local "complete" flag was withdrawn because the server record says otherwise.
    pub completion_withdrawn: bool,
    /// Steps marked completed because an identifier implied them.
    pub inferred_steps: Vec<Step>,
    pub organization_id_synced: bool,
    pub owner_id_synced: bool,
    /// Local business-info drafts were replaced with the newer server copy.
    pub business_info_refreshed: bool,
}

/// One-shot guard around [`reconcile`].
#[derive(Debug, Default)]
pub struct Restoration {
    done: bool,
}

impl Restoration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A guard for a session that was already reconciled, e.g. by an
    /// earlier process.
    #[must_use]
    pub fn already_run() -> Self {
        Self { done: true }
    }

    #[must_use]
    pub fn has_run(&self) -> bool {
        self.done
    }

    /// Reconciles on the first call and returns what changed; later calls
    /// leave `progress` alone and return `None`.
    pub fn run(
        &mut self,
        progress: &mut OnboardingProgress,
        user: &MerchantSession,
        now: DateTime<Utc>,
    ) -> Option<RestoreOutcome> {
        if self.done {
            tracing::debug!("onboarding restoration already ran for this session");
            return None;
        }
        self.done = true;
        Some(reconcile(progress, user, now))
    }
}

/// Merges the server's view of `user` into `progress`.
pub fn reconcile(
    progress: &mut OnboardingProgress,
    user: &MerchantSession,
    now: DateTime<Utc>,
) -> RestoreOutcome {
    // Captured before any mutation below re-stamps it.
    let local_saved_at = progress.last_saved_at;
    let mut outcome = RestoreOutcome::default();

    let record = user.business_info.as_ref();
    if let Some(record) = record.filter(|r| r.is_complete()) {
        outcome.server_complete = true;
        machine::set_complete(progress, true, now);
        sync_identifiers(progress, record, &mut outcome);

        let server_updated_at = user.business_updated_at();
        if server_updated_at.is_some_and(|server| local_saved_at.map_or(true, |local| server > local)) {
            refresh_business_info(progress, record);
            outcome.business_info_refreshed = true;
        }
        progress.approval = record.approval();
        machine::go_to_step(progress, Step::Review, now);
        outcome.step = Some(Step::Review);

        tracing::info!(
            refreshed = outcome.business_info_refreshed,
            "server reports onboarding complete; resuming at review"
        );
        return outcome;
    }

    if let Some(record) = record {
        if progress.is_complete {
            machine::set_complete(progress, false, now);
            outcome.completion_withdrawn = true;
        }
        sync_identifiers(progress, record, &mut outcome);
        progress.approval = record.approval();
    }

    // Identifier-implied completion: an organization exists only after
    // steps 1 and 2, an owner only after step 1.
    let mut implied = Vec::new();
    if progress.organization_id.is_some() {
        implied.extend([Step::BusinessInfo, Step::Address]);
    } else if progress.owner_id.is_some() {
        implied.push(Step::BusinessInfo);
    }
    for step in implied {
        if !machine::is_step_completed(progress, step) {
            machine::mark_completed(progress, step, now);
            outcome.inferred_steps.push(step);
        }
    }

    let target = machine::initial_step(progress).max(progress.current_step);
    if target != progress.current_step {
        machine::go_to_step(progress, target, now);
    }
    outcome.step = Some(target);

    tracing::info!(
        step = target.number(),
        inferred = outcome.inferred_steps.len(),
        withdrawn = outcome.completion_withdrawn,
        "onboarding progress restored"
    );
    outcome
}

fn sync_identifiers(
    progress: &mut OnboardingProgress,
    record: &BusinessRecord,
    outcome: &mut RestoreOutcome,
) {
    if let Some(id) = record.organization_id() {
        if progress.organization_id.as_deref() != Some(id) {
            progress.organization_id = Some(id.to_string());
            outcome.organization_id_synced = true;
        }
    }
    if let Some(id) = record.owner_id() {
        if progress.owner_id.as_deref() != Some(id) {
            progress.owner_id = Some(id.to_string());
            outcome.owner_id_synced = true;
        }
    }
}

fn refresh_business_info(progress: &mut OnboardingProgress, record: &BusinessRecord) {
    let draft = &mut progress.business_info;
    let fields = [
        (&mut draft.business_name, &record.business_name),
        (&mut draft.company_number, &record.company_number),
        (&mut draft.tax_number, &record.tax_number),
        (&mut draft.business_email, &record.business_email),
    ];
    for (local, server) in fields {
        if let Some(value) = server.as_deref().filter(|v| !v.trim().is_empty()) {
            value.clone_into(local);
        }
    }
    if let Some(phone) = record.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        let code = draft.phone_country_code.trim();
        draft.phone_number = phone
            .strip_prefix(code)
            .filter(|_| !code.is_empty())
            .unwrap_or(phone)
            .to_string();
    }
}

#[cfg(test)]
#[path = "restore_test.rs"]
mod tests;
