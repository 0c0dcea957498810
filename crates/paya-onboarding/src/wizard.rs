//! The onboarding wizard: local drafts plus the network side effect of
//! submitting each step.
//!
//! A step advances only after its side effect succeeds. Progress is saved
//! after every change, including partial results such as documents that
//! uploaded while a sibling upload failed.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use paya_client::{
    ApiError, BusinessInfoPatch, CreateOrganizationRequest, CreateOwnerRequest, MerchantClient,
    PartnerAddress, PartnerClient, ProfilePatch, Session,
};
use paya_core::{
    Address, AddressDraft, ApprovalStatus, BusinessDocumentSlot, BusinessInfoDraft, Director,
    DirectorDocumentSlot, DirectorDraft, DocumentSelection, MerchantSession, OnboardingProgress,
    Step, StoredFile,
};

use crate::error::{OnboardingError, UploadFailure};
use crate::machine;
use crate::restore::{RestoreOutcome, Restoration};
use crate::store::ProgressStore;
use crate::validate::validate_step;

const BUSINESS_CATEGORY: &str = "business";
const DIRECTOR_CATEGORY: &str = "director";

/// Result of a successful [`OnboardingWizard::submit_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub submitted: Step,
    /// Step the wizard is on afterwards.
    pub current: Step,
    pub complete: bool,
}

pub struct OnboardingWizard {
    client: MerchantClient,
    partner: Option<PartnerClient>,
    store: ProgressStore,
    user: MerchantSession,
    progress: OnboardingProgress,
    restoration: Restoration,
}

impl std::fmt::Debug for OnboardingWizard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnboardingWizard")
            .field("user_id", &self.user.id)
            .field("partner", &self.partner.is_some())
            .field("current_step", &self.progress.current_step)
            .field("restored", &self.restoration.has_run())
            .finish_non_exhaustive()
    }
}

impl OnboardingWizard {
    /// Opens the wizard for `session` with the progress saved in `store`.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardingError::Store`] if saved progress cannot be read.
    pub fn open(
        session: &Session,
        partner: Option<PartnerClient>,
        store: ProgressStore,
    ) -> Result<Self, OnboardingError> {
        let progress = store.load()?;
        let user = session.user().clone();
        let restoration = if store.restored_for()?.as_deref() == Some(user.id.as_str()) {
            Restoration::already_run()
        } else {
            Restoration::new()
        };
        Ok(Self {
            client: session.client().clone(),
            partner,
            store,
            user,
            progress,
            restoration,
        })
    }

    #[must_use]
    pub fn progress(&self) -> &OnboardingProgress {
        &self.progress
    }

    /// The account as of the last profile response.
    #[must_use]
    pub fn user(&self) -> &MerchantSession {
        &self.user
    }

    /// Reconciles saved progress with the server record. Only the first call
    /// in a session has any effect, including across wizards opened on the
    /// same store.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardingError::Store`] if the reconciled progress or the
    /// restoration marker cannot be saved.
    pub fn restore(&mut self) -> Result<Option<RestoreOutcome>, OnboardingError> {
        let outcome = self
            .restoration
            .run(&mut self.progress, &self.user, Utc::now());
        if outcome.is_some() {
            self.save()?;
            self.store.mark_restored(&self.user.id)?;
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns [`OnboardingError::Store`] if progress cannot be saved.
    pub fn edit_business_info(
        &mut self,
        edit: impl FnOnce(&mut BusinessInfoDraft),
    ) -> Result<(), OnboardingError> {
        edit(&mut self.progress.business_info);
        self.touch_and_save()
    }

    /// # Errors
    ///
    /// Returns [`OnboardingError::Store`] if progress cannot be saved.
    pub fn edit_address(&mut self, edit: impl FnOnce(&mut AddressDraft)) -> Result<(), OnboardingError> {
        edit(&mut self.progress.address);
        self.touch_and_save()
    }

    /// Picks the file for a business document slot. Re-selecting the file
    /// that was already uploaded keeps the upload.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardingError::Store`] if progress cannot be saved.
    pub fn select_business_document(
        &mut self,
        slot: BusinessDocumentSlot,
        path: impl Into<PathBuf>,
    ) -> Result<(), OnboardingError> {
        reselect(&mut self.progress.business_documents, slot, path.into());
        self.touch_and_save()
    }

    /// # Errors
    ///
    /// Returns [`OnboardingError::DirectorCount`] unless `1 <= count <= 10`,
    /// or [`OnboardingError::Store`] if progress cannot be saved.
    pub fn set_director_count(&mut self, count: usize) -> Result<(), OnboardingError> {
        machine::set_director_count(&mut self.progress, count, Utc::now())?;
        self.save()
    }

    /// Edits the director at zero-based `index`.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardingError::UnknownDirector`] when `index` is past the
    /// director count, or [`OnboardingError::Store`] if progress cannot be
    /// saved.
    pub fn edit_director(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut DirectorDraft),
    ) -> Result<(), OnboardingError> {
        let director = self
            .progress
            .directors
            .get_mut(index)
            .ok_or(OnboardingError::UnknownDirector(index))?;
        edit(director);
        self.touch_and_save()
    }

    /// # Errors
    ///
    /// Same as [`OnboardingWizard::edit_director`].
    pub fn select_director_document(
        &mut self,
        index: usize,
        slot: DirectorDocumentSlot,
        path: impl Into<PathBuf>,
    ) -> Result<(), OnboardingError> {
        let path = path.into();
        self.edit_director(index, |director| reselect(&mut director.documents, slot, path))
    }

    /// Jumps to `step` without validation.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardingError::Store`] if progress cannot be saved.
    pub fn go_to_step(&mut self, step: Step) -> Result<(), OnboardingError> {
        machine::go_to_step(&mut self.progress, step, Utc::now());
        self.save()
    }

    /// Moves one step back; returns `false` on the first step.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardingError::Store`] if progress cannot be saved.
    pub fn back(&mut self) -> Result<bool, OnboardingError> {
        let moved = machine::back(&mut self.progress, Utc::now());
        if moved {
            self.save()?;
        }
        Ok(moved)
    }

    /// Discards all local progress.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardingError::Store`] if the store cannot be rewritten.
    pub fn reset(&mut self) -> Result<(), OnboardingError> {
        self.store.reset()?;
        self.progress = OnboardingProgress::default();
        Ok(())
    }

    /// Validates `step`, performs its side effect against the server and,
    /// on success, marks it completed and advances.
    ///
    /// # Errors
    ///
    /// - [`OnboardingError::StepMismatch`] if `step` is not the current step.
    /// - [`OnboardingError::Validation`] before any request is issued.
    /// - [`OnboardingError::PartialUpload`] when some document uploads
    ///   failed; the successful ones stay recorded.
    /// - [`OnboardingError::Api`] for any failed request, including 401.
    /// - [`OnboardingError::Store`] if progress cannot be saved.
    pub async fn submit_step(&mut self, step: Step) -> Result<SubmitOutcome, OnboardingError> {
        let current = self.progress.current_step;
        if step != current {
            return Err(OnboardingError::StepMismatch {
                requested: step,
                current,
            });
        }
        validate_step(&self.progress, step)?;

        tracing::info!(step = step.number(), "submitting onboarding step");
        match step {
            Step::BusinessInfo => self.submit_business_info().await?,
            Step::Address => self.submit_address().await?,
            Step::Documents => self.submit_documents().await?,
            Step::Directors => self.submit_directors().await?,
            Step::Review => self.submit_review().await?,
        }

        let now = Utc::now();
        machine::mark_completed(&mut self.progress, step, now);
        if step == Step::Directors {
            machine::set_complete(&mut self.progress, true, now);
        }
        if let Some(next) = step.next() {
            machine::go_to_step(&mut self.progress, next, now);
        }
        self.save()?;

        let outcome = SubmitOutcome {
            submitted: step,
            current: self.progress.current_step,
            complete: self.progress.is_complete,
        };
        tracing::info!(
            step = step.number(),
            current = outcome.current.number(),
            complete = outcome.complete,
            "onboarding step submitted"
        );
        Ok(outcome)
    }

    async fn submit_business_info(&mut self) -> Result<(), OnboardingError> {
        if let Some(partner) = &self.partner {
            if self.progress.owner_id.is_none() {
                // Saved before the profile PUT so a retry never creates a
                // second owner. The step stays incomplete if the PUT fails,
                // but restoration in a later session reads the saved owner
                // id as a finished step 1.
                let owner_id = partner.create_owner(&self.owner_request()).await?;
                self.progress.owner_id = Some(owner_id);
                self.progress.last_saved_at = Some(Utc::now());
                self.save()?;
            }
        }

        let patch = business_info_patch(&self.progress);
        self.user = self
            .client
            .update_profile(&ProfilePatch::business(patch))
            .await?;
        Ok(())
    }

    async fn submit_address(&mut self) -> Result<(), OnboardingError> {
        if let Some(partner) = &self.partner {
            if self.progress.organization_id.is_none() {
                if let Some(owner_id) = self.progress.owner_id.clone() {
                    let request = organization_request(&self.progress, &owner_id);
                    let organization_id = partner.create_organization(&request).await?;
                    self.progress.organization_id = Some(organization_id);
                    self.progress.last_saved_at = Some(Utc::now());
                    self.save()?;
                } else {
                    tracing::warn!("no partner owner recorded; skipping organization creation");
                }
            }
        }

        let business_info = self
            .progress
            .organization_id
            .clone()
            .map(|organization_id| BusinessInfoPatch {
                organization_id: Some(organization_id),
                ..BusinessInfoPatch::default()
            });
        let patch = ProfilePatch {
            address: Some(address_from_draft(&self.progress.address)),
            business_info,
            ..ProfilePatch::default()
        };
        self.user = self.client.update_profile(&patch).await?;
        Ok(())
    }

    async fn submit_documents(&mut self) -> Result<(), OnboardingError> {
        let jobs: Vec<_> = self
            .progress
            .business_documents
            .iter()
            .filter(|(_, selection)| !selection.is_uploaded())
            .map(|(slot, selection)| (*slot, selection.path.clone(), slot.key()))
            .collect();

        let results = upload_concurrently(&self.client, jobs, BUSINESS_CATEGORY).await;
        let mut batch = BatchResult::default();
        for (slot, result) in results {
            match result {
                Ok(file) => {
                    if let Some(selection) = self.progress.business_documents.get_mut(&slot) {
                        selection.uploaded = Some(file);
                    }
                    batch.uploaded += 1;
                }
                Err(e) => batch.fail(slot.label().to_string(), e),
            }
        }
        if batch.uploaded > 0 {
            self.touch_and_save()?;
        }
        batch.finish()?;

        let documents: BTreeMap<String, StoredFile> = self
            .progress
            .business_documents
            .iter()
            .filter_map(|(slot, selection)| {
                selection
                    .uploaded
                    .clone()
                    .map(|file| (slot.key().to_string(), file))
            })
            .collect();
        let patch = BusinessInfoPatch {
            documents: Some(documents),
            ..BusinessInfoPatch::default()
        };
        self.user = self
            .client
            .update_profile(&ProfilePatch::business(patch))
            .await?;
        Ok(())
    }

    async fn submit_directors(&mut self) -> Result<(), OnboardingError> {
        let jobs: Vec<_> = self
            .progress
            .directors
            .iter()
            .enumerate()
            .flat_map(|(index, director)| {
                director
                    .documents
                    .iter()
                    .filter(|(_, selection)| !selection.is_uploaded())
                    .map(move |(slot, selection)| ((index, *slot), selection.path.clone(), slot.key()))
            })
            .collect();

        let results = upload_concurrently(&self.client, jobs, DIRECTOR_CATEGORY).await;
        let mut batch = BatchResult::default();
        for ((index, slot), result) in results {
            match result {
                Ok(file) => {
                    if let Some(selection) = self
                        .progress
                        .directors
                        .get_mut(index)
                        .and_then(|director| director.documents.get_mut(&slot))
                    {
                        selection.uploaded = Some(file);
                    }
                    batch.uploaded += 1;
                }
                Err(e) => batch.fail(format!("director {}: {}", index + 1, slot.label()), e),
            }
        }
        if batch.uploaded > 0 {
            self.touch_and_save()?;
        }
        batch.finish()?;

        let patch = BusinessInfoPatch {
            directors: Some(self.progress.directors.iter().map(director_from_draft).collect()),
            approval_status: Some(ApprovalStatus::Pending),
            ..BusinessInfoPatch::default()
        };
        self.user = self
            .client
            .update_profile(&ProfilePatch::business(patch))
            .await?;
        self.record_approval();
        Ok(())
    }

    async fn submit_review(&mut self) -> Result<(), OnboardingError> {
        self.user = self.client.get_profile().await?;
        self.record_approval();
        Ok(())
    }

    fn record_approval(&mut self) {
        if let Some(record) = &self.user.business_info {
            self.progress.approval = record.approval();
        }
    }

    fn owner_request(&self) -> CreateOwnerRequest {
        let info = &self.progress.business_info;
        CreateOwnerRequest {
            first_name: self
                .user
                .first_name
                .clone()
                .unwrap_or_else(|| info.business_name.clone()),
            last_name: self.user.last_name.clone().unwrap_or_default(),
            email: self.user.email.clone(),
            phone: info.full_phone(),
            id_number: None,
            kra_pin: non_empty(&info.tax_number),
        }
    }

    fn touch_and_save(&mut self) -> Result<(), OnboardingError> {
        self.progress.last_saved_at = Some(Utc::now());
        self.save()
    }

    fn save(&self) -> Result<(), OnboardingError> {
        self.store.save(&self.progress)?;
        Ok(())
    }
}

/// Successes and failures of one concurrent upload batch.
#[derive(Default)]
struct BatchResult {
    uploaded: usize,
    failures: Vec<UploadFailure>,
    unauthorized: bool,
}

impl BatchResult {
    fn fail(&mut self, document: String, error: ApiError) {
        tracing::warn!(document = %document, error = %error, "document upload failed");
        self.unauthorized |= error.is_unauthorized();
        self.failures.push(UploadFailure {
            document,
            message: error.to_string(),
        });
    }

    /// A 401 outranks the per-document failures so the session is torn down.
    fn finish(self) -> Result<(), OnboardingError> {
        if self.unauthorized {
            return Err(ApiError::Unauthorized.into());
        }
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(OnboardingError::PartialUpload {
                uploaded: self.uploaded,
                failures: self.failures,
            })
        }
    }
}

/// Issues every upload at once and waits for all of them.
async fn upload_concurrently<K: Copy>(
    client: &MerchantClient,
    jobs: Vec<(K, PathBuf, &'static str)>,
    category: &'static str,
) -> Vec<(K, Result<StoredFile, ApiError>)> {
    let in_flight = jobs.len().max(1);
    tracing::debug!(count = jobs.len(), category, "uploading documents");
    stream::iter(jobs)
        .map(|(key, path, document_type)| async move {
            let result = client
                .upload_business_document(&path, document_type, category)
                .await;
            (key, result)
        })
        .buffer_unordered(in_flight)
        .collect()
        .await
}

fn reselect<K: Ord>(selections: &mut BTreeMap<K, DocumentSelection>, slot: K, path: PathBuf) {
    let unchanged = selections
        .get(&slot)
        .is_some_and(|current| current.path == path);
    if !unchanged {
        selections.insert(slot, DocumentSelection::new(path));
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn business_info_patch(progress: &OnboardingProgress) -> BusinessInfoPatch {
    let info = &progress.business_info;
    BusinessInfoPatch {
        business_name: non_empty(&info.business_name),
        company_number: non_empty(&info.company_number),
        registration_date: info
            .registration_date
            .map(|date| date.format("%Y-%m-%d").to_string()),
        phone: non_empty(&info.full_phone()),
        business_email: non_empty(&info.business_email),
        tax_number: non_empty(&info.tax_number),
        trading_name: non_empty(&info.trading_name),
        business_type: non_empty(&info.business_type),
        type_of_business: non_empty(&info.type_of_business),
        industrial_classification: non_empty(&info.industrial_classification),
        industrial_sector: non_empty(&info.industrial_sector),
        website: non_empty(&info.website),
        description: non_empty(&info.description),
        owner_id: progress.owner_id.clone(),
        ..BusinessInfoPatch::default()
    }
}

fn address_from_draft(draft: &AddressDraft) -> Address {
    let street = match non_empty(&draft.address_line2) {
        Some(line2) => format!("{}, {line2}", draft.address_line1.trim()),
        None => draft.address_line1.trim().to_string(),
    };
    Address {
        street: Some(street),
        city: non_empty(&draft.city),
        county: non_empty(&draft.county),
        postal_code: non_empty(&draft.postal_code),
        country: non_empty(&draft.country),
    }
}

fn organization_request(progress: &OnboardingProgress, owner_id: &str) -> CreateOrganizationRequest {
    let info = &progress.business_info;
    let address = &progress.address;
    CreateOrganizationRequest {
        owner_id: owner_id.to_string(),
        name: info.business_name.trim().to_string(),
        company_number: info.company_number.trim().to_string(),
        registration_date: info
            .registration_date
            .map(|date| date.format("%Y-%m-%d").to_string()),
        business_email: non_empty(&info.business_email),
        phone: non_empty(&info.full_phone()),
        tax_number: non_empty(&info.tax_number),
        address: PartnerAddress {
            address_line1: address.address_line1.trim().to_string(),
            address_line2: non_empty(&address.address_line2),
            city: address.city.trim().to_string(),
            county: address.county.trim().to_string(),
            postal_code: non_empty(&address.postal_code),
            country: address.country.trim().to_string(),
        },
    }
}

fn director_from_draft(draft: &DirectorDraft) -> Director {
    Director {
        name: draft.name.trim().to_string(),
        dob: draft.dob,
        nationality: draft.nationality,
        kra_pin: draft.kra_pin.trim().to_string(),
        address: draft.address.trim().to_string(),
        documents: draft
            .documents
            .iter()
            .filter_map(|(slot, selection)| selection.uploaded.clone().map(|file| (*slot, file)))
            .collect(),
    }
}
