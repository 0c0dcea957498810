//! Onboarding wizard command handlers.
//!
//! Every command opens the wizard from the stored progress. The first one
//! after signing in also reconciles it with the server record, so a fresh
//! machine resumes where the account actually stands. Later commands in the
//! same session skip that pass and keep `back` and `goto` positions.

mod forms;

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use paya_core::{BusinessDocumentSlot, DirectorDocumentSlot, Nationality, Step};
use paya_onboarding::{machine, validate_step, OnboardingError, OnboardingWizard, ProgressStore};

use crate::context::{or_dash, AppContext};

/// Sub-commands available under `onboarding`.
#[derive(Debug, Subcommand)]
pub enum OnboardingCommands {
    /// Show the current step, completed steps and approval state
    Status,
    /// Fill in step 1 (business information); only the given fields change
    Business(BusinessArgs),
    /// Fill in step 2 (business address); only the given fields change
    Address(AddressArgs),
    /// Pick the file for a step 3 business document
    Document {
        /// certificateOfIncorporation, kraPinCertificate, cr12 or businessPermit
        #[arg(value_parser = parse_business_slot)]
        slot: BusinessDocumentSlot,
        path: std::path::PathBuf,
    },
    /// Set how many directors step 4 collects (1-10)
    Directors { count: usize },
    /// Fill in one director's details; only the given fields change
    Director(DirectorArgs),
    /// Pick the file for one of a director's documents
    DirectorDocument {
        /// Director position, starting at 1
        #[arg(value_parser = clap::value_parser!(u16).range(1..=10))]
        director: u16,
        /// photoIdFront, photoIdBack, kraCertificate, proofOfAddress or selfie
        #[arg(value_parser = parse_director_slot)]
        slot: DirectorDocumentSlot,
        path: std::path::PathBuf,
    },
    /// Validate and submit a step (defaults to the current one)
    Submit {
        #[arg(value_parser = parse_step)]
        step: Option<Step>,
    },
    /// Jump to a step without validation
    Goto {
        #[arg(value_parser = parse_step)]
        step: Step,
    },
    /// Go back one step
    Back,
    /// Discard all local onboarding progress
    Reset,
}

#[derive(Debug, Default, Args)]
pub struct BusinessArgs {
    #[arg(long)]
    pub business_name: Option<String>,
    #[arg(long)]
    pub company_number: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub registration_date: Option<NaiveDate>,
    /// Dialling code, e.g. +254
    #[arg(long)]
    pub phone_code: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub tax_number: Option<String>,
    #[arg(long)]
    pub trading_name: Option<String>,
    #[arg(long)]
    pub business_type: Option<String>,
    #[arg(long)]
    pub type_of_business: Option<String>,
    #[arg(long)]
    pub industrial_classification: Option<String>,
    #[arg(long)]
    pub industrial_sector: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Args)]
pub struct AddressArgs {
    #[arg(long)]
    pub line1: Option<String>,
    #[arg(long)]
    pub line2: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub county: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
}

#[derive(Debug, Args)]
pub struct DirectorArgs {
    /// Director position, starting at 1
    #[arg(value_parser = clap::value_parser!(u16).range(1..=10))]
    pub director: u16,
    #[arg(long)]
    pub name: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub dob: Option<NaiveDate>,
    /// Kenyan, USA, UK, Tanzanian or "South African"
    #[arg(long)]
    pub nationality: Option<Nationality>,
    #[arg(long)]
    pub kra_pin: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

fn parse_step(raw: &str) -> Result<Step, String> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .and_then(Step::from_number)
        .ok_or_else(|| format!("unknown step '{raw}'; expected 1-5"))
}

fn parse_business_slot(raw: &str) -> Result<BusinessDocumentSlot, String> {
    BusinessDocumentSlot::from_key(raw.trim()).ok_or_else(|| {
        let keys: Vec<&str> = BusinessDocumentSlot::ALL.iter().map(|s| s.key()).collect();
        format!("unknown document '{raw}'; expected one of {}", keys.join(", "))
    })
}

fn parse_director_slot(raw: &str) -> Result<DirectorDocumentSlot, String> {
    DirectorDocumentSlot::from_key(raw.trim()).ok_or_else(|| {
        let keys: Vec<&str> = DirectorDocumentSlot::ALL.iter().map(|s| s.key()).collect();
        format!("unknown director document '{raw}'; expected one of {}", keys.join(", "))
    })
}

/// Opens the wizard for the signed-in merchant and runs restoration if this
/// session has not yet reconciled.
async fn open_wizard(ctx: &AppContext) -> anyhow::Result<OnboardingWizard> {
    let session = ctx.require_session().await?;
    let store = ProgressStore::new(ctx.store().clone());
    let mut wizard = OnboardingWizard::open(&session, ctx.partner_client()?, store)?;

    if let Some(outcome) = wizard.restore()? {
        if outcome.completion_withdrawn {
            eprintln!("note: the server record is incomplete; onboarding reopened");
        }
        if !outcome.inferred_steps.is_empty() {
            tracing::info!(steps = ?outcome.inferred_steps, "steps inferred from saved identifiers");
        }
        if outcome.business_info_refreshed {
            eprintln!("note: business information refreshed from the server record");
        }
    }
    Ok(wizard)
}

pub(crate) async fn run(ctx: &AppContext, command: OnboardingCommands) -> anyhow::Result<()> {
    let mut wizard = open_wizard(ctx).await?;

    match command {
        OnboardingCommands::Status => print_status(&wizard),
        OnboardingCommands::Business(args) => forms::run_business(ctx, &mut wizard, args)?,
        OnboardingCommands::Address(args) => forms::run_address(ctx, &mut wizard, args)?,
        OnboardingCommands::Document { slot, path } => {
            forms::run_document(ctx, &mut wizard, slot, path)?;
        }
        OnboardingCommands::Directors { count } => {
            ctx.guard_onboarding(wizard.set_director_count(count))?;
            println!("collecting {count} director(s)");
        }
        OnboardingCommands::Director(args) => forms::run_director(ctx, &mut wizard, args)?,
        OnboardingCommands::DirectorDocument {
            director,
            slot,
            path,
        } => forms::run_director_document(ctx, &mut wizard, director, slot, path)?,
        OnboardingCommands::Submit { step } => run_submit(ctx, &mut wizard, step).await?,
        OnboardingCommands::Goto { step } => {
            ctx.guard_onboarding(wizard.go_to_step(step))?;
            println!("now on step {step}");
        }
        OnboardingCommands::Back => {
            if ctx.guard_onboarding(wizard.back())? {
                println!("now on step {}", wizard.progress().current_step);
            } else {
                println!("already on the first step");
            }
        }
        OnboardingCommands::Reset => {
            ctx.guard_onboarding(wizard.reset())?;
            println!("onboarding progress discarded");
        }
    }
    Ok(())
}

async fn run_submit(
    ctx: &AppContext,
    wizard: &mut OnboardingWizard,
    step: Option<Step>,
) -> anyhow::Result<()> {
    let step = step.unwrap_or(wizard.progress().current_step);
    match wizard.submit_step(step).await {
        Ok(outcome) => {
            println!("step {} submitted", outcome.submitted);
            if outcome.complete {
                println!("onboarding complete; approval is {}", wizard.progress().approval.platform);
            }
            if outcome.current != outcome.submitted {
                println!("next: step {}", outcome.current);
            }
            Ok(())
        }
        Err(OnboardingError::PartialUpload { uploaded, failures }) => {
            for failure in &failures {
                eprintln!("upload failed: {}: {}", failure.document, failure.message);
            }
            anyhow::bail!(
                "{} upload(s) failed, {uploaded} kept; run `paya-cli onboarding submit` again to retry the rest",
                failures.len()
            )
        }
        Err(e) => ctx.guard_onboarding(Err(e)),
    }
}

fn print_status(wizard: &OnboardingWizard) {
    let progress = wizard.progress();

    println!("{:<14}{}", "STEP", progress.current_step);
    println!("{:<14}{}%", "PROGRESS", machine::progress_percentage(progress));
    println!(
        "{:<14}{}",
        "COMPLETE",
        if progress.is_complete { "yes" } else { "no" }
    );
    println!(
        "{:<14}{}",
        "LAST SAVED",
        or_dash(progress.last_saved_at.map(|at| at.format("%Y-%m-%d %H:%M UTC")))
    );
    println!("{:<14}{}", "ORGANIZATION", or_dash(progress.organization_id.as_deref()));
    println!("{:<14}{}", "OWNER", or_dash(progress.owner_id.as_deref()));
    println!("{:<14}{}", "PLATFORM", progress.approval.platform);
    println!("{:<14}{}", "BANK", progress.approval.bank);
    println!();

    for step in Step::ALL {
        let mark = if machine::is_step_completed(progress, step) {
            "done"
        } else if step == progress.current_step {
            "current"
        } else if machine::can_proceed_to(progress, step) {
            "open"
        } else {
            "locked"
        };
        println!("{mark:<9}{step}");
    }

    if let Err(OnboardingError::Validation { missing, .. }) =
        validate_step(progress, progress.current_step)
    {
        println!();
        println!("still needed for step {}:", progress.current_step.number());
        for field in missing {
            println!("  - {field}");
        }
    }
}
