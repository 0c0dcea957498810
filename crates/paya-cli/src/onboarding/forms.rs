use std::path::PathBuf;

use paya_core::{BusinessDocumentSlot, DirectorDocumentSlot};
use paya_onboarding::{is_valid_email, OnboardingError, OnboardingWizard};

use super::{AddressArgs, BusinessArgs, DirectorArgs};
use crate::context::AppContext;

/// Overwrites `target` when a new value was given.
fn assign(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value.trim().to_string();
    }
}

pub(super) fn run_business(
    ctx: &AppContext,
    wizard: &mut OnboardingWizard,
    args: BusinessArgs,
) -> anyhow::Result<()> {
    if let Some(email) = args.email.as_deref() {
        if !is_valid_email(email) {
            eprintln!("warning: '{email}' does not look like an email address; step 1 will not submit");
        }
    }

    ctx.guard_onboarding(wizard.edit_business_info(|draft| {
        assign(&mut draft.business_name, args.business_name);
        assign(&mut draft.company_number, args.company_number);
        if args.registration_date.is_some() {
            draft.registration_date = args.registration_date;
        }
        assign(&mut draft.phone_country_code, args.phone_code);
        assign(&mut draft.phone_number, args.phone);
        assign(&mut draft.business_email, args.email);
        assign(&mut draft.tax_number, args.tax_number);
        assign(&mut draft.trading_name, args.trading_name);
        assign(&mut draft.business_type, args.business_type);
        assign(&mut draft.type_of_business, args.type_of_business);
        assign(&mut draft.industrial_classification, args.industrial_classification);
        assign(&mut draft.industrial_sector, args.industrial_sector);
        assign(&mut draft.website, args.website);
        assign(&mut draft.description, args.description);
    }))?;

    println!("business information saved");
    Ok(())
}

pub(super) fn run_address(
    ctx: &AppContext,
    wizard: &mut OnboardingWizard,
    args: AddressArgs,
) -> anyhow::Result<()> {
    ctx.guard_onboarding(wizard.edit_address(|draft| {
        assign(&mut draft.address_line1, args.line1);
        assign(&mut draft.address_line2, args.line2);
        assign(&mut draft.city, args.city);
        assign(&mut draft.county, args.county);
        assign(&mut draft.postal_code, args.postal_code);
        assign(&mut draft.country, args.country);
    }))?;

    println!("business address saved");
    Ok(())
}

pub(super) fn run_document(
    ctx: &AppContext,
    wizard: &mut OnboardingWizard,
    slot: BusinessDocumentSlot,
    path: PathBuf,
) -> anyhow::Result<()> {
    if !path.is_file() {
        anyhow::bail!("{} is not a readable file", path.display());
    }
    ctx.guard_onboarding(wizard.select_business_document(slot, path.clone()))?;
    println!("{}: {}", slot.label(), path.display());
    Ok(())
}

pub(super) fn run_director(
    ctx: &AppContext,
    wizard: &mut OnboardingWizard,
    args: DirectorArgs,
) -> anyhow::Result<()> {
    let index = usize::from(args.director) - 1;
    let result = wizard.edit_director(index, |director| {
        assign(&mut director.name, args.name);
        if args.dob.is_some() {
            director.dob = args.dob;
        }
        if let Some(nationality) = args.nationality {
            director.nationality = nationality;
        }
        assign(&mut director.kra_pin, args.kra_pin);
        assign(&mut director.address, args.address);
    });
    ctx.guard_onboarding(with_director_hint(result, wizard))?;

    println!("director {} saved", args.director);
    Ok(())
}

pub(super) fn run_director_document(
    ctx: &AppContext,
    wizard: &mut OnboardingWizard,
    director: u16,
    slot: DirectorDocumentSlot,
    path: PathBuf,
) -> anyhow::Result<()> {
    if !path.is_file() {
        anyhow::bail!("{} is not a readable file", path.display());
    }
    let index = usize::from(director) - 1;
    let result = wizard.select_director_document(index, slot, path.clone());
    ctx.guard_onboarding(with_director_hint(result, wizard))?;
    println!("director {director} {}: {}", slot.label(), path.display());
    Ok(())
}

/// Points at `onboarding directors` when the position is past the count.
fn with_director_hint(
    result: Result<(), OnboardingError>,
    wizard: &OnboardingWizard,
) -> Result<(), OnboardingError> {
    if let Err(OnboardingError::UnknownDirector(index)) = &result {
        eprintln!(
            "director {} does not exist; {} configured. Run `paya-cli onboarding directors <count>` first",
            index + 1,
            wizard.progress().directors.len()
        );
    }
    result
}
