//! Account command handlers: registration, sign-in, sign-out and the
//! current-account summary.

use clap::Subcommand;
use paya_client::{RegisterRequest, Session};

use crate::context::{or_dash, AppContext};

/// Sub-commands available under `auth`.
#[derive(Debug, Subcommand)]
pub enum AuthCommands {
    /// Create a merchant account and sign in with it
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "PAYA_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Sign in with an existing merchant account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PAYA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show the signed-in account and its approval state
    Whoami,
}

pub(crate) async fn run(ctx: &AppContext, command: AuthCommands) -> anyhow::Result<()> {
    match command {
        AuthCommands::Register {
            first_name,
            last_name,
            email,
            password,
            phone,
        } => {
            let mut request = RegisterRequest::merchant(first_name, last_name, email, password);
            request.phone_number = phone;
            let session = ctx.sessions.register(&request).await?;
            println!("account created for {}", session.user().email);
            print_next_step(&session);
        }
        AuthCommands::Login { email, password } => {
            let session = ctx.sessions.login(&email, &password).await?;
            println!("signed in as {}", session.user().display_name());
            print_next_step(&session);
        }
        AuthCommands::Logout => {
            ctx.sessions.logout()?;
            println!("signed out");
        }
        AuthCommands::Whoami => run_whoami(ctx).await?,
    }
    Ok(())
}

/// Merchants without a complete business record land on onboarding.
fn print_next_step(session: &Session) {
    if session.user().business_complete() {
        println!("next: `paya-cli dashboard`");
    } else {
        println!("business onboarding is not finished; next: `paya-cli onboarding status`");
    }
}

async fn run_whoami(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.require_session().await?;
    let user = session.user();

    println!("{:<12}{}", "NAME", user.display_name());
    println!("{:<12}{}", "EMAIL", user.email);
    println!("{:<12}{}", "PHONE", or_dash(user.phone_number.as_deref()));
    println!("{:<12}{}", "ID", user.id);

    let Some(record) = user.business_info.as_ref() else {
        println!("{:<12}not started", "BUSINESS");
        return Ok(());
    };
    let approval = record.approval();
    println!("{:<12}{}", "BUSINESS", or_dash(record.business_name.as_deref()));
    println!(
        "{:<12}{}",
        "ONBOARDING",
        if record.is_complete() { "complete" } else { "incomplete" }
    );
    println!("{:<12}{}", "PLATFORM", approval.platform);
    println!("{:<12}{}", "BANK", approval.bank);
    println!(
        "{:<12}{}",
        "WALLET",
        if approval.wallet_enabled() { "enabled" } else { "not enabled" }
    );
    if approval.is_rejected() {
        eprintln!("warning: the business was rejected; contact support before trading");
    }
    Ok(())
}
