mod auth;
mod context;
mod dashboard;
mod onboarding;
mod orders;
mod products;
mod shopify;
mod support;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use auth::AuthCommands;
use context::AppContext;
use onboarding::OnboardingCommands;
use orders::OrderCommands;
use paya_core::ChartWindow;
use products::ProductCommands;
use shopify::ShopifyCommands;
use support::SupportCommands;

#[derive(Debug, Parser)]
#[command(name = "paya-cli")]
#[command(about = "Paya merchant console")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign up, sign in and out, and inspect the current account
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Walk through the five-step business onboarding wizard
    Onboarding {
        #[command(subcommand)]
        command: OnboardingCommands,
    },
    /// Manage the product catalogue
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Review orders and record fulfillment
    Orders {
        #[command(subcommand)]
        command: OrderCommands,
    },
    /// Answer customer support tickets
    Support {
        #[command(subcommand)]
        command: SupportCommands,
    },
    /// Connect a Shopify storefront and sync products
    Shopify {
        #[command(subcommand)]
        command: ShopifyCommands,
    },
    /// Headline figures and the orders chart
    Dashboard {
        /// Chart range: 1W, 1M, 3M, 6M or 1Y (remembered between runs)
        #[arg(long)]
        window: Option<ChartWindow>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = paya_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("paya-cli ready; run `paya-cli --help` for commands");
        return Ok(());
    };

    tracing::debug!(env = ?config.env, api = %config.api_base_url, "configuration loaded");
    let ctx = AppContext::new(config)?;

    match command {
        Commands::Auth { command } => auth::run(&ctx, command).await,
        Commands::Onboarding { command } => onboarding::run(&ctx, command).await,
        Commands::Products { command } => products::run(&ctx, command).await,
        Commands::Orders { command } => orders::run(&ctx, command).await,
        Commands::Support { command } => support::run(&ctx, command).await,
        Commands::Shopify { command } => shopify::run(&ctx, command).await,
        Commands::Dashboard { window } => dashboard::run_dashboard(&ctx, window).await,
    }
}
