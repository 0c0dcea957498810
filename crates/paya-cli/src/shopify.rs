//! Storefront connection command handlers.

use clap::Subcommand;
use paya_client::{normalise_shop_domain, MerchantClient, ResourceFeedback};

use crate::context::{or_dash, AppContext};

/// Sub-commands available under `shopify`.
#[derive(Debug, Subcommand)]
pub enum ShopifyCommands {
    /// Show whether a store is connected
    Status,
    /// Print the URL that authorises the marketplace app on a store
    Connect {
        /// Store handle or domain, e.g. `acme` or `acme.myshopify.com`
        shop: String,
    },
    /// Import the connected store's products
    Import,
    /// Disconnect the store
    Disconnect,
    /// Publish a storefront product to the marketplace channel
    Publish { product_id: String },
    /// Remove a storefront product from the marketplace channel
    Unpublish { product_id: String },
}

pub(crate) async fn run(ctx: &AppContext, command: ShopifyCommands) -> anyhow::Result<()> {
    let session = ctx.require_session().await?;
    let client = session.client();

    match command {
        ShopifyCommands::Status => {
            let status = ctx.guard(client.shopify_status().await)?;
            if status.connected {
                println!("connected to {}", or_dash(status.store_name.as_deref()));
            } else {
                println!("no store connected; run `paya-cli shopify connect <shop>`");
            }
        }
        ShopifyCommands::Connect { shop } => {
            let domain = normalise_shop_domain(&shop);
            let url = ctx.guard(client.shopify_auth_url(&domain).await)?;
            println!("open this URL to authorise {domain}:");
            println!("{url}");
        }
        ShopifyCommands::Import => {
            let summary = ctx.guard(client.shopify_import_products().await)?;
            println!(
                "imported {}, updated {}, failed {} of {} products",
                summary.imported, summary.updated, summary.failed, summary.total
            );
        }
        ShopifyCommands::Disconnect => {
            ctx.guard(client.shopify_disconnect().await)?;
            println!("store disconnected");
        }
        ShopifyCommands::Publish { product_id } => run_publish(ctx, client, &product_id).await?,
        ShopifyCommands::Unpublish { product_id } => {
            ctx.guard(client.shopify_unpublish_product(&product_id).await)?;
            println!("product {product_id} removed from the marketplace channel");
        }
    }
    Ok(())
}

/// Publishes and reports the outcome back to the storefront. Feedback is
/// best effort; only the publish result decides the exit status.
async fn run_publish(
    ctx: &AppContext,
    client: &MerchantClient,
    product_id: &str,
) -> anyhow::Result<()> {
    match client.shopify_publish_product(product_id).await {
        Ok(()) => {
            let feedback = ResourceFeedback::success(product_id);
            if let Err(e) = client.shopify_resource_feedback(&feedback).await {
                tracing::warn!(product_id, error = %e, "failed to send publish feedback");
            }
            println!("product {product_id} published");
            Ok(())
        }
        Err(e) if e.is_unauthorized() => ctx.guard(Err(e)),
        Err(e) => {
            if let Err(report) = client
                .shopify_report_product_error(product_id, &e.to_string())
                .await
            {
                tracing::warn!(product_id, error = %report, "failed to report publish error");
            }
            Err(e.into())
        }
    }
}
