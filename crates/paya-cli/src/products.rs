//! Product catalogue command handlers.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Subcommand;
use paya_client::ProductFilter;
use paya_core::{LocalList, Product, ProductCategory, ProductInput, ProductStatus};

use crate::context::{clip, or_dash, AppContext};

/// Sub-commands available under `products`.
#[derive(Debug, Subcommand)]
pub enum ProductCommands {
    /// List the merchant's products
    List {
        /// draft, active, inactive or out_of_stock
        #[arg(long)]
        status: Option<ProductStatus>,
        #[arg(long)]
        category: Option<ProductCategory>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Show one product
    Show { id: String },
    /// Create a product from a JSON file
    Create { file: PathBuf },
    /// Replace a product's details from a JSON file
    Update { id: String, file: PathBuf },
    /// Delete a product
    Delete {
        id: String,
        /// Print the product list afterwards
        #[arg(long)]
        list: bool,
    },
    /// Change a product's status
    Status {
        id: String,
        status: ProductStatus,
        /// Print the product list afterwards
        #[arg(long)]
        list: bool,
    },
}

pub(crate) async fn run(ctx: &AppContext, command: ProductCommands) -> anyhow::Result<()> {
    let session = ctx.require_session().await?;
    let client = session.client();

    match command {
        ProductCommands::List {
            status,
            category,
            page,
            limit,
        } => {
            let filter = ProductFilter {
                status,
                category,
                page,
                limit: Some(limit),
            };
            let page = ctx.guard(client.list_products(&filter).await)?;
            print_products(&page.items);
            println!(
                "page {} of {} ({} products)",
                page.pagination.current_page.max(1),
                page.pagination.total_pages.max(1),
                page.pagination.total_items
            );
        }
        ProductCommands::Show { id } => {
            let product = ctx.guard(client.get_product(&id).await)?;
            print_product(&product);
        }
        ProductCommands::Create { file } => {
            let input = read_input(&file)?;
            let product = ctx.guard(client.create_product(&input).await)?;
            println!("created product {} ({})", product.name, product.id);
        }
        ProductCommands::Update { id, file } => {
            let input = read_input(&file)?;
            let product = ctx.guard(client.update_product(&id, &input).await)?;
            println!("updated product {} ({})", product.name, product.id);
        }
        ProductCommands::Delete { id, list } => {
            let mut products = if list {
                Some(fetch_list(ctx, client).await?)
            } else {
                None
            };
            ctx.guard(client.delete_product(&id).await)?;
            println!("deleted product {id}");
            if let Some(products) = products.as_mut() {
                products.remove(&id);
                print_products(products.items());
            }
        }
        ProductCommands::Status { id, status, list } => {
            let mut products = if list {
                Some(fetch_list(ctx, client).await?)
            } else {
                None
            };
            let product = ctx.guard(client.set_product_status(&id, status).await)?;
            println!("{} is now {}", product.name, product.status);
            if let Some(products) = products.as_mut() {
                products.upsert(product);
                print_products(products.items());
            }
        }
    }
    Ok(())
}

/// The list as it stood before a mutation; patched locally once the server
/// confirms instead of being fetched again.
async fn fetch_list(
    ctx: &AppContext,
    client: &paya_client::MerchantClient,
) -> anyhow::Result<LocalList<Product>> {
    let page = ctx.guard(client.list_products(&ProductFilter::default()).await)?;
    Ok(LocalList::new(page.items))
}

/// Reads and checks a product body before any request is sent.
fn read_input(path: &Path) -> anyhow::Result<ProductInput> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let input: ProductInput = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid product JSON file", path.display()))?;
    if let Err(problems) = input.validate() {
        anyhow::bail!("invalid product: {}", problems.join("; "));
    }
    Ok(input)
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("no products yet; add one with `paya-cli products create <file>`");
        return;
    }

    println!(
        "{:<26}{:<32}{:<14}{:<14}{:>8}  STATUS",
        "ID", "NAME", "CATEGORY", "PRICE", "STOCK"
    );
    for product in products {
        let stock = if product.is_low_stock() {
            format!("{}!", product.inventory.quantity)
        } else {
            product.inventory.quantity.to_string()
        };
        println!(
            "{:<26}{:<32}{:<14}{:<14}{:>8}  {}",
            product.id,
            clip(&product.name, 28),
            product.category.as_str(),
            format!("{} {:.2}", product.currency, product.price),
            stock,
            product.status
        );
    }
}

fn print_product(product: &Product) {
    println!("{:<12}{}", "ID", product.id);
    println!("{:<12}{}", "NAME", product.name);
    println!("{:<12}{}", "CATEGORY", product.category);
    println!("{:<12}{} {:.2}", "PRICE", product.currency, product.price);
    println!("{:<12}{}", "STATUS", product.status);
    println!("{:<12}{}", "SKU", or_dash(product.sku.as_deref()));
    println!(
        "{:<12}{} (low at {})",
        "STOCK", product.inventory.quantity, product.inventory.low_stock_threshold
    );
    if !product.tags.is_empty() {
        println!("{:<12}{}", "TAGS", product.tags.join(", "));
    }
    println!("{:<12}{}", "IMAGES", product.images.len());
    println!(
        "{:<12}{}",
        "UPDATED",
        or_dash(product.updated_at.map(|at| at.format("%Y-%m-%d %H:%M")))
    );
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
}
