//! Order command handlers.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use clap::Subcommand;
use paya_client::{MerchantClient, OrderFilter};
use paya_core::{FulfillmentStatus, LocalList, Order, OrderStatus};

use crate::context::{clip, or_dash, AppContext};

/// Sub-commands available under `orders`.
#[derive(Debug, Subcommand)]
pub enum OrderCommands {
    /// List orders containing the merchant's products
    List {
        /// e.g. pending_payment, paid, shipped
        #[arg(long)]
        status: Option<OrderStatus>,
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Show one order with its items and fulfillment
    Show { id: String },
    /// Change an order's status
    Status {
        id: String,
        status: OrderStatus,
        /// Print the order list afterwards
        #[arg(long)]
        list: bool,
    },
    /// Record fulfillment progress (processing, shipped or delivered)
    Fulfill {
        id: String,
        status: FulfillmentStatus,
        #[arg(long)]
        tracking: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Print the order list afterwards
        #[arg(long)]
        list: bool,
    },
}

pub(crate) async fn run(ctx: &AppContext, command: OrderCommands) -> anyhow::Result<()> {
    let session = ctx.require_session().await?;
    let client = session.client();

    match command {
        OrderCommands::List {
            status,
            from,
            to,
            page,
            limit,
        } => {
            let filter = OrderFilter {
                status,
                date_from: from.map(day_start),
                date_to: to.map(day_end),
                page,
                limit: Some(limit),
            };
            let page = ctx.guard(client.list_orders(&filter).await)?;
            print_orders(&page.items);
            println!(
                "page {} of {} ({} orders)",
                page.pagination.current_page.max(1),
                page.pagination.total_pages.max(1),
                page.pagination.total_items
            );
        }
        OrderCommands::Show { id } => {
            let order = ctx.guard(client.get_order(&id).await)?;
            print_order(&order);
        }
        OrderCommands::Status { id, status, list } => {
            let mut orders = fetch_list_if(ctx, client, list).await?;
            let order = ctx.guard(client.update_order_status(&id, status).await)?;
            println!("order {} is now {}", order.order_number, order.status);
            if let Some(orders) = orders.as_mut() {
                orders.upsert(order);
                print_orders(orders.items());
            }
        }
        OrderCommands::Fulfill {
            id,
            status,
            tracking,
            notes,
            list,
        } => {
            let mut orders = fetch_list_if(ctx, client, list).await?;
            let order = ctx.guard(
                client
                    .update_fulfillment(&id, status, tracking.as_deref(), notes.as_deref())
                    .await,
            )?;
            println!(
                "order {} fulfillment is now {}",
                order.order_number,
                order.fulfillment_status()
            );
            if let Some(orders) = orders.as_mut() {
                orders.upsert(order);
                print_orders(orders.items());
            }
        }
    }
    Ok(())
}

async fn fetch_list_if(
    ctx: &AppContext,
    client: &MerchantClient,
    wanted: bool,
) -> anyhow::Result<Option<LocalList<Order>>> {
    if !wanted {
        return Ok(None);
    }
    let page = ctx.guard(client.list_orders(&OrderFilter::default()).await)?;
    Ok(Some(LocalList::new(page.items)))
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    day_start(date) + Duration::days(1) - Duration::seconds(1)
}

fn print_orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("no orders found");
        return;
    }

    println!(
        "{:<26}{:<14}{:<26}{:<14}{:<12}{:<12}CUSTOMER",
        "ID", "NUMBER", "STATUS", "TOTAL", "FULFILLMENT", "DATE"
    );
    for order in orders {
        let date = or_dash(order.created_at.map(|at| at.format("%Y-%m-%d")));
        println!(
            "{:<26}{:<14}{:<26}{:<14}{:<12}{:<12}{}",
            order.id,
            order.order_number,
            order.status.as_str(),
            format!("KES {:.2}", order.total_amount),
            order.fulfillment_status().to_string(),
            date,
            clip(&order.customer_info.full_name(), 30)
        );
    }
}

fn print_order(order: &Order) {
    let fulfillment = order.fulfillment.first();

    println!("{:<13}{}", "ORDER", order.order_number);
    println!("{:<13}{}", "ID", order.id);
    println!("{:<13}{}", "STATUS", order.status);
    println!("{:<13}KES {:.2}", "TOTAL", order.total_amount);
    println!(
        "{:<13}{}",
        "PLACED",
        or_dash(order.created_at.map(|at| at.format("%Y-%m-%d %H:%M")))
    );
    println!("{:<13}{}", "CUSTOMER", order.customer_info.full_name());
    println!("{:<13}{}", "EMAIL", order.customer_info.email);
    println!(
        "{:<13}{}",
        "PHONE",
        or_dash(order.customer_info.phone_number.as_deref())
    );
    println!("{:<13}{}", "FULFILLMENT", order.fulfillment_status());
    println!(
        "{:<13}{}",
        "TRACKING",
        or_dash(fulfillment.and_then(|f| f.tracking_number.as_deref()))
    );
    println!();

    println!("{:<36}{:>6}{:>14}", "ITEM", "QTY", "PRICE");
    for item in &order.items {
        println!(
            "{:<36}{:>6}{:>14}",
            clip(&item.product_name, 32),
            item.quantity,
            format!("{:.2}", item.product_price)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_covers_whole_days() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(day_start(date).to_rfc3339(), "2025-06-01T00:00:00+00:00");
        assert_eq!(day_end(date).to_rfc3339(), "2025-06-01T23:59:59+00:00");
    }
}
