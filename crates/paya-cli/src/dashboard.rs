//! Dashboard command handler: headline figures, recent orders and the
//! orders chart for the selected window.

use chrono::Utc;
use paya_client::{OrderFilter, ProductFilter};
use paya_core::store::CHART_WINDOW_KEY;
use paya_core::{chart_series, ChartPoint, ChartWindow, DashboardStats, MerchantSession};

use crate::context::{or_dash, AppContext};

/// Upper bound on rows fetched for the dashboard figures.
const DASHBOARD_FETCH_LIMIT: u32 = 100;
const BAR_WIDTH: usize = 40;

pub(crate) async fn run_dashboard(
    ctx: &AppContext,
    window: Option<ChartWindow>,
) -> anyhow::Result<()> {
    let window = match window {
        Some(window) => {
            ctx.store().set(CHART_WINDOW_KEY, &window)?;
            window
        }
        None => ctx
            .store()
            .get::<ChartWindow>(CHART_WINDOW_KEY)?
            .unwrap_or_default(),
    };

    let session = ctx.require_session().await?;
    print_approval_banner(session.user());

    let client = session.client();
    let product_filter = ProductFilter {
        limit: Some(DASHBOARD_FETCH_LIMIT),
        ..ProductFilter::default()
    };
    let order_filter = OrderFilter {
        limit: Some(DASHBOARD_FETCH_LIMIT),
        ..OrderFilter::default()
    };
    let (products, orders) = tokio::join!(
        client.list_products(&product_filter),
        client.list_orders(&order_filter)
    );
    let products = ctx.guard(products)?.items;
    let orders = ctx.guard(orders)?.items;

    let stats = DashboardStats::compute(&products, &orders);
    println!("{:<16}{}", "PRODUCTS", stats.total_products);
    println!("{:<16}{}", "ORDERS", stats.total_orders);
    println!("{:<16}{}", "PENDING", stats.pending_orders);
    println!("{:<16}KES {:.2}", "REVENUE", stats.total_revenue);
    println!();

    println!("recent orders");
    if stats.recent_orders.is_empty() {
        println!("  none yet");
    }
    for order in &stats.recent_orders {
        println!(
            "  {:<14}{:<24}KES {:.2}",
            order.order_number,
            order.status.as_str(),
            order.total_amount
        );
    }
    println!();

    let series = chart_series(&orders, window, Utc::now());
    println!("orders over {window}");
    print_chart(&series);
    Ok(())
}

/// Merchants see where their approval stands until the wallet is enabled.
fn print_approval_banner(user: &MerchantSession) {
    let Some(record) = user.business_info.as_ref() else {
        println!("business onboarding not started; run `paya-cli onboarding status`");
        println!();
        return;
    };
    let approval = record.approval();
    if approval.wallet_enabled() {
        return;
    }
    if approval.is_rejected() {
        println!(
            "approval rejected: {}",
            or_dash(
                record
                    .paya_approval
                    .as_ref()
                    .and_then(|gate| gate.rejection_reason.as_deref())
            )
        );
    } else {
        println!(
            "awaiting approval: platform {}, bank {}, wallet {}",
            approval.platform,
            approval.bank,
            if approval.wallet_connected { "connected" } else { "not connected" }
        );
    }
    println!();
}

fn print_chart(series: &[ChartPoint]) {
    if series.is_empty() {
        println!("  no orders in this window");
        return;
    }
    let peak = series.iter().map(|point| point.orders).max().unwrap_or(1).max(1);
    for point in series {
        println!(
            "  {}  {:<width$} {:>4}  KES {:.2}",
            point.date.format("%Y-%m-%d"),
            bar(point.orders, peak),
            point.orders,
            point.revenue,
            width = BAR_WIDTH
        );
    }
}

fn bar(value: usize, peak: usize) -> String {
    let filled = (value * BAR_WIDTH).div_ceil(peak.max(1)).min(BAR_WIDTH);
    "#".repeat(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_day_fills_the_bar() {
        assert_eq!(bar(7, 7).len(), BAR_WIDTH);
    }

    #[test]
    fn any_order_shows_at_least_one_mark() {
        assert_eq!(bar(1, 1000), "#");
        assert_eq!(bar(0, 10), "");
    }
}
