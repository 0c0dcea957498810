//! Figures shown on the merchant dashboard, derived from the product and
//! order lists the client already fetched.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::orders::Order;
use crate::products::Product;

/// Number of orders listed under "recent orders".
pub const RECENT_ORDER_COUNT: usize = 5;

/// Time range of the orders chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartWindow {
    #[default]
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl ChartWindow {
    pub const ALL: [ChartWindow; 5] = [
        ChartWindow::OneWeek,
        ChartWindow::OneMonth,
        ChartWindow::ThreeMonths,
        ChartWindow::SixMonths,
        ChartWindow::OneYear,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ChartWindow::OneWeek => "1W",
            ChartWindow::OneMonth => "1M",
            ChartWindow::ThreeMonths => "3M",
            ChartWindow::SixMonths => "6M",
            ChartWindow::OneYear => "1Y",
        }
    }

    #[must_use]
    pub fn days(self) -> i64 {
        match self {
            ChartWindow::OneWeek => 7,
            ChartWindow::OneMonth => 30,
            ChartWindow::ThreeMonths => 90,
            ChartWindow::SixMonths => 180,
            ChartWindow::OneYear => 365,
        }
    }
}

impl std::fmt::Display for ChartWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ChartWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        ChartWindow::ALL
            .into_iter()
            .find(|window| window.label() == wanted)
            .ok_or_else(|| format!("unknown chart window '{s}'; expected 1W, 1M, 3M, 6M or 1Y"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub pending_orders: usize,
    pub recent_orders: Vec<Order>,
}

impl DashboardStats {
    /// Headline figures. Revenue only counts paid, shipped and delivered
    /// orders; "recent" is the first five orders in the order the server
    /// returned them.
    #[must_use]
    pub fn compute(products: &[Product], orders: &[Order]) -> Self {
        let total_revenue = orders
            .iter()
            .filter(|order| order.status.counts_as_revenue())
            .map(|order| order.total_amount)
            .sum();
        let pending_orders = orders.iter().filter(|order| order.status.is_pending()).count();

        Self {
            total_products: products.len(),
            total_orders: orders.len(),
            total_revenue,
            pending_orders,
            recent_orders: orders.iter().take(RECENT_ORDER_COUNT).cloned().collect(),
        }
    }
}

/// One day on the orders chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub orders: usize,
    pub revenue: Decimal,
}

/// Orders created within `window` of `now`, bucketed by UTC calendar day,
/// oldest first. Days without orders are omitted.
#[must_use]
pub fn chart_series(orders: &[Order], window: ChartWindow, now: DateTime<Utc>) -> Vec<ChartPoint> {
    let start = now - Duration::days(window.days());
    let mut buckets: BTreeMap<NaiveDate, ChartPoint> = BTreeMap::new();

    for order in orders {
        let Some(created_at) = order.created_at.filter(|at| *at >= start) else {
            continue;
        };
        let date = created_at.date_naive();
        let point = buckets.entry(date).or_insert_with(|| ChartPoint {
            date,
            orders: 0,
            revenue: Decimal::ZERO,
        });
        point.orders += 1;
        if order.status.counts_as_revenue() {
            point.revenue += order.total_amount;
        }
    }

    buckets.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::OrderStatus;

    fn order(id: &str, status: OrderStatus, amount: i64, created_at: &str) -> Order {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "orderNumber": format!("PAYA-{id}"),
            "status": status.as_str(),
            "totalAmount": amount,
            "createdAt": created_at
        }))
        .expect("order fixture should parse")
    }

    fn now() -> DateTime<Utc> {
        "2025-06-15T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn compute_counts_revenue_only_from_settled_orders() {
        let orders = vec![
            order("1", OrderStatus::Paid, 100, "2025-06-14T10:00:00Z"),
            order("2", OrderStatus::Delivered, 50, "2025-06-13T10:00:00Z"),
            order("3", OrderStatus::PendingPayment, 999, "2025-06-13T11:00:00Z"),
            order("4", OrderStatus::Processing, 10, "2025-06-12T10:00:00Z"),
            order("5", OrderStatus::Cancelled, 5, "2025-06-11T10:00:00Z"),
            order("6", OrderStatus::Shipped, 25, "2025-06-10T10:00:00Z"),
        ];
        let stats = DashboardStats::compute(&[], &orders);

        assert_eq!(stats.total_orders, 6);
        assert_eq!(stats.total_revenue, Decimal::new(175, 0));
        assert_eq!(stats.pending_orders, 2);
        assert_eq!(stats.recent_orders.len(), RECENT_ORDER_COUNT);
        assert_eq!(stats.recent_orders[0].id, "1");
    }

    #[test]
    fn chart_series_groups_by_day_within_window() {
        let orders = vec![
            order("1", OrderStatus::Paid, 100, "2025-06-14T10:00:00Z"),
            order("2", OrderStatus::PendingPayment, 40, "2025-06-14T18:00:00Z"),
            order("3", OrderStatus::Delivered, 60, "2025-06-10T09:00:00Z"),
            order("4", OrderStatus::Paid, 500, "2025-05-01T09:00:00Z"),
        ];
        let series = chart_series(&orders, ChartWindow::OneWeek, now());

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
        assert_eq!(series[0].revenue, Decimal::new(60, 0));
        assert_eq!(series[1].orders, 2);
        assert_eq!(series[1].revenue, Decimal::new(100, 0));
    }

    #[test]
    fn wider_window_includes_older_orders() {
        let orders = vec![order("4", OrderStatus::Paid, 500, "2025-05-01T09:00:00Z")];
        assert!(chart_series(&orders, ChartWindow::OneMonth, now()).is_empty());
        assert_eq!(chart_series(&orders, ChartWindow::ThreeMonths, now()).len(), 1);
    }

    #[test]
    fn window_parses_labels() {
        assert_eq!("3m".parse::<ChartWindow>(), Ok(ChartWindow::ThreeMonths));
        assert_eq!(ChartWindow::default(), ChartWindow::OneWeek);
        assert!("2W".parse::<ChartWindow>().is_err());
        let json = serde_json::to_string(&ChartWindow::OneYear).unwrap();
        assert_eq!(json, "\"1Y\"");
    }
}
