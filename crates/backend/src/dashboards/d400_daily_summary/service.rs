use anyhow::Result;
use chrono::{DateTime, Duration, Timelike, Utc};
use contracts::dashboards::d400_daily_summary::dto::{BakeListEntry, DailySummary};
use contracts::domain::a002_order::aggregate::{Order, OrderStatus};
use std::collections::{BTreeMap, HashSet};

use super::repository;

/// Midnight UTC of the current day
pub fn start_of_today(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(now.hour() as i64)
        - Duration::minutes(now.minute() as i64)
        - Duration::seconds(now.second() as i64)
        - Duration::nanoseconds(now.timestamp_subsec_nanos() as i64)
}

/// Fold the recent-order window into the daily summary.
///
/// Orders with no placement timestamp are treated as placed `now`, so they
/// always land in today's count. The bake list aggregates only actionable
/// orders (pending or confirmed); a single order listing one product on two
/// lines still counts as one order for that product.
pub fn summarize(orders: &[Order], now: DateTime<Utc>) -> DailySummary {
    let today = start_of_today(now);

    let mut summary = DailySummary {
        today_count: 0,
        production_count: 0,
        dispatch_count: 0,
        window_revenue: 0.0,
        bake_list: BTreeMap::new(),
    };
    let mut orders_per_product: BTreeMap<String, HashSet<uuid::Uuid>> = BTreeMap::new();

    for order in orders {
        if order.state.placed_at.unwrap_or(now) >= today {
            summary.today_count += 1;
        }
        match order.state.status {
            OrderStatus::InProduction => summary.production_count += 1,
            s if s.is_actionable() => summary.dispatch_count += 1,
            _ => {}
        }
        summary.window_revenue += order.header.total_amount.unwrap_or(0.0);

        if order.state.status.is_actionable() {
            for line in &order.lines {
                let entry = summary
                    .bake_list
                    .entry(line.product_name.clone())
                    .or_insert(BakeListEntry { qty: 0, orders: 0 });
                entry.qty += line.qty;
                orders_per_product
                    .entry(line.product_name.clone())
                    .or_default()
                    .insert(order.base.id.value());
            }
        }
    }

    for (product, ids) in orders_per_product {
        if let Some(entry) = summary.bake_list.get_mut(&product) {
            entry.orders = ids.len();
        }
    }

    summary
}

pub async fn get_daily_summary() -> Result<DailySummary> {
    let window = repository::fetch_recent_orders().await?;
    let summary = summarize(&window, Utc::now());
    tracing::info!(
        "Daily summary: {} today, {} in production, {} to dispatch",
        summary.today_count,
        summary.production_count,
        summary.dispatch_count
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_order::aggregate::{
        OrderHeader, OrderLine, OrderState, OrderStatus,
    };

    fn order(
        status: OrderStatus,
        placed_at: Option<DateTime<Utc>>,
        total: Option<f64>,
        lines: Vec<(&str, u32)>,
    ) -> Order {
        Order::new_for_insert(
            "ORD-000001".into(),
            "test".into(),
            OrderHeader {
                customer_name: "Asha".into(),
                phone: None,
                whatsapp_phone: None,
                address: "".into(),
                order_type: None,
                total_amount: total,
            },
            lines
                .into_iter()
                .map(|(name, qty)| OrderLine {
                    product_name: name.into(),
                    qty,
                    unit_price: 100.0,
                })
                .collect(),
            OrderState {
                status,
                placed_at,
                status_changed_at: None,
            },
        )
    }

    #[test]
    fn duplicate_product_lines_count_one_order() {
        let now = Utc::now();
        let orders = vec![order(
            OrderStatus::Pending,
            Some(now),
            Some(300.0),
            vec![("Classic Choc Chip", 2), ("Classic Choc Chip", 1)],
        )];
        let summary = summarize(&orders, now);
        let entry = &summary.bake_list["Classic Choc Chip"];
        assert_eq!(entry.qty, 3);
        assert_eq!(entry.orders, 1);
    }

    #[test]
    fn delivered_orders_stay_off_the_bake_list() {
        let now = Utc::now();
        let orders = vec![
            order(
                OrderStatus::Delivered,
                Some(now),
                Some(100.0),
                vec![("Double Fudge", 4)],
            ),
            order(
                OrderStatus::Confirmed,
                Some(now),
                Some(200.0),
                vec![("Double Fudge", 1)],
            ),
        ];
        let summary = summarize(&orders, now);
        let entry = &summary.bake_list["Double Fudge"];
        assert_eq!(entry.qty, 1);
        assert_eq!(entry.orders, 1);
    }

    #[test]
    fn window_revenue_skips_missing_totals() {
        let now = Utc::now();
        let orders = vec![
            order(OrderStatus::Pending, Some(now), Some(100.0), vec![("A", 1)]),
            order(OrderStatus::Pending, Some(now), Some(200.0), vec![("A", 1)]),
            order(OrderStatus::Pending, Some(now), None, vec![("A", 1)]),
            order(OrderStatus::Pending, Some(now), Some(50.0), vec![("A", 1)]),
        ];
        let summary = summarize(&orders, now);
        assert_eq!(summary.window_revenue, 350.0);
    }

    #[test]
    fn missing_placed_at_counts_as_today() {
        let now = Utc::now();
        let yesterday = now - Duration::days(1);
        let orders = vec![
            order(OrderStatus::Pending, None, Some(100.0), vec![("A", 1)]),
            order(
                OrderStatus::Pending,
                Some(yesterday),
                Some(100.0),
                vec![("A", 1)],
            ),
        ];
        let summary = summarize(&orders, now);
        assert_eq!(summary.today_count, 1);
    }

    #[test]
    fn status_counts_split_production_and_dispatch() {
        let now = Utc::now();
        let orders = vec![
            order(OrderStatus::Pending, Some(now), None, vec![("A", 1)]),
            order(OrderStatus::Confirmed, Some(now), None, vec![("A", 1)]),
            order(OrderStatus::InProduction, Some(now), None, vec![("A", 1)]),
            order(OrderStatus::Delivered, Some(now), None, vec![("A", 1)]),
        ];
        let summary = summarize(&orders, now);
        assert_eq!(summary.dispatch_count, 2);
        assert_eq!(summary.production_count, 1);
    }

    #[test]
    fn start_of_today_is_midnight() {
        let now = Utc::now();
        let midnight = start_of_today(now);
        assert_eq!(midnight.hour(), 0);
        assert_eq!(midnight.minute(), 0);
        assert_eq!(midnight.second(), 0);
        assert!(midnight <= now);
    }
}
