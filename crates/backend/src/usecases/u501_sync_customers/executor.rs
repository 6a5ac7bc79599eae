use anyhow::Result;
use chrono::{DateTime, Utc};
use contracts::domain::a002_order::aggregate::{Order, OrderType};
use contracts::domain::a005_customer::aggregate::Customer;
use sea_orm::TransactionTrait;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::a002_order::repository as orders;
use crate::domain::a005_customer::repository as customers;
use crate::shared::data::db::get_connection;

pub const CORPORATE_TAG: &str = "Corporate";

/// Phone normalized to its digits; the roster key. "98450-12345" and
/// "98450 12345" fold into the same customer.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Accumulated order history for one phone number
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    /// Customer name from the most recently placed order
    pub name: String,
    name_seen_at: DateTime<Utc>,
    pub total_orders: i64,
    pub total_spend: f64,
    pub last_order_date: Option<DateTime<Utc>>,
    pub corporate: bool,
}

/// Fold the order history into a phone-keyed roster.
///
/// Orders with no usable phone are skipped. Input order does not matter:
/// the fold keeps the maximum declared timestamp and the name attached to
/// it, so re-running over the same history always produces the same roster.
pub fn build_roster(history: &[Order]) -> BTreeMap<String, RosterEntry> {
    let mut roster: BTreeMap<String, RosterEntry> = BTreeMap::new();

    for order in history {
        let Some(raw_phone) = order.header.contact_phone() else {
            continue;
        };
        let phone = normalize_phone(raw_phone);
        if phone.is_empty() {
            continue;
        }

        let declared = order.declared_at();
        // Absent stored totals count as zero spend, same as the dashboard's
        // revenue sum
        let amount = order.header.total_amount.unwrap_or(0.0);
        let is_corporate = order.header.effective_type() == OrderType::Corporate;
        let name = order.header.customer_name.trim().to_string();

        let entry = roster.entry(phone).or_insert(RosterEntry {
            name: name.clone(),
            name_seen_at: declared,
            total_orders: 0,
            total_spend: 0.0,
            last_order_date: None,
            corporate: false,
        });

        entry.total_orders += 1;
        entry.total_spend += amount;
        entry.corporate |= is_corporate;
        if entry.last_order_date.map_or(true, |d| declared > d) {
            entry.last_order_date = Some(declared);
        }
        if !name.is_empty() && declared >= entry.name_seen_at {
            entry.name = name;
            entry.name_seen_at = declared;
        }
    }

    roster
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub scanned_orders: usize,
    pub roster_size: usize,
    pub created: usize,
    pub updated: usize,
}

/// Overlay one roster entry onto a customer record. Derived fields are
/// overwritten; operator-owned fields (notes, extra tags) survive. The
/// Corporate tag is only ever added, never removed.
fn apply_entry(customer: &mut Customer, phone: &str, entry: &RosterEntry) {
    customer.phone = phone.to_string();
    if !entry.name.is_empty() {
        customer.base.description = entry.name.clone();
    }
    customer.total_orders = entry.total_orders;
    customer.total_spend = entry.total_spend;
    customer.last_order_date = entry.last_order_date;
    if entry.corporate {
        customer.tags.insert(CORPORATE_TAG.to_string());
    }
}

/// Rebuild the customer roster from the full order history.
///
/// The whole batch writes inside one transaction: either every roster entry
/// lands or none does. Running the sync twice over unchanged history leaves
/// every customer record identical (aside from audit timestamps).
pub async fn sync_customers() -> Result<SyncReport> {
    let history = orders::list_all().await?;
    let roster = build_roster(&history);

    let conn = get_connection();
    let txn = conn.begin().await?;

    let mut created = 0;
    let mut updated = 0;
    for (phone, entry) in &roster {
        match customers::get_by_phone_in_txn(&txn, phone).await? {
            Some(mut customer) => {
                apply_entry(&mut customer, phone, entry);
                customer.before_write();
                customers::upsert_in_txn(&txn, &customer, true).await?;
                updated += 1;
            }
            None => {
                let code = format!("CST-{}", &Uuid::new_v4().to_string()[..8]);
                let mut customer = Customer::new_for_insert(code, entry.name.clone(), phone.clone());
                apply_entry(&mut customer, phone, entry);
                customers::upsert_in_txn(&txn, &customer, false).await?;
                created += 1;
            }
        }
    }

    txn.commit().await?;

    let report = SyncReport {
        scanned_orders: history.len(),
        roster_size: roster.len(),
        created,
        updated,
    };
    tracing::info!(
        "Customer sync: {} orders scanned, {} created, {} updated",
        report.scanned_orders,
        report.created,
        report.updated
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_order::aggregate::{
        OrderHeader, OrderLine, OrderState, OrderStatus,
    };
    use std::collections::BTreeSet;

    fn order(
        name: &str,
        phone: Option<&str>,
        order_type: Option<OrderType>,
        total: f64,
        placed_at: DateTime<Utc>,
    ) -> Order {
        Order::new_for_insert(
            "ORD-000001".into(),
            "test".into(),
            OrderHeader {
                customer_name: name.into(),
                phone: phone.map(Into::into),
                whatsapp_phone: None,
                address: "".into(),
                order_type,
                total_amount: Some(total),
            },
            vec![OrderLine {
                product_name: "Classic Choc Chip".into(),
                qty: 1,
                unit_price: total,
            }],
            OrderState {
                status: OrderStatus::Delivered,
                placed_at: Some(placed_at),
                status_changed_at: None,
            },
        )
    }

    #[test]
    fn normalize_strips_everything_but_digits() {
        assert_eq!(normalize_phone("98450-12345"), "9845012345");
        assert_eq!(normalize_phone("+91 98450 12345"), "919845012345");
        assert_eq!(normalize_phone("n/a"), "");
    }

    #[test]
    fn roster_folds_orders_by_normalized_phone() {
        let now = Utc::now();
        let history = vec![
            order("Asha", Some("98450 12345"), None, 250.0, now),
            order("Asha R", Some("98450-12345"), None, 300.0, now + chrono::Duration::hours(1)),
        ];
        let roster = build_roster(&history);
        assert_eq!(roster.len(), 1);
        let entry = &roster["9845012345"];
        assert_eq!(entry.total_orders, 2);
        assert_eq!(entry.total_spend, 550.0);
        assert_eq!(entry.name, "Asha R");
    }

    #[test]
    fn missing_total_contributes_zero_spend() {
        let now = Utc::now();
        let mut untotaled = order("Asha", Some("9845012345"), None, 100.0, now);
        untotaled.header.total_amount = None;
        untotaled.lines = vec![OrderLine {
            product_name: "Classic Choc Chip".into(),
            qty: 2,
            unit_price: 100.0,
        }];
        let history = vec![
            untotaled,
            order("Asha", Some("9845012345"), None, 250.0, now),
        ];
        let roster = build_roster(&history);
        let entry = &roster["9845012345"];
        assert_eq!(entry.total_orders, 2);
        assert_eq!(entry.total_spend, 250.0);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let now = Utc::now();
        let history = vec![
            order("Asha", Some("9845012345"), None, 250.0, now),
            order("Ravi", Some("9886000001"), Some(OrderType::Corporate), 5000.0, now),
        ];
        let first = build_roster(&history);
        let second = build_roster(&history);
        assert_eq!(first, second);
    }

    #[test]
    fn phoneless_orders_are_skipped() {
        let now = Utc::now();
        let history = vec![
            order("Walk-in", None, None, 100.0, now),
            order("Walk-in", Some("  "), None, 100.0, now),
        ];
        assert!(build_roster(&history).is_empty());
    }

    #[test]
    fn corporate_tag_is_added_once() {
        let now = Utc::now();
        let history = vec![
            order("Ravi", Some("9886000001"), Some(OrderType::Corporate), 5000.0, now),
            order("Ravi", Some("9886000001"), Some(OrderType::Corporate), 3000.0, now),
        ];
        let roster = build_roster(&history);
        let entry = &roster["9886000001"];
        assert!(entry.corporate);

        let mut customer =
            Customer::new_for_insert("CST-1".into(), "Ravi".into(), "9886000001".into());
        apply_entry(&mut customer, "9886000001", entry);
        apply_entry(&mut customer, "9886000001", entry);
        let expected: BTreeSet<String> = [CORPORATE_TAG.to_string()].into();
        assert_eq!(customer.tags, expected);
    }

    #[test]
    fn operator_fields_survive_overlay() {
        let now = Utc::now();
        let history = vec![order("Asha", Some("9845012345"), None, 250.0, now)];
        let roster = build_roster(&history);

        let mut customer =
            Customer::new_for_insert("CST-1".into(), "Asha".into(), "9845012345".into());
        customer.notes = Some("prefers eggless".into());
        customer.tags.insert("vip".into());

        apply_entry(&mut customer, "9845012345", &roster["9845012345"]);
        assert_eq!(customer.notes.as_deref(), Some("prefers eggless"));
        assert!(customer.tags.contains("vip"));
        assert_eq!(customer.total_orders, 1);
    }

    #[test]
    fn last_order_date_is_max_regardless_of_input_order() {
        let now = Utc::now();
        let earlier = now - chrono::Duration::days(10);
        let forward = vec![
            order("Asha", Some("9845012345"), None, 100.0, earlier),
            order("Asha", Some("9845012345"), None, 100.0, now),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = build_roster(&forward);
        let b = build_roster(&reversed);
        assert_eq!(a["9845012345"].last_order_date, Some(now));
        assert_eq!(a["9845012345"].last_order_date, b["9845012345"].last_order_date);
    }
}
