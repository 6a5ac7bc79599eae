use anyhow::Result;
use contracts::domain::a002_order::aggregate::Order;

use crate::domain::a002_order::repository as orders;

/// The dashboard reads the same recent-order window the order list uses,
/// newest first.
pub async fn fetch_recent_orders() -> Result<Vec<Order>> {
    orders::list_recent().await
}
