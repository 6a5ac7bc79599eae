use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate demand for one product across open orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakeListEntry {
    /// Total quantity demanded
    pub qty: u32,
    /// Number of distinct orders demanding the product. An order listing the
    /// same product on two lines counts once.
    pub orders: usize,
}

/// Daily operations summary derived from the recent-order window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Orders placed since the start of today
    pub today_count: usize,
    /// Orders currently in production
    pub production_count: usize,
    /// Orders awaiting action (pending or confirmed)
    pub dispatch_count: usize,
    /// Sum of order totals over the fetched window. Known limitation: this is
    /// a last-N-orders sum, not a calendar-week revenue figure, matching the
    /// legacy dashboard it replaces.
    pub window_revenue: f64,
    /// Per-product production demand from pending/confirmed orders, keyed by
    /// product name
    pub bake_list: BTreeMap<String, BakeListEntry>,
}
