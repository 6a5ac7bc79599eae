use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Id type for customer roster records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for CustomerId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(CustomerId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Derived customer record, keyed by normalized phone number.
///
/// Not authoritative: the sync use case rebuilds the aggregate fields
/// (order count, spend, last order date, Corporate tag) from the order
/// history. Operator-owned fields (`notes`, extra `tags`) survive a re-sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(flatten)]
    pub base: BaseAggregate<CustomerId>,

    /// Normalized phone number; the roster key
    pub phone: String,
    pub total_orders: i64,
    pub total_spend: f64,
    pub last_order_date: Option<DateTime<Utc>>,
    /// Free-form tags; ordered set so the Corporate tag is added at most once
    pub tags: BTreeSet<String>,
    /// Internal operator notes
    pub notes: Option<String>,
}

impl Customer {
    pub fn new_for_insert(code: String, name: String, phone: String) -> Self {
        Self {
            base: BaseAggregate::new(CustomerId::new_v4(), code, name),
            phone,
            total_orders: 0,
            total_spend: 0.0,
            last_order_date: None,
            tags: BTreeSet::new(),
            notes: None,
        }
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

/// Operator edit of the non-derived customer fields. Absent fields are left
/// untouched (merge semantics).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerPatch {
    pub notes: Option<String>,
    pub add_tags: Option<Vec<String>>,
    pub remove_tags: Option<Vec<String>>,
}

impl AggregateRoot for Customer {
    type Id = CustomerId;

    fn id(&self) -> Self::Id {
        self.base.id
    }
    fn code(&self) -> &str {
        &self.base.code
    }
    fn description(&self) -> &str {
        &self.base.description
    }
    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }
    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }
    fn aggregate_index() -> &'static str {
        "a005"
    }
    fn collection_name() -> &'static str {
        "customer"
    }
    fn element_name() -> &'static str {
        "Customer"
    }
    fn list_name() -> &'static str {
        "Customers"
    }
}
