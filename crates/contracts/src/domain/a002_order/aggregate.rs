use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id type for customer orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
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

impl AggregateId for OrderId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(OrderId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Order fulfillment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    Pending,
    Confirmed,
    InProduction,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InProduction => "in_production",
            OrderStatus::Delivered => "delivered",
        }
    }

    /// Parse a stored status; legacy records with unknown or empty status
    /// read back as `New`.
    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "pending" => OrderStatus::Pending,
            "confirmed" => OrderStatus::Confirmed,
            "in_production" => OrderStatus::InProduction,
            "delivered" => OrderStatus::Delivered,
            _ => OrderStatus::New,
        }
    }

    /// Statuses that still require a baking run (feed the bake list)
    pub fn is_actionable(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }
}

/// Retail storefront order vs corporate bulk order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    Retail,
    Corporate,
}

/// Customer and money fields of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHeader {
    pub customer_name: String,
    /// Primary contact phone
    pub phone: Option<String>,
    /// Fallback contact used when `phone` is absent (legacy checkout forms
    /// stored the WhatsApp number separately)
    pub whatsapp_phone: Option<String>,
    pub address: String,
    /// Absent on legacy records; treated as `Retail` for filter matching
    pub order_type: Option<OrderType>,
    /// Stored order total. Not forced to equal the line-item sum; see
    /// `computed_total`.
    pub total_amount: Option<f64>,
}

impl OrderHeader {
    /// Order type with the legacy default applied
    pub fn effective_type(&self) -> OrderType {
        self.order_type.unwrap_or(OrderType::Retail)
    }

    /// Primary phone, falling back to the WhatsApp contact
    pub fn contact_phone(&self) -> Option<&str> {
        self.phone
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .or_else(|| self.whatsapp_phone.as_deref().filter(|p| !p.trim().is_empty()))
    }
}

/// One ordered line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_name: String,
    pub qty: u32,
    pub unit_price: f64,
}

impl OrderLine {
    pub fn line_total(&self) -> f64 {
        self.qty as f64 * self.unit_price
    }
}

/// Status and timestamps of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderState {
    pub status: OrderStatus,
    /// When the customer placed the order. Absent on malformed legacy
    /// records; the dashboard treats those as placed "now".
    pub placed_at: Option<DateTime<Utc>>,
    pub status_changed_at: Option<DateTime<Utc>>,
}

/// Customer order (aggregate)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(flatten)]
    pub base: BaseAggregate<OrderId>,

    pub header: OrderHeader,
    pub lines: Vec<OrderLine>,
    pub state: OrderState,
}

impl Order {
    pub fn new_for_insert(
        code: String,
        description: String,
        header: OrderHeader,
        lines: Vec<OrderLine>,
        state: OrderState,
    ) -> Self {
        Self {
            base: BaseAggregate::new(OrderId::new_v4(), code, description),
            header,
            lines,
            state,
        }
    }

    /// Sum of line totals. "Stored total == computed total" is not enforced;
    /// callers decide whether to store this value or the submitted one.
    pub fn computed_total(&self) -> f64 {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    /// Declared order timestamp used for customer attribution: the placement
    /// time when known, the record creation time otherwise.
    pub fn declared_at(&self) -> DateTime<Utc> {
        self.state.placed_at.unwrap_or(self.base.metadata.created_at)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.header.customer_name.trim().is_empty() {
            return Err("Customer name cannot be empty".into());
        }
        if self.lines.is_empty() {
            return Err("Order must contain at least one line".into());
        }
        for line in &self.lines {
            if line.product_name.trim().is_empty() {
                return Err("Line item product name cannot be empty".into());
            }
            if line.qty == 0 {
                return Err("Line item quantity must be at least 1".into());
            }
            if line.unit_price < 0.0 {
                return Err("Line item price cannot be negative".into());
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.state.status = status;
        self.state.status_changed_at = Some(Utc::now());
    }
}

/// Payload for creating an order from the back office
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_name: String,
    pub phone: Option<String>,
    pub whatsapp_phone: Option<String>,
    #[serde(default)]
    pub address: String,
    pub order_type: Option<OrderType>,
    pub lines: Vec<OrderLine>,
    /// Stored as submitted when present; otherwise the line-item sum is used
    pub total_amount: Option<f64>,
}

impl AggregateRoot for Order {
    type Id = OrderId;

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
        "a002"
    }
    fn collection_name() -> &'static str {
        "order"
    }
    fn element_name() -> &'static str {
        "Order"
    }
    fn list_name() -> &'static str {
        "Orders"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_with_lines(lines: Vec<OrderLine>) -> Order {
        Order::new_for_insert(
            "ORD-000001".into(),
            "Test order".into(),
            OrderHeader {
                customer_name: "Asha".into(),
                phone: Some("98450 12345".into()),
                whatsapp_phone: None,
                address: "12 Lake Rd".into(),
                order_type: None,
                total_amount: None,
            },
            lines,
            OrderState {
                status: OrderStatus::Pending,
                placed_at: Some(Utc::now()),
                status_changed_at: None,
            },
        )
    }

    #[test]
    fn computed_total_sums_lines() {
        let order = order_with_lines(vec![
            OrderLine {
                product_name: "Classic Choc Chip".into(),
                qty: 2,
                unit_price: 250.0,
            },
            OrderLine {
                product_name: "Double Fudge".into(),
                qty: 1,
                unit_price: 300.0,
            },
        ]);
        assert_eq!(order.computed_total(), 800.0);
    }

    #[test]
    fn validate_rejects_zero_qty() {
        let order = order_with_lines(vec![OrderLine {
            product_name: "Classic Choc Chip".into(),
            qty: 0,
            unit_price: 250.0,
        }]);
        assert!(order.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_price() {
        let order = order_with_lines(vec![OrderLine {
            product_name: "Classic Choc Chip".into(),
            qty: 1,
            unit_price: -5.0,
        }]);
        assert!(order.validate().is_err());
    }

    #[test]
    fn missing_type_is_retail() {
        let order = order_with_lines(vec![OrderLine {
            product_name: "Classic Choc Chip".into(),
            qty: 1,
            unit_price: 250.0,
        }]);
        assert_eq!(order.header.effective_type(), OrderType::Retail);
    }

    #[test]
    fn contact_phone_falls_back_to_whatsapp() {
        let mut order = order_with_lines(vec![OrderLine {
            product_name: "Classic Choc Chip".into(),
            qty: 1,
            unit_price: 250.0,
        }]);
        order.header.phone = None;
        order.header.whatsapp_phone = Some("98860 00001".into());
        assert_eq!(order.header.contact_phone(), Some("98860 00001"));
        order.header.whatsapp_phone = None;
        assert_eq!(order.header.contact_phone(), None);
    }

    #[test]
    fn unknown_status_reads_as_new() {
        assert_eq!(OrderStatus::from_str_or_default("shipped"), OrderStatus::New);
        assert_eq!(OrderStatus::from_str_or_default(""), OrderStatus::New);
        assert_eq!(
            OrderStatus::from_str_or_default("in_production"),
            OrderStatus::InProduction
        );
    }
}
