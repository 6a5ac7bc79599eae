use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id type for inventory items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryItemId(pub Uuid);

impl InventoryItemId {
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

impl AggregateId for InventoryItemId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(InventoryItemId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Ingredient vs packaging material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryItemType {
    Ingredient,
    Packaging,
}

impl InventoryItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryItemType::Ingredient => "ingredient",
            InventoryItemType::Packaging => "packaging",
        }
    }

    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "packaging" => InventoryItemType::Packaging,
            _ => InventoryItemType::Ingredient,
        }
    }
}

/// Stock-keeping item (the `description` on the base holds the item name).
///
/// `current_stock` must never go negative; that floor is enforced at the
/// adjustment transaction, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(flatten)]
    pub base: BaseAggregate<InventoryItemId>,

    pub category: String,
    pub item_type: InventoryItemType,
    pub current_stock: i64,
    /// Reorder threshold
    pub min_level: i64,
    /// Unit of measure ("kg", "pcs", ...)
    pub unit: String,
    pub supplier: String,
}

impl InventoryItem {
    pub fn new_for_insert(
        code: String,
        name: String,
        category: String,
        item_type: InventoryItemType,
        unit: String,
        supplier: String,
    ) -> Self {
        Self {
            base: BaseAggregate::new(InventoryItemId::new_v4(), code, name),
            category,
            item_type,
            current_stock: 0,
            min_level: 0,
            unit,
            supplier,
        }
    }

    /// Below the reorder threshold
    pub fn is_low(&self) -> bool {
        self.current_stock < self.min_level
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Item name cannot be empty".into());
        }
        if self.current_stock < 0 {
            return Err("Stock level cannot be negative".into());
        }
        if self.min_level < 0 {
            return Err("Minimum level cannot be negative".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

/// Create/update payload for the inventory CRUD surface. Stock levels are
/// changed through the adjustment endpoint, not here; `initial_stock` only
/// seeds newly created items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemDto {
    /// Absent on create
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: String,
    pub category: String,
    pub item_type: InventoryItemType,
    #[serde(default)]
    pub initial_stock: i64,
    #[serde(default)]
    pub min_level: i64,
    pub unit: String,
    pub supplier: String,
    pub comment: Option<String>,
}

impl AggregateRoot for InventoryItem {
    type Id = InventoryItemId;

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
        "a003"
    }
    fn collection_name() -> &'static str {
        "inventory_item"
    }
    fn element_name() -> &'static str {
        "Inventory item"
    }
    fn list_name() -> &'static str {
        "Inventory"
    }
}
