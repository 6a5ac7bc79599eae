use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id type for catalog products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Uuid);

impl ProductId {
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

impl AggregateId for ProductId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ProductId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Catalog product (the `description` on the base holds the product name)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub base: BaseAggregate<ProductId>,

    /// Category shown on the storefront ("Cookies", "Brownies", ...)
    pub category: String,
    /// Retail unit price
    pub unit_price: f64,
    /// Whether the product is currently offered
    pub is_available: bool,
}

impl Product {
    pub fn new_for_insert(code: String, name: String, category: String, unit_price: f64) -> Self {
        Self {
            base: BaseAggregate::new(ProductId::new_v4(), code, name),
            category,
            unit_price,
            is_available: true,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Product name cannot be empty".into());
        }
        if self.unit_price < 0.0 {
            return Err("Unit price cannot be negative".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

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
        "a001"
    }
    fn collection_name() -> &'static str {
        "product"
    }
    fn element_name() -> &'static str {
        "Product"
    }
    fn list_name() -> &'static str {
        "Products"
    }
}

/// Create/update payload for the product CRUD surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDto {
    /// Absent on create
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: String,
    pub category: String,
    pub unit_price: f64,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub comment: Option<String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_price() {
        let mut product =
            Product::new_for_insert("PRD-0001".into(), "Classic Choc Chip".into(), "Cookies".into(), 250.0);
        assert!(product.validate().is_ok());
        product.unit_price = -1.0;
        assert!(product.validate().is_err());
    }
}
