use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id type for corporate leads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub Uuid);

impl LeadId {
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

impl AggregateId for LeadId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(LeadId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Converted,
    Closed,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Converted => "converted",
            LeadStatus::Closed => "closed",
        }
    }

    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "contacted" => LeadStatus::Contacted,
            "converted" => LeadStatus::Converted,
            "closed" => LeadStatus::Closed,
            _ => LeadStatus::New,
        }
    }
}

/// Corporate inquiry prior to becoming an order (the `description` on the
/// base holds the contact name)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    #[serde(flatten)]
    pub base: BaseAggregate<LeadId>,

    pub company: String,
    /// Occasion the inquiry is for ("Diwali gifting", "offsite", ...)
    pub event: String,
    pub estimated_qty: u32,
    pub phone: Option<String>,
    pub status: LeadStatus,
}

impl Lead {
    pub fn new_for_insert(
        code: String,
        contact_name: String,
        company: String,
        event: String,
        estimated_qty: u32,
        phone: Option<String>,
    ) -> Self {
        Self {
            base: BaseAggregate::new(LeadId::new_v4(), code, contact_name),
            company,
            event,
            estimated_qty,
            phone,
            status: LeadStatus::New,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Contact name cannot be empty".into());
        }
        if self.company.trim().is_empty() {
            return Err("Company cannot be empty".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

/// Create/update payload for the lead CRUD surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadDto {
    /// Absent on create
    pub id: Option<String>,
    pub code: Option<String>,
    pub contact_name: String,
    pub company: String,
    pub event: String,
    #[serde(default)]
    pub estimated_qty: u32,
    pub phone: Option<String>,
    pub status: Option<LeadStatus>,
    pub comment: Option<String>,
}

impl AggregateRoot for Lead {
    type Id = LeadId;

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
        "a004"
    }
    fn collection_name() -> &'static str {
        "lead"
    }
    fn element_name() -> &'static str {
        "Lead"
    }
    fn list_name() -> &'static str {
        "Leads"
    }
}
