use super::EntityMetadata;

/// Trait implemented by every aggregate root in the system.
///
/// Instance methods expose record data; the static methods carry the
/// aggregate's registration data (index, collection, UI names).
pub trait AggregateRoot {
    /// Identifier type of the aggregate
    type Id;

    fn id(&self) -> Self::Id;

    fn code(&self) -> &str;

    fn description(&self) -> &str;

    fn metadata(&self) -> &EntityMetadata;

    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Aggregate index in the system (e.g. "a001")
    fn aggregate_index() -> &'static str;

    /// Collection name in the database (e.g. "product")
    fn collection_name() -> &'static str;

    /// Singular UI name (e.g. "Product")
    fn element_name() -> &'static str;

    /// Plural UI name (e.g. "Products")
    fn list_name() -> &'static str;

    /// Full aggregate name (e.g. "a001_product")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}
