pub mod executor;

pub use executor::{build_roster, normalize_phone, sync_customers, RosterEntry, SyncReport};
