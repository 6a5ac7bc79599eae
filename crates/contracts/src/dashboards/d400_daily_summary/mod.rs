pub mod dto;

pub use dto::{BakeListEntry, DailySummary};
