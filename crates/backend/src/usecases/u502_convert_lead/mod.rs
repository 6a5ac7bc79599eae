pub mod executor;

pub use executor::{convert_lead, order_from_lead, ConvertLeadError, ConversionResult};
