pub mod executor;

pub use executor::{lead_from_inquiry, submit_inquiry, InquiryError, InquiryRequest, InquiryResponse};
