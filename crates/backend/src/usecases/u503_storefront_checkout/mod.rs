pub mod executor;

pub use executor::{checkout, order_from_checkout, CheckoutError, CheckoutRequest, CheckoutResponse};
