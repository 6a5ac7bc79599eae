pub mod aggregate;
pub mod cart;
