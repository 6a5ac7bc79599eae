pub mod common;

pub mod a001_product;
pub mod a002_order;
pub mod a003_inventory_item;
pub mod a004_lead;
pub mod a005_customer;
