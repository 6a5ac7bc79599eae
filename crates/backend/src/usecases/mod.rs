pub mod u501_sync_customers;
pub mod u502_convert_lead;
pub mod u503_storefront_checkout;
pub mod u504_corporate_inquiry;
