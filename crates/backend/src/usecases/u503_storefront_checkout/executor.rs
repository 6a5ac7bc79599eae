use chrono::Utc;
use contracts::domain::a002_order::aggregate::{
    Order, OrderHeader, OrderState, OrderStatus, OrderType,
};
use contracts::domain::a002_order::cart::Cart;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::a002_order::repository as orders;
use crate::domain::a002_order::service::next_order_code;
use crate::shared::config::get_config;
use crate::shared::messaging;

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("invalid order: {0}")]
    Invalid(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Storefront checkout form plus the session cart
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub cart: Cart,
    pub customer_name: String,
    pub phone: Option<String>,
    pub whatsapp_phone: Option<String>,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    pub order_code: String,
    /// wa.me deep link the storefront opens so the customer can announce the
    /// order to the bakery
    pub whatsapp_url: String,
}

/// Pending retail order from the checkout form. The stored total is the cart
/// sum at checkout time.
pub fn order_from_checkout(request: &CheckoutRequest) -> Order {
    let description = format!(
        "{} - {} item(s)",
        request.customer_name.trim(),
        request.cart.lines.len()
    );
    Order::new_for_insert(
        next_order_code(),
        description,
        OrderHeader {
            customer_name: request.customer_name.clone(),
            phone: request.phone.clone(),
            whatsapp_phone: request.whatsapp_phone.clone(),
            address: request.address.clone(),
            order_type: Some(OrderType::Retail),
            total_amount: Some(request.cart.total_amount()),
        },
        request.cart.to_order_lines(),
        OrderState {
            status: OrderStatus::Pending,
            placed_at: Some(Utc::now()),
            status_changed_at: None,
        },
    )
}

/// Persist the checkout as a pending order and hand back the WhatsApp link.
pub async fn checkout(request: CheckoutRequest) -> Result<CheckoutResponse, CheckoutError> {
    if request.cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut order = order_from_checkout(&request);
    order.validate().map_err(CheckoutError::Invalid)?;
    order.before_write();

    let order_id = orders::upsert(&order).await?;

    let message = messaging::order_message(&order);
    let whatsapp_url =
        messaging::whatsapp_link(&get_config().messaging.whatsapp_number, &message);

    tracing::info!(
        "Checkout: order {} for {} ({} lines)",
        order.base.code,
        order.header.customer_name,
        order.lines.len()
    );
    Ok(CheckoutResponse {
        order_id,
        order_code: order.base.code,
        whatsapp_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_cart() -> CheckoutRequest {
        let mut cart = Cart::default();
        cart.update_quantity("Classic Choc Chip", 250.0, 2);
        cart.update_quantity("Double Fudge", 300.0, 1);
        CheckoutRequest {
            cart,
            customer_name: "Asha".into(),
            phone: Some("9845012345".into()),
            whatsapp_phone: None,
            address: "12 Lake Rd".into(),
        }
    }

    #[test]
    fn checkout_builds_a_pending_retail_order() {
        let order = order_from_checkout(&request_with_cart());
        assert_eq!(order.state.status, OrderStatus::Pending);
        assert_eq!(order.header.order_type, Some(OrderType::Retail));
        assert_eq!(order.header.total_amount, Some(800.0));
        assert_eq!(order.lines.len(), 2);
        assert!(order.validate().is_ok());
    }

    #[test]
    fn stored_total_matches_line_sum() {
        let order = order_from_checkout(&request_with_cart());
        assert_eq!(order.header.total_amount, Some(order.computed_total()));
    }
}
