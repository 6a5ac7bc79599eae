use super::repository;
use anyhow::Result;
use chrono::Utc;
use contracts::domain::a002_order::aggregate::{
    Order, OrderDraft, OrderHeader, OrderState, OrderStatus, OrderType,
};
use uuid::Uuid;

/// Short order code in the storefront's historical format ("ORD-493021")
pub fn next_order_code() -> String {
    let millis = Utc::now().timestamp_millis().to_string();
    let suffix = &millis[millis.len().saturating_sub(6)..];
    format!("ORD-{}", suffix)
}

/// Build a pending order from a draft. The stored total is the submitted one
/// when present, the line-item sum otherwise.
pub fn order_from_draft(draft: OrderDraft) -> Order {
    let description = format!(
        "{} - {} item(s)",
        draft.customer_name.trim(),
        draft.lines.len()
    );
    let mut order = Order::new_for_insert(
        next_order_code(),
        description,
        OrderHeader {
            customer_name: draft.customer_name,
            phone: draft.phone,
            whatsapp_phone: draft.whatsapp_phone,
            address: draft.address,
            order_type: draft.order_type,
            total_amount: draft.total_amount,
        },
        draft.lines,
        OrderState {
            status: OrderStatus::Pending,
            placed_at: Some(Utc::now()),
            status_changed_at: None,
        },
    );
    if order.header.total_amount.is_none() {
        order.header.total_amount = Some(order.computed_total());
    }
    order
}

pub async fn create(draft: OrderDraft) -> Result<Uuid> {
    let mut order = order_from_draft(draft);
    order
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    order.before_write();

    let id = repository::upsert(&order).await?;
    tracing::info!("Created order {} ({})", order.base.code, id);
    Ok(id)
}

/// Order list view: fetch one page of recent orders and filter it in memory.
///
/// The filters are applied after the fetch, so the result can be smaller than
/// the page even when matching records exist beyond the window. Accepted
/// ceiling for datasets under roughly a thousand orders; past that the
/// filters belong in the query.
pub async fn list_filtered(
    status: Option<OrderStatus>,
    order_type: Option<OrderType>,
) -> Result<Vec<Order>> {
    let page = repository::list_page().await?;
    Ok(filter_page(page, status, order_type))
}

/// In-memory equality filter over a fetched page. Orders without a type
/// match `Retail`.
pub fn filter_page(
    orders: Vec<Order>,
    status: Option<OrderStatus>,
    order_type: Option<OrderType>,
) -> Vec<Order> {
    orders
        .into_iter()
        .filter(|o| status.map_or(true, |s| o.state.status == s))
        .filter(|o| order_type.map_or(true, |t| o.header.effective_type() == t))
        .collect()
}

pub async fn get_by_id(id: Uuid) -> Result<Option<Order>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> Result<Vec<Order>> {
    repository::list_all().await
}

pub async fn update_status(id: Uuid, status: OrderStatus) -> Result<Order> {
    let mut order = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Order not found: {}", id))?;

    order.set_status(status);
    order.before_write();
    repository::upsert(&order).await?;

    tracing::info!("Order {} moved to {}", order.base.code, status.as_str());
    Ok(order)
}

pub async fn delete(id: Uuid) -> Result<bool> {
    repository::soft_delete(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_order::aggregate::OrderLine;

    fn order(status: OrderStatus, order_type: Option<OrderType>) -> Order {
        Order::new_for_insert(
            next_order_code(),
            "test".into(),
            OrderHeader {
                customer_name: "Ravi".into(),
                phone: None,
                whatsapp_phone: None,
                address: "".into(),
                order_type,
                total_amount: Some(100.0),
            },
            vec![OrderLine {
                product_name: "Double Fudge".into(),
                qty: 1,
                unit_price: 100.0,
            }],
            OrderState {
                status,
                placed_at: Some(Utc::now()),
                status_changed_at: None,
            },
        )
    }

    #[test]
    fn filter_by_status() {
        let page = vec![
            order(OrderStatus::Pending, Some(OrderType::Retail)),
            order(OrderStatus::Delivered, Some(OrderType::Retail)),
        ];
        let filtered = filter_page(page, Some(OrderStatus::Pending), None);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].state.status, OrderStatus::Pending);
    }

    #[test]
    fn missing_type_matches_retail_filter() {
        let page = vec![
            order(OrderStatus::Pending, None),
            order(OrderStatus::Pending, Some(OrderType::Corporate)),
        ];
        let filtered = filter_page(page, None, Some(OrderType::Retail));
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].header.order_type.is_none());
    }

    #[test]
    fn no_filters_returns_page_unchanged() {
        let page = vec![
            order(OrderStatus::Pending, None),
            order(OrderStatus::Delivered, Some(OrderType::Corporate)),
        ];
        assert_eq!(filter_page(page, None, None).len(), 2);
    }

    #[test]
    fn draft_total_defaults_to_line_sum() {
        let draft = OrderDraft {
            customer_name: "Meera".into(),
            phone: Some("9845000000".into()),
            whatsapp_phone: None,
            address: "".into(),
            order_type: None,
            lines: vec![
                OrderLine {
                    product_name: "Classic Choc Chip".into(),
                    qty: 2,
                    unit_price: 250.0,
                },
                OrderLine {
                    product_name: "Double Fudge".into(),
                    qty: 1,
                    unit_price: 300.0,
                },
            ],
            total_amount: None,
        };
        let order = order_from_draft(draft);
        assert_eq!(order.header.total_amount, Some(800.0));
        assert_eq!(order.state.status, OrderStatus::Pending);
        assert!(order.base.code.starts_with("ORD-"));
    }
}
