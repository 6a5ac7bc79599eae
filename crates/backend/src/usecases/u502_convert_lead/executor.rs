use chrono::Utc;
use contracts::domain::a002_order::aggregate::{
    Order, OrderHeader, OrderLine, OrderState, OrderStatus, OrderType,
};
use contracts::domain::a004_lead::aggregate::{Lead, LeadStatus};
use sea_orm::TransactionTrait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::a002_order::repository as orders;
use crate::domain::a002_order::service::next_order_code;
use crate::domain::a004_lead::repository as leads;
use crate::shared::data::db::get_connection;

#[derive(Debug, thiserror::Error)]
pub enum ConvertLeadError {
    #[error("lead {0} not found")]
    NotFound(Uuid),
    #[error("lead {0} is already converted")]
    AlreadyConverted(Uuid),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub order_id: Uuid,
    pub order_code: String,
}

/// Corporate order seeded from an inquiry. Quantity carries over as a single
/// unpriced line; pricing gets filled in when the order is confirmed.
pub fn order_from_lead(lead: &Lead) -> Order {
    let description = format!("{} - {}", lead.company, lead.event);
    Order::new_for_insert(
        next_order_code(),
        description,
        OrderHeader {
            customer_name: lead.base.description.clone(),
            phone: lead.phone.clone(),
            whatsapp_phone: None,
            address: lead.company.clone(),
            order_type: Some(OrderType::Corporate),
            total_amount: None,
        },
        vec![OrderLine {
            product_name: format!("Corporate order ({})", lead.event),
            qty: lead.estimated_qty.max(1),
            unit_price: 0.0,
        }],
        OrderState {
            status: OrderStatus::Pending,
            placed_at: Some(Utc::now()),
            status_changed_at: None,
        },
    )
}

/// Convert an inquiry into a corporate order.
///
/// The order insert and the lead's status change commit together or not at
/// all; a crash between the two cannot leave a converted lead without its
/// order.
pub async fn convert_lead(lead_id: Uuid) -> Result<ConversionResult, ConvertLeadError> {
    let mut lead = leads::get_by_id(lead_id)
        .await?
        .ok_or(ConvertLeadError::NotFound(lead_id))?;
    if lead.status == LeadStatus::Converted {
        return Err(ConvertLeadError::AlreadyConverted(lead_id));
    }

    let order = order_from_lead(&lead);
    lead.status = LeadStatus::Converted;
    lead.before_write();

    let conn = get_connection();
    let txn = conn.begin().await?;
    let order_id = orders::insert_in_txn(&txn, &order).await?;
    leads::update_in_txn(&txn, &lead).await?;
    txn.commit().await?;

    tracing::info!(
        "Converted lead {} into order {}",
        lead.base.code,
        order.base.code
    );
    Ok(ConversionResult {
        order_id,
        order_code: order.base.code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead() -> Lead {
        Lead::new_for_insert(
            "LEAD-1".into(),
            "Priya".into(),
            "Acme Corp".into(),
            "Diwali gifting".into(),
            150,
            Some("9886000001".into()),
        )
    }

    #[test]
    fn conversion_builds_a_pending_corporate_order() {
        let order = order_from_lead(&lead());
        assert_eq!(order.header.order_type, Some(OrderType::Corporate));
        assert_eq!(order.state.status, OrderStatus::Pending);
        assert_eq!(order.header.customer_name, "Priya");
        assert_eq!(order.lines[0].qty, 150);
        assert!(order.validate().is_ok());
    }

    #[test]
    fn zero_estimate_still_yields_a_valid_order() {
        let mut inquiry = lead();
        inquiry.estimated_qty = 0;
        let order = order_from_lead(&inquiry);
        assert_eq!(order.lines[0].qty, 1);
        assert!(order.validate().is_ok());
    }
}
