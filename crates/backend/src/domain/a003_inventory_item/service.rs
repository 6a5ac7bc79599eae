use super::repository;
use anyhow::Result;
use chrono::Utc;
use contracts::domain::a003_inventory_item::aggregate::{InventoryItem, InventoryItemDto};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement, TransactionTrait};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

/// Outcome of a refused or failed stock adjustment.
///
/// Underflow is an explicit signaled outcome here: the legacy back office
/// silently dropped decrements that would go below zero, which left the
/// operator with no feedback.
#[derive(Debug, thiserror::Error)]
pub enum StockAdjustError {
    #[error("inventory item {0} not found")]
    NotFound(Uuid),
    #[error("insufficient stock: {current} on hand, adjustment of {delta} refused")]
    InsufficientStock { current: i64, delta: i64 },
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

/// Stock level after applying `delta`, or `None` when the result would fall
/// below zero
pub fn checked_adjust(current: i64, delta: i64) -> Option<i64> {
    let next = current.checked_add(delta)?;
    (next >= 0).then_some(next)
}

/// Apply `delta` to one item's stock level, refusing underflow.
///
/// Read and write run inside a single store transaction, and the write
/// itself re-checks the floor (`current_stock + delta >= 0` in the UPDATE
/// predicate), so two concurrent adjustments on the same item cannot lose an
/// update or drive the level negative. Returns the stock level after the
/// adjustment.
pub async fn adjust_stock(id: Uuid, delta: i64) -> Result<i64, StockAdjustError> {
    let conn = get_connection();
    let txn = conn.begin().await?;

    let row = txn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT current_stock FROM a003_inventory_item WHERE id = ? AND is_deleted = 0",
            [id.to_string().into()],
        ))
        .await?;

    let current: i64 = match row {
        Some(row) => row.try_get("", "current_stock")?,
        // Dropping the transaction rolls it back
        None => return Err(StockAdjustError::NotFound(id)),
    };

    if checked_adjust(current, delta).is_none() {
        return Err(StockAdjustError::InsufficientStock { current, delta });
    }

    let result = txn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE a003_inventory_item \
             SET current_stock = current_stock + ?, updated_at = ?, version = version + 1 \
             WHERE id = ? AND current_stock + ? >= 0",
            [
                delta.into(),
                Utc::now().to_rfc3339().into(),
                id.to_string().into(),
                delta.into(),
            ],
        ))
        .await?;

    if result.rows_affected() == 0 {
        // Guard in the UPDATE predicate fired: another adjustment moved the
        // level between our read and write
        return Err(StockAdjustError::InsufficientStock { current, delta });
    }

    let after = txn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT current_stock FROM a003_inventory_item WHERE id = ?",
            [id.to_string().into()],
        ))
        .await?;
    let new_level: i64 = match after {
        Some(row) => row.try_get("", "current_stock")?,
        None => return Err(StockAdjustError::NotFound(id)),
    };

    txn.commit().await?;
    tracing::info!("Adjusted stock for {} by {}: now {}", id, delta, new_level);
    Ok(new_level)
}

pub async fn list_all() -> Result<Vec<InventoryItem>> {
    repository::list_all().await
}

pub async fn get_by_id(id: Uuid) -> Result<Option<InventoryItem>> {
    repository::get_by_id(id).await
}

pub async fn upsert(dto: InventoryItemDto) -> Result<Uuid> {
    let mut item = match &dto.id {
        Some(id_str) => {
            let uuid = Uuid::parse_str(id_str)?;
            repository::get_by_id(uuid)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Inventory item not found: {}", id_str))?
        }
        None => {
            let code = dto
                .code
                .clone()
                .unwrap_or_else(|| format!("INV-{}", &Uuid::new_v4().to_string()[..8]));
            let mut item = InventoryItem::new_for_insert(
                code,
                dto.name.clone(),
                dto.category.clone(),
                dto.item_type,
                dto.unit.clone(),
                dto.supplier.clone(),
            );
            item.current_stock = dto.initial_stock;
            item
        }
    };

    item.base.description = dto.name;
    item.category = dto.category;
    item.item_type = dto.item_type;
    item.min_level = dto.min_level;
    item.unit = dto.unit;
    item.supplier = dto.supplier;
    if let Some(code) = dto.code {
        item.base.code = code;
    }
    item.base.set_comment(dto.comment);

    item.validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    item.before_write();

    let id = repository::upsert(&item).await?;
    tracing::info!("Saved inventory item {} ({})", item.base.description, id);
    Ok(id)
}

pub async fn delete(id: Uuid) -> Result<bool> {
    repository::soft_delete(id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_refuses_underflow() {
        // currentStock = 0, delta = -1 must leave the level untouched
        assert_eq!(checked_adjust(0, -1), None);
        assert_eq!(checked_adjust(0, 0), Some(0));
    }

    #[test]
    fn decrement_to_exactly_zero_is_allowed() {
        assert_eq!(checked_adjust(1, -1), Some(0));
    }

    #[test]
    fn arbitrary_deltas_are_accepted() {
        assert_eq!(checked_adjust(5, 10), Some(15));
        assert_eq!(checked_adjust(5, -5), Some(0));
        assert_eq!(checked_adjust(5, -6), None);
    }

    #[test]
    fn overflow_is_refused() {
        assert_eq!(checked_adjust(i64::MAX, 1), None);
    }

    #[test]
    fn sequential_increments_accumulate() {
        // Two +1 adjustments from 5 must land on 7, never 6. The transaction
        // plus the guarded UPDATE serialize the concurrent case; this checks
        // the arithmetic both writers go through.
        let after_first = checked_adjust(5, 1).unwrap();
        let after_second = checked_adjust(after_first, 1).unwrap();
        assert_eq!(after_second, 7);
    }
}
