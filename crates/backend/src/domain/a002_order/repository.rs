use anyhow::Result;
use chrono::Utc;
use contracts::domain::a002_order::aggregate::{Order, OrderHeader, OrderId, OrderLine, OrderState};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

/// Window of recent orders fed to the daily dashboard
pub const RECENT_WINDOW: u64 = 20;
/// Page size for the back-office order list
pub const LIST_PAGE_SIZE: u64 = 50;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub header_json: String,
    pub lines_json: String,
    pub state_json: String,
    pub placed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Order {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        let header: OrderHeader = serde_json::from_str(&m.header_json)
            .unwrap_or_else(|_| panic!("Failed to deserialize header_json for order: {}", m.code));
        let lines: Vec<OrderLine> = serde_json::from_str(&m.lines_json)
            .unwrap_or_else(|_| panic!("Failed to deserialize lines_json for order: {}", m.code));
        let state: OrderState = serde_json::from_str(&m.state_json)
            .unwrap_or_else(|_| panic!("Failed to deserialize state_json for order: {}", m.code));

        Order {
            base: BaseAggregate::with_metadata(
                OrderId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            header,
            lines,
            state,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active_model(aggregate: &Order, is_update: bool) -> Result<ActiveModel> {
    let header_json = serde_json::to_string(&aggregate.header)?;
    let lines_json = serde_json::to_string(&aggregate.lines)?;
    let state_json = serde_json::to_string(&aggregate.state)?;

    Ok(ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        header_json: Set(header_json),
        lines_json: Set(lines_json),
        state_json: Set(state_json),
        placed_at: Set(aggregate.state.placed_at),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(if is_update {
            aggregate.base.metadata.version + 1
        } else {
            aggregate.base.metadata.version
        }),
        created_at: if is_update {
            sea_orm::ActiveValue::NotSet
        } else {
            Set(Some(aggregate.base.metadata.created_at))
        },
    })
}

/// The `RECENT_WINDOW` most recently placed orders, newest first
pub async fn list_recent() -> Result<Vec<Order>> {
    let items: Vec<Order> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::PlacedAt)
        .limit(RECENT_WINDOW)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// One page of recent orders for the list view
pub async fn list_page() -> Result<Vec<Order>> {
    let items: Vec<Order> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::PlacedAt)
        .limit(LIST_PAGE_SIZE)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Complete order history, used by the customer synchronizer. Batch scan;
/// intended for a bounded historical order count, not a streaming design.
pub async fn list_all() -> Result<Vec<Order>> {
    let items: Vec<Order> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::PlacedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> Result<Option<Order>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_code(code: &str) -> Result<Option<Order>> {
    let result = Entity::find()
        .filter(Column::Code.eq(code))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn upsert(aggregate: &Order) -> Result<Uuid> {
    let uuid = aggregate.base.id.value();
    let existing = Entity::find_by_id(uuid.to_string()).one(conn()).await?;

    let active = to_active_model(aggregate, existing.is_some())?;
    if existing.is_some() {
        active.update(conn()).await?;
    } else {
        active.insert(conn()).await?;
    }
    Ok(uuid)
}

/// Insert an order through an already-open transaction (lead conversion)
pub async fn insert_in_txn(txn: &DatabaseTransaction, aggregate: &Order) -> Result<Uuid> {
    let active = to_active_model(aggregate, false)?;
    active.insert(txn).await?;
    Ok(aggregate.base.id.value())
}

pub async fn soft_delete(id: Uuid) -> Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
