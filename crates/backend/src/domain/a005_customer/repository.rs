use anyhow::Result;
use chrono::Utc;
use contracts::domain::a005_customer::aggregate::{Customer, CustomerId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a005_customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub phone: String,
    pub total_orders: i64,
    pub total_spend: f64,
    pub last_order_date: Option<chrono::DateTime<chrono::Utc>>,
    pub tags_json: String,
    pub notes: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Customer {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        let tags: BTreeSet<String> = serde_json::from_str(&m.tags_json).unwrap_or_else(|_| {
            panic!("Failed to deserialize tags_json for customer: {}", m.code)
        });

        Customer {
            base: BaseAggregate::with_metadata(
                CustomerId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            phone: m.phone,
            total_orders: m.total_orders,
            total_spend: m.total_spend,
            last_order_date: m.last_order_date,
            tags,
            notes: m.notes,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active_model(aggregate: &Customer, is_update: bool) -> Result<ActiveModel> {
    let tags_json = serde_json::to_string(&aggregate.tags)?;

    Ok(ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        phone: Set(aggregate.phone.clone()),
        total_orders: Set(aggregate.total_orders),
        total_spend: Set(aggregate.total_spend),
        last_order_date: Set(aggregate.last_order_date),
        tags_json: Set(tags_json),
        notes: Set(aggregate.notes.clone()),
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

pub async fn list_all() -> Result<Vec<Customer>> {
    let items: Vec<Customer> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Description)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> Result<Option<Customer>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

/// Roster lookup by the normalized phone key
pub async fn get_by_phone(phone: &str) -> Result<Option<Customer>> {
    let result = Entity::find()
        .filter(Column::Phone.eq(phone))
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_phone_in_txn(
    txn: &DatabaseTransaction,
    phone: &str,
) -> Result<Option<Customer>> {
    let result = Entity::find()
        .filter(Column::Phone.eq(phone))
        .filter(Column::IsDeleted.eq(false))
        .one(txn)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn upsert(aggregate: &Customer) -> Result<Uuid> {
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

/// Upsert through an already-open transaction (the sync batch writes the
/// whole roster atomically)
pub async fn upsert_in_txn(
    txn: &DatabaseTransaction,
    aggregate: &Customer,
    is_update: bool,
) -> Result<Uuid> {
    let active = to_active_model(aggregate, is_update)?;
    if is_update {
        active.update(txn).await?;
    } else {
        active.insert(txn).await?;
    }
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
