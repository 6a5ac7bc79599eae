use super::repository;
use anyhow::Result;
use contracts::domain::a001_product::aggregate::{Product, ProductDto};
use uuid::Uuid;

pub async fn list_all() -> Result<Vec<Product>> {
    repository::list_all().await
}

pub async fn get_by_id(id: Uuid) -> Result<Option<Product>> {
    repository::get_by_id(id).await
}

/// Create or update a product from the CRUD form payload
pub async fn upsert(dto: ProductDto) -> Result<Uuid> {
    let mut product = match &dto.id {
        Some(id_str) => {
            let uuid = Uuid::parse_str(id_str)?;
            repository::get_by_id(uuid)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Product not found: {}", id_str))?
        }
        None => {
            let code = dto
                .code
                .clone()
                .unwrap_or_else(|| format!("PRD-{}", &Uuid::new_v4().to_string()[..8]));
            Product::new_for_insert(code, dto.name.clone(), dto.category.clone(), dto.unit_price)
        }
    };

    product.base.description = dto.name;
    product.category = dto.category;
    product.unit_price = dto.unit_price;
    product.is_available = dto.is_available;
    if let Some(code) = dto.code {
        product.base.code = code;
    }
    product.base.set_comment(dto.comment);

    product
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    product.before_write();

    let id = repository::upsert(&product).await?;
    tracing::info!("Saved product {} ({})", product.base.description, id);
    Ok(id)
}

pub async fn delete(id: Uuid) -> Result<bool> {
    repository::soft_delete(id).await
}
