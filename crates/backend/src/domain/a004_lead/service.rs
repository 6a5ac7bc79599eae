use super::repository;
use anyhow::Result;
use contracts::domain::a004_lead::aggregate::{Lead, LeadDto};
use uuid::Uuid;

pub async fn list_all() -> Result<Vec<Lead>> {
    repository::list_all().await
}

pub async fn get_by_id(id: Uuid) -> Result<Option<Lead>> {
    repository::get_by_id(id).await
}

pub async fn upsert(dto: LeadDto) -> Result<Uuid> {
    let mut lead = match &dto.id {
        Some(id_str) => {
            let uuid = Uuid::parse_str(id_str)?;
            repository::get_by_id(uuid)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Lead not found: {}", id_str))?
        }
        None => {
            let code = dto
                .code
                .clone()
                .unwrap_or_else(|| format!("LEAD-{}", &Uuid::new_v4().to_string()[..8]));
            Lead::new_for_insert(
                code,
                dto.contact_name.clone(),
                dto.company.clone(),
                dto.event.clone(),
                dto.estimated_qty,
                dto.phone.clone(),
            )
        }
    };

    lead.base.description = dto.contact_name;
    lead.company = dto.company;
    lead.event = dto.event;
    lead.estimated_qty = dto.estimated_qty;
    lead.phone = dto.phone;
    if let Some(status) = dto.status {
        lead.status = status;
    }
    if let Some(code) = dto.code {
        lead.base.code = code;
    }
    lead.base.set_comment(dto.comment);

    lead.validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    lead.before_write();

    let id = repository::upsert(&lead).await?;
    tracing::info!("Saved lead {} ({})", lead.base.code, id);
    Ok(id)
}

pub async fn delete(id: Uuid) -> Result<bool> {
    repository::soft_delete(id).await
}
