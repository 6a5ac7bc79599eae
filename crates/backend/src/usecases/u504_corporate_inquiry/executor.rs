use contracts::domain::a004_lead::aggregate::Lead;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::a004_lead::repository as leads;
use crate::shared::config::get_config;
use crate::shared::messaging;

#[derive(Debug, thiserror::Error)]
pub enum InquiryError {
    #[error("invalid inquiry: {0}")]
    Invalid(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Corporate inquiry form from the storefront
#[derive(Debug, Clone, Deserialize)]
pub struct InquiryRequest {
    pub contact_name: String,
    pub company: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub estimated_qty: u32,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InquiryResponse {
    pub lead_id: Uuid,
    pub lead_code: String,
    /// wa.me deep link the storefront opens so the visitor can start the
    /// conversation with the bakery
    pub whatsapp_url: String,
}

/// New lead from the inquiry form; follow-up happens in the back office.
pub fn lead_from_inquiry(request: &InquiryRequest) -> Lead {
    let code = format!("LEAD-{}", &Uuid::new_v4().to_string()[..8]);
    Lead::new_for_insert(
        code,
        request.contact_name.trim().to_string(),
        request.company.trim().to_string(),
        request.event.trim().to_string(),
        request.estimated_qty,
        request.phone.clone(),
    )
}

/// Record the inquiry as a new lead and hand back the WhatsApp link.
pub async fn submit_inquiry(request: InquiryRequest) -> Result<InquiryResponse, InquiryError> {
    let mut lead = lead_from_inquiry(&request);
    lead.validate().map_err(InquiryError::Invalid)?;
    lead.before_write();

    let lead_id = leads::upsert(&lead).await?;

    let message = messaging::corporate_inquiry_message(
        &lead.base.description,
        &lead.company,
        &lead.event,
        lead.estimated_qty,
    );
    let whatsapp_url =
        messaging::whatsapp_link(&get_config().messaging.whatsapp_number, &message);

    tracing::info!(
        "Corporate inquiry {} from {}",
        lead.base.code,
        lead.company
    );
    Ok(InquiryResponse {
        lead_id,
        lead_code: lead.base.code,
        whatsapp_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a004_lead::aggregate::LeadStatus;

    fn request() -> InquiryRequest {
        InquiryRequest {
            contact_name: "Priya".into(),
            company: "Acme Corp".into(),
            event: "Diwali gifting".into(),
            estimated_qty: 150,
            phone: Some("9886000001".into()),
        }
    }

    #[test]
    fn inquiry_builds_a_new_lead() {
        let lead = lead_from_inquiry(&request());
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.base.description, "Priya");
        assert_eq!(lead.company, "Acme Corp");
        assert_eq!(lead.estimated_qty, 150);
        assert!(lead.base.code.starts_with("LEAD-"));
        assert!(lead.validate().is_ok());
    }

    #[test]
    fn blank_company_is_rejected() {
        let mut form = request();
        form.company = "  ".into();
        assert!(lead_from_inquiry(&form).validate().is_err());
    }
}
