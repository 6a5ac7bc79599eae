use super::repository;
use anyhow::Result;
use contracts::domain::a005_customer::aggregate::{Customer, CustomerPatch};
use uuid::Uuid;

pub async fn list_all() -> Result<Vec<Customer>> {
    repository::list_all().await
}

pub async fn get_by_id(id: Uuid) -> Result<Option<Customer>> {
    repository::get_by_id(id).await
}

pub async fn get_by_phone(phone: &str) -> Result<Option<Customer>> {
    repository::get_by_phone(phone).await
}

/// Merge-apply the operator-owned fields. Derived fields (counts, spend,
/// last order date) stay untouched; the next sync owns those.
pub fn merge_patch(customer: &mut Customer, patch: CustomerPatch) {
    if let Some(notes) = patch.notes {
        customer.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
    }
    if let Some(add) = patch.add_tags {
        for tag in add {
            let tag = tag.trim().to_string();
            if !tag.is_empty() {
                customer.tags.insert(tag);
            }
        }
    }
    if let Some(remove) = patch.remove_tags {
        for tag in remove {
            customer.tags.remove(tag.trim());
        }
    }
}

pub async fn apply_patch(id: Uuid, patch: CustomerPatch) -> Result<Customer> {
    let mut customer = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Customer not found: {}", id))?;

    merge_patch(&mut customer, patch);
    customer.before_write();
    repository::upsert(&customer).await?;

    tracing::info!("Patched customer {}", customer.base.code);
    Ok(customer)
}

pub async fn delete(id: Uuid) -> Result<bool> {
    repository::soft_delete(id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer::new_for_insert("CST-1".into(), "Ravi".into(), "9845000000".into())
    }

    #[test]
    fn patch_adds_and_removes_tags() {
        let mut c = customer();
        merge_patch(
            &mut c,
            CustomerPatch {
                notes: None,
                add_tags: Some(vec!["vip".into(), "corporate".into()]),
                remove_tags: None,
            },
        );
        assert!(c.tags.contains("vip"));

        merge_patch(
            &mut c,
            CustomerPatch {
                notes: None,
                add_tags: None,
                remove_tags: Some(vec!["vip".into()]),
            },
        );
        assert!(!c.tags.contains("vip"));
        assert!(c.tags.contains("corporate"));
    }

    #[test]
    fn absent_patch_fields_leave_record_untouched() {
        let mut c = customer();
        c.notes = Some("regular weekend buyer".into());
        merge_patch(
            &mut c,
            CustomerPatch {
                notes: None,
                add_tags: None,
                remove_tags: None,
            },
        );
        assert_eq!(c.notes.as_deref(), Some("regular weekend buyer"));
    }

    #[test]
    fn blank_notes_clear_the_field() {
        let mut c = customer();
        c.notes = Some("old".into());
        merge_patch(
            &mut c,
            CustomerPatch {
                notes: Some("  ".into()),
                add_tags: None,
                remove_tags: None,
            },
        );
        assert_eq!(c.notes, None);
    }
}
