use console_domain::{Merchant, MerchantStatus};
use tracing::info;

use crate::commands::report;
use crate::forms::{build_create_merchant, build_update_merchant, MerchantDraft};
use crate::ops::RefreshTopic;
use crate::queries::path_segment;
use crate::{AppError, AppState};

fn merchant_path(merchant_id: &str) -> Result<String, AppError> {
    if merchant_id.trim().is_empty() {
        return Err(AppError::validation("merchant id is required"));
    }
    Ok(format!("/merchant/{}", path_segment(merchant_id)))
}

pub async fn create_merchant(state: &AppState, draft: &MerchantDraft) -> Result<Option<Merchant>, AppError> {
    let result = async {
        let dto = build_create_merchant(draft)?;
        let body = serde_json::to_value(&dto).map_err(anyhow::Error::from)?;
        let envelope = state.api.post("/merchant", Some(body)).await?;
        info!(name = %dto.name, "merchant created");
        Ok::<_, AppError>(envelope.decode_data::<Merchant>().ok())
    }
    .await;

    let result = report(state, result, |_| "merchant created".to_string(), "failed to create merchant")?;
    state.refresh.publish(RefreshTopic::MerchantsChanged).await;
    Ok(result)
}

pub async fn update_merchant(
    state: &AppState,
    merchant_id: &str,
    draft: &MerchantDraft,
) -> Result<Option<Merchant>, AppError> {
    let result = async {
        let path = merchant_path(merchant_id)?;
        let dto = build_update_merchant(draft)?;
        let body = serde_json::to_value(&dto).map_err(anyhow::Error::from)?;
        let envelope = state.api.put(&path, Some(body)).await?;
        info!(merchant_id, "merchant updated");
        Ok::<_, AppError>(envelope.decode_data::<Merchant>().ok())
    }
    .await;

    let result = report(state, result, |_| "merchant updated".to_string(), "operation failed")?;
    state.refresh.publish(RefreshTopic::MerchantsChanged).await;
    Ok(result)
}

/// Soft delete: the backend flips the merchant to INACTIVE.
pub async fn deactivate_merchant(state: &AppState, merchant_id: &str) -> Result<(), AppError> {
    let result = async {
        let path = merchant_path(merchant_id)?;
        let envelope = state.api.del(&path).await?;
        if let Ok(merchant) = envelope.decode_data::<Merchant>() {
            if merchant.status != MerchantStatus::Inactive {
                tracing::warn!(merchant_id, status = %merchant.status, "merchant still active after deactivate");
            }
        }
        info!(merchant_id, "merchant deactivated");
        Ok::<_, AppError>(())
    }
    .await;

    report(state, result, |_| "merchant deactivated".to_string(), "failed to deactivate merchant")?;
    state.refresh.publish(RefreshTopic::MerchantsChanged).await;
    Ok(())
}
