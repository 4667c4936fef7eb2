use console_domain::{ApiEnvelope, SyncOrderRequest, SyncOutcome};
use tracing::{info, warn};

use crate::{AppError, AppState};

/// Turns a sync response into a notice: success with the count, or a
/// warning carrying the server message when the job reports `success: false`.
fn report_sync(state: &AppState, what: &str, envelope: &ApiEnvelope) -> SyncOutcome {
    let outcome = SyncOutcome::from_envelope(envelope).unwrap_or_else(|| SyncOutcome {
        success: true,
        message: envelope.message.clone(),
        count: 0,
    });
    if outcome.success {
        info!(what, count = outcome.count, "sync finished");
        state
            .notices
            .success(format!("{what} synced, {} records", outcome.count));
    } else {
        let message = if outcome.message.trim().is_empty() {
            format!("{what} sync failed")
        } else {
            outcome.message.trim().to_string()
        };
        warn!(what, message = %message, "sync reported failure");
        state.notices.warning(message);
    }
    outcome
}

pub async fn sync_shops(state: &AppState) -> Result<SyncOutcome, AppError> {
    match state.api.post("/store-info/sync", None).await {
        Ok(envelope) => Ok(report_sync(state, "shops", &envelope)),
        Err(err) => {
            let err = AppError::from(err);
            state.notices.error(err.user_message("failed to sync shops"));
            Err(err)
        }
    }
}

pub async fn sync_orders(state: &AppState, request: &SyncOrderRequest) -> Result<SyncOutcome, AppError> {
    let body = serde_json::to_value(request).map_err(anyhow::Error::from)?;
    match state.api.post("/order/sync", Some(body)).await {
        Ok(envelope) => Ok(report_sync(state, "orders", &envelope)),
        Err(err) => {
            let err = AppError::from(err);
            state.notices.error(err.user_message("failed to sync orders"));
            Err(err)
        }
    }
}
