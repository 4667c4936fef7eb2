pub mod diag_handlers;
pub mod merchant_handlers;
pub mod search_handlers;
pub mod session_handlers;
pub mod shop_handlers;
pub mod task_handlers;

pub use diag_handlers::*;
pub use merchant_handlers::*;
pub use search_handlers::*;
pub use session_handlers::*;
pub use shop_handlers::*;
pub use task_handlers::*;

use std::sync::Arc;

use chrono::Local;
use console_application::detail_view::{DetailSource, DetailState, DetailViewModel};
use console_application::list_view::{clamp_page_size, FetchOutcome, ListSource, ListState, ListViewModel};
use console_application::ops::RefreshTopic;
use console_application::AppState;
use console_domain::{EpochMillis, ResourceKey};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::CliError;
use crate::views::Screen;

pub type Emit<'a> = &'a mut (dyn FnMut(Screen) + Send);

pub(crate) fn page_size_or_default(state: &AppState, page_size: Option<u32>) -> u32 {
    clamp_page_size(page_size.unwrap_or(state.config.default_page_size))
}

/// A failed fetch has already posted its notice; this turns it into an exit status.
pub(crate) fn ensure_applied(state: &AppState, outcome: FetchOutcome) -> Result<(), CliError> {
    match outcome {
        FetchOutcome::Applied | FetchOutcome::Superseded => Ok(()),
        FetchOutcome::Failed => Err(CliError::Failed(
            state
                .notices
                .last()
                .map(|notice| notice.message)
                .unwrap_or_else(|| "request failed".to_string()),
        )),
    }
}

pub(crate) fn format_time(value: Option<EpochMillis>) -> String {
    value
        .and_then(EpochMillis::to_datetime)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub(crate) fn or_dash(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("-")
        .to_string()
}

pub(crate) fn page_footer<T, F>(state: &ListState<T, F>) -> String {
    format!(
        "page {}/{} ({} per page)",
        state.page,
        state.total_pages().max(1),
        state.page_size
    )
}

/// Re-renders a polled list until cancelled, or until every item is terminal
/// when polling stops on settle.
pub(crate) async fn watch_list<S, R>(
    state: &AppState,
    key: ResourceKey,
    view: Arc<ListViewModel<S>>,
    topic: Option<RefreshTopic>,
    cancel: CancellationToken,
    emit: Emit<'_>,
    render: R,
) -> Result<(), CliError>
where
    S: ListSource,
    R: Fn(&ListState<S::Item, S::Filter>) -> Screen,
{
    if state.config.stop_polling_when_settled && view.is_settled().await {
        return Ok(());
    }
    let mut changes = view.subscribe();
    let _subscription = state
        .polling
        .subscribe(key.clone(), state.config.poll_interval(), view.clone());
    let signals = cancel.child_token();
    if let Some(topic) = topic {
        let _relay = state.refresh.refresh_on(topic, view.clone(), signals.clone()).await;
    }

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = view.snapshot().await;
                if snapshot.loading {
                    continue;
                }
                emit(render(&snapshot));
                if state.config.stop_polling_when_settled && view.is_settled().await {
                    info!(key = %key, "all items settled, leaving watch");
                    break;
                }
            }
        }
    }
    signals.cancel();
    Ok(())
}

pub(crate) async fn watch_detail<S, R>(
    state: &AppState,
    key: ResourceKey,
    view: Arc<DetailViewModel<S>>,
    cancel: CancellationToken,
    emit: Emit<'_>,
    render: R,
) -> Result<(), CliError>
where
    S: DetailSource,
    R: Fn(&DetailState<S::Item>) -> Screen,
{
    if state.config.stop_polling_when_settled && view.is_settled().await {
        return Ok(());
    }
    let mut changes = view.subscribe();
    let _subscription = state
        .polling
        .subscribe(key.clone(), state.config.poll_interval(), view.clone());

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = view.snapshot().await;
                if snapshot.loading {
                    continue;
                }
                emit(render(&snapshot));
                if state.config.stop_polling_when_settled && view.is_settled().await {
                    info!(key = %key, "record settled, leaving watch");
                    break;
                }
            }
        }
    }
    Ok(())
}
