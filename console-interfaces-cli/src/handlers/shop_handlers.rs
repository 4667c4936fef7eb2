use console_application::commands::sync_commands;
use console_application::filters::{ShopFilter, ShopFilterForm};
use console_application::list_view::{ListState, ListViewModel};
use console_application::queries::ShopSource;
use console_application::AppState;
use console_domain::{Shop, SyncOrderRequest, SyncOutcome};

use crate::error::CliError;
use crate::handlers::{ensure_applied, format_time, or_dash, page_footer, page_size_or_default, Emit};
use crate::views::{auth_status_badge, shop_status_badge, Screen};

fn shops_screen(list: &ListState<Shop, ShopFilter>) -> Screen {
    let rows = list
        .items
        .iter()
        .map(|shop| {
            vec![
                shop.shop_id.clone(),
                shop.name.clone(),
                or_dash(Some(shop.platform.as_str())),
                or_dash(shop.site_code.as_deref()),
                shop_status_badge(&shop.status).render(),
                auth_status_badge(&shop.auth_expired_status).render(),
                format_time(shop.expire_time),
            ]
        })
        .collect();
    Screen::titled("Shops")
        .with_table(
            vec!["SHOP ID", "NAME", "PLATFORM", "SITE", "STATUS", "AUTH", "EXPIRES"],
            rows,
        )
        .with_total(list.total)
        .with_footer(page_footer(list))
}

fn sync_screen(title: &str, outcome: &SyncOutcome) -> Screen {
    Screen::titled(title)
        .field("success", outcome.success.to_string())
        .field("records", outcome.count.to_string())
}

pub async fn list_shops(
    state: &AppState,
    form: ShopFilterForm,
    page: u32,
    page_size: Option<u32>,
    emit: Emit<'_>,
) -> Result<(), CliError> {
    let page_size = page_size_or_default(state, page_size);
    let view = ListViewModel::new(
        ShopSource::new(state.api.clone()),
        page_size,
        state.notices.clone(),
        state.metrics.clone(),
    );
    let outcome = view
        .fetch(page, page_size, ShopFilter::from_form(form))
        .await;
    ensure_applied(state, outcome)?;
    emit(shops_screen(&view.snapshot().await));
    Ok(())
}

/// A job that reports `success: false` is shown as a warning, not a failure exit.
pub async fn sync_shops(state: &AppState, emit: Emit<'_>) -> Result<(), CliError> {
    let outcome = sync_commands::sync_shops(state).await?;
    emit(sync_screen("Shop sync", &outcome));
    Ok(())
}

pub async fn sync_orders(state: &AppState, request: &SyncOrderRequest, emit: Emit<'_>) -> Result<(), CliError> {
    let outcome = sync_commands::sync_orders(state, request).await?;
    emit(sync_screen("Order sync", &outcome));
    Ok(())
}
