use console_application::commands::merchant_commands;
use console_application::filters::MerchantFilter;
use console_application::forms::MerchantDraft;
use console_application::list_view::{ListState, ListViewModel};
use console_application::queries::MerchantSource;
use console_application::AppState;
use console_domain::Merchant;

use crate::error::CliError;
use crate::handlers::{ensure_applied, format_time, or_dash, page_footer, page_size_or_default, Emit};
use crate::views::{merchant_status_badge, truncate, Screen};

fn merchants_screen(list: &ListState<Merchant, MerchantFilter>) -> Screen {
    let rows = list
        .items
        .iter()
        .map(|merchant| {
            vec![
                merchant.id.clone(),
                merchant.name.clone(),
                merchant_status_badge(&merchant.status).render(),
                or_dash(merchant.admin.as_ref().map(|admin| admin.email.as_str())),
                truncate(&or_dash(merchant.description.as_deref()), 40),
                format_time(merchant.created_at),
            ]
        })
        .collect();
    Screen::titled("Merchants")
        .with_table(vec!["ID", "NAME", "STATUS", "ADMIN", "DESCRIPTION", "CREATED"], rows)
        .with_total(list.total)
        .with_footer(page_footer(list))
}

fn merchant_screen(title: &str, merchant: &Merchant) -> Screen {
    Screen::titled(title)
        .field("id", merchant.id.clone())
        .field("name", merchant.name.clone())
        .field("status", merchant_status_badge(&merchant.status).render())
        .field("description", or_dash(merchant.description.as_deref()))
}

pub async fn list_merchants(
    state: &AppState,
    status: Option<String>,
    page: u32,
    page_size: Option<u32>,
    emit: Emit<'_>,
) -> Result<(), CliError> {
    let page_size = page_size_or_default(state, page_size);
    let view = ListViewModel::new(
        MerchantSource::new(state.api.clone()),
        page_size,
        state.notices.clone(),
        state.metrics.clone(),
    );
    let outcome = view
        .fetch(page, page_size, MerchantFilter::from_form(status))
        .await;
    ensure_applied(state, outcome)?;
    emit(merchants_screen(&view.snapshot().await));
    Ok(())
}

pub async fn create_merchant(state: &AppState, draft: &MerchantDraft, emit: Emit<'_>) -> Result<(), CliError> {
    match merchant_commands::create_merchant(state, draft).await? {
        Some(merchant) => emit(merchant_screen("Merchant created", &merchant)),
        None => emit(Screen::default()),
    }
    Ok(())
}

pub async fn update_merchant(
    state: &AppState,
    merchant_id: &str,
    draft: &MerchantDraft,
    emit: Emit<'_>,
) -> Result<(), CliError> {
    match merchant_commands::update_merchant(state, merchant_id, draft).await? {
        Some(merchant) => emit(merchant_screen("Merchant updated", &merchant)),
        None => emit(Screen::default()),
    }
    Ok(())
}

pub async fn deactivate_merchant(state: &AppState, merchant_id: &str, emit: Emit<'_>) -> Result<(), CliError> {
    merchant_commands::deactivate_merchant(state, merchant_id).await?;
    emit(Screen::default());
    Ok(())
}
