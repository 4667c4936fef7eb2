use console_application::list_view::{clamp_page_size, FetchOutcome, ListState, ListViewModel};
use console_application::queries::{search_influencers, InfluencerSearchSource, SEARCH_PAGE_SIZE};
use console_application::filters::SearchFilter;
use console_application::AppState;
use console_domain::InfluencerSearchItem;

use crate::error::CliError;
use crate::handlers::{ensure_applied, or_dash, page_footer, Emit};
use crate::views::{truncate, Screen};

fn results_screen(list: &ListState<InfluencerSearchItem, SearchFilter>) -> Screen {
    let rows = list
        .items
        .iter()
        .map(|item| {
            let sales = if item.sale_amount_show.trim().is_empty() {
                format!("{:.2}", item.product_sales_amount)
            } else {
                item.sale_amount_show.clone()
            };
            vec![
                or_dash(Some(item.influencer_id.as_str())),
                item.influencer_name.clone(),
                item.influencer_followers.to_string(),
                or_dash(Some(item.country_region.as_str())),
                item.product_sales_count.to_string(),
                sales,
                truncate(&or_dash(Some(item.fastmoss_detail_url.as_str())), 48),
            ]
        })
        .collect();
    Screen::titled(format!("Search: {}", list.filters.keyword))
        .with_table(
            vec!["INFLUENCER", "NAME", "FOLLOWERS", "REGION", "SALES", "AMOUNT", "DETAIL"],
            rows,
        )
        .with_total(list.total)
        .with_footer(page_footer(list))
}

/// A blank keyword only produces the warning notice.
pub async fn search(
    state: &AppState,
    keyword: &str,
    page: u32,
    page_size: Option<u32>,
    emit: Emit<'_>,
) -> Result<(), CliError> {
    let page_size = page_size.map(clamp_page_size).unwrap_or(SEARCH_PAGE_SIZE);
    let view = ListViewModel::new(
        InfluencerSearchSource::new(state.api.clone()),
        page_size,
        state.notices.clone(),
        state.metrics.clone(),
    );
    match search_influencers(&view, &state.notices, keyword, page, page_size).await {
        None => emit(Screen::default()),
        Some(outcome) => {
            ensure_applied(state, outcome)?;
            if outcome == FetchOutcome::Applied {
                emit(results_screen(&view.snapshot().await));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_application::testing::{test_state, FakeBackend, FakeMethod};
    use console_application::NoticeLevel;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn two_results_render_two_rows() {
        let api = Arc::new(FakeBackend::new());
        api.respond(
            FakeMethod::Post,
            "/fastmoss/search",
            json!({
                "list": [
                    { "id": 1, "influencerId": "influencer123", "influencerName": "Ann", "influencerFollowers": 1200, "productSalesAmount": "99.5" },
                    { "id": 2, "influencerId": "influencer123", "influencerName": "Ann B", "influencerFollowers": "800" }
                ],
                "total": 2
            }),
        );
        let state = test_state(api.clone()).await;
        let mut screens = Vec::new();

        search(&state, "influencer123", 1, None, &mut |screen| screens.push(screen))
            .await
            .expect("search");

        assert_eq!(screens.len(), 1);
        assert_eq!(screens[0].rows.len(), 2);
        assert_eq!(screens[0].total_label.as_deref(), Some("2"));
        assert_eq!(screens[0].rows[0][5], "99.50");
        assert_eq!(screens[0].footer.as_deref(), Some("page 1/1 (10 per page)"));
        assert_eq!(
            api.last_body(FakeMethod::Post, "/fastmoss/search"),
            Some(json!({ "keyword": "influencer123", "page": 1, "limit": 10 }))
        );
    }

    #[tokio::test]
    async fn blank_keyword_warns_without_request() {
        let api = Arc::new(FakeBackend::new());
        let state = test_state(api.clone()).await;

        search(&state, "   ", 1, None, &mut |_| {}).await.expect("search");

        assert!(api.calls().is_empty());
        assert_eq!(state.notices.last().map(|n| n.level), Some(NoticeLevel::Warning));
    }
}
