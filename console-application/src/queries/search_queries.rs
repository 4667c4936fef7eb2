use std::sync::Arc;

use async_trait::async_trait;
use console_domain::{BackendApi, InfluencerSearchItem, PageResult, PagedList};
use serde_json::json;

use crate::filters::SearchFilter;
use crate::list_view::{FetchOutcome, ListSource, ListViewModel, PageQuery};
use crate::{AppError, NoticeBoard};

pub const SEARCH_PAGE_SIZE: u32 = 10;
pub const EMPTY_KEYWORD_WARNING: &str = "please enter an influencer id";

pub struct InfluencerSearchSource {
    api: Arc<dyn BackendApi>,
}

impl InfluencerSearchSource {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ListSource for InfluencerSearchSource {
    type Item = InfluencerSearchItem;
    type Filter = SearchFilter;

    fn label(&self) -> &'static str {
        "search results"
    }

    async fn fetch_page(
        &self,
        query: &PageQuery<SearchFilter>,
    ) -> Result<PageResult<InfluencerSearchItem>, AppError> {
        if query.filter.keyword.is_empty() {
            return Err(AppError::validation(EMPTY_KEYWORD_WARNING));
        }
        let body = json!({
            "keyword": query.filter.keyword,
            "page": query.page,
            "limit": query.page_size,
        });
        let envelope = self.api.post("/fastmoss/search", Some(body)).await?;
        let paged: PagedList<InfluencerSearchItem> = envelope.decode_data()?;
        Ok(paged.into_page(query.page, query.page_size))
    }
}

/// A blank keyword is a warning and never reaches the network.
pub async fn search_influencers(
    view: &ListViewModel<InfluencerSearchSource>,
    notices: &NoticeBoard,
    keyword: &str,
    page: u32,
    page_size: u32,
) -> Option<FetchOutcome> {
    let filter = SearchFilter::new(keyword);
    if filter.keyword.is_empty() {
        notices.warning(EMPTY_KEYWORD_WARNING);
        return None;
    }

    let outcome = view.fetch(page, page_size, filter).await;
    if outcome == FetchOutcome::Applied {
        let total = view.snapshot().await.total;
        if total > 0 {
            notices.success(format!("found {total} results"));
        } else {
            notices.info("no matching influencers");
        }
    }
    Some(outcome)
}
