use std::sync::Arc;

use async_trait::async_trait;
use console_domain::{BackendApi, Merchant, PageResult};

use crate::filters::MerchantFilter;
use crate::list_view::{ListSource, PageQuery};
use crate::AppError;

/// `GET /merchant` returns the whole list, so pages are cut here.
pub struct MerchantSource {
    api: Arc<dyn BackendApi>,
}

impl MerchantSource {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ListSource for MerchantSource {
    type Item = Merchant;
    type Filter = MerchantFilter;

    fn label(&self) -> &'static str {
        "merchants"
    }

    async fn fetch_page(&self, query: &PageQuery<MerchantFilter>) -> Result<PageResult<Merchant>, AppError> {
        let envelope = self.api.get("/merchant", &query.filter.to_params()).await?;
        let merchants: Option<Vec<Merchant>> = envelope.decode_data()?;
        let merchants = merchants.unwrap_or_default();

        let total = merchants.len() as u64;
        let offset = (query.page.saturating_sub(1) as usize).saturating_mul(query.page_size as usize);
        let items = merchants
            .into_iter()
            .skip(offset)
            .take(query.page_size as usize)
            .collect();

        Ok(PageResult {
            items,
            total,
            page: query.page,
            page_size: query.page_size,
        })
    }
}
