use std::sync::Arc;

use async_trait::async_trait;
use console_domain::{BackendApi, PageResult, PagedList, Shop};

use crate::filters::ShopFilter;
use crate::list_view::{ListSource, PageQuery};
use crate::AppError;

pub struct ShopSource {
    api: Arc<dyn BackendApi>,
}

impl ShopSource {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ListSource for ShopSource {
    type Item = Shop;
    type Filter = ShopFilter;

    fn label(&self) -> &'static str {
        "shops"
    }

    async fn fetch_page(&self, query: &PageQuery<ShopFilter>) -> Result<PageResult<Shop>, AppError> {
        let params = query.filter.to_params(query.page, query.page_size);
        let envelope = self.api.get("/store-info", &params).await?;
        let paged: PagedList<Shop> = envelope.decode_data()?;
        Ok(paged.into_page(query.page, query.page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, FakeMethod};
    use serde_json::json;

    #[tokio::test]
    async fn string_page_counters_are_accepted() {
        let api = Arc::new(FakeBackend::new());
        api.respond(
            FakeMethod::Get,
            "/store-info",
            json!({
                "list": [{ "shopId": "77", "name": "Main", "platform": "TIKTOK", "status": "LOCK", "authExpiredStatus": "NORMAL", "createTime": "1700000000000" }],
                "total": 1,
                "page": "1",
                "pageSize": "20"
            }),
        );
        let page = ShopSource::new(api)
            .fetch_page(&PageQuery {
                page: 1,
                page_size: 10,
                filter: ShopFilter::default(),
            })
            .await
            .expect("page");

        assert_eq!(page.page_size, 20);
        assert_eq!(page.items[0].shop_id, "77");
    }
}
