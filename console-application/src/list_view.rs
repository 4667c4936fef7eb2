// Generic paginated list view-model
//
// Every list screen (merchants, shops, definitions, instances, sub-tasks,
// search results) is a `ListViewModel` over a `ListSource`. The last-issued
// fetch is authoritative: each fetch takes a sequence token, and a result
// whose token is no longer current is dropped without touching state or the
// notice channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use console_domain::PageResult;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::ops::PollTarget;
use crate::{AppError, Metrics, NoticeBoard};

pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery<F> {
    pub page: u32,
    pub page_size: u32,
    pub filter: F,
}

#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;
    type Filter: Clone + Default + PartialEq + Send + Sync + 'static;

    fn label(&self) -> &'static str;

    async fn fetch_page(
        &self,
        query: &PageQuery<Self::Filter>,
    ) -> Result<PageResult<Self::Item>, AppError>;

    fn is_settled(&self, _items: &[Self::Item]) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T, F> {
    pub items: Vec<T>,
    pub loading: bool,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub filters: F,
    pub failed: bool,
}

impl<T, F> ListState<T, F> {
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    Superseded,
}

pub struct ListViewModel<S: ListSource> {
    source: S,
    state: RwLock<ListState<S::Item, S::Filter>>,
    sequence: AtomicU64,
    changes: watch::Sender<u64>,
    notices: Arc<NoticeBoard>,
    metrics: Arc<Metrics>,
}

impl<S: ListSource> ListViewModel<S> {
    pub fn new(source: S, page_size: u32, notices: Arc<NoticeBoard>, metrics: Arc<Metrics>) -> Self {
        let (changes, _rx) = watch::channel(0);
        Self {
            source,
            state: RwLock::new(ListState {
                items: Vec::new(),
                loading: false,
                page: 1,
                page_size: clamp_page_size(page_size),
                total: 0,
                filters: S::Filter::default(),
                failed: false,
            }),
            sequence: AtomicU64::new(0),
            changes,
            notices,
            metrics,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn fetch(&self, page: u32, page_size: u32, filters: S::Filter) -> FetchOutcome {
        let query = PageQuery {
            page: page.max(1),
            page_size: clamp_page_size(page_size),
            filter: filters,
        };
        let token = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        self.state.write().await.loading = true;
        self.notify();

        let result = self.source.fetch_page(&query).await;

        let mut state = self.state.write().await;
        if self.sequence.load(Ordering::SeqCst) != token {
            drop(state);
            self.metrics.record_superseded();
            debug!(source = self.source.label(), token, "discarding superseded fetch");
            return FetchOutcome::Superseded;
        }

        let outcome = match result {
            Ok(page_result) => {
                state.items = page_result.items;
                state.total = page_result.total;
                state.page = page_result.page.max(1);
                state.page_size = clamp_page_size(page_result.page_size);
                state.filters = query.filter;
                state.failed = false;
                FetchOutcome::Applied
            }
            Err(err) => {
                state.items.clear();
                state.total = 0;
                state.failed = true;
                let fallback = format!("failed to load {}", self.source.label());
                self.notices.error(err.user_message(&fallback));
                FetchOutcome::Failed
            }
        };
        state.loading = false;
        drop(state);
        self.notify();
        outcome
    }

    pub async fn apply_filters(&self, filters: S::Filter) -> FetchOutcome {
        let page_size = self.state.read().await.page_size;
        self.fetch(1, page_size, filters).await
    }

    pub async fn reset(&self) -> FetchOutcome {
        let page_size = self.state.read().await.page_size;
        self.fetch(1, page_size, S::Filter::default()).await
    }

    pub async fn change_page(&self, page: u32, page_size: u32) -> FetchOutcome {
        let filters = self.state.read().await.filters.clone();
        self.fetch(page, page_size, filters).await
    }

    pub async fn refresh(&self) -> FetchOutcome {
        let (page, page_size, filters) = {
            let state = self.state.read().await;
            (state.page, state.page_size, state.filters.clone())
        };
        self.fetch(page, page_size, filters).await
    }

    pub async fn snapshot(&self) -> ListState<S::Item, S::Filter> {
        self.state.read().await.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    pub async fn is_settled(&self) -> bool {
        let state = self.state.read().await;
        !state.failed && self.source.is_settled(&state.items)
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }
}

#[async_trait]
impl<S: ListSource> PollTarget for ListViewModel<S> {
    async fn poll(&self) -> bool {
        match self.refresh().await {
            FetchOutcome::Applied => self.is_settled().await,
            FetchOutcome::Failed | FetchOutcome::Superseded => false,
        }
    }
}

pub fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(1, MAX_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoticeLevel;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::oneshot;

    /// Source whose responses are released by the test, one per page.
    #[derive(Default)]
    struct GatedSource {
        gates: Mutex<HashMap<u32, oneshot::Receiver<Result<Vec<u32>, String>>>>,
    }

    impl GatedSource {
        fn gate(&self, page: u32) -> oneshot::Sender<Result<Vec<u32>, String>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().expect("gates").insert(page, rx);
            tx
        }
    }

    #[async_trait]
    impl ListSource for GatedSource {
        type Item = u32;
        type Filter = Option<String>;

        fn label(&self) -> &'static str {
            "numbers"
        }

        async fn fetch_page(&self, query: &PageQuery<Self::Filter>) -> Result<PageResult<u32>, AppError> {
            let rx = self
                .gates
                .lock()
                .expect("gates")
                .remove(&query.page)
                .expect("gate registered for page");
            match rx.await.expect("gate released") {
                Ok(items) => Ok(PageResult {
                    total: items.len() as u64,
                    items,
                    page: query.page,
                    page_size: query.page_size,
                }),
                Err(message) => Err(AppError::validation(message)),
            }
        }

        fn is_settled(&self, items: &[u32]) -> bool {
            !items.is_empty() && items.iter().all(|n| *n == 0)
        }
    }

    fn view() -> Arc<ListViewModel<GatedSource>> {
        let metrics = Arc::new(Metrics::default());
        Arc::new(ListViewModel::new(
            GatedSource::default(),
            10,
            Arc::new(NoticeBoard::new(10, metrics.clone())),
            metrics,
        ))
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn later_fetch_wins_even_when_earlier_resolves_last() {
        let view = view();
        let page1 = view.source().gate(1);
        let page2 = view.source().gate(2);

        let first = tokio::spawn({
            let view = view.clone();
            async move { view.fetch(1, 10, None).await }
        });
        settle().await;
        let second = tokio::spawn({
            let view = view.clone();
            async move { view.fetch(2, 10, None).await }
        });
        settle().await;

        page2.send(Ok(vec![20, 21])).expect("release page 2");
        assert_eq!(second.await.expect("join"), FetchOutcome::Applied);

        page1.send(Ok(vec![10])).expect("release page 1");
        assert_eq!(first.await.expect("join"), FetchOutcome::Superseded);

        let state = view.snapshot().await;
        assert_eq!(state.page, 2);
        assert_eq!(state.items, vec![20, 21]);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn superseded_failure_leaves_no_notice() {
        let view = view();
        let page1 = view.source().gate(1);
        let page2 = view.source().gate(2);

        let first = tokio::spawn({
            let view = view.clone();
            async move { view.fetch(1, 10, None).await }
        });
        settle().await;
        let second = tokio::spawn({
            let view = view.clone();
            async move { view.fetch(2, 10, None).await }
        });
        settle().await;

        page1.send(Err("boom".into())).expect("release page 1");
        assert_eq!(first.await.expect("join"), FetchOutcome::Superseded);
        assert!(view.snapshot().await.loading);

        page2.send(Ok(vec![1])).expect("release page 2");
        assert_eq!(second.await.expect("join"), FetchOutcome::Applied);
        assert!(view.notices.recent().is_empty());
    }

    #[tokio::test]
    async fn failure_clears_items_and_reports_error() {
        let view = view();
        view.source().gate(1).send(Ok(vec![1, 2])).expect("release");
        view.fetch(1, 10, None).await;

        view.source().gate(1).send(Err("backend down".into())).expect("release");
        assert_eq!(view.refresh().await, FetchOutcome::Failed);

        let state = view.snapshot().await;
        assert!(state.items.is_empty());
        assert_eq!(state.total, 0);
        assert!(!state.loading);
        let notice = view.notices.last().expect("notice");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "backend down");
    }

    #[tokio::test]
    async fn apply_filters_resets_page_and_change_page_keeps_filters() {
        let view = view();
        view.source().gate(3).send(Ok(vec![])).expect("release");
        view.fetch(3, 20, None).await;

        view.source().gate(1).send(Ok(vec![])).expect("release");
        view.apply_filters(Some("processing".into())).await;
        let state = view.snapshot().await;
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 20);
        assert_eq!(state.filters.as_deref(), Some("processing"));

        view.source().gate(2).send(Ok(vec![])).expect("release");
        view.change_page(2, 500).await;
        let state = view.snapshot().await;
        assert_eq!(state.page, 2);
        assert_eq!(state.page_size, MAX_PAGE_SIZE);
        assert_eq!(state.filters.as_deref(), Some("processing"));

        view.source().gate(1).send(Ok(vec![])).expect("release");
        view.reset().await;
        assert_eq!(view.snapshot().await.filters, None);
    }

    #[tokio::test]
    async fn poll_reports_settled_items() {
        let view = view();
        view.source().gate(1).send(Ok(vec![0, 0])).expect("release");
        view.fetch(1, 10, None).await;

        view.source().gate(1).send(Ok(vec![0, 0])).expect("release");
        assert!(view.poll().await);

        view.source().gate(1).send(Ok(vec![0, 1])).expect("release");
        assert!(!view.poll().await);
    }

    #[tokio::test]
    async fn subscribers_see_state_changes() {
        let view = view();
        let mut changes = view.subscribe();
        view.source().gate(1).send(Ok(vec![5])).expect("release");
        view.fetch(1, 10, None).await;

        tokio::time::timeout(Duration::from_secs(1), changes.changed())
            .await
            .expect("change within timeout")
            .expect("sender alive");
    }

    #[test]
    fn total_pages_rounds_up() {
        let state: ListState<u8, ()> = ListState {
            items: vec![],
            loading: false,
            page: 1,
            page_size: 10,
            total: 31,
            filters: (),
            failed: false,
        };
        assert_eq!(state.total_pages(), 4);
    }
}
