// Single-record view-model (definition detail, sub-task detail)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::list_view::FetchOutcome;
use crate::ops::PollTarget;
use crate::{AppError, Metrics, NoticeBoard};

#[async_trait]
pub trait DetailSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    fn label(&self) -> &'static str;

    async fn fetch_one(&self) -> Result<Self::Item, AppError>;

    fn is_settled(&self, _item: &Self::Item) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailState<T> {
    pub item: Option<T>,
    pub loading: bool,
}

pub struct DetailViewModel<S: DetailSource> {
    source: S,
    state: RwLock<DetailState<S::Item>>,
    sequence: AtomicU64,
    changes: watch::Sender<u64>,
    notices: Arc<NoticeBoard>,
    metrics: Arc<Metrics>,
}

impl<S: DetailSource> DetailViewModel<S> {
    pub fn new(source: S, notices: Arc<NoticeBoard>, metrics: Arc<Metrics>) -> Self {
        let (changes, _rx) = watch::channel(0);
        Self {
            source,
            state: RwLock::new(DetailState {
                item: None,
                loading: false,
            }),
            sequence: AtomicU64::new(0),
            changes,
            notices,
            metrics,
        }
    }

    /// Failed loads keep the last good item on screen.
    pub async fn load(&self) -> FetchOutcome {
        let token = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().await.loading = true;
        self.notify();

        let result = self.source.fetch_one().await;

        let mut state = self.state.write().await;
        if self.sequence.load(Ordering::SeqCst) != token {
            drop(state);
            self.metrics.record_superseded();
            debug!(source = self.source.label(), token, "discarding superseded load");
            return FetchOutcome::Superseded;
        }
        let outcome = match result {
            Ok(item) => {
                state.item = Some(item);
                FetchOutcome::Applied
            }
            Err(err) => {
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

    pub async fn snapshot(&self) -> DetailState<S::Item> {
        self.state.read().await.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    pub async fn is_settled(&self) -> bool {
        let state = self.state.read().await;
        state
            .item
            .as_ref()
            .map(|item| self.source.is_settled(item))
            .unwrap_or(false)
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }
}

#[async_trait]
impl<S: DetailSource> PollTarget for DetailViewModel<S> {
    async fn poll(&self) -> bool {
        if self.load().await != FetchOutcome::Applied {
            return false;
        }
        self.is_settled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Flaky {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DetailSource for Flaky {
        type Item = usize;

        fn label(&self) -> &'static str {
            "record"
        }

        async fn fetch_one(&self) -> Result<usize, AppError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == 2 {
                Err(AppError::Internal(anyhow::anyhow!("socket closed")))
            } else {
                Ok(call)
            }
        }

        fn is_settled(&self, item: &usize) -> bool {
            *item >= 3
        }
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_item_and_uses_fallback() {
        let metrics = Arc::new(Metrics::default());
        let notices = Arc::new(NoticeBoard::new(5, metrics.clone()));
        let view = DetailViewModel::new(
            Flaky {
                calls: AtomicUsize::new(0),
            },
            notices.clone(),
            metrics,
        );

        assert_eq!(view.load().await, FetchOutcome::Applied);
        assert!(!view.poll().await);
        assert_eq!(view.snapshot().await.item, Some(1));
        assert_eq!(
            notices.last().map(|n| n.message),
            Some("failed to load record".to_string())
        );

        assert!(view.poll().await);
        assert_eq!(view.snapshot().await.item, Some(3));
    }
}
