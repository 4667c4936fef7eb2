use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use console_domain::{current_millis, EpochMillis};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::PollTarget;

const CHANNEL_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshTopic {
    TaskCreated,
    MerchantsChanged,
    InstancesChanged,
}

impl RefreshTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshTopic::TaskCreated => "task-created",
            RefreshTopic::MerchantsChanged => "merchants-changed",
            RefreshTopic::InstancesChanged => "instances-changed",
        }
    }
}

impl fmt::Display for RefreshTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSignal {
    pub topic: RefreshTopic,
    pub at: EpochMillis,
}

/// Broadcasts "something changed, re-fetch" between otherwise unrelated views.
#[derive(Default)]
pub struct RefreshHub {
    channels: RwLock<HashMap<RefreshTopic, broadcast::Sender<RefreshSignal>>>,
}

impl RefreshHub {
    pub async fn subscribe(&self, topic: RefreshTopic) -> broadcast::Receiver<RefreshSignal> {
        let mut channels = self.channels.write().await;
        channels
            .entry(topic)
            .or_insert_with(|| {
                let (tx, _rx) = broadcast::channel(CHANNEL_BUFFER);
                tx
            })
            .subscribe()
    }

    pub async fn publish(&self, topic: RefreshTopic) {
        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(&topic) {
            let delivered = tx
                .send(RefreshSignal {
                    topic,
                    at: EpochMillis(current_millis()),
                })
                .unwrap_or(0);
            debug!(topic = %topic, delivered, "refresh signal published");
        }
    }

    /// Refreshes `target` whenever `topic` fires, until `cancel` is triggered.
    pub async fn refresh_on(
        &self,
        topic: RefreshTopic,
        target: Arc<dyn PollTarget>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let mut rx = self.subscribe(topic).await;
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    received = rx.recv() => match received {
                        Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                            debug!(topic = %topic, "refreshing on signal");
                            target.poll().await;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter(AtomicUsize);

    #[async_trait]
    impl PollTarget for Counter {
        async fn poll(&self) -> bool {
            self.0.fetch_add(1, Ordering::SeqCst);
            false
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let hub = RefreshHub::default();
        hub.publish(RefreshTopic::TaskCreated).await;
    }

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let hub = RefreshHub::default();
        let mut created = hub.subscribe(RefreshTopic::TaskCreated).await;
        let mut merchants = hub.subscribe(RefreshTopic::MerchantsChanged).await;

        hub.publish(RefreshTopic::TaskCreated).await;

        let signal = created.recv().await.expect("signal");
        assert_eq!(signal.topic, RefreshTopic::TaskCreated);
        assert!(merchants.try_recv().is_err());
    }

    #[tokio::test]
    async fn refresh_on_polls_target_until_cancelled() {
        let hub = RefreshHub::default();
        let counter = Arc::new(Counter::default());
        let cancel = CancellationToken::new();
        let handle = hub
            .refresh_on(RefreshTopic::TaskCreated, counter.clone(), cancel.clone())
            .await;

        hub.publish(RefreshTopic::TaskCreated).await;
        for _ in 0..10 {
            if counter.0.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);

        cancel.cancel();
        handle.await.expect("listener exits");
    }
}
