// Keyed, reference-counted polling timers
//
// One timer per resource key. Subscribers hold a `PollSubscription`; the timer
// is cancelled when the last one is dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use console_domain::ResourceKey;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::Metrics;

#[async_trait]
pub trait PollTarget: Send + Sync {
    /// Re-fetches and reports whether everything shown is settled.
    async fn poll(&self) -> bool;
}

struct PollEntry {
    subscribers: usize,
    cancel: CancellationToken,
}

type Registry = Arc<Mutex<HashMap<ResourceKey, PollEntry>>>;

pub struct PollingService {
    registry: Registry,
    metrics: Arc<Metrics>,
    stop_when_settled: bool,
}

impl PollingService {
    pub fn new(metrics: Arc<Metrics>, stop_when_settled: bool) -> Self {
        Self {
            registry: Arc::new(Mutex::new(HashMap::new())),
            metrics,
            stop_when_settled,
        }
    }

    /// Starts polling `key` or joins the timer already running for it.
    ///
    /// The target of whichever subscriber started the timer is the one that
    /// gets refreshed. If the timer stopped because the target settled, this
    /// restarts it with the new target.
    pub fn subscribe(
        &self,
        key: ResourceKey,
        interval: Duration,
        target: Arc<dyn PollTarget>,
    ) -> PollSubscription {
        let mut registry = match self.registry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let entry = registry.entry(key.clone()).or_insert_with(|| PollEntry {
            subscribers: 0,
            cancel: CancellationToken::new(),
        });
        entry.subscribers += 1;

        let needs_start = entry.subscribers == 1 || entry.cancel.is_cancelled();
        if needs_start {
            if entry.cancel.is_cancelled() {
                entry.cancel = CancellationToken::new();
            }
            info!(key = %key, interval_ms = interval.as_millis() as u64, "polling started");
            tokio::spawn(run_poll_loop(
                key.clone(),
                interval,
                target,
                entry.cancel.clone(),
                self.metrics.clone(),
                self.stop_when_settled,
            ));
        } else {
            debug!(key = %key, subscribers = entry.subscribers, "joined existing poll timer");
        }

        PollSubscription {
            key,
            registry: self.registry.clone(),
        }
    }

    pub fn is_active(&self, key: &ResourceKey) -> bool {
        self.registry
            .lock()
            .map(|registry| {
                registry
                    .get(key)
                    .map(|entry| !entry.cancel.is_cancelled())
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    pub fn subscriber_count(&self, key: &ResourceKey) -> usize {
        self.registry
            .lock()
            .map(|registry| registry.get(key).map(|entry| entry.subscribers).unwrap_or(0))
            .unwrap_or(0)
    }
}

async fn run_poll_loop(
    key: ResourceKey,
    interval: Duration,
    target: Arc<dyn PollTarget>,
    cancel: CancellationToken,
    metrics: Arc<Metrics>,
    stop_when_settled: bool,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }

        metrics.record_poll_tick();
        debug!(key = %key, "poll tick");

        let settled = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            settled = target.poll() => settled,
        };

        if settled && stop_when_settled {
            info!(key = %key, "polling stopped, all items settled");
            cancel.cancel();
            break;
        }
    }
    debug!(key = %key, "poll loop exited");
}

/// Keeps a poll timer alive. Dropping the last subscription for a key
/// cancels its timer.
pub struct PollSubscription {
    key: ResourceKey,
    registry: Registry,
}

impl PollSubscription {
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }
}

impl Drop for PollSubscription {
    fn drop(&mut self) {
        let mut registry = match self.registry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let remove = match registry.get_mut(&self.key) {
            Some(entry) => {
                entry.subscribers = entry.subscribers.saturating_sub(1);
                entry.subscribers == 0
            }
            None => false,
        };
        if remove {
            if let Some(entry) = registry.remove(&self.key) {
                entry.cancel.cancel();
                debug!(key = %self.key, "polling cancelled, last subscriber left");
            }
        }
    }
}
