// User-visible notice channel
//
// Every outcome the user should see (errors, warnings, sync results) goes
// through the board. Live views subscribe; one-shot commands read `recent`.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use console_domain::{current_millis, EpochMillis};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::Metrics;

const CHANNEL_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: EpochMillis,
}

pub struct NoticeBoard {
    history: Mutex<VecDeque<Notice>>,
    capacity: usize,
    tx: broadcast::Sender<Notice>,
    metrics: Arc<Metrics>,
}

impl NoticeBoard {
    pub fn new(capacity: usize, metrics: Arc<Metrics>) -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_BUFFER);
        Self {
            history: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
            capacity: capacity.max(1),
            tx,
            metrics,
        }
    }

    pub fn push(&self, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice {
            level,
            message: message.into(),
            at: EpochMillis(current_millis()),
        };
        match level {
            NoticeLevel::Error | NoticeLevel::Warning => {
                warn!(level = %level, message = %notice.message, "notice");
            }
            _ => info!(level = %level, message = %notice.message, "notice"),
        }
        self.metrics.record_notice();

        if let Ok(mut history) = self.history.lock() {
            if history.len() == self.capacity {
                history.pop_front();
            }
            history.push_back(notice.clone());
        }
        let _ = self.tx.send(notice);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn recent(&self) -> Vec<Notice> {
        self.history
            .lock()
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notice> {
        self.history
            .lock()
            .ok()
            .and_then(|history| history.back().cloned())
    }
}
