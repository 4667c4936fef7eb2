use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use console_domain::{BackendApi, RuntimeConfig};

use crate::ops::{MeteredApi, PollingService, RefreshHub};
use crate::{Metrics, NoticeBoard, SessionContext};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub api: Arc<dyn BackendApi>,
    pub session: Arc<SessionContext>,
    pub refresh: Arc<RefreshHub>,
    pub polling: Arc<PollingService>,
    pub notices: Arc<NoticeBoard>,
    pub metrics: Arc<Metrics>,
    /// Instance ids with a run request in flight.
    pub starting_instances: Arc<Mutex<HashSet<String>>>,
}

impl AppState {
    pub fn new(
        config: RuntimeConfig,
        api: Arc<dyn BackendApi>,
        session: Arc<SessionContext>,
    ) -> Self {
        let metrics = Arc::new(Metrics::default());
        let api: Arc<dyn BackendApi> = Arc::new(MeteredApi::new(api, metrics.clone()));
        Self {
            polling: Arc::new(PollingService::new(
                metrics.clone(),
                config.stop_polling_when_settled,
            )),
            notices: Arc::new(NoticeBoard::new(config.notice_history, metrics.clone())),
            refresh: Arc::new(RefreshHub::default()),
            starting_instances: Arc::new(Mutex::new(HashSet::new())),
            config,
            api,
            session,
            metrics,
        }
    }
}
