use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use console_application::{AppState, SessionContext};
use console_domain::{BackendApi, SessionStore, TokenSource};
use console_infrastructure::{AppConfig, FileSessionStore, HttpBackendApi};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    /// Wires the HTTP backend and file session store. The stored session is
    /// loaded before any command runs.
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();

        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&config.session_path));
        let session = Arc::new(SessionContext::new(store, &runtime_config));
        let restored = session.initialize().await?;

        let tokens: Arc<dyn TokenSource> = session.clone();
        let api: Arc<dyn BackendApi> = Arc::new(HttpBackendApi::new(&runtime_config, tokens)?);
        info!(
            api = %console_infrastructure::join_url(&runtime_config.api_base_url, &runtime_config.api_prefix),
            logged_in = restored.is_authenticated,
            "console context ready"
        );

        Ok(Self {
            state: AppState::new(runtime_config, api, session),
        })
    }
}
