use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use console_domain::{normalize_optional_text, RuntimeConfig};

use crate::config::validation::{validate_api_prefix, validate_base_url};
use crate::utils::{parse_flag, resolve_path};

pub const CONFIG_ENV: &str = "OPS_CONSOLE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "./ops-console.toml";
const ENV_PREFIX: &str = "OPS_CONSOLE_";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_prefix: String,
    pub request_timeout_seconds: u64,
    pub poll_interval_seconds: u64,
    pub stop_polling_when_settled: bool,
    pub default_page_size: u32,
    pub session_path: String,
    pub demo_username: String,
    pub demo_password: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub notice_history: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let runtime = RuntimeConfig::default();
        Self {
            api_base_url: runtime.api_base_url,
            api_prefix: runtime.api_prefix,
            request_timeout_seconds: runtime.request_timeout_seconds,
            poll_interval_seconds: runtime.poll_interval_seconds,
            stop_polling_when_settled: runtime.stop_polling_when_settled,
            default_page_size: runtime.default_page_size,
            session_path: "./session.json".to_string(),
            demo_username: runtime.demo_username,
            demo_password: runtime.demo_password,
            log_level: "info".to_string(),
            log_dir: None,
            notice_history: runtime.notice_history,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path), |key| env::var(key).ok()).await
    }

    /// Loads `path` (defaults when missing), then applies overrides from `lookup`.
    pub async fn load_from<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).await?;
            toml::from_str::<AppConfig>(&content)
                .map_err(|err| anyhow!("invalid config {}: {}", path.display(), err))?
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_env_overrides(lookup);
        config.resolve_paths(path.parent());
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.api_base_url = self.api_base_url.trim().trim_end_matches('/').to_string();
        self.api_prefix = self.api_prefix.trim().trim_end_matches('/').to_string();
        self.log_level = self.log_level.trim().to_string();
        if self.log_level.is_empty() {
            self.log_level = "info".to_string();
        }
        self.log_dir = normalize_optional_text(self.log_dir.take());
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.session_path = resolve_path(base, &self.session_path);
        if let Some(log_dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, log_dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.api_base_url)?;
        validate_api_prefix(&self.api_prefix)?;
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if self.poll_interval_seconds == 0 {
            return Err(anyhow!("poll_interval_seconds must be greater than 0"));
        }
        if !(1..=100).contains(&self.default_page_size) {
            return Err(anyhow!("default_page_size must be within 1..=100"));
        }
        if self.session_path.trim().is_empty() {
            return Err(anyhow!("session_path must not be empty"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            api_base_url: self.api_base_url.clone(),
            api_prefix: self.api_prefix.clone(),
            request_timeout_seconds: self.request_timeout_seconds,
            poll_interval_seconds: self.poll_interval_seconds,
            stop_polling_when_settled: self.stop_polling_when_settled,
            default_page_size: self.default_page_size,
            demo_username: self.demo_username.clone(),
            demo_password: self.demo_password.clone(),
            notice_history: self.notice_history,
        }
    }

    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(value) = var("API_BASE_URL") {
            self.api_base_url = value;
        }
        if let Some(value) = var("API_PREFIX") {
            self.api_prefix = value;
        }
        if let Some(value) = var("REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.trim().parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = var("POLL_INTERVAL_SECONDS") {
            self.poll_interval_seconds = value.trim().parse().unwrap_or(self.poll_interval_seconds);
        }
        if let Some(value) = var("STOP_POLLING_WHEN_SETTLED") {
            self.stop_polling_when_settled =
                parse_flag(&value).unwrap_or(self.stop_polling_when_settled);
        }
        if let Some(value) = var("DEFAULT_PAGE_SIZE") {
            self.default_page_size = value.trim().parse().unwrap_or(self.default_page_size);
        }
        if let Some(value) = var("SESSION_PATH") {
            self.session_path = value;
        }
        if let Some(value) = var("DEMO_USERNAME") {
            self.demo_username = value;
        }
        if let Some(value) = var("DEMO_PASSWORD") {
            self.demo_password = value;
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = var("LOG_DIR") {
            self.log_dir = Some(value);
        }
        if let Some(value) = var("NOTICE_HISTORY") {
            self.notice_history = value.trim().parse().unwrap_or(self.notice_history);
        }
    }
}
