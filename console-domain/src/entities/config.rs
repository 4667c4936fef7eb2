// Runtime configuration seen by the application layer

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub api_base_url: String,
    pub api_prefix: String,
    pub request_timeout_seconds: u64,
    pub poll_interval_seconds: u64,
    pub stop_polling_when_settled: bool,
    pub default_page_size: u32,
    pub demo_username: String,
    pub demo_password: String,
    pub notice_history: usize,
}

impl RuntimeConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.max(1))
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            api_prefix: "/api/v1".to_string(),
            request_timeout_seconds: 15,
            poll_interval_seconds: 5,
            stop_polling_when_settled: true,
            default_page_size: 10,
            demo_username: "admin".to_string(),
            demo_password: "123456".to_string(),
            notice_history: 50,
        }
    }
}
