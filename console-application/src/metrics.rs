use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    api_requests: AtomicU64,
    api_failures: AtomicU64,
    superseded_fetches: AtomicU64,
    poll_ticks: AtomicU64,
    notices: AtomicU64,
}

impl Metrics {
    pub fn record_request(&self, ok: bool) {
        self.api_requests.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.api_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_superseded(&self) {
        self.superseded_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_poll_tick(&self) {
        self.poll_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notice(&self) {
        self.notices.fetch_add(1, Ordering::Relaxed);
    }

    pub fn poll_ticks(&self) -> u64 {
        self.poll_ticks.load(Ordering::Relaxed)
    }

    pub fn superseded_fetches(&self) -> u64 {
        self.superseded_fetches.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let requests = self.api_requests.load(Ordering::Relaxed);
        let failures = self.api_failures.load(Ordering::Relaxed);
        let superseded = self.superseded_fetches.load(Ordering::Relaxed);
        let ticks = self.poll_ticks.load(Ordering::Relaxed);
        let notices = self.notices.load(Ordering::Relaxed);

        format!(
            "# TYPE ops_console_api_requests_total counter\n\
ops_console_api_requests_total {}\n\
# TYPE ops_console_api_failures_total counter\n\
ops_console_api_failures_total {}\n\
# TYPE ops_console_superseded_fetches_total counter\n\
ops_console_superseded_fetches_total {}\n\
# TYPE ops_console_poll_ticks_total counter\n\
ops_console_poll_ticks_total {}\n\
# TYPE ops_console_notices_total counter\n\
ops_console_notices_total {}\n",
            requests, failures, superseded, ticks, notices
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_every_counter() {
        let metrics = Metrics::default();
        metrics.record_request(true);
        metrics.record_request(false);
        metrics.record_poll_tick();

        let text = metrics.render_prometheus();
        assert!(text.contains("ops_console_api_requests_total 2\n"));
        assert!(text.contains("ops_console_api_failures_total 1\n"));
        assert!(text.contains("ops_console_poll_ticks_total 1\n"));
        assert!(text.contains("ops_console_notices_total 0\n"));
    }
}
