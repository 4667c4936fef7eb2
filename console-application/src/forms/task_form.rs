// Task creation dialog controller

use std::sync::{Arc, OnceLock};

use console_domain::{current_millis, normalize_optional_text, BackendApi, CreateTaskDefinitionDto, TaskKind};
use regex::Regex;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{info, warn};
use url::Url;

use crate::ops::{RefreshHub, RefreshTopic};
use crate::{AppError, NoticeBoard};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub task_type: String,
    pub name: String,
    pub urls: String,
    pub remark: String,
}

impl TaskDraft {
    pub fn url_lines(&self) -> Vec<String> {
        self.urls
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFormState {
    pub open: bool,
    pub submitting: bool,
    pub draft: TaskDraft,
}

fn tiktok_product_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^https://(shop|www)\.tiktok\.com/view/product/\d+").ok())
        .as_ref()
}

/// Matched against the URL with its query string stripped.
pub fn is_tiktok_product_url(raw: &str) -> bool {
    let without_query = raw.split('?').next().unwrap_or_default();
    tiktok_product_pattern()
        .map(|pattern| pattern.is_match(without_query))
        .unwrap_or(false)
}

pub fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}

/// Checks the draft and builds the creation payload. Never touches the network.
pub fn build_task_definition(draft: &TaskDraft, now_millis: i64) -> Result<CreateTaskDefinitionDto, AppError> {
    let task_type = draft.task_type.trim();
    if task_type.is_empty() {
        return Err(AppError::validation("task type is required"));
    }
    let kind = TaskKind::parse(task_type)
        .ok_or_else(|| AppError::validation(format!("unsupported task type: {task_type}")))?;

    let urls = draft.url_lines();
    if kind.requires_urls() && urls.is_empty() {
        return Err(AppError::validation(format!(
            "at least one URL is required for {}",
            kind.label()
        )));
    }
    if kind == TaskKind::TiktokReview {
        if let Some(bad) = urls.iter().find(|url| !is_tiktok_product_url(url)) {
            return Err(AppError::validation(format!(
                "not a TikTok Shop product URL: {bad}"
            )));
        }
    }
    if kind == TaskKind::FastmossCrawl {
        if let Some(bad) = urls.iter().find(|url| !is_http_url(url)) {
            return Err(AppError::validation(format!("invalid URL: {bad}")));
        }
    }

    let name = normalize_optional_text(Some(draft.name.clone()))
        .unwrap_or_else(|| format!("{}-{}", kind.as_str(), now_millis));

    let mut config = json!({ "taskType": kind.as_str() });
    if kind.requires_urls() {
        config["urls"] = Value::from(urls);
    }

    Ok(CreateTaskDefinitionDto {
        name: Some(name),
        description: normalize_optional_text(Some(draft.remark.clone())),
        split_strategy: kind.split_strategy(),
        config,
    })
}

pub struct TaskFormController {
    api: Arc<dyn BackendApi>,
    refresh: Arc<RefreshHub>,
    notices: Arc<NoticeBoard>,
    state: Mutex<TaskFormState>,
}

impl TaskFormController {
    pub fn new(api: Arc<dyn BackendApi>, refresh: Arc<RefreshHub>, notices: Arc<NoticeBoard>) -> Self {
        Self {
            api,
            refresh,
            notices,
            state: Mutex::new(TaskFormState::default()),
        }
    }

    pub async fn open(&self) {
        self.state.lock().await.open = true;
    }

    /// Closing discards the draft.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        state.open = false;
        state.draft = TaskDraft::default();
    }

    pub async fn edit(&self, draft: TaskDraft) {
        self.state.lock().await.draft = draft;
    }

    /// Switching task type clears the URL list.
    pub async fn set_task_type(&self, task_type: &str) {
        let mut state = self.state.lock().await;
        if state.draft.task_type != task_type {
            state.draft.task_type = task_type.to_string();
            state.draft.urls.clear();
        }
    }

    pub async fn state(&self) -> TaskFormState {
        self.state.lock().await.clone()
    }

    pub async fn submit(&self) -> Result<Value, AppError> {
        let prepared = {
            let mut state = self.state.lock().await;
            if state.submitting {
                return Err(AppError::validation("a submission is already in progress"));
            }
            let draft = state.draft.clone();
            let dto = match build_task_definition(&draft, current_millis()) {
                Ok(dto) => dto,
                Err(err) => {
                    drop(state);
                    self.notices.error(err.user_message("failed to create task"));
                    return Err(err);
                }
            };
            let body = serde_json::to_value(&dto).map_err(anyhow::Error::from)?;
            state.submitting = true;
            (dto, body)
        };
        let (dto, body) = prepared;

        let result = self.api.post("/task/definition", Some(body)).await;

        let mut state = self.state.lock().await;
        state.submitting = false;
        match result {
            Ok(envelope) => {
                state.open = false;
                state.draft = TaskDraft::default();
                drop(state);
                info!(name = ?dto.name, strategy = %dto.split_strategy, "task definition created");
                self.notices.success(format!(
                    "task created: {}",
                    dto.name.as_deref().unwrap_or_default()
                ));
                self.refresh.publish(RefreshTopic::TaskCreated).await;
                Ok(envelope.data)
            }
            Err(err) => {
                drop(state);
                let err = AppError::from(err);
                warn!(error = %err, "task creation failed");
                self.notices.error(err.user_message("failed to create task"));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, FakeMethod};
    use crate::Metrics;
    use console_domain::{ApiError, SplitStrategy};

    fn draft(task_type: &str, urls: &str) -> TaskDraft {
        TaskDraft {
            task_type: task_type.to_string(),
            urls: urls.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn qianyi_sync_needs_no_urls() {
        let dto = build_task_definition(&draft("qianyi_sync", ""), 1_700_000_000_000).expect("valid");
        assert_eq!(dto.split_strategy, SplitStrategy::Page);
        assert_eq!(dto.name.as_deref(), Some("qianyi_sync-1700000000000"));
        assert_eq!(dto.config, json!({ "taskType": "qianyi_sync" }));
    }

    #[test]
    fn url_driven_kinds_reject_empty_url_list() {
        for kind in ["tiktok_review", "fastmoss_crawl"] {
            let err = build_task_definition(&draft(kind, " \n  \n"), 0).expect_err("invalid");
            assert!(matches!(err, AppError::Validation(_)), "{kind}");
        }
    }

    #[test]
    fn tiktok_urls_are_checked_without_query_string() {
        assert!(is_tiktok_product_url(
            "https://shop.tiktok.com/view/product/1730584769274152937?region=MY&locale=en"
        ));
        assert!(!is_tiktok_product_url("https://shop.tiktok.com/view/shop/123"));
        assert!(!is_tiktok_product_url("http://www.tiktok.com/view/product/1"));

        let err = build_task_definition(
            &draft("tiktok_review", "https://www.tiktok.com/view/product/1\nhttps://example.com/x"),
            0,
        )
        .expect_err("second url invalid");
        assert!(err.to_string().contains("example.com"));
    }

    #[test]
    fn url_list_payload_carries_trimmed_urls() {
        let mut input = draft("fastmoss_crawl", " https://www.fastmoss.com/a \n\nhttps://www.fastmoss.com/b");
        input.name = "  nightly ".to_string();
        input.remark = "from ops".to_string();

        let dto = build_task_definition(&input, 0).expect("valid");
        assert_eq!(dto.split_strategy, SplitStrategy::UrlList);
        assert_eq!(dto.name.as_deref(), Some("nightly"));
        assert_eq!(
            serde_json::to_value(&dto).expect("encode"),
            json!({
                "name": "nightly",
                "description": "from ops",
                "splitStrategy": "url_list",
                "config": {
                    "taskType": "fastmoss_crawl",
                    "urls": ["https://www.fastmoss.com/a", "https://www.fastmoss.com/b"]
                }
            })
        );
    }

    #[test]
    fn unknown_task_type_is_rejected() {
        let err = build_task_definition(&draft("shopee_sync", ""), 0).expect_err("invalid");
        assert!(err.to_string().contains("shopee_sync"));
    }

    fn controller(api: Arc<FakeBackend>) -> (TaskFormController, Arc<RefreshHub>, Arc<NoticeBoard>) {
        let refresh = Arc::new(RefreshHub::default());
        let notices = Arc::new(NoticeBoard::new(10, Arc::new(Metrics::default())));
        (
            TaskFormController::new(api, refresh.clone(), notices.clone()),
            refresh,
            notices,
        )
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_network() {
        let api = Arc::new(FakeBackend::new());
        let (form, _refresh, _notices) = controller(api.clone());
        form.open().await;
        form.edit(draft("fastmoss_crawl", "")).await;

        assert!(form.submit().await.is_err());
        assert!(api.calls().is_empty());
        let state = form.state().await;
        assert!(state.open);
        assert!(!state.submitting);
    }

    #[tokio::test]
    async fn successful_submit_closes_and_broadcasts() {
        let api = Arc::new(FakeBackend::new());
        api.respond(FakeMethod::Post, "/task/definition", json!({ "id": 10 }));
        let (form, refresh, _notices) = controller(api.clone());
        let mut created = refresh.subscribe(RefreshTopic::TaskCreated).await;

        form.open().await;
        form.edit(draft("qianyi_sync", "")).await;
        form.submit().await.expect("submit");

        let state = form.state().await;
        assert!(!state.open);
        assert_eq!(state.draft, TaskDraft::default());
        assert_eq!(created.recv().await.expect("signal").topic, RefreshTopic::TaskCreated);
    }

    #[tokio::test]
    async fn failed_submit_keeps_draft_and_reenables() {
        let api = Arc::new(FakeBackend::new());
        api.fail(
            FakeMethod::Post,
            "/task/definition",
            ApiError::Http {
                status: 500,
                message: "db unavailable".into(),
            },
        );
        let (form, _refresh, notices) = controller(api);
        let input = draft("qianyi_sync", "");
        form.open().await;
        form.edit(input.clone()).await;

        assert!(form.submit().await.is_err());
        let state = form.state().await;
        assert!(state.open);
        assert!(!state.submitting);
        assert_eq!(state.draft, input);
        assert_eq!(notices.last().map(|n| n.message), Some("db unavailable".to_string()));
    }

    #[tokio::test]
    async fn changing_task_type_clears_urls() {
        let (form, _refresh, _notices) = controller(Arc::new(FakeBackend::new()));
        form.edit(draft("tiktok_review", "https://www.tiktok.com/view/product/1")).await;
        form.set_task_type("fastmoss_crawl").await;
        assert_eq!(form.state().await.draft.urls, "");
    }
}
