use std::sync::Arc;

use async_trait::async_trait;
use console_domain::{
    BackendApi, PageResult, PagedList, StatusSummary, SubTask, TaskDefinition, TaskInstance,
};
use serde_json::{json, Value};

use crate::detail_view::DetailSource;
use crate::filters::{SubTaskFilter, TaskDefinitionFilter};
use crate::list_view::{ListSource, PageQuery};
use crate::queries::path_segment;
use crate::AppError;

fn paged_body<F: serde::Serialize>(filter: &F, page: u32, page_size: u32) -> Result<Value, AppError> {
    let mut body = serde_json::to_value(filter).map_err(anyhow::Error::from)?;
    if let Value::Object(map) = &mut body {
        map.insert("page".to_string(), json!(page));
        map.insert("pageSize".to_string(), json!(page_size));
    }
    Ok(body)
}

pub struct TaskDefinitionSource {
    api: Arc<dyn BackendApi>,
}

impl TaskDefinitionSource {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ListSource for TaskDefinitionSource {
    type Item = TaskDefinition;
    type Filter = TaskDefinitionFilter;

    fn label(&self) -> &'static str {
        "task definitions"
    }

    async fn fetch_page(
        &self,
        query: &PageQuery<TaskDefinitionFilter>,
    ) -> Result<PageResult<TaskDefinition>, AppError> {
        let body = paged_body(&query.filter, query.page, query.page_size)?;
        let envelope = self.api.post("/task/definition/list", Some(body)).await?;
        let paged: PagedList<TaskDefinition> = envelope.decode_data()?;
        Ok(paged.into_page(query.page, query.page_size))
    }
}

pub struct TaskInstanceSource {
    api: Arc<dyn BackendApi>,
    definition_id: String,
}

impl TaskInstanceSource {
    pub fn new(api: Arc<dyn BackendApi>, definition_id: &str) -> Self {
        Self {
            api,
            definition_id: definition_id.trim().to_string(),
        }
    }
}

#[async_trait]
impl ListSource for TaskInstanceSource {
    type Item = TaskInstance;
    type Filter = ();

    fn label(&self) -> &'static str {
        "task instances"
    }

    async fn fetch_page(&self, query: &PageQuery<()>) -> Result<PageResult<TaskInstance>, AppError> {
        let body = json!({
            "taskDefinitionId": self.definition_id,
            "page": query.page,
            "pageSize": query.page_size,
        });
        let envelope = self.api.post("/task/instance/list", Some(body)).await?;
        let paged: PagedList<TaskInstance> = envelope.decode_data()?;
        Ok(paged.into_page(query.page, query.page_size))
    }

    fn is_settled(&self, items: &[TaskInstance]) -> bool {
        StatusSummary::from_statuses(items.iter().map(|item| &item.status)).is_settled()
    }
}

/// Sub-tasks of one instance. The status filter is applied to the fetched page.
pub struct SubTaskSource {
    api: Arc<dyn BackendApi>,
    instance_id: String,
}

impl SubTaskSource {
    pub fn new(api: Arc<dyn BackendApi>, instance_id: &str) -> Self {
        Self {
            api,
            instance_id: instance_id.trim().to_string(),
        }
    }
}

#[async_trait]
impl ListSource for SubTaskSource {
    type Item = SubTask;
    type Filter = SubTaskFilter;

    fn label(&self) -> &'static str {
        "sub-tasks"
    }

    async fn fetch_page(&self, query: &PageQuery<SubTaskFilter>) -> Result<PageResult<SubTask>, AppError> {
        let body = json!({
            "taskInstanceId": self.instance_id,
            "page": query.page,
            "pageSize": query.page_size,
        });
        let envelope = self.api.post("/task/subtask/list", Some(body)).await?;
        let paged: PagedList<SubTask> = envelope.decode_data()?;
        let mut page = paged.into_page(query.page, query.page_size);
        // total is the backend count, not the filtered page length
        if query.filter.status.is_some() {
            page.items.retain(|item| query.filter.matches(&item.status));
        }
        Ok(page)
    }

    fn is_settled(&self, items: &[SubTask]) -> bool {
        StatusSummary::from_statuses(items.iter().map(|item| &item.status)).is_settled()
    }
}

pub struct TaskDefinitionDetail {
    api: Arc<dyn BackendApi>,
    definition_id: String,
}

impl TaskDefinitionDetail {
    pub fn new(api: Arc<dyn BackendApi>, definition_id: &str) -> Self {
        Self {
            api,
            definition_id: definition_id.trim().to_string(),
        }
    }
}

#[async_trait]
impl DetailSource for TaskDefinitionDetail {
    type Item = TaskDefinition;

    fn label(&self) -> &'static str {
        "task definition"
    }

    async fn fetch_one(&self) -> Result<TaskDefinition, AppError> {
        let path = format!("/task/definition/{}", path_segment(&self.definition_id));
        let envelope = self.api.get(&path, &Default::default()).await?;
        Ok(envelope.decode_data()?)
    }
}

pub struct SubTaskDetail {
    api: Arc<dyn BackendApi>,
    sub_task_id: String,
}

impl SubTaskDetail {
    pub fn new(api: Arc<dyn BackendApi>, sub_task_id: &str) -> Self {
        Self {
            api,
            sub_task_id: sub_task_id.trim().to_string(),
        }
    }
}

#[async_trait]
impl DetailSource for SubTaskDetail {
    type Item = SubTask;

    fn label(&self) -> &'static str {
        "sub-task"
    }

    async fn fetch_one(&self) -> Result<SubTask, AppError> {
        let path = format!("/sub-task/{}", path_segment(&self.sub_task_id));
        let envelope = self.api.get(&path, &Default::default()).await?;
        Ok(envelope.decode_data()?)
    }

    fn is_settled(&self, item: &SubTask) -> bool {
        item.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_view::{FetchOutcome, ListViewModel};
    use crate::testing::{FakeBackend, FakeMethod};
    use crate::{Metrics, NoticeBoard};
    use console_domain::TaskStatus;

    fn view<S: ListSource>(source: S) -> ListViewModel<S> {
        let metrics = Arc::new(Metrics::default());
        ListViewModel::new(source, 10, Arc::new(NoticeBoard::new(10, metrics.clone())), metrics)
    }

    #[tokio::test]
    async fn definition_list_posts_filter_with_pagination() {
        let api = Arc::new(FakeBackend::new());
        api.respond(
            FakeMethod::Post,
            "/task/definition/list",
            json!({ "list": [{ "id": 1, "definitionId": "d-1", "name": "x", "excutor": "tiktok" }], "total": 1 }),
        );
        let definitions = view(TaskDefinitionSource::new(api.clone()));

        let filter = TaskDefinitionFilter {
            executor: Some("tiktok".into()),
            ..Default::default()
        };
        assert_eq!(definitions.fetch(2, 20, filter).await, FetchOutcome::Applied);

        let body = api.last_body(FakeMethod::Post, "/task/definition/list").expect("body");
        assert_eq!(body, json!({ "excutor": "tiktok", "page": 2, "pageSize": 20 }));
        let state = definitions.snapshot().await;
        assert_eq!(state.page, 2);
        assert_eq!(state.items[0].definition_id, "d-1");
    }

    #[tokio::test]
    async fn instance_list_settles_when_all_terminal() {
        let api = Arc::new(FakeBackend::new());
        api.respond(
            FakeMethod::Post,
            "/task/instance/list",
            json!({ "list": [
                { "id": 1, "taskInstanceId": "i-1", "status": "completed" },
                { "id": 2, "taskInstanceId": "i-2", "status": "failed" }
            ], "total": 2 }),
        );
        let instances = view(TaskInstanceSource::new(api.clone(), "d-1"));
        instances.refresh().await;
        assert!(instances.is_settled().await);

        let body = api.last_body(FakeMethod::Post, "/task/instance/list").expect("body");
        assert_eq!(body["taskDefinitionId"], "d-1");
    }

    #[tokio::test]
    async fn sub_task_status_filter_is_client_side() {
        let api = Arc::new(FakeBackend::new());
        api.respond(
            FakeMethod::Post,
            "/task/subtask/list",
            json!({ "list": [
                { "id": 1, "status": "processing", "currentPage": 2, "totalPages": 4 },
                { "id": 2, "status": "failed" }
            ], "total": 25, "page": 1, "pageSize": 10 }),
        );
        let sub_tasks = view(SubTaskSource::new(api.clone(), "i-1"));
        sub_tasks
            .apply_filters(SubTaskFilter {
                status: Some(TaskStatus::Processing),
            })
            .await;

        let state = sub_tasks.snapshot().await;
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.total, 25);
        assert_eq!(state.total_pages(), 3);
        assert_eq!(state.items[0].progress_percent(), 50);
        assert!(!sub_tasks.is_settled().await);
    }

    #[tokio::test]
    async fn sub_task_detail_is_settled_when_terminal() {
        let api = Arc::new(FakeBackend::new());
        api.respond(
            FakeMethod::Get,
            "/sub-task/s-1",
            json!({ "id": 1, "subtaskId": "s-1", "status": "completed" }),
        );
        let detail = SubTaskDetail::new(api, "s-1");
        let item = detail.fetch_one().await.expect("fetch");
        assert!(detail.is_settled(&item));
    }
}
