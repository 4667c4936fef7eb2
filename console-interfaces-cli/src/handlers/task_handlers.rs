use std::sync::Arc;

use console_application::commands::task_commands;
use console_application::detail_view::{DetailState, DetailViewModel};
use console_application::filters::{SubTaskFilter, TaskDefinitionFilter, TaskDefinitionFilterForm};
use console_application::forms::TaskDraft;
use console_application::list_view::{ListState, ListViewModel};
use console_application::ops::RefreshTopic;
use console_application::queries::{
    SubTaskDetail, SubTaskSource, TaskDefinitionDetail, TaskDefinitionSource, TaskInstanceSource,
};
use console_application::AppState;
use console_domain::{ResourceKey, StatusSummary, SubTask, TaskDefinition, TaskInstance, TaskKind};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::CliError;
use crate::handlers::{
    ensure_applied, format_time, or_dash, page_footer, page_size_or_default, watch_detail, watch_list,
    Emit,
};
use crate::views::{progress_bar, task_status_badge, truncate, Screen};

fn summary_line(summary: &StatusSummary) -> String {
    format!(
        "{} pending, {} processing, {} completed, {} failed ({}% done)",
        summary.pending,
        summary.processing,
        summary.completed,
        summary.failed,
        summary.completion_rate()
    )
}

fn definitions_screen(list: &ListState<TaskDefinition, TaskDefinitionFilter>) -> Screen {
    let rows = list
        .items
        .iter()
        .map(|definition| {
            vec![
                definition.id.clone(),
                definition.name.clone(),
                or_dash(Some(definition.executor.as_str())),
                definition
                    .split_strategy
                    .map(|strategy| strategy.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                format_time(definition.created_at),
            ]
        })
        .collect();
    Screen::titled("Task definitions")
        .with_table(vec!["ID", "NAME", "EXECUTOR", "SPLIT", "CREATED"], rows)
        .with_total(list.total)
        .with_footer(page_footer(list))
}

fn definition_screen(definition: &TaskDefinition) -> Screen {
    let task_type = definition
        .config
        .get("taskType")
        .and_then(Value::as_str)
        .and_then(TaskKind::parse)
        .map(|kind| kind.label().to_string());
    let mut screen = Screen::titled(format!("Task definition {}", definition.id))
        .field("name", definition.name.clone())
        .field("type", or_dash(task_type.as_deref()))
        .field("executor", or_dash(Some(definition.executor.as_str())))
        .field(
            "split",
            definition
                .split_strategy
                .map(|strategy| strategy.to_string())
                .unwrap_or_else(|| "-".to_string()),
        )
        .field("description", or_dash(definition.description.as_deref()))
        .field("created", format_time(definition.created_at));
    for (index, url) in definition.config_urls().iter().enumerate() {
        screen = screen.field(format!("url {}", index + 1), url.clone());
    }
    screen
}

fn instances_screen(definition_id: &str, list: &ListState<TaskInstance, ()>) -> Screen {
    let summary = StatusSummary::from_statuses(list.items.iter().map(|item| &item.status));
    let rows = list
        .items
        .iter()
        .map(|instance| {
            vec![
                instance.id.clone(),
                or_dash(Some(instance.task_instance_id.as_str())),
                task_status_badge(&instance.status).render(),
                format_time(instance.started_at),
                format_time(instance.completed_at),
                truncate(&or_dash(instance.error_message.as_deref()), 40),
            ]
        })
        .collect();
    Screen::titled(format!("Instances of {definition_id}"))
        .with_table(
            vec!["ID", "INSTANCE", "STATUS", "STARTED", "COMPLETED", "ERROR"],
            rows,
        )
        .with_total(list.total)
        .with_footer(format!("{}\n{}", summary_line(&summary), page_footer(list)))
}

fn sub_tasks_screen(instance_id: &str, list: &ListState<SubTask, SubTaskFilter>) -> Screen {
    let summary = StatusSummary::from_statuses(list.items.iter().map(|item| &item.status));
    let rows = list
        .items
        .iter()
        .map(|sub_task| {
            vec![
                sub_task.id.clone(),
                task_status_badge(&sub_task.status).render(),
                progress_bar(sub_task.progress_percent()),
                truncate(&or_dash(sub_task.url.as_deref()), 48),
                truncate(&or_dash(sub_task.error_message.as_deref()), 32),
            ]
        })
        .collect();
    let mut screen = Screen::titled(format!("Sub-tasks of {instance_id}"));
    if let Some(status) = &list.filters.status {
        screen = screen.field("filter", format!("{status}, {} on this page", list.items.len()));
    }
    screen
        .with_table(vec!["ID", "STATUS", "PROGRESS", "URL", "ERROR"], rows)
        .with_total(list.total)
        .with_footer(format!("{}\n{}", summary_line(&summary), page_footer(list)))
}

fn sub_task_screen(state: &DetailState<SubTask>) -> Screen {
    let Some(sub_task) = &state.item else {
        return Screen::message("sub-task not loaded");
    };
    let pages = match (sub_task.current_page, sub_task.total_pages) {
        (Some(current), Some(total)) => format!("{current}/{total}"),
        _ => "-".to_string(),
    };
    Screen::titled(format!("Sub-task {}", sub_task.id))
        .field("status", task_status_badge(&sub_task.status).render())
        .field("progress", progress_bar(sub_task.progress_percent()))
        .field("pages", pages)
        .field("url", or_dash(sub_task.url.as_deref()))
        .field("instance", or_dash(Some(sub_task.instance_id.as_str())))
        .field("started", format_time(sub_task.started_at))
        .field("completed", format_time(sub_task.completed_at))
        .field("error", or_dash(sub_task.error_message.as_deref()))
}

pub async fn list_definitions(
    state: &AppState,
    form: TaskDefinitionFilterForm,
    page: u32,
    page_size: Option<u32>,
    emit: Emit<'_>,
) -> Result<(), CliError> {
    let page_size = page_size_or_default(state, page_size);
    let view = ListViewModel::new(
        TaskDefinitionSource::new(state.api.clone()),
        page_size,
        state.notices.clone(),
        state.metrics.clone(),
    );
    let outcome = view
        .fetch(page, page_size, TaskDefinitionFilter::from_form(form))
        .await;
    ensure_applied(state, outcome)?;
    emit(definitions_screen(&view.snapshot().await));
    Ok(())
}

pub async fn create_definition(state: &AppState, draft: TaskDraft, emit: Emit<'_>) -> Result<(), CliError> {
    let form = task_commands::task_form(state);
    form.open().await;
    form.edit(draft).await;
    let data = form.submit().await?;

    let mut screen = Screen::default();
    if let Some(id) = data.get("id").filter(|id| !id.is_null()) {
        let id = id.as_str().map(str::to_string).unwrap_or_else(|| id.to_string());
        screen = screen.field("id", id);
    }
    emit(screen);
    Ok(())
}

pub async fn show_definition(state: &AppState, definition_id: &str, emit: Emit<'_>) -> Result<(), CliError> {
    let view = DetailViewModel::new(
        TaskDefinitionDetail::new(state.api.clone(), definition_id),
        state.notices.clone(),
        state.metrics.clone(),
    );
    ensure_applied(state, view.load().await)?;
    if let Some(definition) = view.snapshot().await.item {
        emit(definition_screen(&definition));
    }
    Ok(())
}

pub async fn build_instance(state: &AppState, definition_id: &str, emit: Emit<'_>) -> Result<(), CliError> {
    task_commands::build_instance(state, definition_id).await?;
    emit(Screen::default());
    Ok(())
}

pub async fn run_instance(state: &AppState, instance_id: &str, emit: Emit<'_>) -> Result<(), CliError> {
    task_commands::run_instance(state, instance_id).await?;
    emit(Screen::default());
    Ok(())
}

pub async fn list_instances(
    state: &AppState,
    definition_id: &str,
    page: u32,
    page_size: Option<u32>,
    watch: bool,
    cancel: CancellationToken,
    emit: Emit<'_>,
) -> Result<(), CliError> {
    let definition_id = definition_id.trim();
    if definition_id.is_empty() {
        return Err(CliError::Invalid("definition id is required".to_string()));
    }
    let page_size = page_size_or_default(state, page_size);
    let view = Arc::new(ListViewModel::new(
        TaskInstanceSource::new(state.api.clone(), definition_id),
        page_size,
        state.notices.clone(),
        state.metrics.clone(),
    ));
    ensure_applied(state, view.fetch(page, page_size, ()).await)?;
    emit(instances_screen(definition_id, &view.snapshot().await));

    if !watch {
        return Ok(());
    }
    watch_list(
        state,
        ResourceKey::instances(definition_id),
        view,
        Some(RefreshTopic::InstancesChanged),
        cancel,
        emit,
        |list| instances_screen(definition_id, list),
    )
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn list_sub_tasks(
    state: &AppState,
    instance_id: &str,
    status: Option<String>,
    page: u32,
    page_size: Option<u32>,
    watch: bool,
    cancel: CancellationToken,
    emit: Emit<'_>,
) -> Result<(), CliError> {
    let instance_id = instance_id.trim();
    if instance_id.is_empty() {
        return Err(CliError::Invalid("instance id is required".to_string()));
    }
    let page_size = page_size_or_default(state, page_size);
    let view = Arc::new(ListViewModel::new(
        SubTaskSource::new(state.api.clone(), instance_id),
        page_size,
        state.notices.clone(),
        state.metrics.clone(),
    ));
    let outcome = view
        .fetch(page, page_size, SubTaskFilter::from_form(status))
        .await;
    ensure_applied(state, outcome)?;
    emit(sub_tasks_screen(instance_id, &view.snapshot().await));

    if !watch {
        return Ok(());
    }
    watch_list(
        state,
        ResourceKey::sub_tasks(instance_id),
        view,
        None,
        cancel,
        emit,
        |list| sub_tasks_screen(instance_id, list),
    )
    .await
}

pub async fn show_sub_task(
    state: &AppState,
    sub_task_id: &str,
    watch: bool,
    cancel: CancellationToken,
    emit: Emit<'_>,
) -> Result<(), CliError> {
    let view = Arc::new(DetailViewModel::new(
        SubTaskDetail::new(state.api.clone(), sub_task_id),
        state.notices.clone(),
        state.metrics.clone(),
    ));
    ensure_applied(state, view.load().await)?;
    emit(sub_task_screen(&view.snapshot().await));

    if !watch {
        return Ok(());
    }
    watch_detail(
        state,
        ResourceKey::sub_task(sub_task_id.trim()),
        view,
        cancel,
        emit,
        sub_task_screen,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_application::testing::{test_state, FakeBackend, FakeMethod};
    use serde_json::json;
    use std::time::Duration;

    fn instance_page(status: &str) -> Value {
        json!({
            "list": [{ "id": 7, "taskInstanceId": "inst-7", "definitionId": "d1", "status": status }],
            "total": 1
        })
    }

    #[tokio::test]
    async fn instances_render_summary_and_badges() {
        let api = Arc::new(FakeBackend::new());
        api.respond(FakeMethod::Post, "/task/instance/list", instance_page("processing"));
        let state = test_state(api).await;
        let mut screens = Vec::new();

        list_instances(&state, "d1", 1, None, false, CancellationToken::new(), &mut |s| {
            screens.push(s)
        })
        .await
        .expect("list");

        let screen = &screens[0];
        assert_eq!(screen.rows[0][2], "~ processing");
        assert!(screen
            .footer
            .as_deref()
            .unwrap_or_default()
            .starts_with("0 pending, 1 processing"));
    }

    #[tokio::test(start_paused = true)]
    async fn watch_ends_once_instances_settle() {
        let api = Arc::new(FakeBackend::new());
        api.respond(FakeMethod::Post, "/task/instance/list", instance_page("processing"));
        api.respond(FakeMethod::Post, "/task/instance/list", instance_page("completed"));
        let state = test_state(api.clone()).await;
        let mut screens = Vec::new();

        tokio::time::timeout(
            Duration::from_secs(60),
            list_instances(&state, "d1", 1, None, true, CancellationToken::new(), &mut |s| {
                screens.push(s)
            }),
        )
        .await
        .expect("watch should finish")
        .expect("watch");

        assert_eq!(screens.len(), 2);
        assert_eq!(screens[1].rows[0][2], "+ completed");
        assert!(!state.polling.is_active(&ResourceKey::instances("d1")));
    }

    #[tokio::test]
    async fn failed_definition_load_is_a_failure_exit() {
        let api = Arc::new(FakeBackend::new());
        let state = test_state(api).await;

        let err = show_definition(&state, "missing", &mut |_| {})
            .await
            .expect_err("404");
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn empty_url_list_is_rejected_before_network() {
        let api = Arc::new(FakeBackend::new());
        let state = test_state(api.clone()).await;
        let draft = TaskDraft {
            task_type: "tiktok_review".into(),
            ..Default::default()
        };

        let err = create_definition(&state, draft, &mut |_| {})
            .await
            .expect_err("invalid");
        assert_eq!(err.exit_code(), 2);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn status_filter_keeps_backend_total() {
        let api = Arc::new(FakeBackend::new());
        api.respond(
            FakeMethod::Post,
            "/task/subtask/list",
            json!({ "list": [
                { "id": 1, "status": "processing" },
                { "id": 2, "status": "failed" }
            ], "total": 25 }),
        );
        let state = test_state(api).await;
        let mut screens = Vec::new();

        list_sub_tasks(
            &state,
            "i-1",
            Some("failed".into()),
            1,
            None,
            false,
            CancellationToken::new(),
            &mut |s| screens.push(s),
        )
        .await
        .expect("list");

        let screen = &screens[0];
        assert_eq!(screen.rows.len(), 1);
        assert_eq!(screen.total_label.as_deref(), Some("25"));
        assert!(screen
            .fields
            .contains(&("filter".to_string(), "failed, 1 on this page".to_string())));
        assert!(screen
            .footer
            .as_deref()
            .unwrap_or_default()
            .ends_with("page 1/3 (10 per page)"));
    }
}
