use console_domain::ApiEnvelope;
use serde_json::json;
use tracing::info;

use crate::commands::report;
use crate::forms::TaskFormController;
use crate::ops::RefreshTopic;
use crate::{AppError, AppState};

pub fn task_form(state: &AppState) -> TaskFormController {
    TaskFormController::new(state.api.clone(), state.refresh.clone(), state.notices.clone())
}

pub async fn build_instance(state: &AppState, definition_id: &str) -> Result<ApiEnvelope, AppError> {
    let definition_id = definition_id.trim();
    let result = if definition_id.is_empty() {
        Err(AppError::validation("definition id is required"))
    } else {
        state
            .api
            .post(
                "/task/definition/build",
                Some(json!({ "taskDefinitionId": definition_id })),
            )
            .await
            .map_err(AppError::from)
    };

    let envelope = report(
        state,
        result,
        |_| "task instance created".to_string(),
        "failed to create task instance",
    )?;
    info!(definition_id, "instance built");
    state.refresh.publish(RefreshTopic::InstancesChanged).await;
    Ok(envelope)
}

/// Starts an instance. A second run request for the same instance is rejected
/// while the first is in flight.
pub async fn run_instance(state: &AppState, instance_id: &str) -> Result<ApiEnvelope, AppError> {
    let instance_id = instance_id.trim().to_string();
    if instance_id.is_empty() {
        return report(
            state,
            Err(AppError::validation("instance id is required")),
            |_| String::new(),
            "failed to start task instance",
        );
    }

    let claimed = state
        .starting_instances
        .lock()
        .map(|mut starting| starting.insert(instance_id.clone()))
        .unwrap_or(false);
    if !claimed {
        return report(
            state,
            Err(AppError::validation(format!("instance {instance_id} is already starting"))),
            |_| String::new(),
            "failed to start task instance",
        );
    }

    let result = state
        .api
        .post("/task/instance/run", Some(json!({ "taskInstanceId": instance_id })))
        .await
        .map_err(AppError::from);

    if let Ok(mut starting) = state.starting_instances.lock() {
        starting.remove(&instance_id);
    }

    let envelope = report(
        state,
        result,
        |_| "task instance started".to_string(),
        "failed to start task instance",
    )?;
    info!(instance_id = %instance_id, "instance started");
    state.refresh.publish(RefreshTopic::InstancesChanged).await;
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_state, FakeBackend, FakeMethod};
    use crate::NoticeLevel;
    use std::sync::Arc;

    #[tokio::test]
    async fn build_posts_definition_id() {
        let api = Arc::new(FakeBackend::new());
        api.respond(FakeMethod::Post, "/task/definition/build", json!({}));
        let state = test_state(api.clone()).await;
        let mut changed = state.refresh.subscribe(RefreshTopic::InstancesChanged).await;

        build_instance(&state, " def-1 ").await.expect("build");

        assert_eq!(
            api.last_body(FakeMethod::Post, "/task/definition/build"),
            Some(json!({ "taskDefinitionId": "def-1" }))
        );
        assert!(changed.try_recv().is_ok());
    }

    #[tokio::test]
    async fn non_zero_code_surfaces_server_message() {
        let api = Arc::new(FakeBackend::new());
        api.respond_envelope(
            FakeMethod::Post,
            "/task/instance/run",
            ApiEnvelope {
                code: 1001,
                message: "instance already running".into(),
                ..Default::default()
            },
        );
        let state = test_state(api).await;

        assert!(run_instance(&state, "inst-1").await.is_err());
        let notice = state.notices.last().expect("notice");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "instance already running");
        assert!(state.starting_instances.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn concurrent_run_of_same_instance_is_rejected() {
        let api = Arc::new(FakeBackend::new());
        let state = test_state(api.clone()).await;
        state
            .starting_instances
            .lock()
            .expect("lock")
            .insert("inst-2".to_string());

        let err = run_instance(&state, "inst-2").await.expect_err("rejected");
        assert!(matches!(err, AppError::Validation(_)));
        assert!(api.calls().is_empty());
        let notice = state.notices.last().expect("notice");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "instance inst-2 is already starting");
    }
}
