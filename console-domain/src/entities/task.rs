// Task pipeline entities: definition → instance → sub-task

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::progress_percent;
use crate::utils::{id_string, lenient_text, optional_id_string, optional_millis, optional_u32};
use crate::value_objects::{EpochMillis, SplitStrategy, TaskStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub merchant_id: Option<String>,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "id_string")]
    pub definition_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub split_strategy: Option<SplitStrategy>,
    /// Upstream spells this field `excutor`.
    #[serde(
        default,
        rename = "excutor",
        alias = "executor",
        deserialize_with = "lenient_text"
    )]
    pub executor: String,
    #[serde(default)]
    pub config: Value,
    #[serde(default, deserialize_with = "optional_millis")]
    pub created_at: Option<EpochMillis>,
    #[serde(default, deserialize_with = "optional_millis")]
    pub updated_at: Option<EpochMillis>,
}

impl TaskDefinition {
    pub fn config_urls(&self) -> Vec<String> {
        self.config
            .get("urls")
            .and_then(Value::as_array)
            .map(|urls| {
                urls.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInstance {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "id_string")]
    pub task_instance_id: String,
    #[serde(default, deserialize_with = "id_string")]
    pub definition_id: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "optional_millis")]
    pub started_at: Option<EpochMillis>,
    #[serde(default, deserialize_with = "optional_millis")]
    pub completed_at: Option<EpochMillis>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "optional_millis")]
    pub created_at: Option<EpochMillis>,
    #[serde(default, deserialize_with = "optional_millis")]
    pub updated_at: Option<EpochMillis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "id_string")]
    pub subtask_id: String,
    #[serde(default, deserialize_with = "id_string")]
    pub instance_id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "optional_u32")]
    pub current_page: Option<u32>,
    #[serde(default, deserialize_with = "optional_u32")]
    pub total_pages: Option<u32>,
    #[serde(default, deserialize_with = "optional_millis")]
    pub started_at: Option<EpochMillis>,
    #[serde(default, deserialize_with = "optional_millis")]
    pub completed_at: Option<EpochMillis>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "optional_millis")]
    pub created_at: Option<EpochMillis>,
    #[serde(default, deserialize_with = "optional_millis")]
    pub updated_at: Option<EpochMillis>,
}

impl SubTask {
    pub fn progress_percent(&self) -> u8 {
        progress_percent(self.current_page, self.total_pages)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskDefinitionDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub split_strategy: SplitStrategy,
    pub config: Value,
}
