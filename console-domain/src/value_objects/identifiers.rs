// Identifier value objects

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key a polling subscription is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey(pub String);

impl ResourceKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn instances(definition_id: &str) -> Self {
        Self(format!("definition:{}:instances", definition_id.trim()))
    }

    pub fn sub_tasks(instance_id: &str) -> Self {
        Self(format!("instance:{}:subtasks", instance_id.trim()))
    }

    pub fn sub_task(sub_task_id: &str) -> Self {
        Self(format!("subtask:{}", sub_task_id.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
