pub mod clickup;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::model::work_item::WorkItem;

/// Value sent to a custom field. Serializes untagged, so `{"value": 10}` or `{"value": "10.1"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// What the run needs from a remote task service.
#[async_trait]
pub trait TaskSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch every open task (and subtask) of a list in one call.
    async fn fetch_tasks(&self, list_id: &str, include_custom_fields: bool)
        -> Result<Vec<WorkItem>>;

    async fn set_custom_field(&self, task_id: &str, field_id: &str, value: &FieldValue)
        -> Result<()>;

    async fn rename_task(&self, task_id: &str, name: &str) -> Result<()>;
}
