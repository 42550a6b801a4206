use anyhow::{Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use super::{FieldValue, TaskSource};
use crate::error::NumberingError;
use crate::model::work_item::WorkItem;

pub const DEFAULT_BASE_URL: &str = "https://api.clickup.com/api/v2";

pub struct ClickUpProvider {
    base_url: String,
    api_token: SecretString,
    client: reqwest::Client,
}

impl ClickUpProvider {
    pub fn new(api_token: SecretString, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            api_token,
            client: reqwest::Client::new(),
        }
    }

    fn tasks_url(&self, list_id: &str) -> String {
        format!("{}/list/{}/task", self.base_url, urlencoding::encode(list_id))
    }

    fn field_url(&self, task_id: &str, field_id: &str) -> String {
        format!(
            "{}/task/{}/field/{}",
            self.base_url,
            urlencoding::encode(task_id),
            urlencoding::encode(field_id)
        )
    }

    fn task_url(&self, task_id: &str) -> String {
        format!("{}/task/{}", self.base_url, urlencoding::encode(task_id))
    }
}

#[derive(Deserialize)]
struct TaskListResponse {
    #[serde(default)]
    tasks: Vec<WorkItem>,
}

/// Turn any non-2xx response into `NumberingError::Api`, keeping the body for the operator.
async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(NumberingError::Api { status, body }.into())
}

#[async_trait]
impl TaskSource for ClickUpProvider {
    fn name(&self) -> &str {
        "ClickUp"
    }

    async fn fetch_tasks(
        &self,
        list_id: &str,
        include_custom_fields: bool,
    ) -> Result<Vec<WorkItem>> {
        let url = self.tasks_url(list_id);
        let mut params = vec![("subtasks", "true"), ("include_closed", "false")];
        if include_custom_fields {
            params.push(("include_custom_fields", "true"));
        }
        debug!(%url, include_custom_fields, "GET list tasks");

        let resp = self
            .client
            .get(&url)
            .header("Authorization", self.api_token.expose_secret())
            .query(&params)
            .send()
            .await
            .context("ClickUp list request failed")?;

        let list: TaskListResponse = ensure_success(resp)
            .await?
            .json()
            .await
            .context("Failed to parse ClickUp task list")?;

        Ok(list.tasks)
    }

    async fn set_custom_field(
        &self,
        task_id: &str,
        field_id: &str,
        value: &FieldValue,
    ) -> Result<()> {
        let url = self.field_url(task_id, field_id);
        debug!(%url, ?value, "POST custom field");

        let resp = self
            .client
            .post(&url)
            .header("Authorization", self.api_token.expose_secret())
            .json(&serde_json::json!({ "value": value }))
            .send()
            .await
            .context("ClickUp field update request failed")?;

        ensure_success(resp).await?;
        Ok(())
    }

    async fn rename_task(&self, task_id: &str, name: &str) -> Result<()> {
        let url = self.task_url(task_id);
        debug!(%url, new_name = name, "PUT task name");

        let resp = self
            .client
            .put(&url)
            .header("Authorization", self.api_token.expose_secret())
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .context("ClickUp task update request failed")?;

        ensure_success(resp).await?;
        Ok(())
    }
}
