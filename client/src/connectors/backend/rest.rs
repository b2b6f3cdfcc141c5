//! REST implementation of the backend connectors.
//!
//! Speaks the hosted backend's PostgREST-style HTTP dialect: table endpoints
//! under `/rest/v1/`, `column=eq.value` filters, and representation returns
//! for inserts and updates. Row-level access policies on the backend decide
//! what each identity may see or mutate.

use reqwest::Method;
use serde_json::{Map, Value, json};

use taskflow_core::task::{Profile, Task, TaskDraft, TaskId, TaskPatch, TaskStatus, UserId};

use super::{ProfileStore, StoreError, TaskStore};
use crate::config::Config;

/// PostgREST media type that collapses a single-row result into one object.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// HTTP client for the hosted backend's task and profile tables.
pub struct RestBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl RestBackend {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            api_key: config.backend_api_key.clone(),
            access_token: None,
        }
    }

    /// Authorizes requests with the signed-in user's access token, so the
    /// backend's row-level policies see the right identity. Without a token
    /// requests carry only the public API key.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }

    async fn read_ok(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl TaskStore for RestBackend {
    #[tracing::instrument(skip(self))]
    async fn list_tasks(&self, user_id: &UserId) -> Result<Vec<Task>, StoreError> {
        let response = self
            .request(Method::GET, &self.table_url("tasks"))
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{user_id}")),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await?;
        Self::decode(Self::read_ok(response).await?).await
    }

    #[tracing::instrument(skip(self))]
    async fn insert_task(&self, user_id: &UserId, draft: &TaskDraft) -> Result<Task, StoreError> {
        let body = Value::Object(insert_task_body(user_id, draft));
        let response = self
            .request(Method::POST, &self.table_url("tasks"))
            .header("Prefer", "return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(&body)
            .send()
            .await?;
        Self::decode(Self::read_ok(response).await?).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, StoreError> {
        let body = Value::Object(task_patch_body(patch));
        let response = self
            .request(Method::PATCH, &self.table_url("tasks"))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;
        let rows: Vec<Task> = Self::decode(Self::read_ok(response).await?).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_task(&self, id: &TaskId) -> Result<(), StoreError> {
        let response = self
            .request(Method::DELETE, &self.table_url("tasks"))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let rows: Vec<Task> = Self::decode(Self::read_ok(response).await?).await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }
}

impl ProfileStore for RestBackend {
    #[tracing::instrument(skip(self))]
    async fn fetch_profile(&self, id: &UserId) -> Result<Option<Profile>, StoreError> {
        let response = self
            .request(Method::GET, &self.table_url("profiles"))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{id}"))])
            .send()
            .await?;
        let rows: Vec<Profile> = Self::decode(Self::read_ok(response).await?).await?;
        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(skip(self))]
    async fn insert_profile(
        &self,
        id: &UserId,
        full_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<Profile, StoreError> {
        let mut body = Map::new();
        body.insert("id".to_string(), json!(id));
        body.insert("full_name".to_string(), json!(full_name));
        body.insert("avatar_url".to_string(), json!(avatar_url));

        let response = self
            .request(Method::POST, &self.table_url("profiles"))
            .header("Prefer", "return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(&Value::Object(body))
            .send()
            .await?;
        Self::decode(Self::read_ok(response).await?).await
    }

    #[tracing::instrument(skip(self))]
    async fn upsert_profile(
        &self,
        id: &UserId,
        full_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<Profile, StoreError> {
        let body = Value::Object(profile_patch_body(id, full_name, avatar_url));
        let response = self
            .request(Method::POST, &self.table_url("profiles"))
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(&body)
            .send()
            .await?;
        Self::decode(Self::read_ok(response).await?).await
    }
}

/// Builds the insert body for a draft: always a pending task with progress 0.
fn insert_task_body(user_id: &UserId, draft: &TaskDraft) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("user_id".to_string(), json!(user_id));
    body.insert("title".to_string(), json!(draft.title));
    body.insert("description".to_string(), json!(draft.description));
    body.insert("status".to_string(), json!(TaskStatus::Pending.as_str()));
    body.insert("priority".to_string(), json!(draft.priority.as_str()));
    body.insert(
        "due_date".to_string(),
        json!(draft.due_date.map(|due| due.to_rfc3339())),
    );
    body.insert("category".to_string(), json!(draft.category));
    body.insert("progress".to_string(), json!(0));
    body
}

/// Builds a PATCH body carrying only the fields the patch supplies. A
/// supplied-but-`None` optional serializes as JSON null, clearing the column.
fn task_patch_body(patch: &TaskPatch) -> Map<String, Value> {
    let mut body = Map::new();
    if let Some(title) = &patch.title {
        body.insert("title".to_string(), json!(title));
    }
    if let Some(description) = &patch.description {
        body.insert("description".to_string(), json!(description));
    }
    if let Some(status) = patch.status {
        body.insert("status".to_string(), json!(status.as_str()));
    }
    if let Some(priority) = patch.priority {
        body.insert("priority".to_string(), json!(priority.as_str()));
    }
    if let Some(due_date) = &patch.due_date {
        body.insert(
            "due_date".to_string(),
            json!(due_date.map(|due| due.to_rfc3339())),
        );
    }
    if let Some(category) = &patch.category {
        body.insert("category".to_string(), json!(category));
    }
    if let Some(progress) = patch.progress {
        body.insert("progress".to_string(), json!(progress));
    }
    body
}

fn profile_patch_body(
    id: &UserId,
    full_name: Option<String>,
    avatar_url: Option<String>,
) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("id".to_string(), json!(id));
    if let Some(full_name) = full_name {
        body.insert("full_name".to_string(), json!(full_name));
    }
    if let Some(avatar_url) = avatar_url {
        body.insert("avatar_url".to_string(), json!(avatar_url));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use taskflow_core::task::TaskPriority;

    fn config() -> Config {
        Config {
            backend_url: "https://project.example.co/".to_string(),
            backend_api_key: "public-key".to_string(),
        }
    }

    #[test]
    fn table_url_trims_trailing_slashes() {
        let backend = RestBackend::new(&config());
        assert_eq!(
            backend.table_url("tasks"),
            "https://project.example.co/rest/v1/tasks"
        );
    }

    #[test]
    fn insert_body_defaults_to_pending_with_zero_progress() {
        let draft = TaskDraft::new("Buy milk");

        let body = insert_task_body(&"user-1".to_string(), &draft);

        assert_eq!(body["user_id"], json!("user-1"));
        assert_eq!(body["title"], json!("Buy milk"));
        assert_eq!(body["status"], json!("pending"));
        assert_eq!(body["priority"], json!("medium"));
        assert_eq!(body["progress"], json!(0));
        assert_eq!(body["description"], Value::Null);
        assert_eq!(body["due_date"], Value::Null);
        assert_eq!(body["category"], Value::Null);
    }

    #[test]
    fn insert_body_serializes_due_date_as_rfc3339() {
        let due: DateTime<Utc> = DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let draft = TaskDraft::new("Buy milk").with_due_date(due);

        let body = insert_task_body(&"user-1".to_string(), &draft);

        assert_eq!(body["due_date"], json!("2024-06-01T12:00:00+00:00"));
    }

    #[test]
    fn patch_body_carries_only_supplied_fields() {
        let patch = TaskPatch::new()
            .status(TaskStatus::Completed)
            .progress(100);

        let body = task_patch_body(&patch);

        assert_eq!(body.len(), 2);
        assert_eq!(body["status"], json!("completed"));
        assert_eq!(body["progress"], json!(100));
        assert!(!body.contains_key("title"));
    }

    #[test]
    fn patch_body_clears_optionals_with_null() {
        let patch = TaskPatch::new()
            .description(None)
            .category(Some("errands".to_string()))
            .priority(TaskPriority::Urgent);

        let body = task_patch_body(&patch);

        assert_eq!(body["description"], Value::Null);
        assert_eq!(body["category"], json!("errands"));
        assert_eq!(body["priority"], json!("urgent"));
    }

    #[test]
    fn empty_patch_produces_an_empty_body() {
        assert!(task_patch_body(&TaskPatch::new()).is_empty());
    }

    #[test]
    fn profile_patch_body_keeps_unsupplied_fields_out() {
        let body = profile_patch_body(&"user-1".to_string(), Some("Ada".to_string()), None);

        assert_eq!(body["id"], json!("user-1"));
        assert_eq!(body["full_name"], json!("Ada"));
        assert!(!body.contains_key("avatar_url"));
    }
}
