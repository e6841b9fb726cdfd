//! Elasticsearch index management

use super::message_of;
use crate::api::{ApiError, Body, CumulusClient, Invoke, Result};
use serde::Serialize;
use serde_json::Value;

/// Options for switching the index an alias points to
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeIndex {
    pub current_index: String,
    pub new_index: String,
    /// Alias to move; the API uses its default alias when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_name: Option<String>,
    pub delete_source: bool,
}

/// Index name used when none is given: `cumulus-YYYY-MM-DD`
pub fn default_index_name() -> String {
    chrono::Utc::now().format("cumulus-%Y-%m-%d").to_string()
}

/// The aliased index currently used by Cumulus
pub async fn current_index<I: Invoke>(client: &CumulusClient<I>, prefix: &str) -> Result<Value> {
    client.get(prefix, "/elasticsearch/current-index", None).await
}

pub async fn indices_status<I: Invoke>(client: &CumulusClient<I>, prefix: &str) -> Result<Value> {
    let response = client.get(prefix, "/elasticsearch/indices-status", None).await?;
    Ok(response.get("body").cloned().unwrap_or(Value::Null))
}

/// Re-index Elasticsearch from the database into `index_name`.
///
/// The new index is not used until [`change_index`] points the alias at it.
pub async fn index_from_database<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    index_name: Option<&str>,
) -> Result<Value> {
    let index_name = index_name.map_or_else(default_index_name, str::to_string);
    let body = serde_json::json!({ "indexName": index_name });
    let response = client
        .post(prefix, "/elasticsearch/index-from-database", Some(Body::Json(body)))
        .await?;
    Ok(message_of(response))
}

pub async fn change_index<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    options: &ChangeIndex,
) -> Result<Value> {
    let body = serde_json::to_value(options).map_err(ApiError::InvalidDocument)?;
    let response = client
        .post(prefix, "/elasticsearch/change-index", Some(Body::Json(body)))
        .await?;
    Ok(message_of(response))
}
