//! Cumulus resources
//!
//! One module per resource type. Every handler is a thin call into the
//! [`crate::api`] layer: single requests go through
//! [`CumulusClient`](crate::api::CumulusClient), listings through
//! [`fetch_pages`](crate::api::fetch_pages), and upserts through
//! [`upsert`](crate::api::upsert()).
//!
//! - [`async_operations`] - Background operations
//! - [`collections`] - Collection definitions (upsertable)
//! - [`dead_letter`] - Dead letter archive recovery
//! - [`elasticsearch`] - Index management
//! - [`executions`] - Workflow executions
//! - [`granules`] - Granule lifecycle actions
//! - [`providers`] - Provider definitions (upsertable)
//! - [`reports`] - Reconciliation reports
//! - [`rules`] - Rule definitions (upsertable)
//! - [`stats`] - Aggregate statistics

pub mod async_operations;
pub mod collections;
pub mod dead_letter;
pub mod elasticsearch;
pub mod executions;
pub mod granules;
pub mod providers;
pub mod reports;
pub mod rules;
pub mod stats;

use crate::api::{ApiError, CumulusClient, Invoke, Result};
use serde_json::{Map, Value};

/// Show the Cumulus API version
pub async fn version<I: Invoke>(client: &CumulusClient<I>, prefix: &str) -> Result<Value> {
    client.get(prefix, "/version", None).await
}

/// Parse a JSON document supplied by the user
pub fn parse_document(data: &str) -> Result<Value> {
    serde_json::from_str(data).map_err(ApiError::InvalidDocument)
}

/// Split a comma-separated field list
pub fn field_list(fields: &str) -> Vec<String> {
    fields
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keep only the named fields of each record
pub fn select_fields(items: Vec<Value>, fields: &[String]) -> Vec<Value> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(mut record) => {
                let picked: Map<String, Value> = fields
                    .iter()
                    .filter_map(|field| record.remove(field).map(|value| (field.clone(), value)))
                    .collect();
                Value::Object(picked)
            }
            other => other,
        })
        .collect()
}

/// The `message` of a response, as returned by action endpoints
fn message_of(response: Value) -> Value {
    match response {
        Value::Object(mut map) => map.remove("message").unwrap_or(Value::Null),
        _ => Value::Null,
    }
}
