//! Granules
//!
//! Granules are addressed by collection ID and granule ID. State changes
//! are `PATCH` actions on the granule itself.

use crate::api::pagination::{fetch_pages, ListOptions};
use crate::api::{path_segment, ApiError, Body, CumulusClient, Invoke, Result};
use serde::Serialize;
use serde_json::Value;

/// Body of a granule `PATCH` action
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GranuleAction<'a> {
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    workflow: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    execution_arn: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    workflow_name: Option<&'a str>,
}

/// Options for reingesting a granule
#[derive(Debug, Clone, Default)]
pub struct Reingest {
    pub execution_arn: Option<String>,
    /// Ignored by the API when `execution_arn` is supplied
    pub workflow_name: Option<String>,
}

fn granule_path(collection_id: &str, granule_id: &str) -> String {
    format!(
        "/granules/{}/{}",
        path_segment(collection_id),
        path_segment(granule_id)
    )
}

async fn apply_action<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    collection_id: &str,
    granule_id: &str,
    action: GranuleAction<'_>,
) -> Result<Value> {
    let body = serde_json::to_value(&action).map_err(ApiError::InvalidDocument)?;
    client
        .patch(prefix, &granule_path(collection_id, granule_id), Body::Json(body))
        .await
}

pub async fn get<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    collection_id: &str,
    granule_id: &str,
) -> Result<Value> {
    client
        .get(prefix, &granule_path(collection_id, granule_id), None)
        .await
}

/// Delete a granule (it must first be unpublished)
pub async fn delete<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    collection_id: &str,
    granule_id: &str,
) -> Result<Value> {
    client
        .delete(prefix, &granule_path(collection_id, granule_id))
        .await
}

/// Remove a granule from the CMR
pub async fn unpublish<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    collection_id: &str,
    granule_id: &str,
) -> Result<Value> {
    let action = GranuleAction {
        action: "removeFromCmr",
        ..Default::default()
    };
    apply_action(client, prefix, collection_id, granule_id, action).await
}

pub async fn reingest<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    collection_id: &str,
    granule_id: &str,
    options: &Reingest,
) -> Result<Value> {
    let action = GranuleAction {
        action: "reingest",
        execution_arn: options.execution_arn.as_deref(),
        workflow_name: options.workflow_name.as_deref(),
        ..Default::default()
    };
    apply_action(client, prefix, collection_id, granule_id, action).await
}

/// Run a granule through a workflow
pub async fn process<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    collection_id: &str,
    granule_id: &str,
    workflow: &str,
) -> Result<Value> {
    let action = GranuleAction {
        action: "applyWorkflow",
        workflow: Some(workflow),
        ..Default::default()
    };
    apply_action(client, prefix, collection_id, granule_id, action).await
}

pub async fn list<I: Invoke>(client: &CumulusClient<I>, options: &ListOptions) -> Result<Vec<Value>> {
    fetch_pages(client, "/granules", options, None).await
}
