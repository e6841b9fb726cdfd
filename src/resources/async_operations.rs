//! Async operations

use crate::api::pagination::{fetch_pages, ListOptions};
use crate::api::{path_segment, CumulusClient, Invoke, Result};
use serde_json::Value;

pub async fn get<I: Invoke>(client: &CumulusClient<I>, prefix: &str, id: &str) -> Result<Value> {
    client
        .get(prefix, &format!("/asyncOperations/{}", path_segment(id)), None)
        .await
}

/// List async operations; only `id` is returned unless fields are given
pub async fn list<I: Invoke>(client: &CumulusClient<I>, options: &ListOptions) -> Result<Vec<Value>> {
    let mut options = options.clone();
    options.fields.get_or_insert_with(|| "id".to_string());
    fetch_pages(client, "/asyncOperations", &options, None).await
}
