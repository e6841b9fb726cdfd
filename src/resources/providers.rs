//! Providers

use crate::api::pagination::{fetch_pages, ListOptions};
use crate::api::upsert::{self, PROVIDER};
use crate::api::{path_segment, CumulusClient, Invoke, Result};
use serde_json::Value;

pub async fn add<I: Invoke>(client: &CumulusClient<I>, prefix: &str, document: &Value) -> Result<Value> {
    upsert::create(client, &PROVIDER, prefix, document).await
}

pub async fn replace<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    document: &Value,
) -> Result<Value> {
    upsert::replace(client, &PROVIDER, prefix, document).await
}

/// Replace a provider, or add it if not found
pub async fn upsert<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    document: &Value,
) -> Result<Value> {
    upsert::upsert(client, &PROVIDER, prefix, document).await
}

pub async fn delete<I: Invoke>(client: &CumulusClient<I>, prefix: &str, id: &str) -> Result<Value> {
    client
        .delete(prefix, &format!("/providers/{}", path_segment(id)))
        .await
}

pub async fn list<I: Invoke>(client: &CumulusClient<I>, options: &ListOptions) -> Result<Vec<Value>> {
    fetch_pages(client, PROVIDER.collection_path, options, None).await
}
