//! Collections

use crate::api::pagination::{fetch_pages, ListOptions};
use crate::api::upsert::{self, COLLECTION};
use crate::api::{path_segment, CumulusClient, Invoke, Result};
use serde_json::Value;

pub async fn add<I: Invoke>(client: &CumulusClient<I>, prefix: &str, document: &Value) -> Result<Value> {
    upsert::create(client, &COLLECTION, prefix, document).await
}

pub async fn replace<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    document: &Value,
) -> Result<Value> {
    upsert::replace(client, &COLLECTION, prefix, document).await
}

/// Replace a collection, or add it if not found
pub async fn upsert<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    document: &Value,
) -> Result<Value> {
    upsert::upsert(client, &COLLECTION, prefix, document).await
}

pub async fn delete<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    name: &str,
    version: &str,
) -> Result<Value> {
    let path = format!("/collections/{}/{}", path_segment(name), path_segment(version));
    client.delete(prefix, &path).await
}

pub async fn list<I: Invoke>(client: &CumulusClient<I>, options: &ListOptions) -> Result<Vec<Value>> {
    fetch_pages(client, COLLECTION.collection_path, options, None).await
}
