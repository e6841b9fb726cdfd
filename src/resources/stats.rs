//! Statistics

use crate::api::{CumulusClient, Invoke, Result};
use serde_json::Value;

/// Summary of statistics related to granules in the system
pub async fn summary<I: Invoke>(client: &CumulusClient<I>, prefix: &str) -> Result<Value> {
    client.get(prefix, "/stats", None).await
}

/// Count values for a given field, for a given record type
pub async fn count<I: Invoke>(client: &CumulusClient<I>, prefix: &str) -> Result<Value> {
    client.get(prefix, "/stats/aggregate", None).await
}
