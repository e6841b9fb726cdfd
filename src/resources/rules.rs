//! Rules

use crate::api::pagination::{fetch_pages, ListOptions};
use crate::api::upsert::{self, RULE};
use crate::api::{path_segment, Body, CumulusClient, Invoke, Result};
use serde_json::{json, Value};

/// Rule activation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleState {
    Enabled,
    Disabled,
}

impl RuleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleState::Enabled => "ENABLED",
            RuleState::Disabled => "DISABLED",
        }
    }
}

fn rule_path(name: &str) -> String {
    format!("/rules/{}", path_segment(name))
}

pub async fn add<I: Invoke>(client: &CumulusClient<I>, prefix: &str, document: &Value) -> Result<Value> {
    upsert::create(client, &RULE, prefix, document).await
}

pub async fn replace<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    document: &Value,
) -> Result<Value> {
    upsert::replace(client, &RULE, prefix, document).await
}

/// Replace a rule, or add it if not found
pub async fn upsert<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    document: &Value,
) -> Result<Value> {
    upsert::upsert(client, &RULE, prefix, document).await
}

pub async fn delete<I: Invoke>(client: &CumulusClient<I>, prefix: &str, name: &str) -> Result<Value> {
    client.delete(prefix, &rule_path(name)).await
}

/// Enable or disable a rule
pub async fn set_state<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    name: &str,
    state: RuleState,
) -> Result<Value> {
    let body = json!({ "state": state.as_str() });
    client.patch(prefix, &rule_path(name), Body::Json(body)).await
}

/// Rerun a 'onetime' rule
pub async fn run<I: Invoke>(client: &CumulusClient<I>, prefix: &str, name: &str) -> Result<Value> {
    let body = json!({ "action": "rerun" });
    client.patch(prefix, &rule_path(name), Body::Json(body)).await
}

pub async fn list<I: Invoke>(client: &CumulusClient<I>, options: &ListOptions) -> Result<Vec<Value>> {
    fetch_pages(client, RULE.collection_path, options, None).await
}
