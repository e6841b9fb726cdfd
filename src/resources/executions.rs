//! Workflow executions

use super::{field_list, select_fields};
use crate::api::pagination::{fetch_pages, ListOptions};
use crate::api::{CumulusClient, Invoke, Result};
use serde_json::{json, Map, Value};

pub async fn list<I: Invoke>(client: &CumulusClient<I>, options: &ListOptions) -> Result<Vec<Value>> {
    fetch_pages(client, "/executions", options, None).await
}

/// Granule criteria for [`find_by_granules`]
#[derive(Debug, Clone, Default)]
pub struct GranuleQuery {
    pub collection_id: Option<String>,
    pub granule_id: Option<String>,
    /// Full search body; overrides the IDs above
    pub data: Option<Value>,
}

impl GranuleQuery {
    fn body(&self) -> Value {
        if let Some(data) = &self.data {
            return data.clone();
        }

        let mut granule = Map::new();
        if let Some(collection_id) = &self.collection_id {
            granule.insert("collectionId".to_string(), json!(collection_id));
        }
        if let Some(granule_id) = &self.granule_id {
            granule.insert("granuleId".to_string(), json!(granule_id));
        }
        json!({ "granules": [granule] })
    }
}

/// Find executions associated with a list of granules.
///
/// The search endpoint ignores field selection, so fields are picked from
/// the results here.
pub async fn find_by_granules<I: Invoke>(
    client: &CumulusClient<I>,
    options: &ListOptions,
    query: &GranuleQuery,
) -> Result<Vec<Value>> {
    let body = query.body();
    let executions = fetch_pages(client, "/executions/search-by-granules", options, Some(&body)).await?;

    Ok(match &options.fields {
        Some(fields) => select_fields(executions, &field_list(fields)),
        None => executions,
    })
}
