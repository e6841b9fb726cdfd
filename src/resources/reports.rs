//! Reconciliation reports

use crate::api::pagination::{fetch_pages, ListOptions};
use crate::api::{path_segment, ApiError, Body, CumulusClient, Invoke, Result};
use serde::Serialize;
use serde_json::Value;

/// Kinds of reconciliation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ReportType {
    #[default]
    Inventory,
    #[serde(rename = "Granule Inventory")]
    GranuleInventory,
    #[serde(rename = "Granule Not Found")]
    GranuleNotFound,
    #[serde(rename = "ORCA Backup")]
    OrcaBackup,
    Internal,
}

/// Parameters of a new report.
///
/// Empty ID lists are left out of the request: the API builds an invalid
/// query from an empty list.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReport {
    /// Defaults to a combination of report type and creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_name: Option<String>,
    pub report_type: ReportType,
    #[serde(rename = "collectionId", skip_serializing_if = "Vec::is_empty")]
    pub collection_ids: Vec<String>,
    #[serde(rename = "granuleId", skip_serializing_if = "Vec::is_empty")]
    pub granule_ids: Vec<String>,
    #[serde(rename = "provider", skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<String>,
    /// Status filter for Granule Inventory reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<String>,
}

fn report_path(name: &str) -> String {
    format!("/reconciliationReports/{}", path_segment(name))
}

pub async fn create<I: Invoke>(
    client: &CumulusClient<I>,
    prefix: &str,
    report: &CreateReport,
) -> Result<Value> {
    let body = serde_json::to_value(report).map_err(ApiError::InvalidDocument)?;
    client
        .post(prefix, "/reconciliationReports", Some(Body::Json(body)))
        .await
}

pub async fn get<I: Invoke>(client: &CumulusClient<I>, prefix: &str, name: &str) -> Result<Value> {
    client.get(prefix, &report_path(name), None).await
}

pub async fn delete<I: Invoke>(client: &CumulusClient<I>, prefix: &str, name: &str) -> Result<Value> {
    client.delete(prefix, &report_path(name)).await
}

pub async fn list<I: Invoke>(client: &CumulusClient<I>, options: &ListOptions) -> Result<Vec<Value>> {
    fetch_pages(client, "/reconciliationReports", options, None).await
}
