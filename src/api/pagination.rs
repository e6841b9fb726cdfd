//! Paginated listing
//!
//! Fetches successive pages from a listing endpoint and flattens their
//! `results` arrays into a single ordered list.

use super::client::{ApiRequest, Body, CumulusClient, Invoke, Method, QueryParams, QueryValue};
use super::error::{ApiError, Result};
use crate::unfold::{unfold, Step};
use futures::TryStreamExt;
use serde_json::Value;
use std::fmt;

/// Page size requested when listing everything
pub const ALL_PAGE_SIZE: &str = "100";

/// Sort direction for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options shared by every listing
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub prefix: String,
    /// Extra `NAME=VALUE` query filters
    pub params: Vec<(String, String)>,
    pub sort_by: String,
    pub order: SortOrder,
    /// Comma-separated field selection passed through to the API
    pub fields: Option<String>,
    /// First page to request (1-based)
    pub page: u32,
    pub limit: usize,
    /// Ignore `limit` and read until an empty page
    pub all: bool,
}

impl ListOptions {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            params: Vec::new(),
            sort_by: "timestamp".to_string(),
            order: SortOrder::Asc,
            fields: None,
            page: 1,
            limit: 10,
            all: false,
        }
    }

    fn base_query(&self) -> QueryParams {
        let mut query: QueryParams = self
            .params
            .iter()
            .map(|(name, value)| (name.clone(), QueryValue::from(value.as_str())))
            .collect();

        query.insert("sort_by".to_string(), self.sort_by.as_str().into());
        query.insert("order".to_string(), self.order.as_str().into());
        if let Some(fields) = &self.fields {
            query.insert("fields".to_string(), fields.as_str().into());
        }

        let limit = if self.all {
            ALL_PAGE_SIZE.to_string()
        } else {
            self.limit.to_string()
        };
        query.insert("limit".to_string(), limit.into());

        query
    }
}

fn page_request(
    options: &ListOptions,
    path: &str,
    query: &QueryParams,
    body: Option<&Value>,
    page: u32,
) -> ApiRequest {
    let mut query = query.clone();
    query.insert("page".to_string(), page.to_string().into());

    // Search-style listings take their criteria in a POST body
    let method = if body.is_some() {
        Method::Post
    } else {
        Method::Get
    };

    ApiRequest {
        prefix: options.prefix.clone(),
        method,
        path: path.to_string(),
        query: Some(query),
        body: body.cloned().map(Body::Json),
    }
}

/// Fetch pages from `path` until the limit is reached or a page comes back empty
pub async fn fetch_pages<I: Invoke>(
    client: &CumulusClient<I>,
    path: &str,
    options: &ListOptions,
    body: Option<&Value>,
) -> Result<Vec<Value>> {
    let base_query = options.base_query();

    // The cursor becomes None once the page number cannot advance
    let pages = unfold(Some(options.page), |page| {
        let next = page.map(|page| (page, page_request(options, path, &base_query, body, page)));
        async move {
            let Some((page, api_request)) = next else {
                return Ok(Step::Done);
            };
            let response = client.request(api_request).await?;
            page_step(&response, page)
        }
    });
    futures::pin_mut!(pages);

    let mut items = Vec::new();
    while let Some(page_items) = pages.try_next().await? {
        items.extend(page_items);
        if !options.all && items.len() >= options.limit {
            break;
        }
    }

    if !options.all {
        items.truncate(options.limit);
    }

    tracing::debug!("Fetched {} items from {}", items.len(), path);
    Ok(items)
}

fn page_step(response: &Value, page: u32) -> Result<Step<Vec<Value>, Option<u32>>> {
    match response.get("results").and_then(Value::as_array) {
        None => Err(ApiError::Pagination(response_error_message(response))),
        Some(results) if results.is_empty() => Ok(Step::Done),
        Some(results) => Ok(Step::Continue {
            output: results.clone(),
            next: page.checked_add(1),
        }),
    }
}

/// Describe a listing response that lacks `results`.
///
/// Uses the search engine's root-cause reasons when present, otherwise the
/// whole response as compact JSON.
pub fn response_error_message(response: &Value) -> String {
    let reasons: Vec<String> = response
        .pointer("/meta/body/error/root_cause")
        .and_then(Value::as_array)
        .map(|causes| {
            causes
                .iter()
                .map(|cause| match cause.get("reason") {
                    Some(Value::String(reason)) => reason.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    let message = reasons.join(" | ");
    if message.is_empty() {
        response.to_string()
    } else {
        message
    }
}
