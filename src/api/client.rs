//! Cumulus Client
//!
//! Executes single logical requests against the Cumulus API through an
//! [`Invoke`] implementation and decodes the response envelope.

use super::error::{ApiError, DomainError, Result};
use super::status::NO_RETRY_STATUS_CODES;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// API version requested on every call
pub const API_VERSION: &str = "2";

/// HTTP methods accepted by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query string value: either a single value or a repeated parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Multi(values)
    }
}

pub type QueryParams = BTreeMap<String, QueryValue>;

/// Request body: sent verbatim, or serialized from JSON
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Raw(String),
    Json(Value),
}

impl Body {
    fn serialize(&self) -> String {
        match self {
            Body::Raw(raw) => raw.clone(),
            Body::Json(value) => value.to_string(),
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

/// One logical request against a Cumulus stack
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub prefix: String,
    pub method: Method,
    pub path: String,
    pub query: Option<QueryParams>,
    pub body: Option<Body>,
}

impl ApiRequest {
    pub fn new(prefix: &str, method: Method, path: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            method,
            path: path.to_string(),
            query: None,
            body: None,
        }
    }

    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = Some(query);
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// API Gateway style proxy payload handed to the invoker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyPayload {
    pub resource: String,
    pub http_method: Method,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string_parameters: Option<QueryParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ProxyPayload {
    fn from_request(request: &ApiRequest) -> Self {
        let headers = BTreeMap::from([
            ("Cumulus-API-Version".to_string(), API_VERSION.to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]);

        Self {
            resource: "/{proxy+}".to_string(),
            http_method: request.method,
            path: request.path.clone(),
            headers,
            query_string_parameters: request.query.clone(),
            body: request
                .body
                .as_ref()
                .map(Body::serialize)
                .filter(|body| !body.is_empty()),
        }
    }
}

/// Everything an invoker needs to perform (and possibly retry) a call
pub struct InvokeRequest<'a> {
    pub prefix: &'a str,
    pub payload: ProxyPayload,
    /// Statuses that must not be retried
    pub expected_status_codes: &'a [u16],
    /// Called once per failed attempt, before any retry
    pub on_failed_attempt: &'a (dyn Fn(&ApiError) + Send + Sync),
}

/// Raw response returned by an invoker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status_code: u16,
    pub body: Option<String>,
}

impl RawResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: Some(body.into()),
        }
    }
}

/// Transport collaborator that delivers payloads to a Cumulus stack
#[async_trait]
pub trait Invoke: Send + Sync {
    async fn invoke(&self, request: InvokeRequest<'_>) -> Result<RawResponse>;
}

fn log_failed_attempt(error: &ApiError) {
    tracing::warn!("Request attempt failed: {}", error);
}

/// Decode a raw response into a success value or a typed failure
pub fn decode_response(response: &RawResponse) -> Result<Value> {
    let text = response
        .body
        .as_deref()
        .filter(|body| !body.trim().is_empty())
        .unwrap_or("{}");

    let body: Value = serde_json::from_str(text).map_err(|source| ApiError::Decode {
        status: response.status_code,
        source,
    })?;

    match DomainError::from_body(&body, response.status_code) {
        Some(err) => Err(err.into()),
        None => Ok(body),
    }
}

/// Main Cumulus client
#[derive(Clone)]
pub struct CumulusClient<I> {
    invoker: I,
}

impl<I: Invoke> CumulusClient<I> {
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Execute one request and decode its response
    pub async fn request(&self, request: ApiRequest) -> Result<Value> {
        if request.prefix.trim().is_empty() {
            return Err(ApiError::MissingPrefix);
        }

        let payload = ProxyPayload::from_request(&request);
        tracing::debug!("{} {} [prefix: {}]", request.method, request.path, request.prefix);
        tracing::trace!("Request payload: {:?}", payload);

        let response = self
            .invoker
            .invoke(InvokeRequest {
                prefix: &request.prefix,
                payload,
                expected_status_codes: &NO_RETRY_STATUS_CODES,
                on_failed_attempt: &log_failed_attempt,
            })
            .await?;

        tracing::debug!("Response status: {}", response.status_code);
        tracing::trace!("Response body: {:?}", response.body);

        decode_response(&response)
    }

    /// Make a GET request
    pub async fn get(&self, prefix: &str, path: &str, query: Option<QueryParams>) -> Result<Value> {
        let mut request = ApiRequest::new(prefix, Method::Get, path);
        request.query = query;
        self.request(request).await
    }

    /// Make a POST request
    pub async fn post(&self, prefix: &str, path: &str, body: Option<Body>) -> Result<Value> {
        let mut request = ApiRequest::new(prefix, Method::Post, path);
        request.body = body;
        self.request(request).await
    }

    /// Make a PUT request
    pub async fn put(&self, prefix: &str, path: &str, body: Body) -> Result<Value> {
        self.request(ApiRequest::new(prefix, Method::Put, path).body(body))
            .await
    }

    /// Make a PATCH request
    pub async fn patch(&self, prefix: &str, path: &str, body: Body) -> Result<Value> {
        self.request(ApiRequest::new(prefix, Method::Patch, path).body(body))
            .await
    }

    /// Make a DELETE request
    pub async fn delete(&self, prefix: &str, path: &str) -> Result<Value> {
        self.request(ApiRequest::new(prefix, Method::Delete, path))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedInvoker;
    use serde_json::json;

    #[tokio::test]
    async fn builds_proxy_payload() {
        let invoker = ScriptedInvoker::new(vec![Ok(RawResponse::new(200, r#"{"ok":true}"#))]);
        let client = CumulusClient::new(invoker);

        let query = QueryParams::from([
            ("limit".to_string(), QueryValue::from("10")),
            ("status".to_string(), QueryValue::from(vec!["a".to_string(), "b".to_string()])),
        ]);
        let request = ApiRequest::new("my-stack", Method::Post, "/granules")
            .query(query)
            .body(json!({"action": "reingest"}));

        let value = client.request(request).await.unwrap();
        assert_eq!(value, json!({"ok": true}));

        let calls = client.invoker().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prefix, "my-stack");

        let payload = serde_json::to_value(&calls[0].payload).unwrap();
        assert_eq!(
            payload,
            json!({
                "resource": "/{proxy+}",
                "httpMethod": "POST",
                "path": "/granules",
                "headers": {
                    "Cumulus-API-Version": "2",
                    "Content-Type": "application/json"
                },
                "queryStringParameters": {"limit": "10", "status": ["a", "b"]},
                "body": "{\"action\":\"reingest\"}"
            })
        );
    }

    #[tokio::test]
    async fn raw_body_is_sent_verbatim_and_absent_body_omitted() {
        let invoker = ScriptedInvoker::new(vec![
            Ok(RawResponse::new(200, "{}")),
            Ok(RawResponse::new(200, "{}")),
        ]);
        let client = CumulusClient::new(invoker);

        client
            .post("p", "/rules", Some(Body::Raw("{ \"name\": \"r\" }".to_string())))
            .await
            .unwrap();
        client.get("p", "/version", None).await.unwrap();

        let calls = client.invoker().calls();
        assert_eq!(calls[0].payload.body.as_deref(), Some("{ \"name\": \"r\" }"));
        assert_eq!(calls[1].payload.body, None);
        assert_eq!(calls[1].payload.query_string_parameters, None);
    }

    #[tokio::test]
    async fn passes_no_retry_classification() {
        let invoker = ScriptedInvoker::new(vec![Ok(RawResponse::new(200, "{}"))]);
        let client = CumulusClient::new(invoker);
        client.get("p", "/stats", None).await.unwrap();

        let calls = client.invoker().calls();
        assert_eq!(calls[0].expected_status_codes, NO_RETRY_STATUS_CODES.to_vec());
    }

    #[tokio::test]
    async fn empty_prefix_is_rejected_before_invoking() {
        let invoker = ScriptedInvoker::new(vec![]);
        let client = CumulusClient::new(invoker);

        let err = client.get("  ", "/version", None).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingPrefix));
        assert!(client.invoker().calls().is_empty());
    }

    #[test]
    fn empty_body_decodes_as_empty_object() {
        let value = decode_response(&RawResponse { status_code: 204, body: None }).unwrap();
        assert_eq!(value, json!({}));

        let value = decode_response(&RawResponse::new(204, "")).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let err = decode_response(&RawResponse::new(502, "<html>Bad Gateway</html>")).unwrap_err();
        assert!(matches!(err, ApiError::Decode { status: 502, .. }));
    }

    #[test]
    fn domain_failure_shape_is_rejected() {
        let err = decode_response(&RawResponse::new(
            400,
            r#"{"error":"BadRequest","message":"bad"}"#,
        ))
        .unwrap_err();

        match err {
            ApiError::Domain(domain) => {
                assert_eq!(domain.error, "BadRequest");
                assert_eq!(domain.message, "bad");
                assert_eq!(domain.status, Some(400));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn partial_failure_shape_is_a_success_value() {
        let value =
            decode_response(&RawResponse::new(200, r#"{"error":null,"message":"ok"}"#)).unwrap();
        assert_eq!(value["message"], "ok");

        let value = decode_response(&RawResponse::new(200, r#"{"message":"ok"}"#)).unwrap();
        assert_eq!(value, json!({"message": "ok"}));
    }

    #[test]
    fn non_object_bodies_are_success_values() {
        let value = decode_response(&RawResponse::new(200, r#""cumulus-2024-01-01""#)).unwrap();
        assert_eq!(value, json!("cumulus-2024-01-01"));
    }

    #[tokio::test]
    async fn transport_failures_propagate_unchanged() {
        let invoker = ScriptedInvoker::new(vec![Err(ApiError::Transport {
            status: Some(503),
            message: "Service Unavailable".to_string(),
        })]);
        let client = CumulusClient::new(invoker);

        let err = client.delete("p", "/rules/r1").await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "Service Unavailable");
    }
}
