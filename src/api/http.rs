//! HTTP invoker for the Cumulus API
//!
//! Delivers proxy payloads as plain HTTP requests and retries attempts whose
//! outcome is not final.

use super::client::{Invoke, InvokeRequest, Method, ProxyPayload, QueryParams, QueryValue, RawResponse};
use super::error::{ApiError, Result};
use crate::config::ClientConfig;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let end = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Flatten query parameters, repeating names with several values
fn query_pairs(query: &QueryParams) -> Vec<(&str, &str)> {
    query
        .iter()
        .flat_map(|(name, value)| match value {
            QueryValue::Single(v) => vec![(name.as_str(), v.as_str())],
            QueryValue::Multi(values) => values.iter().map(|v| (name.as_str(), v.as_str())).collect(),
        })
        .collect()
}

/// Message for a response whose status is not final
fn failure_message(response: &RawResponse) -> String {
    let detail = response
        .body
        .as_deref()
        .and_then(|body| serde_json::from_str::<Value>(body).ok())
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string));

    match detail {
        Some(message) => format!("API request failed: {} - {}", response.status_code, message),
        None => format!("API request failed: {}", response.status_code),
    }
}

/// [`Invoke`] implementation backed by `reqwest`
#[derive(Clone)]
pub struct HttpInvoker {
    client: Client,
    config: ClientConfig,
}

impl HttpInvoker {
    /// Create a new HTTP invoker
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url_for(&self, prefix: &str, path: &str) -> Result<Url> {
        let raw = format!("{}{}", self.config.endpoint_for(prefix), path);
        Url::parse(&raw).map_err(|err| ApiError::Transport {
            status: None,
            message: format!("Invalid request URL '{}': {}", raw, err),
        })
    }

    /// Perform a single attempt
    async fn send(&self, url: &Url, payload: &ProxyPayload) -> Result<RawResponse> {
        tracing::debug!("{} {}", payload.http_method, url);

        let mut request = self
            .client
            .request(to_reqwest_method(payload.http_method), url.clone());

        for (name, value) in &payload.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(query) = &payload.query_string_parameters {
            request = request.query(&query_pairs(query));
        }
        if let Some(body) = &payload.body {
            request = request.body(body.clone());
        }

        let response = request.send().await.map_err(|err| ApiError::Transport {
            status: None,
            message: format!("Failed to send request: {}", err),
        })?;

        let status_code = response.status().as_u16();
        let body = response.text().await.map_err(|err| ApiError::Transport {
            status: Some(status_code),
            message: format!("Failed to read response body: {}", err),
        })?;

        Ok(RawResponse {
            status_code,
            body: Some(body),
        })
    }
}

#[async_trait]
impl Invoke for HttpInvoker {
    async fn invoke(&self, request: InvokeRequest<'_>) -> Result<RawResponse> {
        let url = self.url_for(request.prefix, &request.payload.path)?;
        let attempts = self.config.attempts();
        let mut delay = Duration::from_millis(self.config.initial_backoff_ms);

        let mut attempt = 1;
        loop {
            let failure = match self.send(&url, &request.payload).await {
                Ok(response) if request.expected_status_codes.contains(&response.status_code) => {
                    return Ok(response);
                }
                Ok(response) => {
                    // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
                    tracing::error!(
                        "API error: {} - {}",
                        response.status_code,
                        sanitize_for_log(response.body.as_deref().unwrap_or(""))
                    );
                    ApiError::Transport {
                        status: Some(response.status_code),
                        message: failure_message(&response),
                    }
                }
                Err(err) => err,
            };

            (request.on_failed_attempt)(&failure);

            if attempt >= attempts {
                return Err(failure);
            }

            tracing::debug!("Retrying in {:?} (attempt {}/{})", delay, attempt + 1, attempts);
            tokio::time::sleep(delay).await;
            delay *= 2;
            attempt += 1;
        }
    }
}
