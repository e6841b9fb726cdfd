//! In-memory invoker for unit tests

use super::client::{Invoke, InvokeRequest, ProxyPayload, RawResponse};
use super::error::{ApiError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A call observed by [`ScriptedInvoker`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prefix: String,
    pub payload: ProxyPayload,
    pub expected_status_codes: Vec<u16>,
}

/// Replays a fixed list of outcomes and records every request
pub struct ScriptedInvoker {
    outcomes: Mutex<VecDeque<Result<RawResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedInvoker {
    pub fn new(outcomes: Vec<Result<RawResponse>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// One successful JSON response per page
    pub fn pages(pages: Vec<serde_json::Value>) -> Self {
        Self::new(
            pages
                .into_iter()
                .map(|page| Ok(RawResponse::new(200, page.to_string())))
                .collect(),
        )
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Invoke for ScriptedInvoker {
    async fn invoke(&self, request: InvokeRequest<'_>) -> Result<RawResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            prefix: request.prefix.to_string(),
            payload: request.payload,
            expected_status_codes: request.expected_status_codes.to_vec(),
        });

        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ApiError::Transport {
                    status: None,
                    message: "no scripted response left".to_string(),
                })
            })
    }
}
