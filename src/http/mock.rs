use super::transport::{ApiRequest, ApiResponse, Transport};
use super::ArrError;
use crate::config::ServiceConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Records every request and answers from a queue of canned responses,
/// falling back to `fallback` once the queue is drained.
#[derive(Clone)]
pub struct MockTransport {
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    queued: Arc<Mutex<VecDeque<ApiResponse>>>,
    fallback: ApiResponse,
}

impl MockTransport {
    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            queued: Arc::new(Mutex::new(VecDeque::new())),
            fallback: ApiResponse {
                status,
                body: body.to_owned(),
            },
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::raw(StatusCode::OK, &body.to_string())
    }

    pub fn status(status: StatusCode, body: &str) -> Self {
        Self::raw(status, body)
    }

    /// Answer the next request with `body` before falling back.
    pub fn push(&self, status: StatusCode, body: Value) {
        self.queued.lock().unwrap().push_back(ApiResponse {
            status,
            body: body.to_string(),
        });
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ArrError> {
        self.requests.lock().unwrap().push(request);
        let response = self.queued.lock().unwrap().pop_front();
        Ok(response.unwrap_or_else(|| self.fallback.clone()))
    }
}

pub fn config(base_url: &str) -> ServiceConfig {
    ServiceConfig {
        base_url: base_url.to_owned(),
        api_key: "test-key".to_owned(),
    }
}
