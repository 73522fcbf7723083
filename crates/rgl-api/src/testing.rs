//! In-process [`HttpExecutor`] fake for unit tests.
#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reqwest::StatusCode;

use crate::error::BoxError;
use crate::transport::{ApiRequest, ApiResponse, HttpExecutor};

/// Returns one canned response (or error) for every request and records
/// what it was sent.
#[derive(Debug)]
pub struct FakeExecutor {
    status: StatusCode,
    body: String,
    error: Option<String>,
    delay: Duration,
    calls: AtomicUsize,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeExecutor {
    /// Responds with `status` and `body`.
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.into(),
            error: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request with `message`.
    pub fn failing(message: &str) -> Self {
        let mut executor = Self::json(200, "");
        executor.error = Some(String::from(message));
        executor
    }

    /// Sleeps for `delay` before answering.
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of requests received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most recent request received.
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl HttpExecutor for FakeExecutor {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(ref message) = self.error {
            return Err(message.clone().into());
        }

        Ok(ApiResponse {
            status: self.status,
            body: self.body.clone().into_bytes(),
        })
    }
}
