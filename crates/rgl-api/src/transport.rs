//! Rate-limited transport: token-bucket admission in front of an
//! injectable HTTP executor.
#![allow(clippy::future_not_send)]

use std::time::Duration;

use anyhow::{Context, Result as AnyResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use url::Url;

use crate::call_context::CallContext;
use crate::error::{BoxError, Result, RglError, TransportError};
use crate::rate_limiter::{RateLimitConfig, TokenBucket};

/// Default overall timeout for a single HTTP exchange.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// A fully-formed outbound request.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including query parameters.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Serialized JSON body, if any.
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Sets a header, replacing any previous value.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// Status and fully-read body of a response.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

/// Executes HTTP requests.
///
/// The seam between the transport and the network; tests substitute a
/// fake. Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[trait_variant::make(HttpExecutor: Send)]
pub trait LocalHttpExecutor {
    /// Sends `request` and reads the whole response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be delivered or the body
    /// cannot be read.
    async fn execute(&self, request: ApiRequest) -> std::result::Result<ApiResponse, BoxError>;
}

/// [`HttpExecutor`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    /// HTTP client (gzip enabled).
    http_client: Client,
}

impl ReqwestExecutor {
    /// Creates an executor with a fresh `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the `reqwest::Client` build fails.
    pub fn new() -> AnyResult<Self> {
        let http_client = Client::builder()
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self::from_client(http_client))
    }

    /// Wraps an existing `reqwest::Client`.
    #[must_use]
    pub const fn from_client(http_client: Client) -> Self {
        Self { http_client }
    }
}

impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, request: ApiRequest) -> std::result::Result<ApiResponse, BoxError> {
        let mut builder = self
            .http_client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(ApiResponse { status, body })
    }
}

/// Holds a token bucket and an executor; every request first waits for
/// bucket admission, then runs under the request timeout.
#[derive(Debug)]
pub struct RateLimitedTransport<E> {
    /// Network seam.
    executor: E,
    /// Admission control.
    bucket: TokenBucket,
    /// Upper bound for one HTTP exchange, not counting the admission wait.
    request_timeout: Duration,
}

impl<E: HttpExecutor> RateLimitedTransport<E> {
    /// Creates a transport with a full bucket.
    #[must_use]
    pub fn new(executor: E, rate_limit: RateLimitConfig, request_timeout: Duration) -> Self {
        Self {
            executor,
            bucket: TokenBucket::new(rate_limit),
            request_timeout,
        }
    }

    /// Returns the token bucket.
    #[must_use]
    pub const fn bucket(&self) -> &TokenBucket {
        &self.bucket
    }

    /// Returns the executor.
    #[cfg(test)]
    pub(crate) const fn executor_for_tests(&self) -> &E {
        &self.executor
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Waits for admission, then performs `request`.
    ///
    /// The token is spent on admission, whether or not the exchange
    /// succeeds. After admission the exchange stays bound to `ctx` and is
    /// also cut off by the request timeout, whichever ends first.
    ///
    /// # Errors
    ///
    /// - [`RglError::WaitFailed`] if `ctx` ends before admission; nothing is sent.
    /// - [`RglError::RequestFailed`] if the executor fails, times out, or
    ///   `ctx` ends while the exchange is in flight.
    pub async fn execute(&self, ctx: &CallContext, request: ApiRequest) -> Result<ApiResponse> {
        self.bucket.wait(ctx).await.map_err(RglError::WaitFailed)?;

        tracing::debug!(method = %request.method, url = %request.url, "RGL API request");

        let exchange = tokio::time::timeout(self.request_timeout, self.executor.execute(request));
        let outcome = tokio::select! {
            biased;
            reason = ctx.done() => {
                tracing::debug!(%reason, "RGL API request abandoned");
                return Err(RglError::RequestFailed(TransportError::Aborted(reason)));
            }
            outcome = exchange => outcome,
        };

        match outcome {
            Ok(Ok(response)) => {
                tracing::debug!(
                    status = %response.status,
                    body_len = response.body.len(),
                    "RGL API response"
                );
                Ok(response)
            }
            Ok(Err(e)) => Err(RglError::RequestFailed(TransportError::Executor(e))),
            Err(_) => Err(RglError::RequestFailed(TransportError::Timeout(
                self.request_timeout,
            ))),
        }
    }
}
