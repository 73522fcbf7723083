//! Cancellation and deadline carrier passed into every API call.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::WaitError;

/// Cancellable, optionally deadline-bearing context for a call.
///
/// The context bounds both the rate-limit admission wait and the HTTP
/// exchange that follows it. The exchange is additionally bounded by the
/// client's request timeout.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Cancellation signal shared with clones and parents.
    cancel: CancellationToken,
    /// Instant after which the context is expired.
    deadline: Option<Instant>,
}

impl CallContext {
    /// Creates a context that never expires and is only cancelled explicitly.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Creates a context that expires at `deadline`.
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Creates a context driven by an external cancellation token.
    #[must_use]
    pub const fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancel: token,
            deadline: None,
        }
    }

    /// Derives a context cancelled together with `self`, keeping its deadline.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancels this context and every child derived from it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Reports why the context has ended, or `None` while it is live.
    #[must_use]
    pub fn err(&self) -> Option<WaitError> {
        if self.cancel.is_cancelled() {
            return Some(WaitError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Some(WaitError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled or its deadline elapses.
    pub async fn done(&self) -> WaitError {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    () = self.cancel.cancelled() => WaitError::Cancelled,
                    () = tokio::time::sleep_until(deadline) => WaitError::DeadlineExceeded,
                }
            }
            None => {
                self.cancel.cancelled().await;
                WaitError::Cancelled
            }
        }
    }
}
