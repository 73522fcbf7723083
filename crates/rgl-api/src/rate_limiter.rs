//! Token-bucket rate limiter guarding every outbound RGL request.

use std::num::NonZeroU32;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::call_context::CallContext;
use crate::error::WaitError;

/// Default burst size.
const DEFAULT_CAPACITY: NonZeroU32 = NonZeroU32::MIN;

/// Default time for one token to accrue.
const DEFAULT_REFILL_INTERVAL: Duration = Duration::from_secs(15);

/// Token bucket parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct RateLimitConfig {
    /// Maximum number of requests admitted without waiting.
    pub capacity: NonZeroU32,
    /// Time for a single token to accrue.
    pub refill_interval: Duration,
}

impl RateLimitConfig {
    /// Creates a config admitting `capacity` requests per burst and one
    /// more every `refill_interval`.
    #[must_use]
    pub const fn new(capacity: NonZeroU32, refill_interval: Duration) -> Self {
        Self {
            capacity,
            refill_interval,
        }
    }
}

impl Default for RateLimitConfig {
    /// One request per 15 seconds.
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_REFILL_INTERVAL)
    }
}

/// Mutable bucket state, only touched while holding the admission lock.
#[derive(Debug)]
struct BucketState {
    /// Whole tokens currently available.
    tokens: u32,
    /// Instant from which the next token is accruing.
    last_refill: Instant,
}

impl BucketState {
    /// Adds the whole tokens accrued since `last_refill`, keeping any
    /// partial progress toward the next one.
    fn refill(&mut self, now: Instant, capacity: u32, interval: Duration) {
        if self.tokens >= capacity {
            self.last_refill = now;
            return;
        }

        let elapsed = now.saturating_duration_since(self.last_refill);
        let accrued = elapsed
            .as_nanos()
            .checked_div(interval.as_nanos())
            .unwrap_or(u128::MAX);
        if accrued == 0 {
            return;
        }

        let accrued = u32::try_from(accrued).unwrap_or(u32::MAX);
        self.tokens = self.tokens.saturating_add(accrued).min(capacity);
        self.last_refill = if self.tokens >= capacity {
            now
        } else {
            interval
                .checked_mul(accrued)
                .and_then(|advance| self.last_refill.checked_add(advance))
                .unwrap_or(now)
        };
    }
}

/// Token bucket admitting up to `capacity` requests at once and one
/// more per `refill_interval` thereafter.
///
/// Waiters are queued on a fair mutex, so they are admitted in the
/// order they started waiting. A waiter whose context ends before
/// admission consumes nothing.
#[derive(Debug)]
pub struct TokenBucket {
    /// Maximum tokens.
    capacity: u32,
    /// Time for one token to accrue.
    refill_interval: Duration,
    /// Bucket state; the lock is the admission queue.
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Creates a full bucket.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        let capacity = config.capacity.get();
        Self {
            capacity,
            refill_interval: config.refill_interval,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Returns the configured burst size.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the configured refill interval.
    #[must_use]
    pub const fn refill_interval(&self) -> Duration {
        self.refill_interval
    }

    /// Returns the number of tokens available right now.
    ///
    /// Waits behind any caller currently queued for admission.
    pub async fn available(&self) -> u32 {
        let mut state = self.state.lock().await;
        state.refill(Instant::now(), self.capacity, self.refill_interval);
        state.tokens
    }

    /// Waits until the bucket admits one request, then consumes a token.
    ///
    /// # Errors
    ///
    /// Returns the context's [`WaitError`] if it is cancelled or its
    /// deadline elapses first, and [`WaitError::DeadlineExceeded`]
    /// immediately if the next token would arrive after the deadline.
    pub async fn wait(&self, ctx: &CallContext) -> Result<(), WaitError> {
        if let Some(reason) = ctx.err() {
            return Err(reason);
        }

        tokio::select! {
            biased;
            reason = ctx.done() => Err(reason),
            admitted = self.acquire(ctx.deadline()) => admitted,
        }
    }

    /// Takes the next token, sleeping while holding the admission lock.
    async fn acquire(&self, deadline: Option<Instant>) -> Result<(), WaitError> {
        let mut state = self.state.lock().await;

        loop {
            let now = Instant::now();
            state.refill(now, self.capacity, self.refill_interval);

            if let Some(remaining) = state.tokens.checked_sub(1) {
                state.tokens = remaining;
                return Ok(());
            }

            let ready_at = state
                .last_refill
                .checked_add(self.refill_interval)
                .unwrap_or(now);
            if deadline.is_some_and(|deadline| deadline < ready_at) {
                return Err(WaitError::DeadlineExceeded);
            }

            tracing::debug!(
                wait_ms = ready_at.saturating_duration_since(now).as_millis(),
                "Rate limit bucket empty. Waiting..."
            );
            tokio::time::sleep_until(ready_at).await;
        }
    }
}
