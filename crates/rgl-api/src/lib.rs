//! Client library for the RGL public REST API.
//!
//! Every request passes through a token-bucket rate-limited transport,
//! then its JSON response is decoded into typed records. Failures are
//! reported as [`RglError`] variants naming the stage that failed.

/// `RglApi` trait.
mod api;
/// Cancellation and deadlines.
mod call_context;
/// Typed call dispatcher.
mod client;
/// Error taxonomy.
mod error;
/// Token bucket.
mod rate_limiter;
/// HTTP executor seam and rate-limited transport.
mod transport;
/// Response records.
mod types;

#[cfg(test)]
mod testing;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalRglApi, RglApi};
pub use call_context::CallContext;
#[allow(clippy::module_name_repetitions)]
pub use client::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, MAX_QUERY_COUNT, RglClient, RglClientBuilder,
};
pub use error::{BoxError, Result, RglError, TransportError, WaitError};
pub use rate_limiter::{RateLimitConfig, TokenBucket};
pub use transport::{
    ApiRequest, ApiResponse, DEFAULT_REQUEST_TIMEOUT, HttpExecutor, LocalHttpExecutor,
    RateLimitedTransport, ReqwestExecutor,
};
pub use types::{
    Ban, MatchMap, MatchOverview, MatchTeam, Player, PlayerBanInformation, PlayerStatus,
    PlayerTeam, PlayerTeams, ProfileTeam, SearchPlayerResults, SearchTeamResults,
    SeasonOverview, SteamId, TeamOverview, TeamPlayer, TeamStats,
};
