//! `RglClient` - typed call dispatcher and RGL API implementation.

use std::time::Duration;

use anyhow::{Context, Result as AnyResult};
use reqwest::header::{CONTENT_TYPE, HeaderValue, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::RglApi;
use super::call_context::CallContext;
use super::error::{Result, RglError};
use super::rate_limiter::RateLimitConfig;
use super::transport::{
    ApiRequest, ApiResponse, DEFAULT_REQUEST_TIMEOUT, HttpExecutor, RateLimitedTransport,
    ReqwestExecutor,
};
use super::types::{
    Ban, EmptyRequest, MatchOverview, Player, ProfileTeam, SearchNameRequest,
    SearchPlayerResults, SearchTeamResults, SeasonOverview, SteamId, TeamOverview,
};

/// Default base URL for the RGL public API.
pub const DEFAULT_BASE_URL: &str = "https://api.rgl.gg/v0/";

/// Default User-Agent.
pub const DEFAULT_USER_AGENT: &str = "rgl-api/1.0";

/// Largest page (`take`) and batch size the API accepts.
pub const MAX_QUERY_COUNT: u32 = 100;

/// Statuses treated as success (`200 OK` through `226 IM Used`).
const SUCCESS_STATUS: std::ops::RangeInclusive<u16> = 200..=226;

/// RGL API client.
///
/// Construct one per application (or per test) and share it by
/// reference; all calls go through its single token bucket.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct RglClient<E = ReqwestExecutor> {
    /// Rate-limited transport.
    transport: RateLimitedTransport<E>,
    /// Base URL for API requests (always ends with `/`).
    base_url: Url,
    /// User-Agent sent with every request.
    user_agent: HeaderValue,
}

/// Builder for `RglClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct RglClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    rate_limit: Option<RateLimitConfig>,
    request_timeout: Option<Duration>,
}

impl RglClientBuilder {
    /// Creates a new builder.
    fn new() -> Self {
        Self::default()
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (default: `rgl-api/1.0`).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the token bucket (default: 1 request per 15s).
    #[must_use]
    pub const fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    /// Sets the per-request timeout (default: 15s).
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds a client backed by `reqwest`.
    ///
    /// # Errors
    ///
    /// - The base URL or User-Agent is invalid.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> AnyResult<RglClient> {
        let executor = ReqwestExecutor::new()?;
        self.build_with(executor)
    }

    /// Builds a client that sends requests through `executor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or User-Agent is invalid.
    pub fn build_with<E: HttpExecutor>(self, executor: E) -> AnyResult<RglClient<E>> {
        let mut base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };
        if base_url.cannot_be_a_base() {
            anyhow::bail!("base URL cannot be a base: {base_url}");
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT));
        let user_agent = HeaderValue::from_str(&user_agent)
            .with_context(|| format!("invalid user agent: {user_agent}"))?;

        let transport = RateLimitedTransport::new(
            executor,
            self.rate_limit.unwrap_or_default(),
            self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        );

        Ok(RglClient {
            transport,
            base_url,
            user_agent,
        })
    }
}

impl RglClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> RglClientBuilder {
        RglClientBuilder::new()
    }
}

impl<E: HttpExecutor> RglClient<E> {
    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the rate-limited transport.
    #[must_use]
    pub const fn transport(&self) -> &RateLimitedTransport<E> {
        &self.transport
    }

    /// Resolves `path` (e.g. `"teams/7835"`) against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`RglError::InvalidUrl`] if the join fails.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|source| RglError::InvalidUrl {
                path: String::from(path),
                source,
            })
    }

    /// Resolves `path` and appends the `take` and `skip` query parameters.
    ///
    /// Does not validate the values; accessors check them first.
    ///
    /// # Errors
    ///
    /// Returns [`RglError::InvalidUrl`] if the join fails.
    pub fn paged_endpoint(&self, path: &str, take: u32, skip: u32) -> Result<Url> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut()
            .append_pair("take", &take.to_string())
            .append_pair("skip", &skip.to_string());
        Ok(url)
    }

    /// Sends one request and decodes the JSON response into `T`.
    ///
    /// `body`, when present, is serialized as the JSON request body.
    /// No retry is attempted on any failure.
    ///
    /// # Errors
    ///
    /// - [`RglError::EncodeFailed`] if `body` cannot be serialized (nothing is sent).
    /// - [`RglError::WaitFailed`] / [`RglError::RequestFailed`] from the transport.
    /// - [`RglError::RateLimited`] on HTTP 429.
    /// - [`RglError::BadStatus`] on any other status outside `200..=226`.
    /// - [`RglError::DecodeFailed`] if the body is not the expected JSON.
    pub async fn call<B, T>(
        &self,
        ctx: &CallContext,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = ApiRequest::new(method, url)
            .header(USER_AGENT, self.user_agent.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(RglError::EncodeFailed)?;
            request = request.body(payload);
        }

        let response = self.transport.execute(ctx, request).await?;
        decode_response(response)
    }

    /// Sends a GET without body.
    async fn get_json<T: DeserializeOwned>(&self, ctx: &CallContext, url: Url) -> Result<T> {
        self.call::<(), T>(ctx, Method::GET, url, None).await
    }

    /// Sends a POST with a JSON body.
    async fn post_json<B, T>(&self, ctx: &CallContext, url: Url, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.call(ctx, Method::POST, url, Some(body)).await
    }
}

/// Classifies the status, then decodes the body.
fn decode_response<T: DeserializeOwned>(response: ApiResponse) -> Result<T> {
    let status = response.status;

    if status == StatusCode::TOO_MANY_REQUESTS {
        tracing::warn!("RGL API rate limited (429)");
        return Err(RglError::RateLimited);
    }

    if !SUCCESS_STATUS.contains(&status.as_u16()) {
        tracing::debug!(%status, body_len = response.body.len(), "RGL API error status");
        return Err(RglError::BadStatus(status));
    }

    serde_json::from_slice(&response.body).map_err(RglError::DecodeFailed)
}

/// Checks paging arguments.
fn validate_query(take: u32, skip: u32) -> Result<()> {
    if take > MAX_QUERY_COUNT {
        return Err(RglError::out_of_range(format!(
            "take must be at most {MAX_QUERY_COUNT}, got {take} (skip {skip})"
        )));
    }
    Ok(())
}

/// Checks a search name.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RglError::out_of_range("search name must not be empty"));
    }
    Ok(())
}

/// Checks a player identifier.
fn validate_steam_id(steam_id: SteamId) -> Result<()> {
    if !steam_id.is_valid() {
        return Err(RglError::out_of_range("steam id must be positive"));
    }
    Ok(())
}

/// Checks a numeric resource identifier.
fn validate_id(kind: &str, id: u64) -> Result<()> {
    if id == 0 {
        return Err(RglError::out_of_range(format!("{kind} must be positive")));
    }
    Ok(())
}

impl<E: HttpExecutor + Sync> RglApi for RglClient<E> {
    #[instrument(skip_all, fields(take = take, skip = skip))]
    async fn bans(&self, ctx: &CallContext, take: u32, skip: u32) -> Result<Vec<Ban>> {
        validate_query(take, skip)?;
        let url = self.paged_endpoint("bans/paged", take, skip)?;
        self.get_json(ctx, url).await
    }

    #[instrument(skip_all, fields(steam_id = %steam_id))]
    async fn profile(&self, ctx: &CallContext, steam_id: SteamId) -> Result<Player> {
        validate_steam_id(steam_id)?;
        let url = self.endpoint(&format!("profile/{steam_id}"))?;
        self.get_json(ctx, url).await
    }

    #[instrument(skip_all, fields(count = steam_ids.len()))]
    async fn profiles(&self, ctx: &CallContext, steam_ids: &[SteamId]) -> Result<Vec<Player>> {
        let count = u32::try_from(steam_ids.len()).unwrap_or(u32::MAX);
        if count == 0 || count > MAX_QUERY_COUNT {
            return Err(RglError::out_of_range(format!(
                "profile batch must hold 1..={MAX_QUERY_COUNT} ids, got {count}"
            )));
        }
        let url = self.endpoint("profile/getmany")?;
        self.post_json(ctx, url, steam_ids).await
    }

    #[instrument(skip_all, fields(steam_id = %steam_id))]
    async fn profile_teams(
        &self,
        ctx: &CallContext,
        steam_id: SteamId,
    ) -> Result<Vec<ProfileTeam>> {
        validate_steam_id(steam_id)?;
        let url = self.endpoint(&format!("profile/{steam_id}/teams"))?;
        self.get_json(ctx, url).await
    }

    #[instrument(skip_all, fields(take = take, skip = skip))]
    async fn search_players(
        &self,
        ctx: &CallContext,
        name: &str,
        take: u32,
        skip: u32,
    ) -> Result<SearchPlayerResults> {
        validate_name(name)?;
        validate_query(take, skip)?;
        let url = self.paged_endpoint("search/players", take, skip)?;
        let body = SearchNameRequest {
            name_contains: name,
        };
        self.post_json(ctx, url, &body).await
    }

    #[instrument(skip_all, fields(match_id = match_id))]
    async fn match_overview(&self, ctx: &CallContext, match_id: u64) -> Result<MatchOverview> {
        validate_id("match id", match_id)?;
        let url = self.endpoint(&format!("matches/{match_id}"))?;
        self.get_json(ctx, url).await
    }

    #[instrument(skip_all, fields(take = take, skip = skip))]
    async fn matches(
        &self,
        ctx: &CallContext,
        take: u32,
        skip: u32,
    ) -> Result<Vec<MatchOverview>> {
        validate_query(take, skip)?;
        let url = self.paged_endpoint("matches/paged", take, skip)?;
        self.post_json(ctx, url, &EmptyRequest {}).await
    }

    #[instrument(skip_all, fields(team_id = team_id))]
    async fn team(&self, ctx: &CallContext, team_id: u64) -> Result<TeamOverview> {
        validate_id("team id", team_id)?;
        let url = self.endpoint(&format!("teams/{team_id}"))?;
        self.get_json(ctx, url).await
    }

    #[instrument(skip_all, fields(take = take, skip = skip))]
    async fn search_teams(
        &self,
        ctx: &CallContext,
        name: &str,
        take: u32,
        skip: u32,
    ) -> Result<SearchTeamResults> {
        validate_name(name)?;
        validate_query(take, skip)?;
        let url = self.paged_endpoint("search/teams", take, skip)?;
        let body = SearchNameRequest {
            name_contains: name,
        };
        self.post_json(ctx, url, &body).await
    }

    #[instrument(skip_all, fields(season_id = season_id))]
    async fn season(&self, ctx: &CallContext, season_id: u64) -> Result<SeasonOverview> {
        validate_id("season id", season_id)?;
        let url = self.endpoint(&format!("seasons/{season_id}"))?;
        self.get_json(ctx, url).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::collections::HashMap;
    use std::num::NonZeroU32;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::WaitError;
    use crate::testing::FakeExecutor;

    /// Bucket wide enough that tests never wait.
    fn unthrottled() -> RateLimitConfig {
        RateLimitConfig::new(NonZeroU32::new(50).unwrap(), Duration::from_millis(1))
    }

    fn mock_client(server: &MockServer) -> RglClient {
        RglClient::builder()
            .base_url(format!("{}/v0/", server.uri()).parse().unwrap())
            .rate_limit(unthrottled())
            .build()
            .unwrap()
    }

    fn fake_client(executor: FakeExecutor) -> RglClient<FakeExecutor> {
        RglClient::builder()
            .rate_limit(unthrottled())
            .build_with(executor)
            .unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        // Arrange & Act
        let client = RglClient::builder().build().unwrap();

        // Assert
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(client.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(client.transport().request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(client.transport().bucket().capacity(), 1);
        assert_eq!(
            client.transport().bucket().refill_interval(),
            Duration::from_secs(15)
        );
    }

    #[test]
    fn test_builder_appends_trailing_slash() {
        // Arrange
        let url = Url::parse("http://localhost:8080/v0").unwrap();

        // Act
        let client = RglClient::builder().base_url(url).build().unwrap();

        // Assert
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/v0/");
    }

    #[test]
    fn test_builder_rejects_invalid_user_agent() {
        // Arrange & Act
        let result = RglClient::builder().user_agent("bad\nagent").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("invalid user agent")
        );
    }

    #[test]
    fn test_paged_endpoint_appends_take_and_skip() {
        // Arrange
        let client = RglClient::builder().build().unwrap();

        // Act
        let url = client.paged_endpoint("bans/paged", 10, 20).unwrap();

        // Assert
        assert_eq!(
            url.as_str(),
            "https://api.rgl.gg/v0/bans/paged?take=10&skip=20"
        );
    }

    #[test]
    fn test_decode_response_success_range_is_inclusive() {
        // Arrange
        let response = ApiResponse {
            status: StatusCode::IM_USED,
            body: b"[1,2]".to_vec(),
        };

        // Act
        let decoded: Vec<u8> = decode_response(response).unwrap();

        // Assert
        assert_eq!(decoded, vec![1, 2]);
    }

    #[test]
    fn test_decode_response_227_is_bad_status() {
        // Arrange
        let response = ApiResponse {
            status: StatusCode::from_u16(227).unwrap(),
            body: b"[]".to_vec(),
        };

        // Act
        let result: Result<Vec<u8>> = decode_response(response);

        // Assert
        assert!(matches!(result, Err(RglError::BadStatus(s)) if s.as_u16() == 227));
    }

    #[tokio::test]
    async fn test_team_round_trip_through_fake_executor() {
        // Arrange
        let client = fake_client(FakeExecutor::json(
            200,
            include_str!("../../../fixtures/rgl/team_7835.json"),
        ));

        // Act
        let team = client.team(&CallContext::new(), 7835).await.unwrap();

        // Assert
        assert_eq!(team.team_id, 7835);
        let sent = client.transport().executor_for_tests().last_request().unwrap();
        assert_eq!(sent.method, Method::GET);
        assert_eq!(sent.url.as_str(), "https://api.rgl.gg/v0/teams/7835");
        assert_eq!(sent.headers[USER_AGENT], DEFAULT_USER_AGENT);
        assert_eq!(sent.headers[CONTENT_TYPE], "application/json");
        assert!(sent.body.is_none());
    }

    #[tokio::test]
    async fn test_bans_page_through_fake_executor() {
        // Arrange
        let client = fake_client(FakeExecutor::json(
            200,
            include_str!("../../../fixtures/rgl/bans_paged.json"),
        ));

        // Act
        let bans = client.bans(&CallContext::new(), 10, 0).await.unwrap();

        // Assert
        assert_eq!(bans.len(), 10);
        assert!(bans.iter().all(|ban| !ban.reason.is_empty()));
        let sent = client.transport().executor_for_tests().last_request().unwrap();
        assert_eq!(
            sent.url.as_str(),
            "https://api.rgl.gg/v0/bans/paged?take=10&skip=0"
        );
    }

    #[tokio::test]
    async fn test_profiles_posts_ids_as_strings() {
        // Arrange
        let client = fake_client(FakeExecutor::json(
            200,
            include_str!("../../../fixtures/rgl/profiles_getmany.json"),
        ));
        let ids = [
            SteamId::new(76_561_197_970_669_109),
            SteamId::new(76_561_198_084_134_025),
        ];

        // Act
        let players = client.profiles(&CallContext::new(), &ids).await.unwrap();

        // Assert
        assert_eq!(players.len(), 2);
        let sent = client.transport().executor_for_tests().last_request().unwrap();
        assert_eq!(sent.method, Method::POST);
        let body: serde_json::Value = serde_json::from_slice(&sent.body.unwrap()).unwrap();
        assert_eq!(body, json!(["76561197970669109", "76561198084134025"]));
    }

    #[tokio::test]
    async fn test_profiles_batch_size_is_checked() {
        // Arrange
        let client = fake_client(FakeExecutor::json(200, "[]"));
        let too_many: Vec<SteamId> = (1..=101).map(SteamId::new).collect();

        // Act
        let empty = client.profiles(&CallContext::new(), &[]).await;
        let oversized = client.profiles(&CallContext::new(), &too_many).await;

        // Assert
        assert!(empty.unwrap_err().is_out_of_range());
        assert!(oversized.unwrap_err().is_out_of_range());
        assert_eq!(client.transport().executor_for_tests().calls(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_arguments_send_nothing() {
        // Arrange
        let client = fake_client(FakeExecutor::json(200, "[]"));
        let ctx = CallContext::new();

        // Act
        let results = [
            client.bans(&ctx, 101, 0).await.map(|_| ()),
            client.matches(&ctx, 500, 0).await.map(|_| ()),
            client.search_players(&ctx, "", 10, 0).await.map(|_| ()),
            client.search_teams(&ctx, "froyo", 101, 0).await.map(|_| ()),
            client.match_overview(&ctx, 0).await.map(|_| ()),
            client.team(&ctx, 0).await.map(|_| ()),
            client.season(&ctx, 0).await.map(|_| ()),
            client.profile(&ctx, SteamId::new(0)).await.map(|_| ()),
        ];

        // Assert
        for result in results {
            assert!(result.unwrap_err().is_out_of_range());
        }
        assert_eq!(client.transport().executor_for_tests().calls(), 0);
        assert_eq!(client.transport().bucket().available().await, 50);
    }

    #[tokio::test]
    async fn test_boundary_paging_is_accepted() {
        // Arrange
        let client = fake_client(FakeExecutor::json(200, "[]"));

        // Act
        let max = client.bans(&CallContext::new(), 100, 0).await;
        let zero = client.bans(&CallContext::new(), 0, 1_000).await;

        // Assert
        assert!(max.unwrap().is_empty());
        assert!(zero.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_encode_failure_sends_nothing() {
        // Arrange
        let client = fake_client(FakeExecutor::json(200, "{}"));
        let url = client.endpoint("search/players").unwrap();
        let mut unserializable = HashMap::new();
        unserializable.insert((1_u8, 2_u8), "tuple keys are not JSON");

        // Act
        let result: Result<serde_json::Value> = client
            .call(&CallContext::new(), Method::POST, url, Some(&unserializable))
            .await;

        // Assert
        assert!(matches!(result, Err(RglError::EncodeFailed(_))));
        assert_eq!(client.transport().executor_for_tests().calls(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_context_is_wait_failed() {
        // Arrange
        let client = fake_client(FakeExecutor::json(200, "{}"));
        let ctx = CallContext::new();
        ctx.cancel();

        // Act
        let result = client.season(&ctx, 50).await;

        // Assert
        assert!(matches!(
            result,
            Err(RglError::WaitFailed(WaitError::Cancelled))
        ));
        assert_eq!(client.transport().executor_for_tests().calls(), 0);
    }

    #[tokio::test]
    async fn test_bans_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../fixtures/rgl/bans_paged.json");

        Mock::given(method("GET"))
            .and(path("/v0/bans/paged"))
            .and(query_param("take", "10"))
            .and(query_param("skip", "0"))
            .and(header("User-Agent", DEFAULT_USER_AGENT))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let bans = client.bans(&CallContext::new(), 10, 0).await.unwrap();

        // Assert
        assert_eq!(bans.len(), 10);
        assert!(bans.iter().all(|ban| !ban.reason.is_empty()));
    }

    #[tokio::test]
    async fn test_profile_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../fixtures/rgl/profile_76561197970669109.json");

        Mock::given(method("GET"))
            .and(path("/v0/profile/76561197970669109"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let player = client
            .profile(&CallContext::new(), SteamId::new(76_561_197_970_669_109))
            .await
            .unwrap();

        // Assert
        assert_eq!(player.steam_id, SteamId::new(76_561_197_970_669_109));
        assert_eq!(player.name, "camp3r");
    }

    #[tokio::test]
    async fn test_profile_teams_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../fixtures/rgl/profile_teams.json");

        Mock::given(method("GET"))
            .and(path("/v0/profile/76561197970669109/teams"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let teams = client
            .profile_teams(&CallContext::new(), SteamId::new(76_561_197_970_669_109))
            .await
            .unwrap();

        // Assert
        assert_eq!(teams.len(), 3);
        assert!(teams[2].left_at.is_none());
        assert_eq!(teams[0].stats.games_played, 12);
    }

    #[tokio::test]
    async fn test_search_players_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../fixtures/rgl/search_players.json");

        Mock::given(method("POST"))
            .and(path("/v0/search/players"))
            .and(query_param("take", "100"))
            .and(query_param("skip", "0"))
            .and(body_json(json!({ "nameContains": "camp3r" })))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let results = client
            .search_players(&CallContext::new(), "camp3r", 100, 0)
            .await
            .unwrap();

        // Assert
        assert_eq!(results.count, 2);
        assert_eq!(results.results[0], SteamId::new(76_561_197_970_669_109));
    }

    #[tokio::test]
    async fn test_match_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../fixtures/rgl/match_1100.json");

        Mock::given(method("GET"))
            .and(path("/v0/matches/1100"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let overview = client
            .match_overview(&CallContext::new(), 1100)
            .await
            .unwrap();

        // Assert
        assert_eq!(overview.match_name, "Week 6 - cp_steel");
    }

    #[tokio::test]
    async fn test_matches_posts_empty_object() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../fixtures/rgl/matches_paged.json");

        Mock::given(method("POST"))
            .and(path("/v0/matches/paged"))
            .and(query_param("take", "3"))
            .and(query_param("skip", "5"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let matches = client.matches(&CallContext::new(), 3, 5).await.unwrap();

        // Assert
        assert_eq!(matches.len(), 3);
    }

    #[tokio::test]
    async fn test_search_teams_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../fixtures/rgl/search_teams.json");

        Mock::given(method("POST"))
            .and(path("/v0/search/teams"))
            .and(body_json(json!({ "nameContains": "froyo" })))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let results = client
            .search_teams(&CallContext::new(), "froyo", 10, 0)
            .await
            .unwrap();

        // Assert
        assert_eq!(results.results.len(), 3);
        assert_eq!(results.results[0], "froyotech");
    }

    #[tokio::test]
    async fn test_season_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../fixtures/rgl/season_50.json");

        Mock::given(method("GET"))
            .and(path("/v0/seasons/50"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let season = client.season(&CallContext::new(), 50).await.unwrap();

        // Assert
        assert_eq!(season.region_name, "NA Modern Maps Popup League");
    }

    #[tokio::test]
    async fn test_http_429_is_rate_limited_without_retry() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("[]"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let result = client.bans(&CallContext::new(), 10, 0).await;

        // Assert
        let err = result.unwrap_err();
        assert!(err.is_rate_limited());
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn test_http_error_is_bad_status() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let result = client.team(&CallContext::new(), 999_999).await;

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(err.to_string().contains("404 Not Found"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_failed() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let result = client.season(&CallContext::new(), 50).await;

        // Assert
        assert!(matches!(result, Err(RglError::DecodeFailed(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_failed() {
        // Arrange
        let mock_server = MockServer::start().await;
        let client = mock_client(&mock_server);
        drop(mock_server);

        // Act
        let result = client.season(&CallContext::new(), 50).await;

        // Assert
        assert!(matches!(result, Err(RglError::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_custom_user_agent_is_sent() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../fixtures/rgl/season_50.json");

        Mock::given(method("GET"))
            .and(header("User-Agent", "bd-api/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = RglClient::builder()
            .base_url(format!("{}/v0/", mock_server.uri()).parse().unwrap())
            .user_agent("bd-api/1.0")
            .rate_limit(unthrottled())
            .build()
            .unwrap();

        // Act & Assert (mock expect(1) verifies User-Agent header)
        client.season(&CallContext::new(), 50).await.unwrap();
    }

    #[tokio::test]
    async fn test_rate_limiter_enforces_interval() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../fixtures/rgl/season_50.json");

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(3)
            .mount(&mock_server)
            .await;

        let client = RglClient::builder()
            .base_url(format!("{}/v0/", mock_server.uri()).parse().unwrap())
            .rate_limit(RateLimitConfig::new(
                NonZeroU32::new(2).unwrap(),
                Duration::from_millis(100),
            ))
            .build()
            .unwrap();
        let ctx = CallContext::new();

        // Act
        let start = std::time::Instant::now();
        client.season(&ctx, 50).await.unwrap();
        client.season(&ctx, 50).await.unwrap();
        let burst = start.elapsed();
        client.season(&ctx, 50).await.unwrap();
        let elapsed = start.elapsed();

        // Assert: two within the burst, the third waits for a refill
        assert!(burst < Duration::from_millis(100));
        assert!(elapsed >= Duration::from_millis(100));
    }
}
