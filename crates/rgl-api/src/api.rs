//! `RglApi` trait definition.
#![allow(clippy::future_not_send)]

use crate::call_context::CallContext;
use crate::error::Result;
use crate::types::{
    Ban, MatchOverview, Player, ProfileTeam, SearchPlayerResults, SearchTeamResults,
    SeasonOverview, SteamId, TeamOverview,
};

/// RGL API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
///
/// Paged operations accept `take` in `0..=100`; larger values, empty
/// search names and zero identifiers fail with
/// [`RglError::OutOfRange`](crate::RglError::OutOfRange) before any
/// request is made.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(RglApi: Send)]
pub trait LocalRglApi {
    /// Lists league bans, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are out of range or the call fails.
    async fn bans(&self, ctx: &CallContext, take: u32, skip: u32) -> Result<Vec<Ban>>;

    /// Fetches one player profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is zero or the call fails.
    async fn profile(&self, ctx: &CallContext, steam_id: SteamId) -> Result<Player>;

    /// Fetches up to 100 player profiles in one request.
    ///
    /// # Errors
    ///
    /// Returns an error if `steam_ids` is empty or longer than 100, or the call fails.
    async fn profiles(&self, ctx: &CallContext, steam_ids: &[SteamId]) -> Result<Vec<Player>>;

    /// Fetches a player's team history.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is zero or the call fails.
    async fn profile_teams(&self, ctx: &CallContext, steam_id: SteamId)
    -> Result<Vec<ProfileTeam>>;

    /// Searches players by name substring.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, the paging is out of range,
    /// or the call fails.
    async fn search_players(
        &self,
        ctx: &CallContext,
        name: &str,
        take: u32,
        skip: u32,
    ) -> Result<SearchPlayerResults>;

    /// Fetches one match.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is zero or the call fails.
    async fn match_overview(&self, ctx: &CallContext, match_id: u64) -> Result<MatchOverview>;

    /// Lists matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the paging is out of range or the call fails.
    async fn matches(&self, ctx: &CallContext, take: u32, skip: u32)
    -> Result<Vec<MatchOverview>>;

    /// Fetches one team with its roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is zero or the call fails.
    async fn team(&self, ctx: &CallContext, team_id: u64) -> Result<TeamOverview>;

    /// Searches teams by name substring.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, the paging is out of range,
    /// or the call fails.
    async fn search_teams(
        &self,
        ctx: &CallContext,
        name: &str,
        take: u32,
        skip: u32,
    ) -> Result<SearchTeamResults>;

    /// Fetches a season summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is zero or the call fails.
    async fn season(&self, ctx: &CallContext, season_id: u64) -> Result<SeasonOverview>;
}
