//! RGL API response records and request payloads.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// --- Identifiers ---

/// 64-bit Steam account identifier.
///
/// RGL sends these as JSON strings; plain numbers are accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SteamId(u64);

impl SteamId {
    /// Wraps a raw 64-bit identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw 64-bit identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns `true` for a non-zero identifier.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for SteamId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SteamId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl Serialize for SteamId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SteamId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        /// Accepts `"7656..."` or `7656...`.
        struct SteamIdVisitor;

        impl Visitor<'_> for SteamIdVisitor {
            type Value = SteamId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 64-bit steam id as a string or integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<SteamId, E> {
                Ok(SteamId(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<SteamId, E> {
                u64::try_from(v)
                    .map(SteamId)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SteamId, E> {
                v.parse()
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(SteamIdVisitor)
    }
}

// --- Bans ---

/// A league ban from `bans/paged`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ban {
    /// Banned player.
    pub steam_id: SteamId,
    /// Player alias at ban time.
    pub alias: String,
    /// Ban expiry (`None` for permanent bans).
    pub expires_at: Option<DateTime<Utc>>,
    /// Ban creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Reason given by league admins.
    pub reason: String,
}

// --- Profiles ---

/// Account flags on a player profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatus {
    /// Verified account.
    pub is_verified: bool,
    /// Currently banned.
    pub is_banned: bool,
    /// On probation.
    pub is_on_probation: bool,
}

/// Current team in each format, absent when the player has none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTeams {
    /// 6v6 team.
    pub sixes: Option<PlayerTeam>,
    /// Highlander (9v9) team.
    pub highlander: Option<PlayerTeam>,
    /// Prolander (7v7) team.
    pub prolander: Option<PlayerTeam>,
}

/// Team summary embedded in a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTeam {
    /// Team ID.
    pub id: i64,
    /// Team tag.
    pub tag: String,
    /// Team name.
    pub name: String,
    /// Roster status.
    pub status: String,
    /// Season ID.
    pub season_id: i64,
    /// Division ID.
    pub division_id: i64,
    /// Division name.
    pub division_name: String,
}

/// Active ban details on a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBanInformation {
    /// Ban end (`None` for permanent bans).
    pub ends_at: Option<DateTime<Utc>>,
    /// Ban reason.
    pub reason: String,
}

/// A player profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Steam ID.
    pub steam_id: SteamId,
    /// Avatar URL.
    pub avatar: String,
    /// Display name.
    pub name: String,
    /// Last profile update.
    pub updated_at: Option<DateTime<Utc>>,
    /// Account flags.
    pub status: PlayerStatus,
    /// Present only while banned.
    pub ban_information: Option<PlayerBanInformation>,
    /// Current teams per format.
    pub current_teams: PlayerTeams,
}

/// Win/loss record for one roster stint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    /// Wins.
    pub wins: i64,
    /// Wins without the player.
    pub wins_without: i64,
    /// Losses.
    pub loses: i64,
    /// Losses without the player.
    pub loses_without: i64,
    /// Games played.
    pub games_played: i64,
    /// Games without the player.
    pub games_without: i64,
}

/// One entry of a player's team history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileTeam {
    /// Format ID.
    pub format_id: i64,
    /// Format name.
    pub format_name: String,
    /// Region ID.
    pub region_id: i64,
    /// Region name.
    pub region_name: String,
    /// Season ID.
    pub season_id: i64,
    /// Season name.
    pub season_name: String,
    /// Joined at.
    pub started_at: Option<DateTime<Utc>>,
    /// Division ID.
    pub division_id: i64,
    /// Division name.
    pub division_name: String,
    /// Left at (`None` while still on the roster).
    pub left_at: Option<DateTime<Utc>>,
    /// Team name.
    pub team_name: String,
    /// Team tag.
    pub team_tag: String,
    /// Team ID.
    pub team_id: i64,
    /// Record during the stint.
    pub stats: TeamStats,
}

/// Result of `search/players`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPlayerResults {
    /// Matching Steam IDs.
    pub results: Vec<SteamId>,
    /// Number of results in this page.
    pub count: i64,
    /// Total hits across all pages.
    pub total_hit_count: i64,
}

// --- Matches ---

/// A team's side of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTeam {
    /// Team name.
    pub team_name: String,
    /// Team tag.
    pub team_tag: String,
    /// Team ID.
    pub team_id: i64,
    /// Home side.
    pub is_home: bool,
    /// League points, sent as a decimal string.
    #[serde(
        serialize_with = "serialize_points",
        deserialize_with = "deserialize_points"
    )]
    pub points: f32,
}

/// Score on one map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMap {
    /// Map name.
    pub map_name: String,
    /// Home score.
    pub home_score: i64,
    /// Away score.
    pub away_score: i64,
}

/// Match details from `matches/{id}` and `matches/paged`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOverview {
    /// Match ID.
    pub match_id: i64,
    /// Season name.
    pub season_name: String,
    /// Division name.
    pub division_name: String,
    /// Division ID.
    pub division_id: i64,
    /// Season ID.
    pub season_id: i64,
    /// Scheduled time.
    pub match_date: Option<DateTime<Utc>>,
    /// Match name (e.g. `"Week 6 - cp_steel"`).
    pub match_name: String,
    /// Decided by forfeit.
    pub is_forfeit: bool,
    /// Region ID.
    pub region_id: i64,
    /// Winning team ID.
    pub winner: i64,
    /// Both sides.
    pub teams: Vec<MatchTeam>,
    /// Per-map scores.
    pub maps: Vec<MatchMap>,
}

// --- Teams ---

/// A roster entry of a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPlayer {
    /// Player name.
    pub name: String,
    /// Steam ID.
    pub steam_id: SteamId,
    /// Team leader flag.
    pub is_leader: bool,
    /// Joined at.
    pub joined_at: Option<DateTime<Utc>>,
    /// Left at (`None` while on the roster).
    pub left_at: Option<DateTime<Utc>>,
    /// Entry creation time.
    #[serde(rename = "created_on")]
    pub created_on: Option<DateTime<Utc>>,
    /// Entry update time.
    pub updated_on: Option<DateTime<Utc>>,
}

/// Team details from `teams/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamOverview {
    /// Team ID.
    pub team_id: i64,
    /// Same team in other seasons.
    pub linked_teams: Vec<i64>,
    /// Season ID.
    pub season_id: i64,
    /// Division ID.
    pub division_id: i64,
    /// Division name.
    pub division_name: String,
    /// Steam ID of the leader, as sent.
    pub team_leader: String,
    /// Created at.
    pub created_at: Option<DateTime<Utc>>,
    /// Updated at.
    pub updated_at: Option<DateTime<Utc>>,
    /// Team tag.
    pub tag: String,
    /// Team name.
    pub name: String,
    /// Final placement.
    pub final_rank: Option<i64>,
    /// Roster.
    pub players: Vec<TeamPlayer>,
}

/// Result of `search/teams`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTeamResults {
    /// Matching team names.
    pub results: Vec<String>,
    /// Number of results in this page.
    pub count: i64,
    /// Total hits across all pages.
    pub total_hit_count: i64,
}

// --- Seasons ---

/// Season summary from `seasons/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonOverview {
    /// Season name.
    pub name: String,
    /// Division name to display order.
    pub division_sorting: HashMap<String, i64>,
    /// Format name.
    pub format_name: String,
    /// Region name.
    pub region_name: String,
    /// Map pool.
    pub maps: Vec<String>,
    /// Team IDs.
    pub participating_teams: Vec<i64>,
    /// Match IDs.
    pub matches_played_during_season: Vec<i64>,
}

// --- Request payloads ---

/// Body of `search/players` and `search/teams`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchNameRequest<'a> {
    /// Substring to search for.
    pub name_contains: &'a str,
}

/// Empty JSON object body (`{}`).
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct EmptyRequest {}

/// Encodes points as a decimal string, the form upstream sends.
#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_points<S: Serializer>(points: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(points)
}

/// Decodes a number that may arrive as a JSON string.
fn deserialize_points<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    /// Accepts `"1.5"` or `1.5`.
    struct PointsVisitor;

    impl Visitor<'_> for PointsVisitor {
        type Value = f32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f32, E> {
            Ok(v as f32)
        }

        #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f32, E> {
            Ok(v as f32)
        }

        #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f32, E> {
            Ok(v as f32)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f32, E> {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(PointsVisitor)
}
