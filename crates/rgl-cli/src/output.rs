//! Log-line rendering of API records.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use rgl_api::{Ban, MatchOverview, Player, ProfileTeam, SeasonOverview, TeamOverview};

/// Timestamp format used in every table.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Formats an optional timestamp, `-` when absent.
fn format_date(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| String::from("-"), |at| at.format(DATE_FORMAT).to_string())
}

/// Logs a ban table.
pub fn log_bans(bans: &[Ban]) {
    tracing::info!("Bans: {}", bans.len());
    tracing::info!("SteamID\t\t\tAlias\t\tExpires\t\t\tReason");
    for ban in bans {
        tracing::info!(
            "{}\t{}\t\t{}\t{}",
            ban.steam_id,
            ban.alias,
            format_date(ban.expires_at),
            ban.reason,
        );
    }
}

/// Logs one player profile.
pub fn log_player(player: &Player) {
    tracing::info!("{} ({})", player.name, player.steam_id);
    tracing::info!(
        "Verified: {}\tBanned: {}\tProbation: {}",
        player.status.is_verified,
        player.status.is_banned,
        player.status.is_on_probation,
    );
    if let Some(ref ban) = player.ban_information {
        tracing::info!(
            "Ban ends {}: {}",
            format_date(ban.ends_at),
            ban.reason
        );
    }

    let teams = &player.current_teams;
    for (format, team) in [
        ("Sixes", &teams.sixes),
        ("Highlander", &teams.highlander),
        ("Prolander", &teams.prolander),
    ] {
        if let Some(team) = team {
            tracing::info!(
                "{}\t[{}] {}\t{}",
                format,
                team.tag,
                team.name,
                team.division_name
            );
        }
    }
}

/// Logs a player's team history.
pub fn log_profile_teams(teams: &[ProfileTeam]) {
    tracing::info!("Teams: {}", teams.len());
    tracing::info!("TeamID\tTag\tSeason\t\t\tDivision\tW-L");
    for team in teams {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}-{}",
            team.team_id,
            team.team_tag,
            team.season_name,
            team.division_name,
            team.stats.wins,
            team.stats.loses,
        );
    }
}

/// Logs a name search result page.
pub fn log_search_results<T: Display>(results: &[T], count: i64, total_hit_count: i64) {
    tracing::info!("Results: {count} of {total_hit_count}");
    for result in results {
        tracing::info!("{result}");
    }
}

/// Logs one match with its teams and maps.
pub fn log_match(overview: &MatchOverview) {
    tracing::info!(
        "Match {}: {} ({}, {})",
        overview.match_id,
        overview.match_name,
        overview.season_name,
        overview.division_name,
    );
    tracing::info!("Date: {}", format_date(overview.match_date));
    for team in &overview.teams {
        tracing::info!(
            "{}\t[{}] {}\t{}",
            if team.is_home { "Home" } else { "Away" },
            team.team_tag,
            team.team_name,
            team.points,
        );
    }
    for map in &overview.maps {
        tracing::info!("{}\t{}-{}", map.map_name, map.home_score, map.away_score);
    }
}

/// Logs a match table.
pub fn log_matches(matches: &[MatchOverview]) {
    tracing::info!("Matches: {}", matches.len());
    tracing::info!("MatchID\tDate\t\t\tName");
    for overview in matches {
        tracing::info!(
            "{}\t{}\t{}",
            overview.match_id,
            format_date(overview.match_date),
            overview.match_name,
        );
    }
}

/// Logs one team with its roster.
pub fn log_team(team: &TeamOverview) {
    tracing::info!("[{}] {} ({})", team.tag, team.name, team.team_id);
    tracing::info!("Division: {}", team.division_name);
    if let Some(rank) = team.final_rank {
        tracing::info!("Final rank: {rank}");
    }
    for player in &team.players {
        let role = if player.is_leader { "Leader" } else { "Player" };
        tracing::info!("{}\t{}\t{}", player.steam_id, role, player.name);
    }
}

/// Logs a season summary.
pub fn log_season(season: &SeasonOverview) {
    tracing::info!("{} ({})", season.name, season.format_name);
    tracing::info!("Region: {}", season.region_name);
    tracing::info!("Maps: {}", season.maps.join(", "));
    tracing::info!("Teams: {}", season.participating_teams.len());
    tracing::info!(
        "Matches played: {}",
        season.matches_played_during_season.len()
    );
}
