//! rgl - command-line client for the RGL public REST API.

/// Application configuration (TOML).
mod config;
/// Log-line rendering of API records.
mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rgl_api::{CallContext, LocalRglApi, RglClient, SteamId};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Give up after this many seconds, including time spent waiting for
    /// the rate limiter.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List league bans.
    Bans(PageArgs),
    /// Show a player profile.
    Profile(SteamIdArgs),
    /// Show several player profiles in one request.
    Profiles(ProfilesArgs),
    /// List a player's team history.
    ProfileTeams(SteamIdArgs),
    /// Search players by name.
    SearchPlayers(SearchArgs),
    /// Show one match.
    Match(IdArgs),
    /// List matches.
    Matches(PageArgs),
    /// Show a team and its roster.
    Team(IdArgs),
    /// Search teams by name.
    SearchTeams(SearchArgs),
    /// Show a season summary.
    Season(IdArgs),
}

/// Paging arguments.
#[derive(clap::Args)]
struct PageArgs {
    /// Number of records to return (max 100).
    #[arg(long, default_value_t = 10)]
    take: u32,
    /// Number of records to skip.
    #[arg(long, default_value_t = 0)]
    skip: u32,
}

/// Arguments for commands addressing one player.
#[derive(clap::Args)]
struct SteamIdArgs {
    /// 64-bit Steam ID (e.g. 76561197970669109).
    steam_id: SteamId,
}

/// Arguments for the `profiles` subcommand.
#[derive(clap::Args)]
struct ProfilesArgs {
    /// Comma-separated Steam IDs.
    #[arg(long, required = true, value_delimiter = ',')]
    steam_ids: Vec<SteamId>,
}

/// Arguments for commands addressing one numeric resource.
#[derive(clap::Args)]
struct IdArgs {
    /// Resource ID.
    id: u64,
}

/// Arguments for name searches.
#[derive(clap::Args)]
struct SearchArgs {
    /// Name substring to search for.
    #[arg(long, required = true)]
    name: String,
    #[command(flatten)]
    page: PageArgs,
}

/// Builds a client from the config file.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or holds invalid values,
/// or the HTTP client fails to build.
fn build_client(dir: Option<&PathBuf>) -> Result<RglClient> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;
    tracing::debug!(path = %path.display(), "Loaded config");

    config
        .apply(RglClient::builder())?
        .build()
        .context("failed to build RGL client")
}

/// Creates the call context for one command.
fn call_context(timeout: Option<u64>) -> CallContext {
    timeout.map_or_else(CallContext::new, |secs| {
        CallContext::with_timeout(Duration::from_secs(secs))
    })
}

/// Runs one subcommand against `client`.
///
/// # Errors
///
/// Returns an error if the API call fails.
#[instrument(skip_all)]
async fn run<C: LocalRglApi>(client: &C, ctx: &CallContext, command: Commands) -> Result<()> {
    match command {
        Commands::Bans(page) => {
            let bans = client
                .bans(ctx, page.take, page.skip)
                .await
                .context("RGL bans request failed")?;
            output::log_bans(&bans);
        }
        Commands::Profile(args) => {
            let player = client
                .profile(ctx, args.steam_id)
                .await
                .context("RGL profile request failed")?;
            output::log_player(&player);
        }
        Commands::Profiles(args) => {
            let players = client
                .profiles(ctx, &args.steam_ids)
                .await
                .context("RGL profiles request failed")?;
            tracing::info!("Profiles: {}", players.len());
            for player in &players {
                output::log_player(player);
            }
        }
        Commands::ProfileTeams(args) => {
            let teams = client
                .profile_teams(ctx, args.steam_id)
                .await
                .context("RGL profile teams request failed")?;
            output::log_profile_teams(&teams);
        }
        Commands::SearchPlayers(args) => {
            let found = client
                .search_players(ctx, &args.name, args.page.take, args.page.skip)
                .await
                .context("RGL player search failed")?;
            output::log_search_results(&found.results, found.count, found.total_hit_count);
        }
        Commands::Match(args) => {
            let overview = client
                .match_overview(ctx, args.id)
                .await
                .context("RGL match request failed")?;
            output::log_match(&overview);
        }
        Commands::Matches(page) => {
            let matches = client
                .matches(ctx, page.take, page.skip)
                .await
                .context("RGL matches request failed")?;
            output::log_matches(&matches);
        }
        Commands::Team(args) => {
            let team = client
                .team(ctx, args.id)
                .await
                .context("RGL team request failed")?;
            output::log_team(&team);
        }
        Commands::SearchTeams(args) => {
            let found = client
                .search_teams(ctx, &args.name, args.page.take, args.page.skip)
                .await
                .context("RGL team search failed")?;
            output::log_search_results(&found.results, found.count, found.total_hit_count);
        }
        Commands::Season(args) => {
            let season = client
                .season(ctx, args.id)
                .await
                .context("RGL season request failed")?;
            output::log_season(&season);
        }
    }
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let client = build_client(cli.dir.as_ref())?;
    let ctx = call_context(cli.timeout);
    run(&client, &ctx, cli.command).await
}
