use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ranked_stats::aggregate::RankedStatsService;
use ranked_stats::calculate::resolve_rank;
use ranked_stats::config::AppConfig;
use ranked_stats::fetch::http::ApiClient;
use ranked_stats::fetch::StaticSession;
use ranked_stats::models::{
    EloDistribution, Loadable, PlayerId, RankDistribution, Season, UserRankedStats,
};
use ranked_stats::seasons::{leaderboard_id_for_season, stat_keys_for_season};

/// Environment variable holding the signed-in entity token.
const ENTITY_TOKEN_ENV: &str = "RANKED_STATS_ENTITY_TOKEN";

#[derive(Parser)]
#[command(name = "ranked-stats")]
#[command(about = "Ranked ladder statistics: tiers, distributions and player stats")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./ranked-stats.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Entity token for the backend (defaults to $RANKED_STATS_ENTITY_TOKEN)
    #[arg(long)]
    entity_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the rank for an elo and leaderboard position
    Rank {
        /// Elo rating
        #[arg(long, allow_hyphen_values = true)]
        elo: i64,

        /// 1-based leaderboard position
        #[arg(long)]
        position: u32,
    },

    /// Fetch a season's full leaderboard and print its distributions
    Distribution {
        /// Season index (default: current season)
        #[arg(long)]
        season: Option<u32>,

        /// Elo histogram bucket width (default: from config)
        #[arg(long)]
        precision: Option<i64>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Show a player's ranked statistics for a season
    Stats {
        /// Player entity id
        #[arg(long)]
        player: String,

        /// Season index (default: current season)
        #[arg(long)]
        season: Option<u32>,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// List configured seasons
    Seasons,
}

#[derive(Serialize)]
struct DistributionReport<'a> {
    season: &'a Season,
    leaderboard_id: &'a str,
    player_count: usize,
    rank_distribution: &'a RankDistribution,
    elo_distribution: &'a EloDistribution,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    // Initialize tracing
    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::debug!("Starting ranked-stats v{}", env!("CARGO_PKG_VERSION"));

    let token = cli
        .entity_token
        .clone()
        .or_else(|| std::env::var(ENTITY_TOKEN_ENV).ok());
    let session = Arc::new(StaticSession::new(token));

    match cli.command {
        Commands::Rank { elo, position } => {
            if position == 0 {
                bail!("Leaderboard positions start at 1");
            }
            println!("{}", resolve_rank(elo, position));
        }

        Commands::Distribution {
            season,
            precision,
            json,
        } => {
            let season = select_season(&config, season)?;
            let precision = precision.unwrap_or(config.distribution.elo_precision);
            let leaderboard_id = leaderboard_id_for_season(season.index)?;

            let client = ApiClient::new(config.api.fetcher_config(), session)?;
            let snapshot = client.leaderboard_snapshot(leaderboard_id).await?;
            let ranks = snapshot.rank_distribution();
            let elos = snapshot.elo_distribution(precision)?;

            if json {
                let report = DistributionReport {
                    season: &season,
                    leaderboard_id,
                    player_count: snapshot.len(),
                    rank_distribution: &ranks,
                    elo_distribution: &elos,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_distribution(&season, snapshot.len(), &ranks, &elos);
            }
        }

        Commands::Stats {
            player,
            season,
            json,
        } => {
            let season = select_season(&config, season)?;
            let client = ApiClient::new(config.api.fetcher_config(), session)?;
            let service = RankedStatsService::new(Arc::new(client));

            let player = PlayerId::from(player);
            match service.user_ranked_stats(&player, &season).await? {
                Loadable::Ready(stats) if json => {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                }
                Loadable::Ready(stats) => print_user_stats(&player, &season, &stats),
                Loadable::Failed(message) => bail!("Could not load ranked stats: {}", message),
                Loadable::Loading => bail!("Ranked stats still loading"),
            }
        }

        Commands::Seasons => {
            for season in config.seasons.all() {
                let flags = match (season.is_first, season.is_last) {
                    (true, true) => " (first, current)",
                    (true, false) => " (first)",
                    (false, true) => " (current)",
                    (false, false) => "",
                };
                match stat_keys_for_season(season.index, "elo") {
                    Ok(keys) => println!(
                        "{:>2}  {}{}  elo={} sets={} wins={}",
                        season.index, season.name, flags, keys.elo, keys.sets, keys.wins
                    ),
                    Err(e) => println!("{:>2}  {}{}  {}", season.index, season.name, flags, e),
                }
            }
        }
    }

    Ok(())
}

fn select_season(config: &AppConfig, index: Option<u32>) -> Result<Season> {
    let index = index.unwrap_or(config.seasons.current);
    match config.seasons.season(index) {
        Some(season) => Ok(season),
        None => bail!(
            "Season {} is not configured (current season is {})",
            index,
            config.seasons.current
        ),
    }
}

fn print_distribution(
    season: &Season,
    player_count: usize,
    ranks: &RankDistribution,
    elos: &EloDistribution,
) {
    println!("{}: {} ranked players", season, player_count);
    println!();
    for (rank, count) in ranks.iter().collect::<Vec<_>>().into_iter().rev() {
        println!("{:<12} {:>7}", rank.to_string(), count);
    }

    if elos.is_empty() {
        return;
    }

    let widest = elos.buckets().iter().map(|b| b.value).max().unwrap_or(0).max(1);
    println!();
    for bucket in elos.buckets() {
        let bar = "#".repeat(bucket.value * 40 / widest);
        println!("{:>6} {:>6} {}", bucket.elo, bucket.value, bar);
    }
}

fn print_user_stats(player: &PlayerId, season: &Season, stats: &UserRankedStats) {
    fn show<T: std::fmt::Display>(value: Option<T>) -> String {
        value.map_or_else(|| "-".to_string(), |v| v.to_string())
    }

    let name = stats
        .profile
        .as_ref()
        .and_then(|p| p.display_name.clone())
        .unwrap_or_else(|| player.to_string());

    println!("{} - {}", name, season);
    println!("  Elo:             {}", show(stats.elo));
    println!("  Rank:            {}", show(stats.rank));
    println!(
        "  Position:        {} / {}",
        show(stats.position),
        show(stats.player_count)
    );
    println!("  Best win streak: {}", show(stats.best_win_streak));
    match &stats.set_stats {
        Some(sets) => println!(
            "  Sets:            {} played, {} won ({:.1}%)",
            sets.set_count, sets.win_count, sets.win_rate
        ),
        None => println!("  Sets:            unavailable for this season"),
    }
}
