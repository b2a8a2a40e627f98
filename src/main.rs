use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use stack_stats::calculate::recommend_query;
use stack_stats::config::{AppConfig, QueryConfig, QueryPlayer};
use stack_stats::ingest::{canonical_query, run_batch, select_qualifying_matches};
use stack_stats::models::{Match, Recommendation, Role, StackKey};
use stack_stats::recommend::PositionRecommender;
use stack_stats::roster::Roster;
use stack_stats::storage::{read_match_files, write_reports, StorageConfig};

#[derive(Parser)]
#[command(name = "stack-stats")]
#[command(about = "Ranked flex stack statistics and role recommendations")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute statistics from cached matches and write all reports
    Compute,

    /// Recommend positions for a stack
    Recommend {
        /// Player as NAME#TAG or NAME#TAG=ROLE (repeatable; defaults to the configured query)
        #[arg(long = "player")]
        players: Vec<QueryPlayer>,

        /// Ignore the minimum-games filter for the pinned recommendation
        #[arg(long)]
        no_filter: bool,
    },

    /// Print the stack key for a set of players
    StackKey {
        /// Player names (NAME#TAG)
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn print_recommendation(label: &str, recommendation: Option<&Recommendation>) {
    println!("\n{}", label);
    let Some(rec) = recommendation else {
        println!("  (no complete assignment)");
        return;
    };
    for role in Role::ALL {
        println!("  {:<8} {}", role.as_str(), rec.player_for(role).unwrap_or("-"));
    }
    println!(
        "  Win %:   {:.1}{}",
        rec.win_percent * 100.0,
        if rec.is_filtered { " (filtered)" } else { "" }
    );
}

fn load_inputs(config: &AppConfig, storage: &StorageConfig) -> Result<(Roster, Vec<Match>)> {
    let roster = Roster::from_file(&config.roster_file)
        .with_context(|| format!("Failed to load roster from {:?}", config.roster_file))?;
    let matches = read_match_files(storage)
        .with_context(|| format!("Failed to read matches from {:?}", storage.matches_dir()))?;
    let matches = select_qualifying_matches(matches, &roster);
    Ok((roster, matches))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; the filter is swapped once the config is loaded.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let initial = env_filter
        .unwrap_or_else(|| EnvFilter::new(cli.log_level.as_deref().unwrap_or("info")));
    let (filter, filter_handle) = reload::Layer::new(initial);

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if !from_env && cli.log_level.is_none() {
        filter_handle
            .modify(|filter| *filter = EnvFilter::new(&config.log_level))
            .context("Failed to apply configured log level")?;
    }

    tracing::info!("Starting stack-stats v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());
    let recommender = PositionRecommender::new(config.filter.minimum_number_of_games);

    match cli.command {
        Commands::Compute => {
            let (roster, matches) = load_inputs(&config, &storage)?;
            let query = (!config.query.is_empty()).then_some(config.query.players.as_slice());
            let report = run_batch(&matches, &roster, &recommender, query);

            let written = write_reports(&storage, &report, &config.report.stack_thresholds)
                .context("Failed to write reports")?;

            println!("\n=== Compute Results ===");
            println!("Matches folded:   {}", report.matches_folded);
            println!("Players:          {}", report.players.len());
            println!("Stacks:           {}", report.stacks.len());
            println!("Duos:             {}", report.duos.len());
            println!("Group win %:      {:.1}", report.group_win.percent * 100.0);
            println!("Documents:        {}", written);

            if let Some(query) = &report.query {
                println!("\nQuery stack: {}", query.key);
                print_recommendation("With positions:", query.with_positions.as_ref());
                print_recommendation("Without positions:", query.without_positions.as_ref());
            }
        }

        Commands::Recommend { players, no_filter } => {
            let query = if players.is_empty() {
                config.query.clone()
            } else {
                QueryConfig { players }
            };
            query.validate().context("Invalid stack query")?;
            if query.is_empty() {
                anyhow::bail!("No players given; pass --player or configure [query] players");
            }

            let (roster, matches) = load_inputs(&config, &storage)?;
            let report = run_batch(&matches, &roster, &recommender, Some(query.players.as_slice()));
            let Some(result) = report.query else {
                anyhow::bail!("Stack query produced no result");
            };

            println!("\n=== Stack {} ===", result.key);
            match &result.stack {
                Some(stack) => println!(
                    "Played together {} times, {:.1}% wins",
                    stack.based_on_stack.number_of_games,
                    stack.based_on_stack.win_percent * 100.0
                ),
                None => println!("No games found for this stack"),
            }

            let with_positions = if no_filter {
                let canonical = canonical_query(&query.players, &roster);
                recommend_query(&canonical, &report.overall_players, &recommender, false)
            } else {
                result.with_positions
            };
            print_recommendation("With positions:", with_positions.as_ref());
            print_recommendation("Without positions:", result.without_positions.as_ref());
        }

        Commands::StackKey { names } => {
            let names: Vec<String> = match Roster::from_file(&config.roster_file) {
                Ok(roster) => names
                    .iter()
                    .map(|n| roster.resolve_alias(n).to_string())
                    .collect(),
                Err(e) => {
                    tracing::debug!("No roster for alias resolution: {}", e);
                    names
                }
            };
            println!("{}", StackKey::from_names(&names));
        }
    }

    Ok(())
}
