//! Figgie CLI: play matches between built-in policies.
//!
//! Commands:
//! - `run`: play a match and print the `FINAL_RESULTS` block
//! - `history`: summarise a JSONL match history by policy

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use figgie_core::rules::{SetupError, VALID_PLAYER_COUNTS};
use figgie_runner::{
    run_match, summary_by_policy, ConfigError, HistoryEntry, MatchConfig, MatchHistory,
    MatchSummary, PolicyKind, RunError,
};
use tracing::info;

const HISTORY_FILE: &str = "history.jsonl";

#[derive(Parser)]
#[command(name = "figgie", about = "Figgie CLI: simultaneous-tick card trading engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match. One policy per seat: starter, random or passive.
    Run {
        /// Policies, one per player (4 or 5). Optional with --config.
        policies: Vec<String>,

        /// Number of rounds.
        #[arg(short, long)]
        rounds: Option<u32>,

        /// Debug logging and per-player totals.
        #[arg(short, long, default_value_t = false)]
        verbose: bool,

        /// Directory for round logs and the match history.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Master seed.
        #[arg(long)]
        seed: Option<u64>,

        /// TOML match config. Flags given on the command line override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Play rounds one after another instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// Summarise a match history file by policy.
    History {
        /// Path to a history.jsonl file.
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            policies,
            rounds,
            verbose,
            output,
            seed,
            config,
            sequential,
        } => {
            init_logging(verbose);
            let config = match build_config(policies, rounds, output, seed, config, sequential) {
                Ok(config) => config,
                Err(err) => exit_with(&err),
            };
            run_match_cmd(&config, verbose)
        }
        Commands::History { path } => {
            init_logging(false);
            run_history_cmd(&path)
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "figgie=debug" } else { "figgie=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if std::env::var("FIGGIE_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn build_config(
    policies: Vec<String>,
    rounds: Option<u32>,
    output: Option<PathBuf>,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
    sequential: bool,
) -> Result<MatchConfig, ConfigError> {
    let mut config = match config_path {
        Some(path) => MatchConfig::from_file(&path)?,
        None => MatchConfig::default(),
    };

    if !policies.is_empty() || config.players.is_empty() {
        let kinds = policies
            .iter()
            .map(|p| p.parse::<PolicyKind>())
            .collect::<Result<Vec<_>, _>>()?;
        config.players = MatchConfig::with_policies(&kinds).players;
    }
    if let Some(rounds) = rounds {
        config.rounds = rounds;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if output.is_some() {
        config.output_dir = output;
    }
    if sequential {
        config.parallel = false;
    }

    config.validate()?;
    Ok(config)
}

fn run_match_cmd(config: &MatchConfig, verbose: bool) -> Result<()> {
    let summary = match run_match(config) {
        Ok(summary) => summary,
        Err(RunError::Config(err)) => exit_with(&err),
        Err(err) => return Err(err.into()),
    };

    if let Some(dir) = &config.output_dir {
        let history = MatchHistory::new(dir.join(HISTORY_FILE));
        history
            .append(&HistoryEntry::new(config, &summary))
            .with_context(|| format!("failed to append to {}", history.path().display()))?;
        info!(dir = %dir.display(), "round logs written");
    }

    print_final_results(config, &summary, verbose);
    Ok(())
}

fn print_final_results(config: &MatchConfig, summary: &MatchSummary, verbose: bool) {
    println!();
    println!("FINAL_RESULTS");
    for (i, player) in config.players.iter().enumerate() {
        println!(
            "{}: {} rounds won ({})",
            player.name, summary.round_wins[i], player.policy
        );
    }
    println!("Draws: {}", summary.draws);

    if verbose {
        println!();
        println!("Total scores across all rounds:");
        for (i, total) in summary.total_scores.iter().enumerate() {
            println!("  Player {i}: {total}");
        }
    }
}

fn run_history_cmd(path: &Path) -> Result<()> {
    let entries = MatchHistory::new(path.to_path_buf())
        .read_all()
        .with_context(|| format!("failed to read {}", path.display()))?;
    println!("{} matches in {}", entries.len(), path.display());

    for (policy, s) in summary_by_policy(&entries) {
        println!(
            "{policy:<8} seats {:>4}  rounds {:>6}  won {:>6}  total {:>8}  per round {:>7.2}",
            s.seats, s.rounds_played, s.rounds_won, s.total_score, s.mean_score_per_round
        );
    }
    Ok(())
}

/// Invalid table size or unknown policy: report and exit with status 1.
fn exit_with(err: &ConfigError) -> ! {
    match err {
        ConfigError::Setup(SetupError::InvalidPlayerCount(_)) => eprintln!(
            "Error: Figgie requires {:?} players. {err}",
            VALID_PLAYER_COUNTS
        ),
        _ => eprintln!("Error: {err}"),
    }
    std::process::exit(1);
}
