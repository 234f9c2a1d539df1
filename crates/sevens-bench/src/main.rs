use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use sevens_bench::config::BenchmarkConfig;
use sevens_bench::logging::init_logging;
use sevens_bench::tournament::TournamentRunner;

/// Tournament harness for Sevens strategies.
#[derive(Debug, Parser)]
#[command(
    name = "sevens-bench",
    author,
    version,
    about = "Deterministic Sevens tournament harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of matches to play.
    #[arg(long, value_name = "COUNT")]
    matches: Option<usize>,

    /// Override the base RNG seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the number of players per match.
    #[arg(long, value_name = "PLAYERS")]
    players: Option<usize>,

    /// Exit after validating the configuration and loading every agent.
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(matches) = cli.matches {
        config.matches.count = matches;
    }

    if let Some(seed) = cli.seed {
        config.matches.seed = Some(seed);
    }

    if let Some(players) = cli.players {
        config.matches.players = players;
    }

    config.validate().context("validating overridden configuration")?;

    let outputs = config.resolved_outputs();
    let agent_count = config.agents.len();
    let run_id = config.run_id.clone();
    let matches = config.matches.count;
    let players = config.matches.players;

    println!(
        "Loaded configuration '{run_id}' with {agent_count} agent{} ({matches} matches, {players} players)",
        if agent_count == 1 { "" } else { "s" }
    );

    let runner = TournamentRunner::new(config.clone(), outputs.clone())
        .context("loading agent strategies")?;

    if cli.validate_only {
        println!("Validation-only mode: tournament execution skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let summary = runner.run()?;
    println!(
        "Tournament complete for '{run_id}': {} matches x {} players -> {} rows at {}",
        summary.matches_played,
        summary.players,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Event log: {}", guard.log_path.display());
    }

    Ok(())
}
