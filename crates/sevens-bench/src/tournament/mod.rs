use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use sevens_bot::registry::{LoadError, StrategyRegistry};
use sevens_core::game::match_state::{MatchConfig, MatchEngine, MatchError};
use sevens_core::game::round::RoundConfig;
use sevens_core::model::player::PlayerId;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError, SeatRecord};
use crate::config::{AgentConfig, BenchmarkConfig, ResolvedOutputs};

/// Plays a configured series of matches and writes per-seat results.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    registry: StrategyRegistry,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub matches_played: usize,
    pub players: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

impl TournamentRunner {
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        Self::with_registry(config, outputs, StrategyRegistry::with_builtins())
    }

    /// Build a runner against a custom registry. Every agent locator is
    /// resolved once up front so a bad locator fails before any output is written.
    pub fn with_registry(
        config: BenchmarkConfig,
        outputs: ResolvedOutputs,
        registry: StrategyRegistry,
    ) -> Result<Self, RunnerError> {
        for agent in &config.agents {
            registry
                .create(&agent.locator)
                .map_err(|source| RunnerError::Agent {
                    name: agent.name.clone(),
                    source,
                })?;
        }

        Ok(Self {
            config,
            outputs,
            registry,
        })
    }

    /// Execute the tournament, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.matches.seed.unwrap_or(0));
        let mut analytics = AnalyticsCollector::new(&self.config);
        let mut rows_written = 0usize;

        for match_index in 0..self.config.matches.count {
            let match_seed = rng.next_u64();
            let outcome = self.play_match(match_index, match_seed)?;
            for seat in &outcome.seats {
                analytics.record_seat(&seat.agent, seat.record())?;
            }
            rows_written += write_match_rows(
                &mut writer,
                &self.config,
                match_index,
                match_seed,
                &outcome,
            )?;
        }

        writer.flush()?;
        analytics.finalize().write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            matches_played: self.config.matches.count,
            players: self.config.matches.players,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    fn match_config(&self, match_seed: u64) -> MatchConfig {
        let mut round = RoundConfig::default();
        if let Some(max_idle_rotations) = self.config.matches.max_idle_rotations {
            round.max_idle_rotations = max_idle_rotations;
        }
        MatchConfig {
            threshold: self.config.matches.threshold,
            round,
            ..MatchConfig::default()
        }
        .with_seed(match_seed)
    }

    fn play_match(&self, match_index: usize, match_seed: u64) -> Result<MatchOutcome, RunnerError> {
        let players = self.config.matches.players;
        let mut engine = MatchEngine::new(self.match_config(match_seed));
        let mut seating = Vec::with_capacity(players);
        for player in PlayerId::range(players) {
            let agent = seat_agent(&self.config.agents, match_index, player);
            let strategy = self
                .registry
                .create(&agent.locator)
                .map_err(|source| RunnerError::Agent {
                    name: agent.name.clone(),
                    source,
                })?;
            engine.register_strategy(player, strategy);
            seating.push(agent.name.clone());
        }

        let start = Instant::now();
        let seats = if self.config.matches.single_round {
            engine
                .run_single_round_progress(players)?
                .into_iter()
                .map(|(player, position)| SeatResult {
                    player,
                    agent: seating[player.index()].clone(),
                    position,
                    cards: None,
                    rounds_won: None,
                })
                .collect::<Vec<_>>()
        } else {
            let summary = engine.play_match(players)?;
            let mut seats: Vec<SeatResult> = summary
                .standings
                .iter()
                .map(|standing| SeatResult {
                    player: standing.player,
                    agent: seating[standing.player.index()].clone(),
                    position: standing.rank,
                    cards: Some(standing.cards),
                    rounds_won: Some(standing.rounds_won),
                })
                .collect();
            seats.sort_by_key(|seat| seat.player);
            seats
        };
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        event!(
            target: "sevens_bench::tournament",
            Level::INFO,
            run_id = %self.config.run_id,
            match_index = match_index as u64,
            match_seed,
            elapsed_ms,
            "match complete"
        );

        Ok(MatchOutcome {
            single_round: self.config.matches.single_round,
            seats,
            elapsed_ms,
        })
    }
}

/// Rotates the agent list one seat per match so every agent visits every seat.
fn seat_agent(agents: &[AgentConfig], match_index: usize, player: PlayerId) -> &AgentConfig {
    &agents[(player.index() + match_index) % agents.len()]
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_match_rows(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    match_index: usize,
    match_seed: u64,
    outcome: &MatchOutcome,
) -> Result<usize, RunnerError> {
    let match_id = format!("M{match_index:05}");

    let mut rows_written = 0usize;
    for seat in &outcome.seats {
        let row = MatchLogRow {
            run_id: &config.run_id,
            match_id: &match_id,
            match_index,
            match_seed,
            player: seat.player,
            agent: &seat.agent,
            mode: if outcome.single_round {
                "single_round"
            } else {
                "match"
            },
            position: seat.position,
            cards: seat.cards,
            rounds_won: seat.rounds_won,
            elapsed_ms: outcome.elapsed_ms,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

struct MatchOutcome {
    single_round: bool,
    /// Ascending player id.
    seats: Vec<SeatResult>,
    elapsed_ms: f64,
}

struct SeatResult {
    player: PlayerId,
    agent: String,
    /// Final rank for a full match; 1 for the winner and 0 otherwise for a single round.
    position: usize,
    cards: Option<usize>,
    rounds_won: Option<usize>,
}

impl SeatResult {
    fn record(&self) -> SeatRecord {
        SeatRecord {
            won: self.position == 1,
            rank: self.cards.map(|_| self.position),
            cards: self.cards,
        }
    }
}

#[derive(Serialize)]
struct MatchLogRow<'a> {
    run_id: &'a str,
    match_id: &'a str,
    match_index: usize,
    match_seed: u64,
    player: PlayerId,
    agent: &'a str,
    mode: &'static str,
    position: usize,
    cards: Option<usize>,
    rounds_won: Option<usize>,
    elapsed_ms: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("agent '{name}' could not be loaded: {source}")]
    Agent {
        name: String,
        #[source]
        source: LoadError,
    },
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("match execution failed: {0}")]
    Match(#[from] MatchError),
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}
