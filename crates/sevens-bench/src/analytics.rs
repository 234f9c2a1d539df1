use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::config::{AgentConfig, BenchmarkConfig};

const CONFIDENCE_Z: f64 = 1.96; // 95% CI

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// One seat's result in one match, as seen by the aggregator.
#[derive(Debug, Clone, Copy)]
pub struct SeatRecord {
    pub won: bool,
    /// Final rank; absent in single-round mode.
    pub rank: Option<usize>,
    /// Lifetime cards held at match end; absent in single-round mode.
    pub cards: Option<usize>,
}

pub struct AnalyticsCollector {
    agents: HashMap<String, AgentAccumulator>,
    agent_order: Vec<String>,
    players: usize,
    single_round: bool,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Self {
        let mut agents = HashMap::new();
        let mut order = Vec::new();
        for agent in &config.agents {
            agents.insert(agent.name.clone(), AgentAccumulator::new(agent.clone()));
            order.push(agent.name.clone());
        }

        Self {
            agents,
            agent_order: order,
            players: config.matches.players,
            single_round: config.matches.single_round,
        }
    }

    pub fn record_seat(&mut self, agent: &str, record: SeatRecord) -> Result<(), AnalyticsError> {
        self.agents
            .get_mut(agent)
            .ok_or_else(|| AnalyticsError::UnknownAgent(agent.to_string()))?
            .record(record);
        Ok(())
    }

    pub fn finalize(mut self) -> AnalyticsSummary {
        let agents = self
            .agent_order
            .iter()
            .filter_map(|name| self.agents.remove(name))
            .map(AgentAccumulator::into_report)
            .collect();

        AnalyticsSummary {
            players: self.players,
            single_round: self.single_round,
            agents,
        }
    }
}

struct AgentAccumulator {
    config: AgentConfig,
    seats: usize,
    wins: usize,
    rank_total: usize,
    per_match_cards: Vec<f64>,
}

impl AgentAccumulator {
    fn new(config: AgentConfig) -> Self {
        Self {
            config,
            seats: 0,
            wins: 0,
            rank_total: 0,
            per_match_cards: Vec::new(),
        }
    }

    fn record(&mut self, record: SeatRecord) {
        self.seats += 1;
        if record.won {
            self.wins += 1;
        }
        if let Some(rank) = record.rank {
            self.rank_total += rank;
        }
        if let Some(cards) = record.cards {
            self.per_match_cards.push(cards as f64);
        }
    }

    fn into_report(self) -> AgentReport {
        let average = |total: f64, count: usize| {
            if count == 0 { 0.0 } else { total / count as f64 }
        };
        let cards_total: f64 = self.per_match_cards.iter().sum();

        AgentReport {
            name: self.config.name,
            locator: self.config.locator,
            seats: self.seats,
            wins: self.wins,
            win_rate: average(self.wins as f64, self.seats),
            avg_rank: average(self.rank_total as f64, self.seats),
            avg_cards: average(cards_total, self.per_match_cards.len()),
            ci95: confidence_interval(&self.per_match_cards),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub players: usize,
    pub single_round: bool,
    pub agents: Vec<AgentReport>,
}

impl AnalyticsSummary {
    pub fn to_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Tournament Summary\n\n");
        rows.push_str(&format!(
            "{} players per match, {}\n\n",
            self.players,
            if self.single_round {
                "single round per match"
            } else {
                "played to threshold"
            }
        ));

        if self.single_round {
            rows.push_str("| Agent | Locator | Seats | Wins | Win % |\n");
            rows.push_str("|-------|---------|-------|------|-------|\n");
            for agent in &self.agents {
                rows.push_str(&format!(
                    "| {name} | `{locator}` | {seats} | {wins} | {win:.1}% |\n",
                    name = agent.name,
                    locator = agent.locator,
                    seats = agent.seats,
                    wins = agent.wins,
                    win = agent.win_rate * 100.0,
                ));
            }
            return rows;
        }

        rows.push_str("| Agent | Locator | Seats | Wins | Win % | Avg rank | Avg cards | 95% CI |\n");
        rows.push_str("|-------|---------|-------|------|-------|----------|-----------|--------|\n");
        for agent in &self.agents {
            rows.push_str(&format!(
                "| {name} | `{locator}` | {seats} | {wins} | {win:.1}% | {rank:.2} | {cards:.2} | [{ci_low:.2}, {ci_high:.2}] |\n",
                name = agent.name,
                locator = agent.locator,
                seats = agent.seats,
                wins = agent.wins,
                win = agent.win_rate * 100.0,
                rank = agent.avg_rank,
                cards = agent.avg_cards,
                ci_low = agent.ci95.0,
                ci_high = agent.ci95.1,
            ));
        }
        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.to_markdown()).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub locator: String,
    pub seats: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_rank: f64,
    pub avg_cards: f64,
    pub ci95: (f64, f64),
}

fn confidence_interval(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean = points.iter().sum::<f64>() / points.len() as f64;
    if points.len() == 1 {
        return (mean, mean);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    let std_error = (variance / points.len() as f64).sqrt();
    let margin = CONFIDENCE_Z * std_error;
    (mean - margin, mean + margin)
}
