use crate::game::round::RoundResult;
use crate::model::player::PlayerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Standing {
    pub player: PlayerId,
    /// 1-based final position.
    pub rank: usize,
    /// Lifetime cards left in hand at the end of rounds.
    pub cards: usize,
    pub rounds_won: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundRecord {
    pub round: u32,
    pub result: RoundResult,
    pub remaining: Vec<usize>,
    pub turns: usize,
}

/// Everything needed to report, and with the seed replay, a finished match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchSummary {
    pub seed: u64,
    pub threshold: usize,
    pub rounds: u32,
    pub standings: Vec<Standing>,
    #[serde(default)]
    pub history: Vec<RoundRecord>,
}

impl MatchSummary {
    pub fn winner(&self) -> Option<PlayerId> {
        self.standings.first().map(|standing| standing.player)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
