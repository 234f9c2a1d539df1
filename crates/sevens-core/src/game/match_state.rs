use crate::game::round::{RoundConfig, RoundError, RoundOutcome, RoundResult, RoundState};
use crate::game::serialization::{MatchSummary, RoundRecord, Standing};
use crate::model::card::Card;
use crate::model::deck::{DECK_SIZE, Deck};
use crate::model::player::PlayerId;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::strategy::Strategy;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{Level, event};

pub const MIN_PLAYERS: usize = 2;
/// Every player must receive at least one of the 51 non-anchor cards.
pub const MAX_PLAYERS: usize = DECK_SIZE - 1;
const DEFAULT_THRESHOLD: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Lifetime card total that ends the match once any player reaches it.
    #[serde(default = "default_threshold")]
    pub threshold: usize,
    /// Suit whose seven is face-up at the start of every round.
    #[serde(default = "default_anchor_suit")]
    pub anchor_suit: Suit,
    #[serde(default)]
    pub round: RoundConfig,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl MatchConfig {
    pub fn anchor(&self) -> Card {
        Card::new(Rank::Seven, self.anchor_suit)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.threshold == 0 {
            return Err(MatchError::InvalidThreshold);
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            anchor_suit: default_anchor_suit(),
            round: RoundConfig::default(),
            seed: None,
        }
    }
}

fn default_threshold() -> usize {
    DEFAULT_THRESHOLD
}

fn default_anchor_suit() -> Suit {
    Card::DEFAULT_ANCHOR.suit
}

/// Lifetime bookkeeping for one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    totals: Vec<usize>,
    rounds_won: Vec<usize>,
    round_number: u32,
}

impl MatchState {
    pub fn new(players: usize) -> Self {
        Self {
            totals: vec![0; players],
            rounds_won: vec![0; players],
            round_number: 0,
        }
    }

    pub fn totals(&self) -> &[usize] {
        &self.totals
    }

    pub fn rounds_won(&self) -> &[usize] {
        &self.rounds_won
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Adds every player's leftover cards to their total and credits the
    /// winner, if any. A blocked round credits nobody.
    pub fn record(&mut self, outcome: &RoundOutcome) {
        self.round_number += 1;
        if let Some(winner) = outcome.result.winner() {
            if let Some(won) = self.rounds_won.get_mut(winner.index()) {
                *won += 1;
            }
        }
        for (total, remaining) in self.totals.iter_mut().zip(&outcome.remaining) {
            *total += remaining;
        }
    }

    pub fn threshold_reached(&self, threshold: usize) -> bool {
        self.totals.iter().any(|total| *total >= threshold)
    }

    /// Fewest lifetime cards first; equal totals fall back to ascending id.
    pub fn standings(&self) -> Vec<Standing> {
        let mut order: Vec<PlayerId> = PlayerId::range(self.totals.len()).collect();
        order.sort_by_key(|player| (self.totals[player.index()], *player));
        order
            .into_iter()
            .enumerate()
            .map(|(position, player)| Standing {
                player,
                rank: position + 1,
                cards: self.totals[player.index()],
                rounds_won: self.rounds_won[player.index()],
            })
            .collect()
    }
}

/// Deals, runs and scores rounds for a set of long-lived player slots.
pub struct MatchEngine {
    config: MatchConfig,
    slots: Vec<Option<Box<dyn Strategy>>>,
    rng: StdRng,
    seed: u64,
}

impl MatchEngine {
    pub fn new(config: MatchConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            config,
            slots: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seats `strategy` at `player`, replacing any previous occupant.
    pub fn register_strategy(&mut self, player: PlayerId, strategy: Box<dyn Strategy>) {
        let index = player.index();
        if self.slots.len() <= index {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index] = Some(strategy);
    }

    pub fn strategy_name(&self, player: PlayerId) -> Option<&str> {
        self.slots
            .get(player.index())
            .and_then(|slot| slot.as_deref())
            .map(|strategy| strategy.name())
    }

    /// Plays one round. The winner finishes in position 1, everyone else in 0;
    /// a blocked round reports 0 for all. Entries are in ascending id order.
    pub fn run_single_round_progress(
        &mut self,
        num_players: usize,
    ) -> Result<Vec<(PlayerId, usize)>, MatchError> {
        let mut seats = self.take_seats(num_players)?;
        let result = self.play_round(&mut seats, num_players);
        self.restore_seats(seats);
        let outcome = result?;

        Ok(PlayerId::range(num_players)
            .map(|player| {
                let position = usize::from(outcome.result.winner() == Some(player));
                (player, position)
            })
            .collect())
    }

    /// Plays rounds until a lifetime total reaches the threshold and returns
    /// each player's final rank, best first.
    pub fn run_multi_round_match(
        &mut self,
        num_players: usize,
    ) -> Result<Vec<(PlayerId, usize)>, MatchError> {
        let summary = self.play_match(num_players)?;
        Ok(summary
            .standings
            .iter()
            .map(|standing| (standing.player, standing.rank))
            .collect())
    }

    /// Full match with per-round history.
    pub fn play_match(&mut self, num_players: usize) -> Result<MatchSummary, MatchError> {
        self.config.validate()?;
        let mut seats = self.take_seats(num_players)?;
        let result = self.play_rounds(&mut seats, num_players);
        self.restore_seats(seats);
        result
    }

    pub fn run_single_round_progress_by_name(
        &mut self,
        _player_names: &[String],
    ) -> Result<Vec<(String, usize)>, MatchError> {
        Err(MatchError::Unsupported {
            operation: "run_single_round_progress_by_name",
        })
    }

    pub fn run_multi_round_match_by_name(
        &mut self,
        _player_names: &[String],
    ) -> Result<Vec<(String, usize)>, MatchError> {
        Err(MatchError::Unsupported {
            operation: "run_multi_round_match_by_name",
        })
    }

    fn play_rounds(
        &mut self,
        seats: &mut [Box<dyn Strategy>],
        num_players: usize,
    ) -> Result<MatchSummary, MatchError> {
        let mut state = MatchState::new(num_players);
        let mut history = Vec::new();

        loop {
            let outcome = self.play_round(seats, num_players)?;
            state.record(&outcome);

            event!(
                target: "sevens_core::match",
                Level::INFO,
                round = state.round_number(),
                winner = ?outcome.result.winner(),
                turns = outcome.turns,
                totals = ?state.totals(),
                "round complete"
            );

            history.push(RoundRecord {
                round: state.round_number(),
                result: outcome.result,
                remaining: outcome.remaining,
                turns: outcome.turns,
            });

            if state.threshold_reached(self.config.threshold) {
                break;
            }
        }

        let standings = state.standings();
        event!(
            target: "sevens_core::match",
            Level::INFO,
            seed = self.seed,
            rounds = state.round_number(),
            leader = ?standings.first().map(|s| s.player),
            "match complete"
        );

        Ok(MatchSummary {
            seed: self.seed,
            threshold: self.config.threshold,
            rounds: state.round_number(),
            standings,
            history,
        })
    }

    fn play_round(
        &mut self,
        seats: &mut [Box<dyn Strategy>],
        num_players: usize,
    ) -> Result<RoundOutcome, MatchError> {
        let deck = Deck::shuffled(&mut self.rng);
        let mut round = RoundState::deal(&deck, num_players, self.config.anchor(), self.config.round)?;
        let outcome = round.run(seats)?;
        if matches!(outcome.result, RoundResult::Blocked) {
            event!(
                target: "sevens_core::match",
                Level::DEBUG,
                turns = outcome.turns,
                "round blocked"
            );
        }
        Ok(outcome)
    }

    /// Moves the strategies for `0..num_players` out of their slots and runs
    /// their once-per-match initialisation.
    fn take_seats(&mut self, num_players: usize) -> Result<Vec<Box<dyn Strategy>>, MatchError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
            return Err(MatchError::PlayerCount {
                found: num_players,
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }
        if let Some(missing) = PlayerId::range(num_players)
            .find(|player| !matches!(self.slots.get(player.index()), Some(Some(_))))
        {
            return Err(MatchError::MissingStrategy(missing));
        }

        let mut seats: Vec<Box<dyn Strategy>> = self.slots[..num_players]
            .iter_mut()
            .filter_map(Option::take)
            .collect();
        for (player, strategy) in PlayerId::range(num_players).zip(seats.iter_mut()) {
            strategy.initialize(player);
        }
        Ok(seats)
    }

    fn restore_seats(&mut self, seats: Vec<Box<dyn Strategy>>) {
        for (slot, strategy) in self.slots.iter_mut().zip(seats) {
            *slot = Some(strategy);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("{operation} is not supported; players are addressed by numeric id")]
    Unsupported { operation: &'static str },
    #[error("a match needs between {min} and {max} players, got {found}")]
    PlayerCount { found: usize, min: usize, max: usize },
    #[error("no strategy registered for player {0}")]
    MissingStrategy(PlayerId),
    #[error("threshold must be at least 1")]
    InvalidThreshold,
    #[error(transparent)]
    Round(#[from] RoundError),
}
