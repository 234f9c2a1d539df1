use crate::game::deadlock::is_blocked;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::player::PlayerId;
use crate::model::rules::is_playable;
use crate::model::table::TableState;
use crate::strategy::{Selection, Strategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{Level, event};

const DEFAULT_MAX_IDLE_ROTATIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Full rotations of passes tolerated while a playable card still exists
    /// somewhere. Exceeding it ends the round as blocked.
    #[serde(default = "default_max_idle_rotations")]
    pub max_idle_rotations: usize,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            max_idle_rotations: DEFAULT_MAX_IDLE_ROTATIONS,
        }
    }
}

fn default_max_idle_rotations() -> usize {
    DEFAULT_MAX_IDLE_ROTATIONS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitTurn(PlayerId),
    Resolved { winner: PlayerId },
    Blocked,
}

impl RoundPhase {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, RoundPhase::AwaitTurn(_))
    }
}

/// Why a turn produced no play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    Declined,
    IndexOutOfRange(usize),
    NotPlayable(Card),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAction {
    Played(Card),
    Passed(PassReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub player: PlayerId,
    pub action: TurnAction,
    /// Phase after the turn was applied.
    pub phase: RoundPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundResult {
    Resolved { winner: PlayerId },
    Blocked,
}

impl RoundResult {
    pub fn winner(self) -> Option<PlayerId> {
        match self {
            RoundResult::Resolved { winner } => Some(winner),
            RoundResult::Blocked => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub result: RoundResult,
    /// Cards left in each hand, indexed by player id.
    pub remaining: Vec<usize>,
    pub turns: usize,
    pub plays: usize,
    pub passes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("a round needs at least one player")]
    NoPlayers,
    #[error("player {0} starts the round without cards")]
    EmptyHand(PlayerId),
    #[error("round has {hands} hands but {strategies} strategies were supplied")]
    SeatMismatch { hands: usize, strategies: usize },
    #[error("round is already finished")]
    Finished,
}

/// One round of play: owns the layout and every hand until a terminal phase.
#[derive(Debug, Clone)]
pub struct RoundState {
    hands: Vec<Hand>,
    table: TableState,
    turn_order: Vec<PlayerId>,
    cursor: usize,
    consecutive_passes: usize,
    idle_rotations: usize,
    phase: RoundPhase,
    config: RoundConfig,
    turns: usize,
    plays: usize,
    passes: usize,
}

impl RoundState {
    /// Fresh table holding only `anchor`, remaining cards dealt round-robin.
    pub fn deal(
        deck: &Deck,
        players: usize,
        anchor: Card,
        config: RoundConfig,
    ) -> Result<Self, RoundError> {
        let hands = deck.deal(players, anchor);
        Self::from_hands(hands, TableState::with_anchor(anchor), config)
    }

    /// Builds a round from an arbitrary position; hand `i` belongs to player `i`.
    pub fn from_hands(
        hands: Vec<Hand>,
        table: TableState,
        config: RoundConfig,
    ) -> Result<Self, RoundError> {
        if hands.is_empty() {
            return Err(RoundError::NoPlayers);
        }
        if let Some(index) = hands.iter().position(Hand::is_empty) {
            return Err(RoundError::EmptyHand(PlayerId::new(index)));
        }

        let turn_order: Vec<PlayerId> = PlayerId::range(hands.len()).collect();
        let phase = RoundPhase::AwaitTurn(turn_order[0]);

        Ok(Self {
            hands,
            table,
            turn_order,
            cursor: 0,
            consecutive_passes: 0,
            idle_rotations: 0,
            phase,
            config,
            turns: 0,
            plays: 0,
            passes: 0,
        })
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn hand(&self, player: PlayerId) -> Option<&Hand> {
        self.hands.get(player.index())
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    pub fn consecutive_passes(&self) -> usize {
        self.consecutive_passes
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Executes exactly one turn for the player whose turn it is.
    ///
    /// `strategies[i]` decides for player `i`. Either the whole play happens
    /// (card leaves the hand, cell turns face-up, others are notified) or the
    /// turn counts as a pass and nothing but the pass bookkeeping changes.
    pub fn step(&mut self, strategies: &mut [Box<dyn Strategy>]) -> Result<TurnReport, RoundError> {
        let RoundPhase::AwaitTurn(player) = self.phase else {
            return Err(RoundError::Finished);
        };
        if strategies.len() != self.hands.len() {
            return Err(RoundError::SeatMismatch {
                hands: self.hands.len(),
                strategies: strategies.len(),
            });
        }

        let seat = player.index();
        let selection = strategies[seat].select_card(&self.hands[seat], &self.table);
        self.turns += 1;

        let action = match self.validate(seat, selection) {
            Ok(index) => {
                let card = self.apply_play(seat, index);
                self.notify(strategies, player, |strategy| strategy.observe_move(player, card));
                TurnAction::Played(card)
            }
            Err(reason) => {
                if !matches!(reason, PassReason::Declined) {
                    event!(
                        target: "sevens_core::round",
                        Level::WARN,
                        player = %player,
                        strategy = strategies[seat].name(),
                        reason = ?reason,
                        "invalid selection treated as a pass"
                    );
                }
                self.passes += 1;
                self.consecutive_passes += 1;
                self.notify(strategies, player, |strategy| strategy.observe_pass(player));
                TurnAction::Passed(reason)
            }
        };

        self.phase = self.resolve_phase(player, action);

        event!(
            target: "sevens_core::round",
            Level::DEBUG,
            turn = self.turns,
            player = %player,
            action = ?action,
            phase = ?self.phase,
            "turn"
        );

        Ok(TurnReport {
            player,
            action,
            phase: self.phase,
        })
    }

    /// Plays turns until the round is resolved or blocked.
    pub fn run(&mut self, strategies: &mut [Box<dyn Strategy>]) -> Result<RoundOutcome, RoundError> {
        while !self.phase.is_terminal() {
            self.step(strategies)?;
        }
        self.outcome().ok_or(RoundError::Finished)
    }

    /// Summary of a finished round, `None` while turns remain.
    pub fn outcome(&self) -> Option<RoundOutcome> {
        let result = match self.phase {
            RoundPhase::AwaitTurn(_) => return None,
            RoundPhase::Resolved { winner } => RoundResult::Resolved { winner },
            RoundPhase::Blocked => RoundResult::Blocked,
        };
        Some(RoundOutcome {
            result,
            remaining: self.hands.iter().map(Hand::len).collect(),
            turns: self.turns,
            plays: self.plays,
            passes: self.passes,
        })
    }

    fn validate(&self, seat: usize, selection: Selection) -> Result<usize, PassReason> {
        let index = match selection {
            Selection::Pass => return Err(PassReason::Declined),
            Selection::Play(index) => index,
        };
        let card = self.hands[seat]
            .card(index)
            .ok_or(PassReason::IndexOutOfRange(index))?;
        if !is_playable(card, &self.table) {
            return Err(PassReason::NotPlayable(card));
        }
        Ok(index)
    }

    fn apply_play(&mut self, seat: usize, index: usize) -> Card {
        let card = self.hands[seat]
            .remove_at(index)
            .expect("index validated against the same hand");
        self.table.place(card);
        self.plays += 1;
        self.consecutive_passes = 0;
        self.idle_rotations = 0;
        card
    }

    fn notify<F>(&self, strategies: &mut [Box<dyn Strategy>], actor: PlayerId, mut deliver: F)
    where
        F: FnMut(&mut Box<dyn Strategy>),
    {
        for other in self.turn_order.iter().copied().filter(|p| *p != actor) {
            deliver(&mut strategies[other.index()]);
        }
    }

    fn resolve_phase(&mut self, player: PlayerId, action: TurnAction) -> RoundPhase {
        if matches!(action, TurnAction::Played(_)) && self.hands[player.index()].is_empty() {
            event!(
                target: "sevens_core::round",
                Level::DEBUG,
                winner = %player,
                turns = self.turns,
                "hand emptied"
            );
            return RoundPhase::Resolved { winner: player };
        }

        let active = self.hands.iter().filter(|hand| !hand.is_empty()).count();
        if self.consecutive_passes >= active {
            if is_blocked(&self.hands, &self.table) {
                return RoundPhase::Blocked;
            }
            self.consecutive_passes = 0;
            self.idle_rotations += 1;
            if self.idle_rotations > self.config.max_idle_rotations {
                event!(
                    target: "sevens_core::round",
                    Level::WARN,
                    idle_rotations = self.idle_rotations,
                    turns = self.turns,
                    "playable cards withheld for too long; ending round as blocked"
                );
                return RoundPhase::Blocked;
            }
        }

        self.cursor = (self.cursor + 1) % self.turn_order.len();
        RoundPhase::AwaitTurn(self.turn_order[self.cursor])
    }
}
