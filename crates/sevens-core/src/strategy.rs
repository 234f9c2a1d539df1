use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::PlayerId;
use crate::model::table::TableState;

/// A strategy's answer when asked for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Index into the hand that was passed to [`Strategy::select_card`].
    Play(usize),
    Pass,
}

/// Decision-making agent that occupies one player slot for a whole match.
///
/// The engine hands a strategy its own hand and a read-only table, nothing
/// else. An index that is out of range or names an unplayable card is
/// treated exactly like [`Selection::Pass`].
pub trait Strategy: Send {
    /// Called once per match, before the first round, with the slot's id.
    /// Strategies that want per-round state must reset it themselves.
    fn initialize(&mut self, player: PlayerId);

    fn select_card(&mut self, hand: &Hand, table: &TableState) -> Selection;

    /// Another player laid `card`.
    fn observe_move(&mut self, _player: PlayerId, _card: Card) {}

    /// Another player passed (or had an invalid selection demoted to a pass).
    fn observe_pass(&mut self, _player: PlayerId) {}

    fn name(&self) -> &str;
}
