use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::table::TableState;

/// Whether `card` may be laid on `table`.
///
/// A seven opens its suit and is playable while its own cell is face-down.
/// Any other rank needs a face-up neighbour in the same suit.
pub fn is_playable(card: Card, table: &TableState) -> bool {
    if card.is_seven() {
        return !table.contains(card);
    }
    let below = card
        .rank
        .lower()
        .is_some_and(|rank| table.is_face_up(card.suit, rank));
    let above = card
        .rank
        .higher()
        .is_some_and(|rank| table.is_face_up(card.suit, rank));
    below || above
}

/// Indices into `hand` whose card is currently playable.
pub fn playable_indices(hand: &Hand, table: &TableState) -> Vec<usize> {
    hand.iter()
        .enumerate()
        .filter(|(_, card)| is_playable(**card, table))
        .map(|(index, _)| index)
        .collect()
}

pub fn has_playable(hand: &Hand, table: &TableState) -> bool {
    hand.iter().any(|card| is_playable(*card, table))
}
