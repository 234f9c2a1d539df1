use crate::model::hand::Hand;
use crate::model::rules::has_playable;
use crate::model::table::TableState;

/// True when no still-active hand holds a single playable card.
///
/// Empty hands are inactive and ignored. Only consulted after a full
/// rotation of passes, to tell a genuine deadlock from players who have not
/// yet had a turn since the last card went down.
pub fn is_blocked<'a, I>(hands: I, table: &TableState) -> bool
where
    I: IntoIterator<Item = &'a Hand>,
{
    hands
        .into_iter()
        .filter(|hand| !hand.is_empty())
        .all(|hand| !has_playable(hand, table))
}

#[cfg(test)]
mod tests {
    use super::is_blocked;
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::table::TableState;

    #[test]
    fn face_up_sevens_alone_are_blocked() {
        let mut table = TableState::default();
        for suit in Suit::ALL {
            table.place(Card::new(Rank::Seven, suit));
        }
        let hands = vec![
            Hand::with_cards(vec![Card::new(Rank::Seven, Suit::Clubs)]),
            Hand::with_cards(vec![Card::new(Rank::Seven, Suit::Hearts)]),
            Hand::with_cards(vec![Card::new(Rank::Seven, Suit::Spades)]),
        ];
        assert!(is_blocked(&hands, &table));
    }

    #[test]
    fn one_playable_card_anywhere_breaks_the_block() {
        let table = TableState::default();
        let hands = vec![
            Hand::with_cards(vec![Card::new(Rank::Two, Suit::Clubs)]),
            Hand::with_cards(vec![Card::new(Rank::Eight, Suit::Diamonds)]),
        ];
        assert!(!is_blocked(&hands, &table));
    }

    #[test]
    fn empty_hands_are_ignored() {
        let table = TableState::default();
        let hands = vec![
            Hand::new(),
            Hand::with_cards(vec![Card::new(Rank::King, Suit::Hearts)]),
        ];
        assert!(is_blocked(&hands, &table));
    }
}
