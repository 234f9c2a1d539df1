use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use thiserror::Error;

pub const DECK_SIZE: usize = 52;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    /// Accepts cards from an outside card source, provided they form one full deck.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, DeckError> {
        if cards.len() != DECK_SIZE {
            return Err(DeckError::WrongSize { found: cards.len() });
        }
        let mut seen = HashSet::with_capacity(DECK_SIZE);
        for card in &cards {
            if !seen.insert(*card) {
                return Err(DeckError::Duplicate(*card));
            }
        }
        Ok(Self { cards })
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Deals every card except `anchor` round-robin: player `i` receives the
    /// cards at positions `i, i + n, i + 2n, ...` of the anchor-free sequence.
    pub fn deal(&self, players: usize, anchor: Card) -> Vec<Hand> {
        if players == 0 {
            return Vec::new();
        }
        let mut piles: Vec<Vec<Card>> = (0..players).map(|_| Vec::new()).collect();
        for (position, card) in self
            .cards
            .iter()
            .copied()
            .filter(|card| *card != anchor)
            .enumerate()
        {
            piles[position % players].push(card);
        }
        piles.into_iter().map(Hand::with_cards).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("a deck needs exactly 52 cards, found {found}")]
    WrongSize { found: usize },
    #[error("card {0} appears more than once")]
    Duplicate(Card),
}

#[cfg(test)]
mod tests {
    use super::{Deck, DeckError};
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn standard_deck_has_52_unique_cards() {
        let deck = Deck::standard();
        assert_eq!(deck.cards().len(), 52);
        assert!(Deck::from_cards(deck.cards().to_vec()).is_ok());
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = Deck::shuffled_with_seed(42);
        let deck_b = Deck::shuffled_with_seed(42);
        assert_eq!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        let deck_a = Deck::shuffled_with_seed(1);
        let deck_b = Deck::shuffled_with_seed(2);
        assert_ne!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn from_cards_rejects_duplicates_and_short_decks() {
        let mut cards = Deck::standard().cards().to_vec();
        cards.pop();
        assert_eq!(
            Deck::from_cards(cards.clone()).unwrap_err(),
            DeckError::WrongSize { found: 51 }
        );

        cards.push(Card::new(Rank::Ace, Suit::Clubs));
        assert_eq!(
            Deck::from_cards(cards).unwrap_err(),
            DeckError::Duplicate(Card::new(Rank::Ace, Suit::Clubs))
        );
    }

    #[test]
    fn deal_skips_anchor_and_partitions_the_rest() {
        let deck = Deck::shuffled_with_seed(7);
        let hands = deck.deal(4, Card::DEFAULT_ANCHOR);
        let sizes: Vec<usize> = hands.iter().map(|h| h.len()).collect();
        assert_eq!(sizes, vec![13, 13, 13, 12]);
        assert!(hands.iter().all(|h| !h.contains(Card::DEFAULT_ANCHOR)));

        let total: usize = sizes.iter().sum();
        assert_eq!(total, 51);
    }

    #[test]
    fn deal_follows_round_robin_positions() {
        let deck = Deck::standard();
        let hands = deck.deal(3, Card::DEFAULT_ANCHOR);
        let first = deck.cards()[0];
        let second = deck.cards()[1];
        assert!(hands[0].contains(first));
        assert!(hands[1].contains(second));
    }
}
