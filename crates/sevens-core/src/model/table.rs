use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

/// Face-up cells of the layout, one row per suit and one column per rank.
///
/// Within a round cells only ever flip from face-down to face-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableState {
    cells: [[bool; 13]; 4],
    anchor: Card,
}

impl TableState {
    pub fn with_anchor(anchor: Card) -> Self {
        let mut table = Self {
            cells: [[false; 13]; 4],
            anchor,
        };
        table.place(anchor);
        table
    }

    pub fn anchor(&self) -> Card {
        self.anchor
    }

    pub fn is_face_up(&self, suit: Suit, rank: Rank) -> bool {
        self.cells[suit.index()][rank.index()]
    }

    pub fn contains(&self, card: Card) -> bool {
        self.is_face_up(card.suit, card.rank)
    }

    /// Turns the card's cell face-up. Returns `false` if it already was.
    pub fn place(&mut self, card: Card) -> bool {
        let cell = &mut self.cells[card.suit.index()][card.rank.index()];
        let changed = !*cell;
        *cell = true;
        changed
    }

    pub fn face_up_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|&&up| up).count())
            .sum()
    }

    pub fn face_up_cards(&self) -> impl Iterator<Item = Card> + '_ {
        Suit::ALL.iter().copied().flat_map(move |suit| {
            Rank::ORDERED
                .iter()
                .copied()
                .filter(move |rank| self.is_face_up(suit, *rank))
                .map(move |rank| Card::new(rank, suit))
        })
    }

    /// Lowest and highest face-up rank of a suit, `None` while the suit is closed.
    pub fn run_bounds(&self, suit: Suit) -> Option<(Rank, Rank)> {
        let mut ranks = Rank::ORDERED
            .iter()
            .copied()
            .filter(|rank| self.is_face_up(suit, *rank));
        let low = ranks.next()?;
        let high = ranks.last().unwrap_or(low);
        Some((low, high))
    }
}

impl Default for TableState {
    fn default() -> Self {
        Self::with_anchor(Card::DEFAULT_ANCHOR)
    }
}
