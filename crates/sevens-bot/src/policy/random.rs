use super::log_decision;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sevens_core::model::hand::Hand;
use sevens_core::model::player::PlayerId;
use sevens_core::model::rules::playable_indices;
use sevens_core::model::table::TableState;
use sevens_core::strategy::{Selection, Strategy};

/// Picks uniformly among the playable cards, passing only when there are none.
pub struct RandomStrategy {
    player: Option<PlayerId>,
    rng: StdRng,
    seed: u64,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            player: None,
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn initialize(&mut self, player: PlayerId) {
        self.player = Some(player);
    }

    fn select_card(&mut self, hand: &Hand, table: &TableState) -> Selection {
        let playable = playable_indices(hand, table);
        let selection = playable
            .choose(&mut self.rng)
            .map_or(Selection::Pass, |index| Selection::Play(*index));
        log_decision(self.player, self.name(), selection);
        selection
    }

    fn name(&self) -> &str {
        "random"
    }
}
