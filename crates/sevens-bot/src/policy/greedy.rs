use super::log_decision;
use sevens_core::model::hand::Hand;
use sevens_core::model::player::PlayerId;
use sevens_core::model::rules::is_playable;
use sevens_core::model::table::TableState;
use sevens_core::strategy::{Selection, Strategy};

/// Lays the first playable card in hand order.
#[derive(Debug, Default)]
pub struct GreedyStrategy {
    player: Option<PlayerId>,
}

impl GreedyStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for GreedyStrategy {
    fn initialize(&mut self, player: PlayerId) {
        self.player = Some(player);
    }

    fn select_card(&mut self, hand: &Hand, table: &TableState) -> Selection {
        let selection = hand
            .iter()
            .position(|card| is_playable(*card, table))
            .map_or(Selection::Pass, Selection::Play);
        log_decision(self.player, self.name(), selection);
        selection
    }

    fn name(&self) -> &str {
        "greedy"
    }
}
