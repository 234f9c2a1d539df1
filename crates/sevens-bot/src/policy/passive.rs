use sevens_core::model::hand::Hand;
use sevens_core::model::player::PlayerId;
use sevens_core::model::table::TableState;
use sevens_core::strategy::{Selection, Strategy};

/// Never plays. Useful as a sparring partner and for exercising the stall guard.
#[derive(Debug, Default)]
pub struct PassiveStrategy;

impl Strategy for PassiveStrategy {
    fn initialize(&mut self, _player: PlayerId) {}

    fn select_card(&mut self, _hand: &Hand, _table: &TableState) -> Selection {
        Selection::Pass
    }

    fn name(&self) -> &str {
        "passive"
    }
}
