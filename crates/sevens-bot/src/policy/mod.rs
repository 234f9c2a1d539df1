mod greedy;
mod passive;
mod random;

pub use greedy::GreedyStrategy;
pub use passive::PassiveStrategy;
pub use random::RandomStrategy;

use sevens_core::model::player::PlayerId;
use sevens_core::strategy::Selection;
use tracing::{Level, event};

fn log_decision(player: Option<PlayerId>, strategy: &str, selection: Selection) {
    if !tracing::enabled!(target: "sevens_bot::policy", Level::TRACE) {
        return;
    }
    event!(
        target: "sevens_bot::policy",
        Level::TRACE,
        player = ?player,
        strategy,
        selection = ?selection,
        "decision"
    );
}
