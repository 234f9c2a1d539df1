#![deny(warnings)]
pub mod game;
pub mod model;
pub mod strategy;

pub use game::match_state::{MatchConfig, MatchEngine, MatchError, MatchState};
pub use game::round::{RoundConfig, RoundOutcome, RoundPhase, RoundResult, RoundState};
pub use game::serialization::{MatchSummary, Standing};
pub use strategy::{Selection, Strategy};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "sevens"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "sevens");
        assert!(!AppInfo::version().is_empty());
    }
}
