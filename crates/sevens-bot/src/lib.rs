pub mod policy;
pub mod registry;

pub use policy::{GreedyStrategy, PassiveStrategy, RandomStrategy};
pub use registry::{LoadError, Locator, StrategyRegistry};
