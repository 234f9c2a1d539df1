use crate::policy::{GreedyStrategy, PassiveStrategy, RandomStrategy};
use sevens_core::strategy::Strategy;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{Level, event};

type Constructor = Box<dyn Fn(&Locator) -> Result<Box<dyn Strategy>, LoadError> + Send + Sync>;

/// Parsed form of `name` or `name?key=value&key=value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub name: String,
    pub params: BTreeMap<String, String>,
}

impl Locator {
    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let raw = raw.trim();
        let (name, query) = match raw.split_once('?') {
            Some((name, query)) => (name.trim(), Some(query)),
            None => (raw, None),
        };
        if name.is_empty() {
            return Err(LoadError::EmptyLocator);
        }

        let mut params = BTreeMap::new();
        for pair in query.into_iter().flat_map(|q| q.split('&')).filter(|p| !p.is_empty()) {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(LoadError::MalformedParam {
                    locator: raw.to_string(),
                    param: pair.to_string(),
                });
            };
            params.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }

        Ok(Self {
            name: name.to_ascii_lowercase(),
            params,
        })
    }

    /// Fails if any parameter other than `allowed` was supplied.
    pub fn expect_only(&self, allowed: &[&str]) -> Result<(), LoadError> {
        match self.params.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(LoadError::InvalidParam {
                strategy: self.name.clone(),
                key: key.clone(),
                message: "unknown parameter".to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn u64_param(&self, key: &str) -> Result<Option<u64>, LoadError> {
        self.params
            .get(key)
            .map(|value| {
                value.parse::<u64>().map_err(|err| LoadError::InvalidParam {
                    strategy: self.name.clone(),
                    key: key.to_string(),
                    message: err.to_string(),
                })
            })
            .transpose()
    }
}

/// Turns locator strings into ready-to-seat strategies.
pub struct StrategyRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl StrategyRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Registry preloaded with `random`, `greedy` and `passive`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("random", |locator| {
            locator.expect_only(&["seed"])?;
            let strategy = match locator.u64_param("seed")? {
                Some(seed) => RandomStrategy::with_seed(seed),
                None => RandomStrategy::new(),
            };
            Ok(Box::new(strategy))
        });
        registry.register("greedy", |locator| {
            locator.expect_only(&[])?;
            Ok(Box::new(GreedyStrategy::new()))
        });
        registry.register("passive", |locator| {
            locator.expect_only(&[])?;
            Ok(Box::new(PassiveStrategy))
        });
        registry
    }

    pub fn register<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn(&Locator) -> Result<Box<dyn Strategy>, LoadError> + Send + Sync + 'static,
    {
        self.constructors
            .insert(name.to_ascii_lowercase(), Box::new(constructor));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn contains(&self, locator: &str) -> bool {
        Locator::parse(locator)
            .map(|parsed| self.constructors.contains_key(&parsed.name))
            .unwrap_or(false)
    }

    pub fn create(&self, locator: &str) -> Result<Box<dyn Strategy>, LoadError> {
        let parsed = Locator::parse(locator)?;
        let constructor =
            self.constructors
                .get(&parsed.name)
                .ok_or_else(|| LoadError::UnknownStrategy {
                    name: parsed.name.clone(),
                })?;
        let strategy = constructor(&parsed)?;
        event!(
            target: "sevens_bot::registry",
            Level::DEBUG,
            locator,
            strategy = strategy.name(),
            "strategy loaded"
        );
        Ok(strategy)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("strategy locator is empty")]
    EmptyLocator,
    #[error("unknown strategy '{name}'")]
    UnknownStrategy { name: String },
    #[error("malformed parameter '{param}' in locator '{locator}'")]
    MalformedParam { locator: String, param: String },
    #[error("invalid parameter '{key}' for strategy '{strategy}': {message}")]
    InvalidParam {
        strategy: String,
        key: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::{LoadError, Locator, StrategyRegistry};

    #[test]
    fn parses_name_and_params() {
        let locator = Locator::parse(" Random?seed=42 ").unwrap();
        assert_eq!(locator.name, "random");
        assert_eq!(locator.params.get("seed").map(String::as_str), Some("42"));
        assert_eq!(locator.u64_param("seed").unwrap(), Some(42));
    }

    #[test]
    fn builtins_are_available() {
        let registry = StrategyRegistry::with_builtins();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["greedy", "passive", "random"]);
        assert_eq!(registry.create("greedy").unwrap().name(), "greedy");
        assert_eq!(registry.create("random?seed=3").unwrap().name(), "random");
        assert!(registry.contains("passive"));
    }

    #[test]
    fn load_failures_are_typed() {
        let registry = StrategyRegistry::with_builtins();
        assert!(matches!(
            registry.create("libfancy.so"),
            Err(LoadError::UnknownStrategy { .. })
        ));
        assert!(matches!(registry.create("  "), Err(LoadError::EmptyLocator)));
        assert!(matches!(
            registry.create("random?seed"),
            Err(LoadError::MalformedParam { .. })
        ));
        assert!(matches!(
            registry.create("random?seed=abc"),
            Err(LoadError::InvalidParam { .. })
        ));
        assert!(matches!(
            registry.create("greedy?depth=2"),
            Err(LoadError::InvalidParam { .. })
        ));
    }

    #[test]
    fn custom_constructors_can_be_registered() {
        let mut registry = StrategyRegistry::empty();
        registry.register("Lazy", |_| Ok(Box::new(crate::policy::PassiveStrategy)));
        assert_eq!(registry.create("lazy").unwrap().name(), "passive");
        assert!(registry.create("random").is_err());
    }
}
