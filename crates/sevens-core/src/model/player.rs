use core::fmt;
use serde::{Deserialize, Serialize};

/// Permanent seat identifier for one match, assigned `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub usize);

impl PlayerId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }

    /// Ascending ids `0..count`, the fixed turn order of a round.
    pub fn range(count: usize) -> impl Iterator<Item = PlayerId> {
        (0..count).map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::PlayerId;

    #[test]
    fn display_prefixes_seat_number() {
        assert_eq!(PlayerId::new(3).to_string(), "P3");
    }

    #[test]
    fn range_is_ascending() {
        let ids: Vec<_> = PlayerId::range(3).collect();
        assert_eq!(ids, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId::new(2)).unwrap();
        assert_eq!(json, "2");
    }
}
