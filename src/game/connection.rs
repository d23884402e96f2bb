//! Connections between same-colored dots
//!
//! A connection is an unordered pair of dot ids. The pair is stored sorted,
//! so clicking A then B and clicking B then A land on the same key.

use std::collections::BTreeSet;
use std::fmt;

/// Canonical, order-independent key for a pair of dot ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionKey {
    low: String,
    high: String,
}

impl ConnectionKey {
    /// Build the canonical key for `{a, b}`
    pub fn new(a: &str, b: &str) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.to_string(),
            high: high.to_string(),
        }
    }

    /// Both endpoint ids, lexicographically sorted
    pub fn endpoints(&self) -> (&str, &str) {
        (&self.low, &self.high)
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Set of connections made during one session. Grows only; cleared on reset.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSet {
    keys: BTreeSet<ConnectionKey>,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key. Returns false if it was already present.
    pub fn insert(&mut self, key: ConnectionKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnectionKey> {
        self.keys.iter()
    }

    pub(super) fn clear(&mut self) {
        self.keys.clear();
    }
}
