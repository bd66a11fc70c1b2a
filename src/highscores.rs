//! Best score
//!
//! A single integer persisted as a decimal string under the key the web page
//! has always used.

use crate::platform::storage::KeyValueStore;

/// Highest score reached across rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestScore {
    value: u64,
}

impl BestScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "gradleRunnerHighScore";

    pub fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Parse a stored value. Missing or malformed data counts as no prior best.
    pub fn parse(raw: Option<&str>) -> Self {
        let value = match raw.map(str::trim) {
            None => 0,
            Some(text) => text.parse::<u64>().unwrap_or_else(|_| {
                log::warn!("Ignoring malformed best score {:?}", text);
                0
            }),
        };
        Self { value }
    }

    /// Read the best score from `store`
    pub fn load(store: &impl KeyValueStore) -> Self {
        let best = Self::parse(store.get(Self::STORAGE_KEY).as_deref());
        log::info!("Best score: {}", best.value);
        best
    }

    /// Offer a finished round's score. Persists and returns true only on a new best.
    pub fn record(&mut self, score: u64, store: &mut impl KeyValueStore) -> bool {
        if score <= self.value {
            return false;
        }
        self.value = score;
        if !store.set(Self::STORAGE_KEY, &score.to_string()) {
            log::warn!("Could not persist best score {}", score);
        }
        true
    }
}
