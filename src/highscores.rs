//! Persisted best score
//!
//! Stored as a single integer under `highScore`.

use crate::error::StoreError;
use crate::persistence::KeyValueStore;

const KEY_HIGH_SCORE: &str = "highScore";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// Read the stored best; missing or negative values count as zero
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let best = store
            .get_int(KEY_HIGH_SCORE)
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(0);
        log::info!("High score: {best}");
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Whether `score` would replace the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Save and flush `score` if it beats the best. Returns whether it did.
    pub fn submit(&mut self, score: u64, store: &mut dyn KeyValueStore) -> Result<bool, StoreError> {
        if !self.qualifies(score) {
            return Ok(false);
        }
        self.best = score;
        store.set_int(KEY_HIGH_SCORE, i64::try_from(score).unwrap_or(i64::MAX));
        store.flush()?;
        log::info!("New high score: {score}");
        Ok(true)
    }
}
