use serde_json::{Map, Value};

use super::KeyValueStore;
use crate::error::StoreError;

/// In-process store. `flush` only counts commits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Map<String, Value>,
    flushes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful flushes so far
    pub fn flush_count(&self) -> u32 {
        self.flushes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.flushes += 1;
        Ok(())
    }
}
