//! Key-value preferences store
//!
//! Settings and the high score are flat named values. Reads never fail: a
//! missing or mistyped value is `None` and the caller falls back to its
//! default. Writes are buffered until `flush`.
//!
//! Backends:
//! - `MemoryStore` for tests and headless runs
//! - `FileStore`, a JSON object on disk written via tmp + rename

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde_json::Value;

use crate::error::StoreError;

pub trait KeyValueStore {
    /// Raw value for `key`, if present
    fn get(&self, key: &str) -> Option<&Value>;

    /// Buffer a value; not durable until `flush`
    fn set(&mut self, key: &str, value: Value);

    /// Commit buffered writes
    fn flush(&mut self) -> Result<(), StoreError>;

    fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    fn get_float(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(Value::as_f64).map(|v| v as f32)
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.set(key, Value::from(value));
    }

    fn set_float(&mut self, key: &str, value: f32) {
        // NaN has no JSON form; keep the old value instead
        if value.is_finite() {
            self.set(key, Value::from(f64::from(value)));
        }
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, Value::Bool(value));
    }
}
