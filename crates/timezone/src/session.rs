//! Per-session key/value storage

use std::collections::HashMap;

/// Key holding the effective zone.
pub const EFFECTIVE_TIMEZONE_KEY: &str = "effectiveTimezone";

/// Key holding the detected zone.
pub const DETECTED_TIMEZONE_KEY: &str = "detectedTimezone";

/// Session-scoped string storage (browser `sessionStorage` and the like).
pub trait SessionStore: Send {
    /// Reads a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes a value.
    fn set(&mut self, key: &str, value: &str);
}

/// A session store held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl MemorySessionStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}
