//! Platform abstraction layer
//!
//! The game runs inside a host that may or may not offer:
//! - A signed-in player identity
//! - A key/value store (cloud or local)
//!
//! Everything that touches the host goes through these types so the core
//! can run headless and in tests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Player as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub id: u64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl PlayerIdentity {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            username: None,
        }
    }

    pub fn with_name(mut self, first: &str, last: Option<&str>) -> Self {
        self.first_name = Some(first.to_string());
        self.last_name = last.map(str::to_string);
        self
    }

    /// Key holding this player's best record
    pub fn storage_key(&self) -> String {
        format!("player_{}", self.id)
    }
}

/// String key/value storage offered by the host
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.get("missing").unwrap().is_none());
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_identity_key() {
        let player = PlayerIdentity::new(42).with_name("Ada", Some("Lovelace"));
        assert_eq!(player.storage_key(), "player_42");
        assert_eq!(player.last_name.as_deref(), Some("Lovelace"));
    }
}
