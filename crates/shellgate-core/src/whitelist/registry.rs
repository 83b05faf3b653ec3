//! In-memory whitelist store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::types::{SecurityLevel, WhitelistEntry};
use super::validator::base_command;

/// Thread-safe mapping from base command name to its current policy.
///
/// Names are normalized with [`base_command`] on every operation, so
/// `/usr/bin/ls` and `ls` address the same entry. Nothing is persisted.
#[derive(Debug, Default)]
pub struct WhitelistRegistry {
    entries: RwLock<HashMap<String, WhitelistEntry>>,
}

impl WhitelistRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from seed entries. Later entries overwrite earlier
    /// ones with the same base command.
    pub fn with_entries(seed: impl IntoIterator<Item = WhitelistEntry>) -> Self {
        let registry = Self::new();
        for entry in seed {
            registry.add(entry);
        }
        registry
    }

    /// Insert or overwrite the entry for `entry.command`.
    pub fn add(&self, mut entry: WhitelistEntry) {
        let key = base_command(&entry.command).to_string();
        entry.command = key.clone();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
    }

    /// Remove a command. Absent commands are ignored.
    pub fn remove(&self, command: &str) -> Option<WhitelistEntry> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(base_command(command))
    }

    /// Change the level of an existing entry.
    ///
    /// Returns false (and changes nothing) when the command is absent.
    pub fn update_level(&self, command: &str, level: SecurityLevel) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.get_mut(base_command(command)) {
            Some(entry) => {
                entry.security_level = level;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, command: &str) -> Option<WhitelistEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(base_command(command))
            .cloned()
    }

    /// Snapshot of all entries, in no particular order.
    pub fn list(&self) -> Vec<WhitelistEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
