//! Reference-counted name dictionary.

use std::collections::HashMap;

use arbor_core::{Kind, NameKey};

use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone)]
struct NameEntry {
    name: String,
    references: u32,
}

/// Interns name parts per node kind. An entry lives while at least one node
/// refers to it.
#[derive(Debug, Clone, Default)]
pub struct NameDictionary {
    keys: HashMap<(Kind, String), NameKey>,
    entries: HashMap<NameKey, (Kind, NameEntry)>,
    next_key: u32,
}

impl NameDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a reference on `name` for `kind`, creating the entry if needed.
    pub fn intern(&mut self, name: &str, kind: Kind) -> NameKey {
        if let Some(key) = self.keys.get(&(kind, name.to_string())) {
            if let Some((_, entry)) = self.entries.get_mut(key) {
                entry.references += 1;
                return *key;
            }
        }
        let key = NameKey::new(self.next_key);
        self.next_key += 1;
        self.keys.insert((kind, name.to_string()), key);
        self.entries.insert(
            key,
            (
                kind,
                NameEntry {
                    name: name.to_string(),
                    references: 1,
                },
            ),
        );
        key
    }

    /// Drop one reference; the entry is removed with its last reference.
    pub fn release(&mut self, key: NameKey) -> StoreResult<()> {
        let (kind, entry) = self
            .entries
            .get_mut(&key)
            .ok_or(StoreError::NameNotFound(key))?;
        entry.references -= 1;
        if entry.references == 0 {
            let lookup = (*kind, entry.name.clone());
            self.entries.remove(&key);
            self.keys.remove(&lookup);
        }
        Ok(())
    }

    pub fn get(&self, key: NameKey) -> Option<&str> {
        self.entries.get(&key).map(|(_, e)| e.name.as_str())
    }

    pub fn references(&self, key: NameKey) -> u32 {
        self.entries.get(&key).map(|(_, e)| e.references).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
