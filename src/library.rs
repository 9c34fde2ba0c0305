use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, Utc};

use crate::codec;
use crate::foundation::error::{TacticError, TacticResult};
use crate::model::tactic::TacticState;

/// Key prefix for saved tactics.
pub const KEY_PREFIX: &str = "futsal_tactic_";

/// A named, timestamped tactic stored in a [`KeyValueStore`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SavedRecord {
    pub id: String,
    pub name: String,
    /// Save time, serialized as ISO-8601 UTC.
    pub date: DateTime<Utc>,
    /// Encoded tactic (see [`crate::codec`]).
    pub data: String,
}

impl SavedRecord {
    pub fn key(&self) -> String {
        record_key(&self.id)
    }

    /// Decode the carried tactic.
    pub fn state(&self) -> TacticResult<TacticState> {
        codec::decode(&self.data)
    }
}

fn record_key(id: &str) -> String {
    format!("{KEY_PREFIX}{id}")
}

/// String key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> TacticResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> TacticResult<()>;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> TacticResult<()>;
    fn keys(&self) -> TacticResult<Vec<String>>;
}

/// Volatile store for tests and one-shot sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> TacticResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> TacticResult<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> TacticResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> TacticResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Directory-backed store: one `<key>.json` file per entry.
#[derive(Clone, Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> TacticResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create library directory '{}'", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> TacticResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(TacticError::storage(format!("invalid key '{key}'")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> TacticResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TacticError::storage(format!(
                "read '{}': {e}",
                path.display()
            ))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> TacticResult<()> {
        let path = self.path_for(key)?;
        std::fs::write(&path, value)
            .map_err(|e| TacticError::storage(format!("write '{}': {e}", path.display())))
    }

    fn remove(&mut self, key: &str) -> TacticResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TacticError::storage(format!(
                "remove '{}': {e}",
                path.display()
            ))),
        }
    }

    fn keys(&self) -> TacticResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            TacticError::storage(format!("list '{}': {e}", self.root.display()))
        })?;
        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TacticError::storage(e.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Saved tactics on top of a key-value store.
pub struct TacticLibrary<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TacticLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save `state` under `name`, stamped with the current time.
    pub fn save(&mut self, name: &str, state: &TacticState) -> TacticResult<SavedRecord> {
        self.save_at(name, state, Utc::now())
    }

    /// Save with an explicit timestamp. The id is the timestamp in milliseconds, bumped until
    /// it is free.
    #[tracing::instrument(skip(self, state), fields(frames = state.frames.len()))]
    pub fn save_at(
        &mut self,
        name: &str,
        state: &TacticState,
        date: DateTime<Utc>,
    ) -> TacticResult<SavedRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TacticError::validation("tactic name must not be empty"));
        }

        let mut millis = date.timestamp_millis();
        while self.store.get(&record_key(&millis.to_string()))?.is_some() {
            millis += 1;
        }

        let record = SavedRecord {
            id: millis.to_string(),
            name: name.to_owned(),
            date,
            data: codec::encode(state)?,
        };
        let json = serde_json::to_string(&record)
            .map_err(|e| TacticError::serde(format!("saved record: {e}")))?;
        self.store.set(&record.key(), &json)?;
        tracing::info!(id = %record.id, "tactic saved");
        Ok(record)
    }

    /// Every readable record, most recent first. Unreadable entries are logged and skipped.
    pub fn list(&self) -> TacticResult<Vec<SavedRecord>> {
        let mut out = Vec::new();
        for key in self.store.keys()? {
            if !key.starts_with(KEY_PREFIX) {
                continue;
            }
            let Some(raw) = self.store.get(&key)? else {
                continue;
            };
            match serde_json::from_str::<SavedRecord>(&raw) {
                Ok(rec) => out.push(rec),
                Err(e) => tracing::warn!(key = %key, error = %e, "skipping unreadable saved tactic"),
            }
        }
        out.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(out)
    }

    /// Fetch one record.
    pub fn get(&self, id: &str) -> TacticResult<SavedRecord> {
        let raw = self
            .store
            .get(&record_key(id))?
            .ok_or_else(|| TacticError::storage(format!("no saved tactic with id '{id}'")))?;
        serde_json::from_str(&raw)
            .map_err(|e| TacticError::storage(format!("saved tactic '{id}' is unreadable: {e}")))
    }

    /// Load a record's tactic. Corrupt payloads are a decode error.
    pub fn load(&self, id: &str) -> TacticResult<TacticState> {
        self.get(id)?.state()
    }

    pub fn delete(&mut self, id: &str) -> TacticResult<()> {
        self.store.remove(&record_key(id))?;
        tracing::info!(id, "tactic deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/library.rs"]
mod tests;
