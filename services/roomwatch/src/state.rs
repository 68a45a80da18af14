//! Persisted last-known availability per target

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Mapping from target identity to last observed availability
///
/// An entry exists only after a successful check of that target. A missing
/// entry reads as "not available".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedState {
    entries: BTreeMap<String, bool>,
}

impl PersistedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored availability for `identity`, `false` when absent
    pub fn get(&self, identity: &str) -> bool {
        self.entries.get(identity).copied().unwrap_or(false)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn set(&mut self, identity: &str, available: bool) {
        self.entries.insert(identity.to_string(), available);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, bool)> for PersistedState {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// JSON file holding the [`PersistedState`] between runs
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the state file, starting from an empty state if it is missing or unreadable
    pub fn load(&self) -> PersistedState {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No state file at {:?}, starting empty", self.path);
                return PersistedState::new();
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read state file {:?}: {}. Starting empty.",
                    self.path,
                    e
                );
                return PersistedState::new();
            }
        };

        match serde_json::from_str::<PersistedState>(&content) {
            Ok(state) => {
                tracing::debug!("Loaded {} entries from {:?}", state.len(), self.path);
                state
            }
            Err(e) => {
                tracing::warn!(
                    "State file {:?} is malformed: {}. Starting empty.",
                    self.path,
                    e
                );
                PersistedState::new()
            }
        }
    }

    /// Overwrite the state file with `state`
    ///
    /// The content goes to a sibling temporary file first and is renamed into
    /// place, so an interrupted run leaves the previous file intact.
    pub fn save(&self, state: &PersistedState) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    crate::WatchError::State(format!("Creating {:?}: {}", parent, e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(state)?;
        let tmp_path = self.tmp_path();
        std::fs::write(&tmp_path, json)
            .map_err(|e| crate::WatchError::State(format!("Writing {:?}: {}", tmp_path, e)))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            crate::WatchError::State(format!("Replacing {:?}: {}", self.path, e))
        })?;

        tracing::debug!("Saved {} entries to {:?}", state.len(), self.path);
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
