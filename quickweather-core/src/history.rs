//! Recently queried place names, most recent first.

use anyhow::{Context, Result};

use crate::storage::KeyValueStore;

pub const MAX_HISTORY: usize = 5;
const HISTORY_KEY: &str = "history";

#[derive(Debug)]
pub struct HistoryTracker<S> {
    store: S,
    entries: Vec<String>,
}

impl<S: KeyValueStore> HistoryTracker<S> {
    /// Load persisted history. Unreadable history starts empty rather than failing startup.
    pub fn load(store: S) -> Result<Self> {
        let mut entries = match store.get(HISTORY_KEY)? {
            Some(raw) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring unreadable search history");
                Vec::new()
            }),
            None => Vec::new(),
        };

        // Older or hand-edited files may break the invariants.
        let mut seen = Vec::with_capacity(entries.len());
        entries.retain(|name| {
            let fresh = !seen.contains(name);
            if fresh {
                seen.push(name.clone());
            }
            fresh
        });
        entries.truncate(MAX_HISTORY);

        Ok(Self { store, entries })
    }

    /// Move `name` to the front, dropping the oldest entry beyond the cap.
    pub fn record(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }

        self.entries.retain(|existing| existing != name);
        self.entries.insert(0, name.to_string());
        self.entries.truncate(MAX_HISTORY);

        self.persist()
    }

    pub fn list(&self) -> &[String] {
        &self.entries
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.store.remove(HISTORY_KEY)
    }

    fn persist(&mut self) -> Result<()> {
        let json =
            serde_json::to_string(&self.entries).context("Failed to serialize search history")?;
        self.store.set(HISTORY_KEY, &json)
    }
}
