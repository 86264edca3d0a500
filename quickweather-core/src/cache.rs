//! Last-known-good payload per data kind.

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};

use crate::{model::DataKind, storage::KeyValueStore};

#[derive(Debug)]
pub struct CacheStore<S> {
    store: S,
}

impl<S: KeyValueStore> CacheStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Overwrite the cached payload of `kind`. Other kinds are never touched.
    pub fn put<T: Serialize>(&mut self, kind: DataKind, payload: &T) -> Result<()> {
        let json = serde_json::to_string(payload)
            .with_context(|| format!("Failed to serialize cached {kind}"))?;

        self.store.set(&kind.storage_key(), &json)?;
        tracing::debug!(%kind, "Cache updated");
        Ok(())
    }

    /// `Ok(None)` on a cold start. An entry that no longer parses is treated the same way.
    pub fn get<T: DeserializeOwned>(&self, kind: DataKind) -> Result<Option<T>> {
        let Some(raw) = self.store.get(&kind.storage_key())? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) => {
                tracing::warn!(%kind, error = %e, "Ignoring unreadable cache entry");
                Ok(None)
            }
        }
    }

    pub fn contains(&self, kind: DataKind) -> Result<bool> {
        Ok(self.store.get(&kind.storage_key())?.is_some())
    }

    /// Drop one kind, or every kind when `kind` is `None`.
    pub fn clear(&mut self, kind: Option<DataKind>) -> Result<()> {
        match kind {
            Some(kind) => self.store.remove(&kind.storage_key()),
            None => {
                for kind in DataKind::all() {
                    self.store.remove(&kind.storage_key())?;
                }
                Ok(())
            }
        }
    }
}
