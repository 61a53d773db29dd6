//! Keyed record collections
//!
//! Each collection is one JSON array stored under a fixed key. The array is
//! loaded once into memory, indexed by record key, and written back whole
//! on every explicit flush.

use crate::database::Repository;
use crate::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A record that can live in a [`Collection`]
pub trait Record: Serialize + DeserializeOwned + Clone + Send + 'static {
    /// Identity used for lookups; the first record with a given key wins
    fn record_key(&self) -> &str;
}

/// In-memory view of a stored array
struct Loaded<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: Record> Loaded<T> {
    fn from_items(items: Vec<T>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            index.entry(item.record_key().to_string()).or_insert(pos);
        }
        Self { items, index }
    }

    fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&pos| &self.items[pos])
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        match self.index.get(key) {
            Some(&pos) => self.items.get_mut(pos),
            None => None,
        }
    }

    fn push(&mut self, item: T) {
        self.index
            .entry(item.record_key().to_string())
            .or_insert(self.items.len());
        self.items.push(item);
    }
}

/// Ordered, cached collection of records under one storage key
pub struct Collection<T> {
    repo: Repository,
    key: &'static str,
    cache: Arc<Mutex<Option<Loaded<T>>>>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            key: self.key,
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new(repo: Repository, key: &'static str) -> Self {
        Self {
            repo,
            key,
            cache: Arc::new(Mutex::new(None)),
        }
    }

    /// Every record in insertion order
    pub async fn all(&self) -> Result<Vec<T>> {
        let mut slot = self.cache.lock().await;
        let loaded = self.ensure_loaded(&mut slot).await?;
        Ok(loaded.items.clone())
    }

    /// First record with the given key
    pub async fn get(&self, key: &str) -> Result<Option<T>> {
        let mut slot = self.cache.lock().await;
        let loaded = self.ensure_loaded(&mut slot).await?;
        Ok(loaded.get(key).cloned())
    }

    /// Append a record and flush, without any duplicate check
    pub async fn append(&self, item: T) -> Result<()> {
        let mut slot = self.cache.lock().await;
        let loaded = self.ensure_loaded(&mut slot).await?;
        loaded.push(item);
        self.flush(&mut slot).await
    }

    /// Append only if no record with the same key exists.
    ///
    /// Returns `false` (and writes nothing) on a duplicate key.
    pub async fn append_unique(&self, item: T) -> Result<bool> {
        let mut slot = self.cache.lock().await;
        let loaded = self.ensure_loaded(&mut slot).await?;
        if loaded.get(item.record_key()).is_some() {
            return Ok(false);
        }
        loaded.push(item);
        self.flush(&mut slot).await?;
        Ok(true)
    }

    /// Apply `change` to the record with the given key.
    ///
    /// `change` returns whether it modified the record; the collection is
    /// flushed only then. Returns `false` for an unknown key or no change.
    pub async fn modify<F>(&self, key: &str, change: F) -> Result<bool>
    where
        F: FnOnce(&mut T) -> bool,
    {
        let mut slot = self.cache.lock().await;
        let loaded = self.ensure_loaded(&mut slot).await?;
        let changed = match loaded.get_mut(key) {
            Some(record) => change(record),
            None => return Ok(false),
        };
        if changed {
            self.flush(&mut slot).await?;
        }
        Ok(changed)
    }

    async fn ensure_loaded<'a>(&self, slot: &'a mut Option<Loaded<T>>) -> Result<&'a mut Loaded<T>> {
        if slot.is_none() {
            let items = self.load().await?;
            tracing::debug!("Loaded {} records from {}", items.len(), self.key);
            *slot = Some(Loaded::from_items(items));
        }
        Ok(slot.get_or_insert_with(|| Loaded::from_items(Vec::new())))
    }

    /// Missing key reads as empty; unparseable data is a hard error
    async fn load(&self) -> Result<Vec<T>> {
        match self.repo.get_value(self.key).await? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| AppError::CorruptCollection {
                key: self.key.to_string(),
                source,
            }),
        }
    }

    /// Rewrite the whole array. On failure the cache is dropped so the next
    /// access reloads what is actually stored.
    async fn flush(&self, slot: &mut Option<Loaded<T>>) -> Result<()> {
        let Some(loaded) = slot.as_ref() else {
            return Ok(());
        };

        let written = match serde_json::to_string(&loaded.items) {
            Ok(encoded) => self.repo.set_value(self.key, &encoded).await,
            Err(e) => Err(e.into()),
        };

        if written.is_err() {
            tracing::error!("Failed to flush {}; discarding cached copy", self.key);
            *slot = None;
        }
        written
    }
}
