//! Typed whole-table access over a `KeyValueStore`.
//!
//! A table is a JSON array stored under a single key. Reads always return a
//! freshly deserialized snapshot; writes replace the array wholesale. Row
//! order is insertion order.

use anyhow::Result;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

use super::traits::KeyValueStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Table '{key}' holds unreadable data: {source}")]
    CorruptTable {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One logical table of `T` rows
pub struct Table<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    _rows: PhantomData<fn() -> T>,
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key,
            _rows: PhantomData,
        }
    }
}

impl<T> Table<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _rows: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Load every row. A key that was never written is an empty table.
    pub fn load(&self) -> Result<Vec<T>> {
        match self.store.get(self.key)? {
            None => Ok(Vec::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => {
                let rows = serde_json::from_str(&raw).map_err(|source| StorageError::CorruptTable {
                    key: self.key.to_string(),
                    source,
                })?;
                Ok(rows)
            }
        }
    }

    /// Replace the whole table
    pub fn replace(&self, rows: &[T]) -> Result<()> {
        let raw = serde_json::to_string(rows)?;
        self.store.set(self.key, &raw)?;
        debug!("Saved {} rows to table '{}'", rows.len(), self.key);
        Ok(())
    }

    /// Append a row at the end of the table
    pub fn insert(&self, row: T) -> Result<()> {
        let mut rows = self.load()?;
        rows.push(row);
        self.replace(&rows)
    }

    pub fn find<P>(&self, predicate: P) -> Result<Option<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.load()?.into_iter().find(|row| predicate(row)))
    }

    pub fn filter<P>(&self, predicate: P) -> Result<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self
            .load()?
            .into_iter()
            .filter(|row| predicate(row))
            .collect())
    }

    /// Apply `update` to the first matching row and save the table.
    /// Returns the updated row, or `None` (and writes nothing) when no row matches.
    pub fn update_first<P, F>(&self, predicate: P, update: F) -> Result<Option<T>>
    where
        T: Clone,
        P: Fn(&T) -> bool,
        F: FnOnce(&mut T),
    {
        let mut rows = self.load()?;
        let Some(row) = rows.iter_mut().find(|row| predicate(row)) else {
            return Ok(None);
        };
        update(row);
        let updated = row.clone();
        self.replace(&rows)?;
        Ok(Some(updated))
    }

    /// Remove every matching row. Writes only when something was removed.
    pub fn remove_where<P>(&self, predicate: P) -> Result<usize>
    where
        P: Fn(&T) -> bool,
    {
        let mut rows = self.load()?;
        let before = rows.len();
        rows.retain(|row| !predicate(row));
        let removed = before - rows.len();
        if removed > 0 {
            self.replace(&rows)?;
        }
        Ok(removed)
    }
}
