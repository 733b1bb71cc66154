//! In-memory catalog table.
//!
//! Backs the selector and HTTP tests without a database, and serves as the
//! reference behaviour for the `PostgreSQL` stores: rows ordered by id,
//! `first_at_or_after` is a range lookup.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use arena_types::{Fighter, Location};

use crate::error::DbError;
use crate::source::{CatalogSource, IdSource};

/// Records that carry their own primary key.
pub trait Keyed {
    /// The primary key.
    fn key(&self) -> i64;
}

impl Keyed for Fighter {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for Location {
    fn key(&self) -> i64 {
        self.id
    }
}

/// A table held in a [`BTreeMap`] keyed by id.
#[derive(Debug, Default)]
pub struct MemoryTable<T> {
    rows: RwLock<BTreeMap<i64, T>>,
}

impl<T: Keyed + Clone> MemoryTable<T> {
    /// Build a table from rows; later duplicates replace earlier ones.
    pub fn from_rows(rows: impl IntoIterator<Item = T>) -> Self {
        Self {
            rows: RwLock::new(rows.into_iter().map(|r| (r.key(), r)).collect()),
        }
    }

    /// Remove a row, returning it if present.
    pub fn remove(&self, id: i64) -> Option<T> {
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }
}

impl<T: Keyed + Clone + Send + Sync> IdSource for MemoryTable<T> {
    type Row = T;

    async fn max_id(&self) -> Result<Option<i64>, DbError> {
        Ok(self
            .rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .next_back()
            .copied())
    }

    async fn first_at_or_after(&self, id: i64) -> Result<Option<T>, DbError> {
        Ok(self
            .rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .range(id..)
            .next()
            .map(|(_, row)| row.clone()))
    }
}

impl<T: Keyed + Clone + Send + Sync> CatalogSource for MemoryTable<T> {
    async fn list_all(&self) -> Result<Vec<T>, DbError> {
        Ok(self
            .rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<T>, DbError> {
        Ok(self
            .rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned())
    }
}
