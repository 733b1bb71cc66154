//! Access traits implemented by every catalog table.
//!
//! [`IdSource`] is the minimum the random selector needs: the largest id and
//! an indexed "first row at or after" lookup. [`CatalogSource`] adds the
//! plain listing and get-by-id reads served by the data services.
//!
//! Futures are required to be `Send` so handlers built on these traits can
//! run on a multi-threaded runtime.

use std::future::Future;

use crate::error::DbError;

/// A table keyed by a positive integer id.
pub trait IdSource: Send + Sync {
    /// The record type stored in the table.
    type Row: Send;

    /// Largest id present, or `None` when the table is empty.
    fn max_id(&self) -> impl Future<Output = Result<Option<i64>, DbError>> + Send;

    /// The row with the smallest id that is `>= id`.
    fn first_at_or_after(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Self::Row>, DbError>> + Send;
}

/// Full read surface of a catalog table.
pub trait CatalogSource: IdSource {
    /// Every row, ordered by id.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Self::Row>, DbError>> + Send;

    /// The row with exactly this id.
    fn find_by_id(&self, id: i64)
    -> impl Future<Output = Result<Option<Self::Row>, DbError>> + Send;
}
