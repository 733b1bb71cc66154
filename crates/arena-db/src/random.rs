//! Random row selection without a full table scan.
//!
//! `ORDER BY RANDOM()` sorts the whole table for every request. Instead the
//! selector reads `MAX(id)` (cached for a short TTL), draws `r` uniformly in
//! `[1, max]` and fetches the first row with `id >= r` through the primary
//! key index. With gaps in the id sequence a row following a gap is picked
//! slightly more often than its neighbours; that bias is accepted in return
//! for one aggregate plus one indexed lookup per draw.
//!
//! A cached maximum can go stale when the highest rows are deleted, leaving
//! `r` past the last surviving id. The selector then drops the cache,
//! re-reads the maximum once and draws again.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;

use crate::error::SelectError;
use crate::source::IdSource;

/// Default lifetime of a cached `MAX(id)`.
pub const DEFAULT_MAX_ID_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy)]
struct CachedMax {
    value: i64,
    fetched_at: Instant,
}

/// Picks one row of an [`IdSource`] at random.
#[derive(Debug)]
pub struct RandomSelector<S> {
    source: S,
    max_id_ttl: Duration,
    cached: Mutex<Option<CachedMax>>,
}

impl<S: IdSource> RandomSelector<S> {
    /// Create a selector caching `MAX(id)` for [`DEFAULT_MAX_ID_TTL`].
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, DEFAULT_MAX_ID_TTL)
    }

    /// Create a selector with a custom cache lifetime. Zero disables caching.
    pub const fn with_ttl(source: S, max_id_ttl: Duration) -> Self {
        Self {
            source,
            max_id_ttl,
            cached: Mutex::new(None),
        }
    }

    /// The wrapped source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Return one row chosen at random.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::EmptyCollection`] when the table has no rows
    /// and [`SelectError::Db`] when the store fails.
    pub async fn select(&self) -> Result<S::Row, SelectError> {
        let max = self.max_id(false).await?;
        if let Some(row) = self.source.first_at_or_after(draw(max)).await? {
            return Ok(row);
        }

        tracing::debug!(max, "draw landed past the last row, refreshing MAX(id)");
        let max = self.max_id(true).await?;
        self.source
            .first_at_or_after(draw(max))
            .await?
            .ok_or(SelectError::EmptyCollection)
    }

    /// Forget the cached maximum.
    pub fn invalidate(&self) {
        *self.cached.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    async fn max_id(&self, refresh: bool) -> Result<i64, SelectError> {
        if !refresh && !self.max_id_ttl.is_zero() {
            let cached = *self.cached.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(c) = cached.filter(|c| c.fetched_at.elapsed() < self.max_id_ttl) {
                return Ok(c.value);
            }
        }

        let Some(value) = self.source.max_id().await? else {
            self.invalidate();
            return Err(SelectError::EmptyCollection);
        };

        if !self.max_id_ttl.is_zero() {
            *self.cached.lock().unwrap_or_else(PoisonError::into_inner) = Some(CachedMax {
                value,
                fetched_at: Instant::now(),
            });
        }
        Ok(value)
    }
}

/// Uniform draw in `[1, max]`. Ids are positive, so `max < 1` draws 1.
fn draw(max: i64) -> i64 {
    rand::rng().random_range(1..=max.max(1))
}
