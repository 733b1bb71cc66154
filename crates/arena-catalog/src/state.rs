//! Shared state for a catalog service.

use arena_db::{CatalogSource, RandomSelector};

use crate::config::CatalogKind;

/// State shared by all handlers of one data service.
///
/// Generic over the backing table so handlers run unchanged against
/// `PostgreSQL` in production and an in-memory table in tests.
#[derive(Debug)]
pub struct CatalogState<S> {
    kind: CatalogKind,
    selector: RandomSelector<S>,
}

impl<S: CatalogSource> CatalogState<S> {
    /// Wrap a selector for `kind`.
    pub const fn new(kind: CatalogKind, selector: RandomSelector<S>) -> Self {
        Self { kind, selector }
    }

    /// The table this service serves.
    pub const fn kind(&self) -> CatalogKind {
        self.kind
    }

    /// Random row selector.
    pub const fn selector(&self) -> &RandomSelector<S> {
        &self.selector
    }

    /// The backing table.
    pub const fn source(&self) -> &S {
        self.selector.source()
    }
}
