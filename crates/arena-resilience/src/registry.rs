//! Registry of circuit breakers keyed by dependency name.
//!
//! The registry is an explicit, injectable component: whoever builds the
//! upstream clients owns one and hands out [`Arc<CircuitBreaker>`] handles.
//! Breakers live as long as the registry and are never reset manually.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitSnapshot};

/// Process-wide set of breakers sharing one configuration.
#[derive(Debug, Default)]
pub struct CircuitBreakerRegistry {
    config: CircuitBreakerConfig,
    breakers: RwLock<BTreeMap<String, Arc<CircuitBreaker>>>,
}

impl CircuitBreakerRegistry {
    /// Create an empty registry.
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            breakers: RwLock::new(BTreeMap::new()),
        }
    }

    /// Return the breaker for `name`, creating it closed on first use.
    pub fn breaker(&self, name: &str) -> Arc<CircuitBreaker> {
        if let Some(existing) = self.get(name) {
            return existing;
        }
        let mut breakers = self.breakers.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            breakers
                .entry(name.to_owned())
                .or_insert_with(|| Arc::new(CircuitBreaker::new(name, self.config))),
        )
    }

    fn get(&self, name: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Snapshot every breaker, ordered by name.
    pub fn snapshots(&self) -> Vec<(String, CircuitSnapshot)> {
        self.breakers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, breaker)| (name.clone(), breaker.snapshot()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit_breaker::CircuitState;

    #[test]
    fn same_name_returns_same_breaker() {
        let registry = CircuitBreakerRegistry::new(CircuitBreakerConfig::default());
        let a = registry.breaker("heroes");
        let b = registry.breaker("heroes");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test(start_paused = true)]
    async fn breakers_are_isolated_per_service() {
        let registry = CircuitBreakerRegistry::new(CircuitBreakerConfig {
            failure_threshold: 1,
            ..CircuitBreakerConfig::default()
        });
        let heroes = registry.breaker("heroes");
        let villains = registry.breaker("villains");

        if let Ok(permit) = heroes.try_acquire() {
            permit.record_failure();
        }

        assert_eq!(heroes.state(), CircuitState::Open);
        assert_eq!(villains.state(), CircuitState::Closed);
    }

    #[test]
    fn snapshots_are_sorted_by_name() {
        let registry = CircuitBreakerRegistry::new(CircuitBreakerConfig::default());
        registry.breaker("villains");
        registry.breaker("heroes");
        registry.breaker("locations");
        let names: Vec<String> = registry.snapshots().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["heroes", "locations", "villains"]);
    }

    #[test]
    fn get_does_not_create() {
        let registry = CircuitBreakerRegistry::default();
        assert!(registry.get("heroes").is_none());
        assert!(registry.snapshots().is_empty());
    }
}
