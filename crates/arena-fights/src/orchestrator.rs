//! Fight orchestration.
//!
//! A random fight fetches a hero, a villain and a location concurrently and
//! joins them before resolving. The whole fan-out runs under one deadline.
//! The first fetch to fail fails the request; the remaining fetches are
//! dropped mid-flight and no fallback fighter is ever substituted.

use std::future::Future;
use std::time::Duration;

use arena_types::{FightRequest, FightResult, Fighter, Fighters, Location};
use serde::de::DeserializeOwned;
use tokio::time::error::Elapsed;
use tracing::{info, warn};
use validator::Validate;

use crate::error::FightError;
use crate::resolver::{FightStamp, resolve};
use crate::upstream::UpstreamClient;

/// Composes fights from the three data services.
#[derive(Debug)]
pub struct FightOrchestrator {
    heroes: UpstreamClient,
    villains: UpstreamClient,
    locations: UpstreamClient,
    deadline: Duration,
}

impl FightOrchestrator {
    /// Create an orchestrator over one client per service.
    pub const fn new(
        heroes: UpstreamClient,
        villains: UpstreamClient,
        locations: UpstreamClient,
        deadline: Duration,
    ) -> Self {
        Self {
            heroes,
            villains,
            locations,
            deadline,
        }
    }

    /// End-to-end budget for one request.
    pub const fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Fight a random hero against a random villain at a random location.
    pub async fn execute_fight(&self) -> Result<FightResult, FightError> {
        let (hero, villain, location) = self
            .within_deadline(async {
                tokio::try_join!(
                    fetch::<Fighter>(&self.heroes),
                    fetch::<Fighter>(&self.villains),
                    fetch::<Location>(&self.locations),
                )
            })
            .await?;

        let result = resolve(hero, villain, location, FightStamp::now());
        log_result(&result);
        Ok(result)
    }

    /// A random hero and a random villain, without fighting.
    pub async fn random_fighters(&self) -> Result<Fighters, FightError> {
        let (hero, villain) = self
            .within_deadline(async {
                tokio::try_join!(
                    fetch::<Fighter>(&self.heroes),
                    fetch::<Fighter>(&self.villains),
                )
            })
            .await?;
        Ok(Fighters { hero, villain })
    }

    /// A random location.
    pub async fn random_location(&self) -> Result<Location, FightError> {
        self.within_deadline(fetch::<Location>(&self.locations)).await
    }

    async fn within_deadline<T>(
        &self,
        work: impl Future<Output = Result<T, FightError>>,
    ) -> Result<T, FightError> {
        tokio::time::timeout(self.deadline, work)
            .await
            .map_err(|e: Elapsed| {
                warn!(
                    deadline_ms = self.deadline.as_millis(),
                    error = %e,
                    "fight deadline elapsed"
                );
                FightError::OrchestrationTimeout(self.deadline)
            })?
    }
}

/// Resolve a caller-supplied fight. Validation runs before anything else.
pub fn custom_fight(request: FightRequest) -> Result<FightResult, FightError> {
    request.validate()?;
    let FightRequest {
        hero,
        villain,
        location,
    } = request;
    let result = resolve(hero, villain, location, FightStamp::now());
    log_result(&result);
    Ok(result)
}

async fn fetch<T: DeserializeOwned>(client: &UpstreamClient) -> Result<T, FightError> {
    client.fetch::<T>().await.map_err(|cause| {
        warn!(
            service = %client.service(),
            url = client.url(),
            reason = cause.reason(),
            error = %cause,
            "upstream fetch failed"
        );
        FightError::UpstreamUnavailable {
            service: client.service(),
            cause,
        }
    })
}

fn log_result(result: &FightResult) {
    info!(
        fight_id = %result.fight_id,
        hero = %result.hero.name,
        hero_level = result.hero.level,
        villain = %result.villain.name,
        villain_level = result.villain.level,
        location = %result.location.name,
        winner = %result.winner_name,
        winner_team = %result.winner_team,
        "fight resolved"
    );
}
