//! Integration tests for the catalog API endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` over an
//! in-memory table, so no database or TCP listener is needed.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use arena_catalog::{CatalogKind, CatalogState, build_router};
use arena_db::{MemoryTable, RandomSelector};
use arena_types::{Fighter, Location};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

fn fighter(id: i64, name: &str, level: i32) -> Fighter {
    Fighter {
        id,
        name: name.to_owned(),
        alias: None,
        level,
        powers: String::from("flight"),
        picture: format!("https://pics.example/{id}.png"),
    }
}

fn heroes_router(rows: Vec<Fighter>) -> axum::Router {
    let table = MemoryTable::from_rows(rows);
    let state = Arc::new(CatalogState::new(
        CatalogKind::Heroes,
        RandomSelector::new(table),
    ));
    build_router(state)
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn random_hero_returns_a_row() {
    let router = heroes_router(vec![fighter(1, "Storm", 80), fighter(4, "Cyclops", 60)]);
    let (status, body) = get(router, "/api/heroes/random_hero").await;

    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_i64().unwrap();
    assert!(id == 1 || id == 4);
    assert!(body["level"].is_number());
}

#[tokio::test]
async fn random_from_empty_table_is_404() {
    let (status, body) = get(heroes_router(Vec::new()), "/api/heroes/random_hero").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "no heroes available");
}

#[tokio::test]
async fn list_is_ordered_by_id() {
    let router = heroes_router(vec![fighter(9, "Rogue", 70), fighter(2, "Storm", 80)]);
    let (status, body) = get(router, "/api/heroes").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 9]);
}

#[tokio::test]
async fn get_by_id_found_missing_and_malformed() {
    let rows = vec![fighter(3, "Storm", 80)];

    let (status, body) = get(heroes_router(rows.clone()), "/api/heroes/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Storm");

    let (status, _) = get(heroes_router(rows.clone()), "/api/heroes/4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(heroes_router(rows), "/api/heroes/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn locations_kind_serves_its_own_routes() {
    let table = MemoryTable::from_rows(vec![Location {
        id: 1,
        name: String::from("Gotham City"),
        description: String::from("Dark and rainy"),
        picture: String::new(),
    }]);
    let router = build_router(Arc::new(CatalogState::new(
        CatalogKind::Locations,
        RandomSelector::new(table),
    )));

    let (status, body) = get(router.clone(), "/api/locations/random_location").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Gotham City");

    let (status, _) = get(router, "/api/heroes/random_hero").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_names_the_service() {
    let (status, body) = get(heroes_router(Vec::new()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "heroes");
}
