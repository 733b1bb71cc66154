//! `PostgreSQL`-backed catalog tables.
//!
//! The heroes and villains databases each hold one fighter table with the
//! columns `id, name, otherName, level, powers, picture`; the locations
//! database holds `id, name, description, picture`. Unquoted identifiers
//! fold to lowercase in `PostgreSQL`, hence `othername` below.
//!
//! Table names cannot be bound as parameters, so each store renders its SQL
//! once at construction from a fixed `&'static str`.

use arena_types::{Fighter, Location};
use sqlx::PgPool;

use crate::error::DbError;
use crate::source::{CatalogSource, IdSource};

/// Which fighter table a [`FighterStore`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FighterTable {
    /// The `hero` table.
    Hero,
    /// The `villain` table.
    Villain,
}

impl FighterTable {
    /// SQL table name.
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Villain => "villain",
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FighterRow {
    id: i64,
    name: String,
    othername: Option<String>,
    level: i32,
    powers: Option<String>,
    picture: Option<String>,
}

impl From<FighterRow> for Fighter {
    fn from(row: FighterRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            alias: row.othername,
            level: row.level,
            powers: row.powers.unwrap_or_default(),
            picture: row.picture.unwrap_or_default(),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LocationRow {
    id: i64,
    name: String,
    description: Option<String>,
    picture: Option<String>,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description.unwrap_or_default(),
            picture: row.picture.unwrap_or_default(),
        }
    }
}

/// SQL statements for one table.
#[derive(Debug, Clone)]
struct Statements {
    max_id: String,
    at_or_after: String,
    by_id: String,
    list: String,
}

impl Statements {
    fn render(table: &str, columns: &str) -> Self {
        Self {
            max_id: format!("SELECT MAX(id)::bigint FROM {table}"),
            at_or_after: format!(
                "SELECT {columns} FROM {table} WHERE id >= $1 ORDER BY id ASC LIMIT 1"
            ),
            by_id: format!("SELECT {columns} FROM {table} WHERE id = $1"),
            list: format!("SELECT {columns} FROM {table} ORDER BY id ASC"),
        }
    }
}

const FIGHTER_COLUMNS: &str = "id::bigint AS id, name, othername, level::int4 AS level, \
                               powers, picture";

const LOCATION_COLUMNS: &str = "id::bigint AS id, name, description, picture";

async fn fetch_max_id(pool: &PgPool, sql: &str) -> Result<Option<i64>, DbError> {
    let max: Option<i64> = sqlx::query_scalar(sql).fetch_one(pool).await?;
    Ok(max)
}

/// Reads one fighter table.
#[derive(Debug, Clone)]
pub struct FighterStore {
    pool: PgPool,
    sql: Statements,
}

impl FighterStore {
    /// Create a store for `table` on `pool`.
    pub fn new(pool: PgPool, table: FighterTable) -> Self {
        Self {
            pool,
            sql: Statements::render(table.table_name(), FIGHTER_COLUMNS),
        }
    }
}

impl IdSource for FighterStore {
    type Row = Fighter;

    async fn max_id(&self) -> Result<Option<i64>, DbError> {
        fetch_max_id(&self.pool, &self.sql.max_id).await
    }

    async fn first_at_or_after(&self, id: i64) -> Result<Option<Fighter>, DbError> {
        let row: Option<FighterRow> = sqlx::query_as(&self.sql.at_or_after)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Fighter::from))
    }
}

impl CatalogSource for FighterStore {
    async fn list_all(&self) -> Result<Vec<Fighter>, DbError> {
        let rows: Vec<FighterRow> = sqlx::query_as(&self.sql.list)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Fighter::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Fighter>, DbError> {
        let row: Option<FighterRow> = sqlx::query_as(&self.sql.by_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Fighter::from))
    }
}

/// Reads the `location` table.
#[derive(Debug, Clone)]
pub struct LocationStore {
    pool: PgPool,
    sql: Statements,
}

impl LocationStore {
    /// Create a store on `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            sql: Statements::render("location", LOCATION_COLUMNS),
        }
    }
}

impl IdSource for LocationStore {
    type Row = Location;

    async fn max_id(&self) -> Result<Option<i64>, DbError> {
        fetch_max_id(&self.pool, &self.sql.max_id).await
    }

    async fn first_at_or_after(&self, id: i64) -> Result<Option<Location>, DbError> {
        let row: Option<LocationRow> = sqlx::query_as(&self.sql.at_or_after)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Location::from))
    }
}

impl CatalogSource for LocationStore {
    async fn list_all(&self) -> Result<Vec<Location>, DbError> {
        let rows: Vec<LocationRow> = sqlx::query_as(&self.sql.list)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Location::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, DbError> {
        let row: Option<LocationRow> = sqlx::query_as(&self.sql.by_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Location::from))
    }
}
