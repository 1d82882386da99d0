//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::collections::HashMap;
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    EntityRepository, ErrorContext, LinkRepository, RepositoryError, RepositoryResult,
};
use crate::models::{
    Constellation, ConstellationId, EntityKind, Exoplanet, ExoplanetId, Link, LinkKind,
    Publication, PublicationId, Star, StarId,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables (see module docs).
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
                RepositoryError::internal_with_context(
                    format!("Migration failed: {}", e),
                    ErrorContext::new("run_migrations"),
                )
            })?;
        }

        Ok(Self { pool, config })
    }

    /// Execute a database operation on the blocking pool, retrying transient
    /// failures with exponential backoff.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        return Err(err);
                    }
                };

                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

}

/// Map an insert failure, reporting unique violations as duplicate ids.
fn insert_error(err: DieselError, operation: &str, entity: EntityKind, id: i64) -> RepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RepositoryError::duplicate_id(operation, entity, id)
        }
        other => RepositoryError::from(other).with_operation(operation),
    }
}

fn entity_exists(conn: &mut PgConnection, kind: EntityKind, id: i64) -> QueryResult<bool> {
    match kind {
        EntityKind::Star => diesel::select(exists(stars::table.find(id))).get_result(conn),
        EntityKind::Exoplanet => {
            diesel::select(exists(exoplanets::table.find(id))).get_result(conn)
        }
        EntityKind::Constellation => {
            diesel::select(exists(constellations::table.find(id))).get_result(conn)
        }
        EntityKind::Publication => {
            diesel::select(exists(publications::table.find(id))).get_result(conn)
        }
    }
}

/// Reorder fetched rows to follow `ids`, dropping ids with no row.
fn in_request_order<R, T>(ids: &[i64], rows: Vec<R>, key: impl Fn(&R) -> i64) -> Vec<T>
where
    T: From<R>,
{
    let mut by_id: HashMap<i64, R> = rows.into_iter().map(|r| (key(&r), r)).collect();
    ids.iter()
        .filter_map(|id| by_id.remove(id))
        .map(T::from)
        .collect()
}

#[async_trait]
impl EntityRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1").execute(conn).map_err(RepositoryError::from)?;
            Ok(true)
        })
        .await
    }

    async fn count_entities(&self, kind: EntityKind) -> RepositoryResult<usize> {
        self.with_conn(move |conn| {
            let count: i64 = match kind {
                EntityKind::Star => stars::table.count().get_result(conn)?,
                EntityKind::Exoplanet => exoplanets::table.count().get_result(conn)?,
                EntityKind::Constellation => constellations::table.count().get_result(conn)?,
                EntityKind::Publication => publications::table.count().get_result(conn)?,
            };
            Ok(count as usize)
        })
        .await
    }

    async fn insert_star(&self, star: &Star) -> RepositoryResult<()> {
        let row = StarRow::from(star);
        self.with_conn(move |conn| {
            diesel::insert_into(stars::table)
                .values(&row)
                .execute(conn)
                .map_err(|e| insert_error(e, "insert_star", EntityKind::Star, row.id))?;
            Ok(())
        })
        .await
    }

    async fn get_star(&self, id: StarId) -> RepositoryResult<Star> {
        let raw = id.value();
        self.with_conn(move |conn| {
            stars::table
                .find(raw)
                .select(StarRow::as_select())
                .first(conn)
                .optional()?
                .map(Star::from)
                .ok_or_else(|| RepositoryError::missing_entity("get_star", EntityKind::Star, raw))
        })
        .await
    }

    async fn list_stars(&self) -> RepositoryResult<Vec<Star>> {
        self.with_conn(|conn| {
            let rows = stars::table
                .order(stars::id.asc())
                .select(StarRow::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(Star::from).collect())
        })
        .await
    }

    async fn stars_by_ids(&self, ids: &[StarId]) -> RepositoryResult<Vec<Star>> {
        let ids: Vec<i64> = ids.iter().map(StarId::value).collect();
        self.with_conn(move |conn| {
            let rows = stars::table
                .filter(stars::id.eq_any(&ids))
                .select(StarRow::as_select())
                .load(conn)?;
            Ok(in_request_order(&ids, rows, |r: &StarRow| r.id))
        })
        .await
    }

    async fn insert_exoplanet(&self, exoplanet: &Exoplanet) -> RepositoryResult<()> {
        let row = ExoplanetRow::from(exoplanet);
        self.with_conn(move |conn| {
            diesel::insert_into(exoplanets::table)
                .values(&row)
                .execute(conn)
                .map_err(|e| insert_error(e, "insert_exoplanet", EntityKind::Exoplanet, row.id))?;
            Ok(())
        })
        .await
    }

    async fn get_exoplanet(&self, id: ExoplanetId) -> RepositoryResult<Exoplanet> {
        let raw = id.value();
        self.with_conn(move |conn| {
            exoplanets::table
                .find(raw)
                .select(ExoplanetRow::as_select())
                .first(conn)
                .optional()?
                .map(Exoplanet::from)
                .ok_or_else(|| {
                    RepositoryError::missing_entity("get_exoplanet", EntityKind::Exoplanet, raw)
                })
        })
        .await
    }

    async fn list_exoplanets(&self) -> RepositoryResult<Vec<Exoplanet>> {
        self.with_conn(|conn| {
            let rows = exoplanets::table
                .order(exoplanets::id.asc())
                .select(ExoplanetRow::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(Exoplanet::from).collect())
        })
        .await
    }

    async fn exoplanets_by_ids(&self, ids: &[ExoplanetId]) -> RepositoryResult<Vec<Exoplanet>> {
        let ids: Vec<i64> = ids.iter().map(ExoplanetId::value).collect();
        self.with_conn(move |conn| {
            let rows = exoplanets::table
                .filter(exoplanets::id.eq_any(&ids))
                .select(ExoplanetRow::as_select())
                .load(conn)?;
            Ok(in_request_order(&ids, rows, |r: &ExoplanetRow| r.id))
        })
        .await
    }

    async fn insert_constellation(&self, constellation: &Constellation) -> RepositoryResult<()> {
        let row = ConstellationRow::from(constellation);
        self.with_conn(move |conn| {
            diesel::insert_into(constellations::table)
                .values(&row)
                .execute(conn)
                .map_err(|e| {
                    insert_error(e, "insert_constellation", EntityKind::Constellation, row.id)
                })?;
            Ok(())
        })
        .await
    }

    async fn get_constellation(&self, id: ConstellationId) -> RepositoryResult<Constellation> {
        let raw = id.value();
        self.with_conn(move |conn| {
            constellations::table
                .find(raw)
                .select(ConstellationRow::as_select())
                .first(conn)
                .optional()?
                .map(Constellation::from)
                .ok_or_else(|| {
                    RepositoryError::missing_entity(
                        "get_constellation",
                        EntityKind::Constellation,
                        raw,
                    )
                })
        })
        .await
    }

    async fn list_constellations(&self) -> RepositoryResult<Vec<Constellation>> {
        self.with_conn(|conn| {
            let rows = constellations::table
                .order(constellations::id.asc())
                .select(ConstellationRow::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(Constellation::from).collect())
        })
        .await
    }

    async fn constellations_by_ids(
        &self,
        ids: &[ConstellationId],
    ) -> RepositoryResult<Vec<Constellation>> {
        let ids: Vec<i64> = ids.iter().map(ConstellationId::value).collect();
        self.with_conn(move |conn| {
            let rows = constellations::table
                .filter(constellations::id.eq_any(&ids))
                .select(ConstellationRow::as_select())
                .load(conn)?;
            Ok(in_request_order(&ids, rows, |r: &ConstellationRow| r.id))
        })
        .await
    }

    async fn insert_publication(&self, publication: &Publication) -> RepositoryResult<()> {
        let row = PublicationRow::from(publication);
        self.with_conn(move |conn| {
            diesel::insert_into(publications::table)
                .values(&row)
                .execute(conn)
                .map_err(|e| {
                    insert_error(e, "insert_publication", EntityKind::Publication, row.id)
                })?;
            Ok(())
        })
        .await
    }

    async fn get_publication(&self, id: PublicationId) -> RepositoryResult<Publication> {
        let raw = id.value();
        self.with_conn(move |conn| {
            publications::table
                .find(raw)
                .select(PublicationRow::as_select())
                .first(conn)
                .optional()?
                .map(Publication::from)
                .ok_or_else(|| {
                    RepositoryError::missing_entity(
                        "get_publication",
                        EntityKind::Publication,
                        raw,
                    )
                })
        })
        .await
    }

    async fn list_publications(&self) -> RepositoryResult<Vec<Publication>> {
        self.with_conn(|conn| {
            let rows = publications::table
                .order(publications::id.asc())
                .select(PublicationRow::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(Publication::from).collect())
        })
        .await
    }

    async fn publications_by_ids(
        &self,
        ids: &[PublicationId],
    ) -> RepositoryResult<Vec<Publication>> {
        let ids: Vec<i64> = ids.iter().map(PublicationId::value).collect();
        self.with_conn(move |conn| {
            let rows = publications::table
                .filter(publications::id.eq_any(&ids))
                .select(PublicationRow::as_select())
                .load(conn)?;
            Ok(in_request_order(&ids, rows, |r: &PublicationRow| r.id))
        })
        .await
    }
}

#[async_trait]
impl LinkRepository for PostgresRepository {
    async fn link(&self, link: Link) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|conn| {
                for (kind, id) in [
                    (link.kind.parent_kind(), link.parent),
                    (link.kind.child_kind(), link.child),
                ] {
                    if !entity_exists(conn, kind, id)? {
                        return Err(RepositoryError::missing_entity("link", kind, id));
                    }
                }

                let kind = link.kind.as_str();
                let already_linked: bool = diesel::select(exists(
                    catalog_links::table
                        .filter(catalog_links::kind.eq(kind))
                        .filter(catalog_links::parent_id.eq(link.parent))
                        .filter(catalog_links::child_id.eq(link.child)),
                ))
                .get_result(conn)?;
                if already_linked {
                    return Ok(());
                }

                if link.kind.is_to_one() {
                    diesel::delete(
                        catalog_links::table
                            .filter(catalog_links::kind.eq(kind))
                            .filter(catalog_links::child_id.eq(link.child)),
                    )
                    .execute(conn)?;
                }

                diesel::insert_into(catalog_links::table)
                    .values(&NewLinkRow {
                        kind: kind.to_string(),
                        parent_id: link.parent,
                        child_id: link.child,
                    })
                    .execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    async fn children(&self, kind: LinkKind, parent: i64) -> RepositoryResult<Vec<i64>> {
        self.with_conn(move |conn| {
            let ids = catalog_links::table
                .filter(catalog_links::kind.eq(kind.as_str()))
                .filter(catalog_links::parent_id.eq(parent))
                .order(catalog_links::link_id.asc())
                .select(catalog_links::child_id)
                .load::<i64>(conn)?;
            Ok(ids)
        })
        .await
    }

    async fn parents(&self, kind: LinkKind, child: i64) -> RepositoryResult<Vec<i64>> {
        self.with_conn(move |conn| {
            let ids = catalog_links::table
                .filter(catalog_links::kind.eq(kind.as_str()))
                .filter(catalog_links::child_id.eq(child))
                .order(catalog_links::link_id.asc())
                .select(catalog_links::parent_id)
                .load::<i64>(conn)?;
            Ok(ids)
        })
        .await
    }
}
