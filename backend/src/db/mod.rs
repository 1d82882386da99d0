//! Catalog storage.
//!
//! Entities and the links between them are kept behind the repository
//! traits so the backing store can be swapped at startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP layer (axum handlers, landing page)               │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Nested view assembly                                 │
//! │  - Seed loading                                         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────┐
//!     │                              │
//! ┌───▼──────────────┐   ┌───────────▼──────┐
//! │ Postgres (diesel)│   │ Local (in-memory)│
//! └──────────────────┘   └──────────────────┘
//! ```
//!
//! ```ignore
//! use interswellar::api::PageRequest;
//! use interswellar::db::{services, RepositoryFactory, RepositoryType};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::create(RepositoryType::Local, None).await?;
//!     let stars = services::page_star_views(repo.as_ref(), PageRequest::default()).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use services::{
    get_constellation_view, get_exoplanet_view, get_publication_view, get_star_view,
    health_check, load_seed, page_constellation_views, page_exoplanet_views,
    page_publication_views, page_star_views, CatalogSeed, SeedSummary,
};

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    EntityRepository, ErrorContext, FullRepository, LinkRepository, RepositoryError,
    RepositoryResult,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

/// Initialize the global repository from the environment
/// (see [`RepositoryType::from_env`]). Later calls return the first instance.
pub async fn init_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if let Some(repo) = REPOSITORY.get() {
        return Ok(repo);
    }

    let repo = RepositoryFactory::from_env()
        .await
        .context("Failed to create repository")?;
    Ok(REPOSITORY.get_or_init(|| repo))
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
