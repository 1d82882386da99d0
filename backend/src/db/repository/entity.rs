//! Entity repository trait: inserts, primary-key lookups and table scans.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{
    Constellation, ConstellationId, EntityKind, Exoplanet, ExoplanetId, Publication,
    PublicationId, Star, StarId,
};

/// Repository trait for the four catalog tables.
///
/// Identifiers are assigned by the caller. Inserting a row whose identifier
/// already exists fails with `RepositoryError::ValidationError` and leaves
/// the table unchanged.
///
/// `list_*` operations return rows ordered by identifier ascending.
/// `*_by_ids` operations return rows in the order of the requested ids and
/// silently skip ids that do not exist.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Check if the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Number of rows in one entity table.
    async fn count_entities(&self, kind: EntityKind) -> RepositoryResult<usize>;

    // ==================== Stars ====================

    async fn insert_star(&self, star: &Star) -> RepositoryResult<()>;

    /// Fetch one star, or `RepositoryError::NotFound`.
    async fn get_star(&self, id: StarId) -> RepositoryResult<Star>;

    async fn list_stars(&self) -> RepositoryResult<Vec<Star>>;

    async fn stars_by_ids(&self, ids: &[StarId]) -> RepositoryResult<Vec<Star>>;

    // ==================== Exoplanets ====================

    async fn insert_exoplanet(&self, exoplanet: &Exoplanet) -> RepositoryResult<()>;

    async fn get_exoplanet(&self, id: ExoplanetId) -> RepositoryResult<Exoplanet>;

    async fn list_exoplanets(&self) -> RepositoryResult<Vec<Exoplanet>>;

    async fn exoplanets_by_ids(&self, ids: &[ExoplanetId]) -> RepositoryResult<Vec<Exoplanet>>;

    // ==================== Constellations ====================

    async fn insert_constellation(&self, constellation: &Constellation) -> RepositoryResult<()>;

    async fn get_constellation(&self, id: ConstellationId) -> RepositoryResult<Constellation>;

    async fn list_constellations(&self) -> RepositoryResult<Vec<Constellation>>;

    async fn constellations_by_ids(
        &self,
        ids: &[ConstellationId],
    ) -> RepositoryResult<Vec<Constellation>>;

    // ==================== Publications ====================

    async fn insert_publication(&self, publication: &Publication) -> RepositoryResult<()>;

    async fn get_publication(&self, id: PublicationId) -> RepositoryResult<Publication>;

    async fn list_publications(&self) -> RepositoryResult<Vec<Publication>>;

    async fn publications_by_ids(
        &self,
        ids: &[PublicationId],
    ) -> RepositoryResult<Vec<Publication>>;
}
