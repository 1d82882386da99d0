//! In-memory local repository implementation.
//!
//! All data is kept in ordered maps and a single edge list behind one
//! `RwLock`, which makes the repository fast, deterministic and isolated for
//! unit tests and local development.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::db::repository::{
    EntityRepository, LinkRepository, RepositoryError, RepositoryResult,
};
use crate::models::{
    Constellation, ConstellationId, EntityKind, Exoplanet, ExoplanetId, Link, LinkKind,
    Publication, PublicationId, Star, StarId,
};

/// In-memory local repository.
///
/// Cloning the repository yields another handle onto the same data.
///
/// # Example
/// ```
/// use interswellar::db::repositories::LocalRepository;
/// use interswellar::db::repository::EntityRepository;
/// use interswellar::models::Star;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = LocalRepository::new();
/// repo.insert_star(&Star::new(1, "Sun", 1.0, 1.0, 5772.0, 1.0)).await.unwrap();
/// assert_eq!(repo.list_stars().await.unwrap().len(), 1);
/// # });
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    stars: BTreeMap<StarId, Star>,
    exoplanets: BTreeMap<ExoplanetId, Exoplanet>,
    constellations: BTreeMap<ConstellationId, Constellation>,
    publications: BTreeMap<PublicationId, Publication>,

    // Edges in insertion order
    links: Vec<Link>,

    // Connection health
    unhealthy: bool,
}

impl LocalData {
    fn contains(&self, kind: EntityKind, id: i64) -> bool {
        match kind {
            EntityKind::Star => self.stars.contains_key(&StarId(id)),
            EntityKind::Exoplanet => self.exoplanets.contains_key(&ExoplanetId(id)),
            EntityKind::Constellation => self.constellations.contains_key(&ConstellationId(id)),
            EntityKind::Publication => self.publications.contains_key(&PublicationId(id)),
        }
    }

    fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Star => self.stars.len(),
            EntityKind::Exoplanet => self.exoplanets.len(),
            EntityKind::Constellation => self.constellations.len(),
            EntityKind::Publication => self.publications.len(),
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().unhealthy = !healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        let unhealthy = data.unhealthy;
        *data = LocalData {
            unhealthy,
            ..Default::default()
        };
    }

    /// Total number of rows across the four entity tables.
    pub fn entity_count(&self) -> usize {
        let data = self.data.read();
        EntityKind::ALL.iter().map(|kind| data.count(*kind)).sum()
    }

    /// Number of stored relationship edges.
    pub fn link_count(&self) -> usize {
        self.data.read().links.len()
    }
}

fn insert_row<K: Ord + Copy, V: Clone>(
    table: &mut BTreeMap<K, V>,
    key: K,
    row: &V,
    operation: &str,
    entity: EntityKind,
    raw_id: i64,
) -> RepositoryResult<()> {
    if table.contains_key(&key) {
        return Err(RepositoryError::duplicate_id(operation, entity, raw_id));
    }
    table.insert(key, row.clone());
    Ok(())
}

fn rows_by_ids<K: Ord + Copy, V: Clone>(table: &BTreeMap<K, V>, ids: &[K]) -> Vec<V> {
    ids.iter().filter_map(|id| table.get(id).cloned()).collect()
}

#[async_trait]
impl EntityRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read();
        if data.unhealthy {
            return Err(RepositoryError::connection("Local repository marked unhealthy"));
        }
        Ok(true)
    }

    async fn count_entities(&self, kind: EntityKind) -> RepositoryResult<usize> {
        Ok(self.data.read().count(kind))
    }

    async fn insert_star(&self, star: &Star) -> RepositoryResult<()> {
        let mut data = self.data.write();
        insert_row(
            &mut data.stars,
            star.id,
            star,
            "insert_star",
            EntityKind::Star,
            star.id.value(),
        )
    }

    async fn get_star(&self, id: StarId) -> RepositoryResult<Star> {
        self.data
            .read()
            .stars
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::missing_entity("get_star", EntityKind::Star, id.value()))
    }

    async fn list_stars(&self) -> RepositoryResult<Vec<Star>> {
        Ok(self.data.read().stars.values().cloned().collect())
    }

    async fn stars_by_ids(&self, ids: &[StarId]) -> RepositoryResult<Vec<Star>> {
        Ok(rows_by_ids(&self.data.read().stars, ids))
    }

    async fn insert_exoplanet(&self, exoplanet: &Exoplanet) -> RepositoryResult<()> {
        let mut data = self.data.write();
        insert_row(
            &mut data.exoplanets,
            exoplanet.id,
            exoplanet,
            "insert_exoplanet",
            EntityKind::Exoplanet,
            exoplanet.id.value(),
        )
    }

    async fn get_exoplanet(&self, id: ExoplanetId) -> RepositoryResult<Exoplanet> {
        self.data
            .read()
            .exoplanets
            .get(&id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::missing_entity("get_exoplanet", EntityKind::Exoplanet, id.value())
            })
    }

    async fn list_exoplanets(&self) -> RepositoryResult<Vec<Exoplanet>> {
        Ok(self.data.read().exoplanets.values().cloned().collect())
    }

    async fn exoplanets_by_ids(&self, ids: &[ExoplanetId]) -> RepositoryResult<Vec<Exoplanet>> {
        Ok(rows_by_ids(&self.data.read().exoplanets, ids))
    }

    async fn insert_constellation(&self, constellation: &Constellation) -> RepositoryResult<()> {
        let mut data = self.data.write();
        insert_row(
            &mut data.constellations,
            constellation.id,
            constellation,
            "insert_constellation",
            EntityKind::Constellation,
            constellation.id.value(),
        )
    }

    async fn get_constellation(&self, id: ConstellationId) -> RepositoryResult<Constellation> {
        self.data
            .read()
            .constellations
            .get(&id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::missing_entity(
                    "get_constellation",
                    EntityKind::Constellation,
                    id.value(),
                )
            })
    }

    async fn list_constellations(&self) -> RepositoryResult<Vec<Constellation>> {
        Ok(self.data.read().constellations.values().cloned().collect())
    }

    async fn constellations_by_ids(
        &self,
        ids: &[ConstellationId],
    ) -> RepositoryResult<Vec<Constellation>> {
        Ok(rows_by_ids(&self.data.read().constellations, ids))
    }

    async fn insert_publication(&self, publication: &Publication) -> RepositoryResult<()> {
        let mut data = self.data.write();
        insert_row(
            &mut data.publications,
            publication.id,
            publication,
            "insert_publication",
            EntityKind::Publication,
            publication.id.value(),
        )
    }

    async fn get_publication(&self, id: PublicationId) -> RepositoryResult<Publication> {
        self.data
            .read()
            .publications
            .get(&id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::missing_entity(
                    "get_publication",
                    EntityKind::Publication,
                    id.value(),
                )
            })
    }

    async fn list_publications(&self) -> RepositoryResult<Vec<Publication>> {
        Ok(self.data.read().publications.values().cloned().collect())
    }

    async fn publications_by_ids(
        &self,
        ids: &[PublicationId],
    ) -> RepositoryResult<Vec<Publication>> {
        Ok(rows_by_ids(&self.data.read().publications, ids))
    }
}

#[async_trait]
impl LinkRepository for LocalRepository {
    async fn link(&self, link: Link) -> RepositoryResult<()> {
        let mut data = self.data.write();

        for (kind, id) in [
            (link.kind.parent_kind(), link.parent),
            (link.kind.child_kind(), link.child),
        ] {
            if !data.contains(kind, id) {
                return Err(RepositoryError::missing_entity("link", kind, id));
            }
        }

        if data.links.contains(&link) {
            return Ok(());
        }

        if link.kind.is_to_one() {
            data.links
                .retain(|existing| !(existing.kind == link.kind && existing.child == link.child));
        }
        data.links.push(link);
        Ok(())
    }

    async fn children(&self, kind: LinkKind, parent: i64) -> RepositoryResult<Vec<i64>> {
        Ok(self
            .data
            .read()
            .links
            .iter()
            .filter(|link| link.kind == kind && link.parent == parent)
            .map(|link| link.child)
            .collect())
    }

    async fn parents(&self, kind: LinkKind, child: i64) -> RepositoryResult<Vec<i64>> {
        Ok(self
            .data
            .read()
            .links
            .iter()
            .filter(|link| link.kind == kind && link.child == child)
            .map(|link| link.parent)
            .collect())
    }
}
