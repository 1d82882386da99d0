//! High-level database service layer.
//!
//! Repository-agnostic operations that work with any [`FullRepository`]:
//! resolving relationship edges into nested views, loading whole catalogs
//! from seed documents, and health checks.
//!
//! # Usage
//!
//! ```no_run
//! use interswellar::db::{services, repositories::LocalRepository};
//! use interswellar::api::PageRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let page = services::page_star_views(&repo, PageRequest::default()).await?;
//!     println!("Found {} stars", page.num_results);
//!     Ok(())
//! }
//! ```

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::api::{
    CollectionPage, ConstellationView, ExoplanetView, PageRequest, PublicationView, StarView,
};
use crate::models::{
    Constellation, ConstellationId, Exoplanet, ExoplanetId, Link, LinkKind, Publication,
    PublicationId, Star, StarId,
};

// ==================== Health & Connection ====================

/// Check if the database connection is healthy.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Relationship helpers ====================

async fn child_ids<R, T>(repo: &R, kind: LinkKind, parent: i64) -> RepositoryResult<Vec<T>>
where
    R: FullRepository + ?Sized,
    T: From<i64>,
{
    Ok(repo
        .children(kind, parent)
        .await?
        .into_iter()
        .map(T::from)
        .collect())
}

async fn parent_ids<R, T>(repo: &R, kind: LinkKind, child: i64) -> RepositoryResult<Vec<T>>
where
    R: FullRepository + ?Sized,
    T: From<i64>,
{
    Ok(repo
        .parents(kind, child)
        .await?
        .into_iter()
        .map(T::from)
        .collect())
}

/// Resolve the discovering publication of a star or exoplanet.
///
/// The explicit discovery link wins; otherwise the first citing publication
/// (in link order) is credited.
async fn discoverer<R: FullRepository + ?Sized>(
    repo: &R,
    discovery: LinkKind,
    citation: LinkKind,
    child: i64,
) -> RepositoryResult<Option<Publication>> {
    let explicit: Vec<PublicationId> = parent_ids(repo, discovery, child).await?;
    let candidate = match explicit.first() {
        Some(id) => Some(*id),
        None => parent_ids::<_, PublicationId>(repo, citation, child)
            .await?
            .first()
            .copied(),
    };

    match candidate {
        Some(id) => Ok(repo.publications_by_ids(&[id]).await?.into_iter().next()),
        None => Ok(None),
    }
}

// ==================== Stars ====================

async fn star_view<R: FullRepository + ?Sized>(repo: &R, star: Star) -> RepositoryResult<StarView> {
    let raw = star.id.value();

    let exoplanet_ids: Vec<ExoplanetId> = child_ids(repo, LinkKind::StarExoplanets, raw).await?;
    let exoplanets = repo.exoplanets_by_ids(&exoplanet_ids).await?;

    let constellation_ids: Vec<ConstellationId> =
        parent_ids(repo, LinkKind::ConstellationStars, raw).await?;
    let constellation = repo
        .constellations_by_ids(&constellation_ids)
        .await?
        .into_iter()
        .next();

    let discovered_by = discoverer(
        repo,
        LinkKind::StarDiscoveries,
        LinkKind::PublicationStars,
        raw,
    )
    .await?;

    let publication_ids: Vec<PublicationId> =
        parent_ids(repo, LinkKind::PublicationStars, raw).await?;
    let publications = repo.publications_by_ids(&publication_ids).await?;

    Ok(StarView {
        star,
        exoplanets,
        constellation,
        discovered_by,
        publications,
    })
}

/// Fetch one star with its relationships, or `RepositoryError::NotFound`.
pub async fn get_star_view<R: FullRepository + ?Sized>(
    repo: &R,
    id: StarId,
) -> RepositoryResult<StarView> {
    let star = repo.get_star(id).await?;
    star_view(repo, star).await
}

/// One page of star views, ordered by id.
pub async fn page_star_views<R: FullRepository + ?Sized>(
    repo: &R,
    request: PageRequest,
) -> RepositoryResult<CollectionPage<StarView>> {
    let CollectionPage {
        num_results,
        page,
        total_pages,
        objects,
    } = request.apply(repo.list_stars().await?);

    let mut views = Vec::with_capacity(objects.len());
    for row in objects {
        views.push(star_view(repo, row).await?);
    }
    Ok(CollectionPage {
        num_results,
        page,
        total_pages,
        objects: views,
    })
}

// ==================== Exoplanets ====================

async fn exoplanet_view<R: FullRepository + ?Sized>(
    repo: &R,
    exoplanet: Exoplanet,
) -> RepositoryResult<ExoplanetView> {
    let raw = exoplanet.id.value();

    let star_ids: Vec<StarId> = parent_ids(repo, LinkKind::StarExoplanets, raw).await?;
    let star = repo.stars_by_ids(&star_ids).await?.into_iter().next();

    let discovered_by = discoverer(
        repo,
        LinkKind::ExoplanetDiscoveries,
        LinkKind::PublicationExoplanets,
        raw,
    )
    .await?;

    let publication_ids: Vec<PublicationId> =
        parent_ids(repo, LinkKind::PublicationExoplanets, raw).await?;
    let publications = repo.publications_by_ids(&publication_ids).await?;

    Ok(ExoplanetView {
        exoplanet,
        star,
        discovered_by,
        publications,
    })
}

/// Fetch one exoplanet with its relationships, or `RepositoryError::NotFound`.
pub async fn get_exoplanet_view<R: FullRepository + ?Sized>(
    repo: &R,
    id: ExoplanetId,
) -> RepositoryResult<ExoplanetView> {
    let exoplanet = repo.get_exoplanet(id).await?;
    exoplanet_view(repo, exoplanet).await
}

/// One page of exoplanet views, ordered by id.
pub async fn page_exoplanet_views<R: FullRepository + ?Sized>(
    repo: &R,
    request: PageRequest,
) -> RepositoryResult<CollectionPage<ExoplanetView>> {
    let CollectionPage {
        num_results,
        page,
        total_pages,
        objects,
    } = request.apply(repo.list_exoplanets().await?);

    let mut views = Vec::with_capacity(objects.len());
    for row in objects {
        views.push(exoplanet_view(repo, row).await?);
    }
    Ok(CollectionPage {
        num_results,
        page,
        total_pages,
        objects: views,
    })
}

// ==================== Constellations ====================

async fn constellation_view<R: FullRepository + ?Sized>(
    repo: &R,
    constellation: Constellation,
) -> RepositoryResult<ConstellationView> {
    let raw = constellation.id.value();

    let star_ids: Vec<StarId> = child_ids(repo, LinkKind::ConstellationStars, raw).await?;
    let stars = repo.stars_by_ids(&star_ids).await?;

    let publication_ids: Vec<PublicationId> =
        parent_ids(repo, LinkKind::PublicationConstellations, raw).await?;
    let publications = repo.publications_by_ids(&publication_ids).await?;

    Ok(ConstellationView {
        constellation,
        stars,
        publications,
    })
}

/// Fetch one constellation with its relationships, or `RepositoryError::NotFound`.
pub async fn get_constellation_view<R: FullRepository + ?Sized>(
    repo: &R,
    id: ConstellationId,
) -> RepositoryResult<ConstellationView> {
    let constellation = repo.get_constellation(id).await?;
    constellation_view(repo, constellation).await
}

/// One page of constellation views, ordered by id.
pub async fn page_constellation_views<R: FullRepository + ?Sized>(
    repo: &R,
    request: PageRequest,
) -> RepositoryResult<CollectionPage<ConstellationView>> {
    let CollectionPage {
        num_results,
        page,
        total_pages,
        objects,
    } = request.apply(repo.list_constellations().await?);

    let mut views = Vec::with_capacity(objects.len());
    for row in objects {
        views.push(constellation_view(repo, row).await?);
    }
    Ok(CollectionPage {
        num_results,
        page,
        total_pages,
        objects: views,
    })
}

// ==================== Publications ====================

async fn publication_view<R: FullRepository + ?Sized>(
    repo: &R,
    publication: Publication,
) -> RepositoryResult<PublicationView> {
    let raw = publication.id.value();

    let star_ids: Vec<StarId> = child_ids(repo, LinkKind::PublicationStars, raw).await?;
    let exoplanet_ids: Vec<ExoplanetId> =
        child_ids(repo, LinkKind::PublicationExoplanets, raw).await?;
    let constellation_ids: Vec<ConstellationId> =
        child_ids(repo, LinkKind::PublicationConstellations, raw).await?;
    let discovered_star_ids: Vec<StarId> =
        child_ids(repo, LinkKind::StarDiscoveries, raw).await?;
    let discovered_exoplanet_ids: Vec<ExoplanetId> =
        child_ids(repo, LinkKind::ExoplanetDiscoveries, raw).await?;

    Ok(PublicationView {
        stars: repo.stars_by_ids(&star_ids).await?,
        exoplanets: repo.exoplanets_by_ids(&exoplanet_ids).await?,
        constellations: repo.constellations_by_ids(&constellation_ids).await?,
        discovered_stars: repo.stars_by_ids(&discovered_star_ids).await?,
        discovered_exoplanets: repo.exoplanets_by_ids(&discovered_exoplanet_ids).await?,
        publication,
    })
}

/// Fetch one publication with its relationships, or `RepositoryError::NotFound`.
pub async fn get_publication_view<R: FullRepository + ?Sized>(
    repo: &R,
    id: PublicationId,
) -> RepositoryResult<PublicationView> {
    let publication = repo.get_publication(id).await?;
    publication_view(repo, publication).await
}

/// One page of publication views, ordered by id.
pub async fn page_publication_views<R: FullRepository + ?Sized>(
    repo: &R,
    request: PageRequest,
) -> RepositoryResult<CollectionPage<PublicationView>> {
    let CollectionPage {
        num_results,
        page,
        total_pages,
        objects,
    } = request.apply(repo.list_publications().await?);

    let mut views = Vec::with_capacity(objects.len());
    for row in objects {
        views.push(publication_view(repo, row).await?);
    }
    Ok(CollectionPage {
        num_results,
        page,
        total_pages,
        objects: views,
    })
}

// ==================== Seeding ====================

/// A whole catalog in one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub stars: Vec<Star>,
    #[serde(default)]
    pub exoplanets: Vec<Exoplanet>,
    #[serde(default)]
    pub constellations: Vec<Constellation>,
    #[serde(default)]
    pub publications: Vec<Publication>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl CatalogSeed {
    /// Parse a seed from a JSON document.
    pub fn from_json(json: &str) -> RepositoryResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| RepositoryError::validation(format!("Invalid catalog seed: {}", e)))
    }

    /// Read and parse a seed file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read catalog seed {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }
}

/// Counts of what a seed load inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub entities: usize,
    pub links: usize,
}

/// Insert every entity of `seed`, then every link, in document order.
///
/// Stops at the first failure; rows inserted before it stay in place.
pub async fn load_seed<R: FullRepository + ?Sized>(
    repo: &R,
    seed: &CatalogSeed,
) -> RepositoryResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    for star in &seed.stars {
        repo.insert_star(star).await?;
        summary.entities += 1;
    }
    for exoplanet in &seed.exoplanets {
        repo.insert_exoplanet(exoplanet).await?;
        summary.entities += 1;
    }
    for constellation in &seed.constellations {
        repo.insert_constellation(constellation).await?;
        summary.entities += 1;
    }
    for publication in &seed.publications {
        repo.insert_publication(publication).await?;
        summary.entities += 1;
    }
    debug!("Inserted {} catalog entities", summary.entities);

    for link in &seed.links {
        repo.link(*link).await?;
        summary.links += 1;
    }

    info!(
        "Loaded catalog seed: {} entities, {} links",
        summary.entities, summary.links
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::LinkRepository;

    async fn sample_repo() -> LocalRepository {
        let repo = LocalRepository::new();
        let seed = CatalogSeed {
            stars: vec![Star::new(1, "Sun", 1.0, 1.0, 5772.0, 1.0)],
            exoplanets: vec![
                Exoplanet::new(1, "b", 1.0, 1.0, 10.0, 2001),
                Exoplanet::new(2, "c", 1.0, 1.0, 20.0, 2002),
            ],
            constellations: vec![],
            publications: vec![
                Publication::new(1, "Survey", "A", "J"),
                Publication::new(2, "Follow-up", "B", "J"),
            ],
            links: vec![
                Link::orbits(ExoplanetId(2), StarId(1)),
                Link::orbits(ExoplanetId(1), StarId(1)),
                Link::cites_exoplanet(PublicationId(1), ExoplanetId(1)),
                Link::cites_exoplanet(PublicationId(2), ExoplanetId(1)),
                Link::exoplanet_discovered_by(ExoplanetId(2), PublicationId(2)),
            ],
        };
        load_seed(&repo, &seed).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_paged_views_slice_before_resolving() {
        let repo = sample_repo().await;
        let request = PageRequest::new(Some(2), Some(1)).unwrap();
        let page = page_exoplanet_views(&repo, request).await.unwrap();
        assert_eq!(page.num_results, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.objects.len(), 1);
        assert_eq!(page.objects[0].exoplanet.id, ExoplanetId(2));
        assert_eq!(page.objects[0].star.as_ref().unwrap().id, StarId(1));
    }

    #[tokio::test]
    async fn test_star_exoplanets_follow_link_order() {
        let repo = sample_repo().await;
        let view = get_star_view(&repo, StarId(1)).await.unwrap();
        let ids: Vec<i64> = view.exoplanets.iter().map(|p| p.id.value()).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(view.constellation.is_none());
    }

    #[tokio::test]
    async fn test_discoverer_falls_back_to_first_citation() {
        let repo = sample_repo().await;
        let view = get_exoplanet_view(&repo, ExoplanetId(1)).await.unwrap();
        assert_eq!(view.discovered_by.unwrap().id, PublicationId(1));
        assert_eq!(view.publications.len(), 2);
    }

    #[tokio::test]
    async fn test_explicit_discoverer_wins() {
        let repo = sample_repo().await;
        repo.link(Link::cites_exoplanet(PublicationId(1), ExoplanetId(2)))
            .await
            .unwrap();
        let view = get_exoplanet_view(&repo, ExoplanetId(2)).await.unwrap();
        assert_eq!(view.discovered_by.unwrap().id, PublicationId(2));
        assert_eq!(view.star.unwrap().id, StarId(1));
    }

    #[tokio::test]
    async fn test_publication_view_lists_discoveries() {
        let repo = sample_repo().await;
        let view = get_publication_view(&repo, PublicationId(2)).await.unwrap();
        assert_eq!(view.discovered_exoplanets.len(), 1);
        assert_eq!(view.exoplanets.len(), 1);
        assert!(view.stars.is_empty());
    }

    #[tokio::test]
    async fn test_missing_view_is_not_found() {
        let repo = sample_repo().await;
        let err = get_constellation_view(&repo, ConstellationId(1))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_seed_with_dangling_link_fails() {
        let repo = LocalRepository::new();
        let seed = CatalogSeed::from_json(
            r#"{"stars": [], "links": [{"kind": "star_exoplanets", "parent": 1, "child": 1}]}"#,
        )
        .unwrap();
        assert!(load_seed(&repo, &seed).await.unwrap_err().is_not_found());
    }

    #[test]
    fn test_invalid_seed_json() {
        let err = CatalogSeed::from_json("{not json").unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }
}
