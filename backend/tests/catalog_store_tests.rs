//! Store-level tests: entity round-trips and relationship edges through the
//! repository traits.

mod support;

use interswellar::db::repository::{EntityRepository, LinkRepository, RepositoryError};
use interswellar::db::{get_constellation_view, get_star_view, services, LocalRepository};
use interswellar::models::{
    Constellation, ConstellationId, Exoplanet, ExoplanetId, Link, LinkKind, Publication,
    PublicationId, Star, StarId,
};

fn aries() -> Star {
    Star::new(2, "Aries", 3.0, 4.0, 7000.0, 3.0)
}

fn lummes() -> Star {
    Star::new(3, "Lummes", 5.0, 3.0, 6000.0, 2.7)
}

fn earth() -> Exoplanet {
    Exoplanet::new(1, "Earth", 0.2, 1.0, 5000.0, 0)
}

fn jupiter() -> Exoplanet {
    Exoplanet::new(2, "Jupiter", 0.4, 2.0, 8000.0, 12)
}

fn big_dipper() -> Constellation {
    Constellation::new(1, "big dipper", "big dp", "arris", "laddle", 56.54)
}

fn new_star_paper() -> Publication {
    Publication::new(
        1,
        "discovery of new star",
        "Carl Sagan, Neil Degrasse Tyson",
        "Harvard Stars",
    )
    .with_year(1986)
    .with_abstract("We found a new star.")
}

#[tokio::test]
async fn test_stars_round_trip() {
    let repo = LocalRepository::new();
    let sun = Star::new(1, "Sun", 1.0, 1.0, 5000.0, 1.0);
    repo.insert_star(&lummes()).await.unwrap();
    repo.insert_star(&sun).await.unwrap();

    let stars = repo.list_stars().await.unwrap();
    assert_eq!(stars, vec![sun.clone(), lummes()]);
    assert_eq!(repo.get_star(StarId(3)).await.unwrap(), lummes());
}

#[tokio::test]
async fn test_exoplanets_round_trip() {
    let repo = LocalRepository::new();
    repo.insert_exoplanet(&earth()).await.unwrap();
    repo.insert_exoplanet(&jupiter()).await.unwrap();

    let planet = repo.get_exoplanet(ExoplanetId(1)).await.unwrap();
    assert_eq!(planet.radius, 1.0);
    assert_eq!(planet.year_discovered, 0);
    assert_eq!(planet.name, "Earth");
    assert_eq!(repo.list_exoplanets().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_constellations_round_trip() {
    let repo = LocalRepository::new();
    repo.insert_constellation(&big_dipper()).await.unwrap();
    let stored = repo.get_constellation(ConstellationId(1)).await.unwrap();
    assert_eq!(stored, big_dipper());
    assert_eq!(stored.area, 56.54);
}

#[tokio::test]
async fn test_publications_round_trip() {
    let repo = LocalRepository::new();
    repo.insert_publication(&new_star_paper()).await.unwrap();
    let stored = repo.get_publication(PublicationId(1)).await.unwrap();
    assert_eq!(stored.year, Some(1986));
    assert_eq!(stored.title, "discovery of new star");
    assert_eq!(stored, new_star_paper());
}

#[tokio::test]
async fn test_constellation_contains_stars() {
    let repo = LocalRepository::new();
    repo.insert_star(&aries()).await.unwrap();
    repo.insert_star(&lummes()).await.unwrap();
    repo.insert_constellation(&big_dipper()).await.unwrap();
    repo.link(Link::located_in(StarId(2), ConstellationId(1)))
        .await
        .unwrap();
    repo.link(Link::located_in(StarId(3), ConstellationId(1)))
        .await
        .unwrap();

    let view = get_constellation_view(&repo, ConstellationId(1)).await.unwrap();
    assert_eq!(view.stars, vec![aries(), lummes()]);
}

#[tokio::test]
async fn test_star_contains_exoplanets() {
    let repo = LocalRepository::new();
    repo.insert_exoplanet(&earth()).await.unwrap();
    repo.insert_exoplanet(&jupiter()).await.unwrap();
    repo.insert_star(&aries()).await.unwrap();
    repo.link(Link::orbits(ExoplanetId(1), StarId(2))).await.unwrap();
    repo.link(Link::orbits(ExoplanetId(2), StarId(2))).await.unwrap();

    let view = get_star_view(&repo, StarId(2)).await.unwrap();
    assert_eq!(view.exoplanets, vec![earth(), jupiter()]);
}

#[tokio::test]
async fn test_publication_cites_constellations_and_exoplanets() {
    let repo = LocalRepository::new();
    repo.insert_constellation(&big_dipper()).await.unwrap();
    repo.insert_constellation(&Constellation::new(
        2,
        "little dipper",
        "small dp",
        "arris",
        "laddle",
        54.56,
    ))
    .await
    .unwrap();
    repo.insert_exoplanet(&earth()).await.unwrap();
    repo.insert_exoplanet(&jupiter()).await.unwrap();
    repo.insert_publication(&new_star_paper()).await.unwrap();
    for link in [
        Link::cites_constellation(PublicationId(1), ConstellationId(1)),
        Link::cites_constellation(PublicationId(1), ConstellationId(2)),
        Link::cites_exoplanet(PublicationId(1), ExoplanetId(1)),
        Link::cites_exoplanet(PublicationId(1), ExoplanetId(2)),
    ] {
        repo.link(link).await.unwrap();
    }

    let view = services::get_publication_view(&repo, PublicationId(1))
        .await
        .unwrap();
    let constellation_ids: Vec<_> = view.constellations.iter().map(|c| c.id).collect();
    assert_eq!(constellation_ids, vec![ConstellationId(1), ConstellationId(2)]);
    assert_eq!(view.exoplanets, vec![earth(), jupiter()]);
}

#[tokio::test]
async fn test_duplicate_id_is_rejected() {
    let repo = LocalRepository::new();
    repo.insert_star(&aries()).await.unwrap();
    let err = repo.insert_star(&aries()).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
    assert_eq!(repo.list_stars().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_exoplanet_moves_between_stars() {
    let repo = support::populated_repo().await;
    // exoplanet 1 orbits star 2 in the fixture
    repo.link(Link::orbits(ExoplanetId(1), StarId(1))).await.unwrap();

    assert_eq!(
        repo.parents(LinkKind::StarExoplanets, 1).await.unwrap(),
        vec![1]
    );
    assert_eq!(
        repo.children(LinkKind::StarExoplanets, 2).await.unwrap(),
        vec![2]
    );
    assert_eq!(
        repo.children(LinkKind::StarExoplanets, 1).await.unwrap(),
        vec![3, 1]
    );
}

#[tokio::test]
async fn test_link_to_missing_entity_fails() {
    let repo = support::populated_repo().await;
    let err = repo
        .link(Link::cites_star(PublicationId(1), StarId(42)))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_by_ids_follows_request_order() {
    let repo = support::populated_repo().await;
    let stars = repo
        .stars_by_ids(&[StarId(2), StarId(99), StarId(1)])
        .await
        .unwrap();
    let ids: Vec<_> = stars.iter().map(|s| s.id.value()).collect();
    assert_eq!(ids, vec![2, 1]);
}
