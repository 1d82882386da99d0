#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use interswellar::db::repository::FullRepository;
use interswellar::db::{load_seed, CatalogSeed, LocalRepository};
use interswellar::models::{
    Constellation, ConstellationId, Exoplanet, ExoplanetId, Link, Publication, PublicationId,
    Star, StarId,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// The shared API fixture: two stars, three exoplanets, two constellations
/// and two publications.
///
/// - exoplanets 1 and 2 orbit star 2; exoplanet 3 orbits star 1
/// - both stars lie in constellation 1
/// - publication 1 cites stars 1, 2 and exoplanets 1, 2
/// - publication 2 is the explicit discoverer of exoplanet 3
pub fn catalog_seed() -> CatalogSeed {
    CatalogSeed {
        stars: vec![
            Star::new(1, "rouge_star", 1.0, 1.0, 1000.0, 1.0),
            Star::new(2, "star", 2.0, 2.0, 2000.0, 2.0),
        ],
        exoplanets: vec![
            Exoplanet::new(1, "earth", 1.0, 1.0, 365.0, 0),
            Exoplanet::new(2, "planet", 1.0, 1.0, 1_000_000.0, 2000),
            Exoplanet::new(3, "jonathan", 88.8, 44.4, 0.0, 1994),
        ],
        constellations: vec![
            Constellation::new(1, "little_dipper", "ld", "dd", "Little Dipper", 100.0),
            Constellation::new(2, "big_dipper", "bd", "dd", "Big Dipper", 300.0),
        ],
        publications: vec![
            Publication::new(
                1,
                "Local Star Discovered",
                "Neil deGrasse Tyson",
                "Astronomy & Astrophysics",
            )
            .with_reference("2008A&A...474..293B")
            .with_abstract("Former toaster in sky is actually a star"),
            Publication::new(
                2,
                "Bountiful Discoveries made",
                "Monkey Monkey, Bill Nye",
                "Astronomy & Astrophycis",
            )
            .with_reference("2009A&A...434..421A")
            .with_abstract(
                "This publication lists discoveries of constellation, planets, and stars",
            ),
        ],
        links: vec![
            Link::orbits(ExoplanetId(3), StarId(1)),
            Link::exoplanet_discovered_by(ExoplanetId(3), PublicationId(2)),
            Link::cites_exoplanet(PublicationId(1), ExoplanetId(1)),
            Link::cites_exoplanet(PublicationId(1), ExoplanetId(2)),
            Link::cites_star(PublicationId(1), StarId(1)),
            Link::cites_star(PublicationId(1), StarId(2)),
            Link::orbits(ExoplanetId(1), StarId(2)),
            Link::orbits(ExoplanetId(2), StarId(2)),
            Link::located_in(StarId(1), ConstellationId(1)),
            Link::located_in(StarId(2), ConstellationId(1)),
        ],
    }
}

/// In-memory repository loaded with [`catalog_seed`].
pub async fn populated_repo() -> LocalRepository {
    let repo = LocalRepository::new();
    load_seed(&repo, &catalog_seed())
        .await
        .expect("fixture seed should load");
    repo
}

pub async fn populated_shared_repo() -> Arc<dyn FullRepository> {
    Arc::new(populated_repo().await)
}
