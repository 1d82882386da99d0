//! Relationship edges between catalog entities.
//!
//! Every relationship in the catalog is an ordered `(parent, child)` edge of
//! a given [`LinkKind`]. To-one relationships (an exoplanet orbits one star,
//! a star lies in one constellation, an object has one discovering
//! publication) are links whose child may have at most one parent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::catalog::{ConstellationId, ExoplanetId, PublicationId, StarId};

/// The four entity tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Star,
    Exoplanet,
    Constellation,
    Publication,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        Self::Star,
        Self::Exoplanet,
        Self::Constellation,
        Self::Publication,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Star => "star",
            Self::Exoplanet => "exoplanet",
            Self::Constellation => "constellation",
            Self::Publication => "publication",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of relationship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Star -> exoplanets orbiting it
    StarExoplanets,
    /// Constellation -> stars inside it
    ConstellationStars,
    /// Publication -> stars it is credited with discovering
    StarDiscoveries,
    /// Publication -> exoplanets it is credited with discovering
    ExoplanetDiscoveries,
    /// Publication -> stars it cites
    PublicationStars,
    /// Publication -> exoplanets it cites
    PublicationExoplanets,
    /// Publication -> constellations it cites
    PublicationConstellations,
}

impl LinkKind {
    pub const ALL: [LinkKind; 7] = [
        LinkKind::StarExoplanets,
        LinkKind::ConstellationStars,
        LinkKind::StarDiscoveries,
        LinkKind::ExoplanetDiscoveries,
        LinkKind::PublicationStars,
        LinkKind::PublicationExoplanets,
        LinkKind::PublicationConstellations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StarExoplanets => "star_exoplanets",
            Self::ConstellationStars => "constellation_stars",
            Self::StarDiscoveries => "star_discoveries",
            Self::ExoplanetDiscoveries => "exoplanet_discoveries",
            Self::PublicationStars => "publication_stars",
            Self::PublicationExoplanets => "publication_exoplanets",
            Self::PublicationConstellations => "publication_constellations",
        }
    }

    pub fn parent_kind(&self) -> EntityKind {
        match self {
            Self::StarExoplanets => EntityKind::Star,
            Self::ConstellationStars => EntityKind::Constellation,
            Self::StarDiscoveries
            | Self::ExoplanetDiscoveries
            | Self::PublicationStars
            | Self::PublicationExoplanets
            | Self::PublicationConstellations => EntityKind::Publication,
        }
    }

    pub fn child_kind(&self) -> EntityKind {
        match self {
            Self::StarExoplanets | Self::ExoplanetDiscoveries | Self::PublicationExoplanets => {
                EntityKind::Exoplanet
            }
            Self::ConstellationStars | Self::StarDiscoveries | Self::PublicationStars => {
                EntityKind::Star
            }
            Self::PublicationConstellations => EntityKind::Constellation,
        }
    }

    /// Whether a child may have at most one parent under this kind.
    pub fn is_to_one(&self) -> bool {
        matches!(
            self,
            Self::StarExoplanets
                | Self::ConstellationStars
                | Self::StarDiscoveries
                | Self::ExoplanetDiscoveries
        )
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LinkKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown link kind: {}", s))
    }
}

/// A single relationship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub kind: LinkKind,
    pub parent: i64,
    pub child: i64,
}

impl Link {
    pub fn new(kind: LinkKind, parent: i64, child: i64) -> Self {
        Self {
            kind,
            parent,
            child,
        }
    }

    /// The exoplanet orbits the star.
    pub fn orbits(exoplanet: ExoplanetId, star: StarId) -> Self {
        Self::new(LinkKind::StarExoplanets, star.value(), exoplanet.value())
    }

    /// The star lies within the constellation.
    pub fn located_in(star: StarId, constellation: ConstellationId) -> Self {
        Self::new(
            LinkKind::ConstellationStars,
            constellation.value(),
            star.value(),
        )
    }

    pub fn star_discovered_by(star: StarId, publication: PublicationId) -> Self {
        Self::new(LinkKind::StarDiscoveries, publication.value(), star.value())
    }

    pub fn exoplanet_discovered_by(exoplanet: ExoplanetId, publication: PublicationId) -> Self {
        Self::new(
            LinkKind::ExoplanetDiscoveries,
            publication.value(),
            exoplanet.value(),
        )
    }

    pub fn cites_star(publication: PublicationId, star: StarId) -> Self {
        Self::new(LinkKind::PublicationStars, publication.value(), star.value())
    }

    pub fn cites_exoplanet(publication: PublicationId, exoplanet: ExoplanetId) -> Self {
        Self::new(
            LinkKind::PublicationExoplanets,
            publication.value(),
            exoplanet.value(),
        )
    }

    pub fn cites_constellation(publication: PublicationId, constellation: ConstellationId) -> Self {
        Self::new(
            LinkKind::PublicationConstellations,
            publication.value(),
            constellation.value(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_kind_round_trips_through_str() {
        for kind in LinkKind::ALL {
            assert_eq!(kind.as_str().parse::<LinkKind>().unwrap(), kind);
        }
        assert!("planet_moons".parse::<LinkKind>().is_err());
    }

    #[test]
    fn test_typed_constructors_orient_edges() {
        let link = Link::orbits(ExoplanetId::new(3), StarId::new(1));
        assert_eq!(link.kind, LinkKind::StarExoplanets);
        assert_eq!(link.parent, 1);
        assert_eq!(link.child, 3);

        let link = Link::located_in(StarId::new(2), ConstellationId::new(9));
        assert_eq!(link.parent, 9);
        assert_eq!(link.child, 2);
    }

    #[test]
    fn test_to_one_kinds() {
        assert!(LinkKind::StarExoplanets.is_to_one());
        assert!(LinkKind::ExoplanetDiscoveries.is_to_one());
        assert!(!LinkKind::PublicationStars.is_to_one());
        assert!(!LinkKind::PublicationConstellations.is_to_one());
    }

    #[test]
    fn test_endpoint_kinds() {
        assert_eq!(LinkKind::StarDiscoveries.parent_kind(), EntityKind::Publication);
        assert_eq!(LinkKind::StarDiscoveries.child_kind(), EntityKind::Star);
        assert_eq!(
            LinkKind::PublicationConstellations.child_kind(),
            EntityKind::Constellation
        );
    }

    #[test]
    fn test_link_deserializes_from_seed_json() {
        let link: Link = serde_json::from_str(
            r#"{"kind": "publication_exoplanets", "parent": 1, "child": 2}"#,
        )
        .unwrap();
        assert_eq!(link, Link::cites_exoplanet(PublicationId::new(1), ExoplanetId::new(2)));
    }
}
