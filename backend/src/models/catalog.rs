//! Catalog entities.
//!
//! Each entity is a flat row of scalar fields keyed by a caller-assigned
//! identifier. Relationships between entities are not stored on the rows;
//! they live in the link table (see [`super::links`]) and are resolved into
//! nested views by the service layer.

use serde::{Deserialize, Serialize};

define_id_type!(i64, StarId);
define_id_type!(i64, ExoplanetId);
define_id_type!(i64, ConstellationId);
define_id_type!(i64, PublicationId);

/// A star.
///
/// Physical quantities are expressed in solar units (mass, luminosity,
/// radius) and kelvin (temperature).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub id: StarId,
    pub name: String,
    pub mass: f64,
    pub luminosity: f64,
    pub temperature: f64,
    pub radius: f64,
}

impl Star {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        mass: f64,
        luminosity: f64,
        temperature: f64,
        radius: f64,
    ) -> Self {
        Self {
            id: StarId::new(id),
            name: name.into(),
            mass,
            luminosity,
            temperature,
            radius,
        }
    }
}

/// A planet orbiting a star other than the Sun.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exoplanet {
    pub id: ExoplanetId,
    pub name: String,
    pub mass: f64,
    pub radius: f64,
    /// Orbital period in days
    pub orbital_period: f64,
    pub year_discovered: i32,
}

impl Exoplanet {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        mass: f64,
        radius: f64,
        orbital_period: f64,
        year_discovered: i32,
    ) -> Self {
        Self {
            id: ExoplanetId::new(id),
            name: name.into(),
            mass,
            radius,
            orbital_period,
            year_discovered,
        }
    }
}

/// One of the named constellations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constellation {
    pub id: ConstellationId,
    pub name: String,
    pub abbrev: String,
    pub family: String,
    pub meaning: String,
    /// Area in square degrees
    pub area: f64,
}

impl Constellation {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        abbrev: impl Into<String>,
        family: impl Into<String>,
        meaning: impl Into<String>,
        area: f64,
    ) -> Self {
        Self {
            id: ConstellationId::new(id),
            name: name.into(),
            abbrev: abbrev.into(),
            family: family.into(),
            meaning: meaning.into(),
            area,
        }
    }
}

/// A journal publication citing catalog objects.
///
/// `ref` and `abstract` are Rust keywords, so the fields carry different
/// names and are renamed on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub id: PublicationId,
    /// Bibliographic reference code (e.g. `2008A&A...474..293B`)
    #[serde(rename = "ref", default)]
    pub reference: String,
    pub title: String,
    pub authors: String,
    pub journal: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default)]
    pub year: Option<i32>,
}

impl Publication {
    pub fn new(
        id: i64,
        title: impl Into<String>,
        authors: impl Into<String>,
        journal: impl Into<String>,
    ) -> Self {
        Self {
            id: PublicationId::new(id),
            reference: String::new(),
            title: title.into(),
            authors: authors.into(),
            journal: journal.into(),
            abstract_text: String::new(),
            year: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn with_abstract(mut self, abstract_text: impl Into<String>) -> Self {
        self.abstract_text = abstract_text.into();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_parses_from_path_segment() {
        let id: StarId = "42".parse().unwrap();
        assert_eq!(id, StarId::new(42));
        assert!("forty-two".parse::<StarId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_bare_integer() {
        let value = serde_json::to_value(ExoplanetId::new(7)).unwrap();
        assert_eq!(value, json!(7));
    }

    #[test]
    fn test_publication_keyword_fields_renamed() {
        let publication = Publication::new(1, "Local Star Discovered", "N. Tyson", "A&A")
            .with_reference("2008A&A...474..293B")
            .with_abstract("Former toaster in sky is actually a star");
        let value = serde_json::to_value(&publication).unwrap();
        assert_eq!(value["ref"], "2008A&A...474..293B");
        assert_eq!(value["abstract"], "Former toaster in sky is actually a star");
        assert!(value["year"].is_null());
    }

    #[test]
    fn test_publication_deserializes_without_optional_fields() {
        let publication: Publication = serde_json::from_value(json!({
            "id": 3,
            "title": "discovery of new star",
            "authors": "Carl Sagan",
            "journal": "Harvard Stars",
            "year": 1986
        }))
        .unwrap();
        assert_eq!(publication.reference, "");
        assert_eq!(publication.abstract_text, "");
        assert_eq!(publication.year, Some(1986));
    }
}
