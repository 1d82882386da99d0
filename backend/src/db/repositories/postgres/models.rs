use diesel::prelude::*;

use super::schema::{catalog_links, constellations, exoplanets, publications, stars};
use crate::models::{
    Constellation, ConstellationId, Exoplanet, ExoplanetId, Publication, PublicationId, Star,
    StarId,
};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = stars)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StarRow {
    pub id: i64,
    pub name: String,
    pub mass: f64,
    pub luminosity: f64,
    pub temperature: f64,
    pub radius: f64,
}

impl From<&Star> for StarRow {
    fn from(star: &Star) -> Self {
        Self {
            id: star.id.value(),
            name: star.name.clone(),
            mass: star.mass,
            luminosity: star.luminosity,
            temperature: star.temperature,
            radius: star.radius,
        }
    }
}

impl From<StarRow> for Star {
    fn from(row: StarRow) -> Self {
        Self {
            id: StarId(row.id),
            name: row.name,
            mass: row.mass,
            luminosity: row.luminosity,
            temperature: row.temperature,
            radius: row.radius,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = exoplanets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExoplanetRow {
    pub id: i64,
    pub name: String,
    pub mass: f64,
    pub radius: f64,
    pub orbital_period: f64,
    pub year_discovered: i32,
}

impl From<&Exoplanet> for ExoplanetRow {
    fn from(exoplanet: &Exoplanet) -> Self {
        Self {
            id: exoplanet.id.value(),
            name: exoplanet.name.clone(),
            mass: exoplanet.mass,
            radius: exoplanet.radius,
            orbital_period: exoplanet.orbital_period,
            year_discovered: exoplanet.year_discovered,
        }
    }
}

impl From<ExoplanetRow> for Exoplanet {
    fn from(row: ExoplanetRow) -> Self {
        Self {
            id: ExoplanetId(row.id),
            name: row.name,
            mass: row.mass,
            radius: row.radius,
            orbital_period: row.orbital_period,
            year_discovered: row.year_discovered,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = constellations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ConstellationRow {
    pub id: i64,
    pub name: String,
    pub abbrev: String,
    pub family: String,
    pub meaning: String,
    pub area: f64,
}

impl From<&Constellation> for ConstellationRow {
    fn from(constellation: &Constellation) -> Self {
        Self {
            id: constellation.id.value(),
            name: constellation.name.clone(),
            abbrev: constellation.abbrev.clone(),
            family: constellation.family.clone(),
            meaning: constellation.meaning.clone(),
            area: constellation.area,
        }
    }
}

impl From<ConstellationRow> for Constellation {
    fn from(row: ConstellationRow) -> Self {
        Self {
            id: ConstellationId(row.id),
            name: row.name,
            abbrev: row.abbrev,
            family: row.family,
            meaning: row.meaning,
            area: row.area,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = publications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PublicationRow {
    pub id: i64,
    pub reference: String,
    pub title: String,
    pub authors: String,
    pub journal: String,
    pub abstract_text: String,
    pub year: Option<i32>,
}

impl From<&Publication> for PublicationRow {
    fn from(publication: &Publication) -> Self {
        Self {
            id: publication.id.value(),
            reference: publication.reference.clone(),
            title: publication.title.clone(),
            authors: publication.authors.clone(),
            journal: publication.journal.clone(),
            abstract_text: publication.abstract_text.clone(),
            year: publication.year,
        }
    }
}

impl From<PublicationRow> for Publication {
    fn from(row: PublicationRow) -> Self {
        Self {
            id: PublicationId(row.id),
            reference: row.reference,
            title: row.title,
            authors: row.authors,
            journal: row.journal,
            abstract_text: row.abstract_text,
            year: row.year,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = catalog_links)]
pub struct NewLinkRow {
    pub kind: String,
    pub parent_id: i64,
    pub child_id: i64,
}
