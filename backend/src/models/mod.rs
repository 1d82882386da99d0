//! Domain models for the star catalog.

#[macro_use]
mod macros;

pub mod catalog;
pub mod links;

pub use catalog::{
    Constellation, ConstellationId, Exoplanet, ExoplanetId, Publication, PublicationId, Star,
    StarId,
};
pub use links::{EntityKind, Link, LinkKind};
