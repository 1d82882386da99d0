//! # Interswellar
//!
//! A catalog of stars, exoplanets, constellations and the publications that
//! describe them, served as a read-only JSON REST API with an HTML landing
//! page.
//!
//! ## Architecture
//!
//! - [`models`]: Domain entities, typed identifiers and relationship kinds
//! - [`api`]: Nested view types and pagination returned by the REST API
//! - [`db`]: Repository traits, Postgres and in-memory stores, service layer
//! - [`contributors`]: Commit and issue counts per project contributor
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Features
//!
//! - `local-repo` (default): in-memory store
//! - `postgres-repo`: Postgres store via Diesel, with embedded migrations
//! - `http-server` (default): axum router and the `interswellar-server` binary

// RepositoryError carries a rich context.
#![allow(clippy::result_large_err)]

pub mod api;
pub mod contributors;
pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
