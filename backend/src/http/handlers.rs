//! HTTP handlers for the REST API.
//!
//! Each handler parses its path and query, then delegates to
//! [`crate::db::services`].

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Html,
    Json,
};
use std::str::FromStr;

use super::dto::{
    CollectionPage, ConstellationView, ExoplanetView, HealthResponse, PageQuery,
    PublicationView, StarView,
};
use super::error::AppError;
use super::landing::{self, CatalogTotals};
use super::state::AppState;
use crate::api::{ConstellationId, ExoplanetId, PageRequest, PublicationId, StarId};
use crate::contributors::ContributorStats;
use crate::db::services as db_services;
use crate::models::EntityKind;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_id<T: FromStr>(entity: EntityKind, raw: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} id: {:?}", entity, raw)))
}

fn page_request(query: Result<Query<PageQuery>, QueryRejection>) -> Result<PageRequest, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    query.into_request()
}

// =============================================================================
// Landing & Health
// =============================================================================

/// GET /
pub async fn landing_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let repo = state.repository.as_ref();
    let totals = CatalogTotals {
        stars: repo.count_entities(EntityKind::Star).await?,
        exoplanets: repo.count_entities(EntityKind::Exoplanet).await?,
        constellations: repo.count_entities(EntityKind::Constellation).await?,
        publications: repo.count_entities(EntityKind::Publication).await?,
    };
    let stats = ContributorStats::collect(state.contributors.as_ref()).await;
    Ok(Html(landing::render(&totals, &stats)))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Stars
// =============================================================================

/// GET /api/v1/stars
pub async fn list_stars(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> HandlerResult<CollectionPage<StarView>> {
    let request = page_request(query)?;
    let page = db_services::page_star_views(state.repository.as_ref(), request).await?;
    Ok(Json(page))
}

/// GET /api/v1/stars/{id}
pub async fn get_star(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> HandlerResult<StarView> {
    let id: StarId = parse_id(EntityKind::Star, &raw_id)?;
    let view = db_services::get_star_view(state.repository.as_ref(), id).await?;
    Ok(Json(view))
}

// =============================================================================
// Exoplanets
// =============================================================================

/// GET /api/v1/exoplanets
pub async fn list_exoplanets(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> HandlerResult<CollectionPage<ExoplanetView>> {
    let request = page_request(query)?;
    let page = db_services::page_exoplanet_views(state.repository.as_ref(), request).await?;
    Ok(Json(page))
}

/// GET /api/v1/exoplanets/{id}
pub async fn get_exoplanet(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> HandlerResult<ExoplanetView> {
    let id: ExoplanetId = parse_id(EntityKind::Exoplanet, &raw_id)?;
    let view = db_services::get_exoplanet_view(state.repository.as_ref(), id).await?;
    Ok(Json(view))
}

// =============================================================================
// Constellations
// =============================================================================

/// GET /api/v1/constellations
pub async fn list_constellations(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> HandlerResult<CollectionPage<ConstellationView>> {
    let request = page_request(query)?;
    let page = db_services::page_constellation_views(state.repository.as_ref(), request).await?;
    Ok(Json(page))
}

/// GET /api/v1/constellations/{id}
pub async fn get_constellation(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> HandlerResult<ConstellationView> {
    let id: ConstellationId = parse_id(EntityKind::Constellation, &raw_id)?;
    let view = db_services::get_constellation_view(state.repository.as_ref(), id).await?;
    Ok(Json(view))
}

// =============================================================================
// Publications
// =============================================================================

/// GET /api/v1/publications
pub async fn list_publications(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> HandlerResult<CollectionPage<PublicationView>> {
    let request = page_request(query)?;
    let page = db_services::page_publication_views(state.repository.as_ref(), request).await?;
    Ok(Json(page))
}

/// GET /api/v1/publications/{id}
pub async fn get_publication(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> HandlerResult<PublicationView> {
    let id: PublicationId = parse_id(EntityKind::Publication, &raw_id)?;
    let view = db_services::get_publication_view(state.repository.as_ref(), id).await?;
    Ok(Json(view))
}

/// Fallback for unknown routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}
