//! Request and response shapes that exist only at the HTTP boundary.
//!
//! Catalog payloads are the view types from [`crate::api`].

use serde::{Deserialize, Serialize};

use super::error::AppError;
use crate::api::PageRequest;

pub use crate::api::{
    CollectionPage, ConstellationView, ExoplanetView, PublicationView, StarView,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// `connected`, `disconnected` or `error: ...`
    pub database: String,
}

/// Query string of the collection endpoints.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub results_per_page: Option<usize>,
}

impl PageQuery {
    pub fn into_request(self) -> Result<PageRequest, AppError> {
        PageRequest::new(self.page, self.results_per_page).map_err(AppError::BadRequest)
    }
}
