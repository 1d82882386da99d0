//! Application state for the HTTP server.

use std::sync::Arc;

use crate::contributors::{ContributorSource, StaticContributors};
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Catalog storage
    pub repository: Arc<dyn FullRepository>,
    /// Contributor statistics shown on the landing page
    pub contributors: Arc<dyn ContributorSource>,
}

impl AppState {
    /// State with no contributor statistics.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            contributors: Arc::new(StaticContributors::empty()),
        }
    }

    pub fn with_contributors(mut self, contributors: Arc<dyn ContributorSource>) -> Self {
        self.contributors = contributors;
        self
    }
}
