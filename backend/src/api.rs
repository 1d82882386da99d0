//! Public API surface: the JSON shapes served by the REST endpoints.
//!
//! Single-resource views flatten the entity's scalar fields and add its
//! related entities as shallow nested objects (scalar fields only).

use serde::{Deserialize, Serialize};

pub use crate::models::{
    Constellation, ConstellationId, Exoplanet, ExoplanetId, Link, LinkKind, Publication,
    PublicationId, Star, StarId,
};

/// A star with its relationships resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarView {
    #[serde(flatten)]
    pub star: Star,
    /// Exoplanets orbiting the star, in link order
    pub exoplanets: Vec<Exoplanet>,
    pub constellation: Option<Constellation>,
    pub discovered_by: Option<Publication>,
    /// Publications citing the star
    pub publications: Vec<Publication>,
}

/// An exoplanet with its relationships resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExoplanetView {
    #[serde(flatten)]
    pub exoplanet: Exoplanet,
    pub star: Option<Star>,
    pub discovered_by: Option<Publication>,
    pub publications: Vec<Publication>,
}

/// A constellation with its relationships resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationView {
    #[serde(flatten)]
    pub constellation: Constellation,
    pub stars: Vec<Star>,
    pub publications: Vec<Publication>,
}

/// A publication with its relationships resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationView {
    #[serde(flatten)]
    pub publication: Publication,
    /// Stars the publication cites
    pub stars: Vec<Star>,
    /// Exoplanets the publication cites
    pub exoplanets: Vec<Exoplanet>,
    pub constellations: Vec<Constellation>,
    /// Stars explicitly credited to this publication
    pub discovered_stars: Vec<Star>,
    /// Exoplanets explicitly credited to this publication
    pub discovered_exoplanets: Vec<Exoplanet>,
}

/// Collection response for one entity type.
///
/// `num_results` is the total row count; `objects` holds the requested page
/// ordered by identifier ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionPage<T> {
    pub num_results: usize,
    pub page: usize,
    pub total_pages: usize,
    pub objects: Vec<T>,
}

/// Default page size for collection endpoints.
pub const DEFAULT_RESULTS_PER_PAGE: usize = 10;

/// Upper bound on the page size a client may request.
pub const MAX_RESULTS_PER_PAGE: usize = 100;

/// Page selection for a collection request (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub results_per_page: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            results_per_page: DEFAULT_RESULTS_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Validate raw query values, applying defaults and clamping the page size.
    pub fn new(page: Option<usize>, results_per_page: Option<usize>) -> Result<Self, String> {
        let page = page.unwrap_or(1);
        let results_per_page = results_per_page.unwrap_or(DEFAULT_RESULTS_PER_PAGE);
        if page == 0 {
            return Err("page must be at least 1".to_string());
        }
        if results_per_page == 0 {
            return Err("results_per_page must be at least 1".to_string());
        }
        Ok(Self {
            page,
            results_per_page: results_per_page.min(MAX_RESULTS_PER_PAGE),
        })
    }

    /// Slice `rows` (already ordered) into the requested page.
    pub fn apply<T>(&self, rows: Vec<T>) -> CollectionPage<T> {
        let num_results = rows.len();
        let total_pages = num_results.div_ceil(self.results_per_page);
        let objects = rows
            .into_iter()
            .skip((self.page - 1).saturating_mul(self.results_per_page))
            .take(self.results_per_page)
            .collect();
        CollectionPage {
            num_results,
            page: self.page,
            total_pages,
            objects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults() {
        let req = PageRequest::new(None, None).unwrap();
        assert_eq!(req, PageRequest::default());
    }

    #[test]
    fn test_page_request_rejects_zero() {
        assert!(PageRequest::new(Some(0), None).is_err());
        assert!(PageRequest::new(None, Some(0)).is_err());
    }

    #[test]
    fn test_page_request_clamps_size() {
        let req = PageRequest::new(Some(2), Some(1000)).unwrap();
        assert_eq!(req.results_per_page, MAX_RESULTS_PER_PAGE);
    }

    #[test]
    fn test_apply_slices_and_counts() {
        let req = PageRequest::new(Some(2), Some(2)).unwrap();
        let page = req.apply(vec![1, 2, 3, 4, 5]);
        assert_eq!(page.num_results, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.objects, vec![3, 4]);
    }

    #[test]
    fn test_apply_past_end_is_empty() {
        let req = PageRequest::new(Some(4), Some(2)).unwrap();
        let page = req.apply(vec![1, 2, 3]);
        assert_eq!(page.num_results, 3);
        assert!(page.objects.is_empty());
    }

    #[test]
    fn test_apply_huge_page_is_empty() {
        let req = PageRequest::new(Some(usize::MAX), Some(MAX_RESULTS_PER_PAGE)).unwrap();
        let page = req.apply(vec![1, 2, 3]);
        assert_eq!(page.num_results, 3);
        assert_eq!(page.page, usize::MAX);
        assert!(page.objects.is_empty());
    }

    #[test]
    fn test_view_flattens_entity_fields() {
        let view = StarView {
            star: Star::new(1, "rouge_star", 1.0, 1.0, 1000.0, 1.0),
            exoplanets: vec![],
            constellation: None,
            discovered_by: None,
            publications: vec![],
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["name"], "rouge_star");
        assert!(value["constellation"].is_null());
        assert!(value.get("star").is_none());
    }
}
