//! Link repository trait for relationship edges.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Link, LinkKind};

/// Repository trait for relationship edges between entities.
///
/// Edges are kept in insertion order. For to-one kinds
/// ([`LinkKind::is_to_one`]) a child has at most one parent: linking it again
/// under a different parent moves it, and the moved edge sorts last among
/// the new parent's children. Linking an existing edge again is a no-op.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Store an edge.
    ///
    /// # Errors
    /// `RepositoryError::NotFound` if either endpoint does not exist.
    async fn link(&self, link: Link) -> RepositoryResult<()>;

    /// Children of `parent` under `kind`, in link order.
    async fn children(&self, kind: LinkKind, parent: i64) -> RepositoryResult<Vec<i64>>;

    /// Parents of `child` under `kind`, in link order.
    async fn parents(&self, kind: LinkKind, child: i64) -> RepositoryResult<Vec<i64>>;
}
