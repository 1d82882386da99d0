//! Repository trait definitions for catalog storage.
//!
//! - [`error`]: Error types for repository operations
//! - [`entity`]: Inserts, primary-key lookups and table scans
//! - [`link`]: Ordered relationship edges
//!
//! For functions that need both capabilities, use the [`FullRepository`]
//! trait bound:
//!
//! ```ignore
//! async fn seed<R: FullRepository + ?Sized>(repo: &R, star: &Star) -> RepositoryResult<()> {
//!     repo.insert_star(star).await?;
//!     repo.link(Link::located_in(star.id, ConstellationId::new(1))).await
//! }
//! ```

pub mod entity;
pub mod error;
pub mod link;

pub use entity::EntityRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use link::LinkRepository;

/// Composite trait bound for a complete repository implementation.
pub trait FullRepository: EntityRepository + LinkRepository {}

impl<T> FullRepository for T where T: EntityRepository + LinkRepository {}
