//! Repository factory.
//!
//! Picks and constructs the catalog store at runtime from the environment,
//! a `repository.toml` file, or an explicit [`RepositoryType`].

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use super::PostgresConfig;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Postgres + Diesel implementation
    Postgres,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Accepts "postgres"/"pg" and "local", case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Reads `REPOSITORY_TYPE`. Without it, Postgres is chosen when a
    /// database URL is present, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("DATABASE_URL").is_ok() || std::env::var("PG_DATABASE_URL").is_ok() {
            Self::Postgres
        } else {
            Self::Local
        }
    }
}

#[cfg(not(feature = "postgres-repo"))]
fn postgres_disabled() -> RepositoryError {
    RepositoryError::configuration("Postgres repository feature not enabled")
}

/// Repository factory for creating repository instances.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// `postgres_config` is required when `repo_type` is Postgres.
    pub async fn create(
        repo_type: RepositoryType,
        postgres_config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    let config = postgres_config.ok_or_else(|| {
                        RepositoryError::configuration(
                            "Postgres repository requires PostgresConfig",
                        )
                    })?;
                    let pg = Self::create_postgres(config).await?;
                    Ok(pg as Arc<dyn FullRepository>)
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    let _ = postgres_config;
                    Err(postgres_disabled())
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a Postgres repository, running pending migrations.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> RepositoryResult<Arc<PostgresRepository>> {
        let config = config.clone();
        let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(config))
            .await
            .map_err(|e| RepositoryError::internal(format!("Task join error: {}", e)))??;
        Ok(Arc::new(repo))
    }

    /// Create an empty in-memory repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration
    /// (see [`RepositoryType::from_env`]).
    pub async fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        match RepositoryType::from_env() {
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    let config =
                        PostgresConfig::from_env().map_err(RepositoryError::configuration)?;
                    let pg = Self::create_postgres(&config).await?;
                    Ok(pg as Arc<dyn FullRepository>)
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    Err(postgres_disabled())
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create repository from a TOML configuration file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config).await
    }

    /// Create repository from a parsed [`RepositoryConfig`].
    pub async fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        match repo_type {
            RepositoryType::Postgres => {
                let pg_config = config.to_postgres_config()?.ok_or_else(|| {
                    RepositoryError::configuration(
                        "Postgres repository requires database configuration",
                    )
                })?;
                Self::create(RepositoryType::Postgres, Some(&pg_config)).await
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_from_str() {
        assert_eq!(
            RepositoryType::from_str("local").unwrap(),
            RepositoryType::Local
        );
        assert_eq!(
            RepositoryType::from_str("Pg").unwrap(),
            RepositoryType::Postgres
        );
        assert!(RepositoryType::from_str("sqlite").is_err());
    }

    #[tokio::test]
    async fn test_create_local_repository() {
        let repo = RepositoryFactory::create(RepositoryType::Local, None)
            .await
            .unwrap();
        assert!(repo.health_check().await.unwrap());
    }

    #[cfg(not(feature = "postgres-repo"))]
    #[tokio::test]
    async fn test_postgres_without_feature_is_configuration_error() {
        let err = RepositoryFactory::create(RepositoryType::Postgres, None)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }
}
