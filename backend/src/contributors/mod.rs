//! Contributor statistics for the landing page.
//!
//! A [`ContributorSource`] reports commit and issue counts per contributor.
//! The free helpers ([`get_commits`], [`get_issues`], [`get_total_commits`],
//! [`get_total_issues`]) never fail: an upstream error is logged and treated
//! as "no data".

mod github;

pub use github::{ContributorError, GithubConfig, GithubContributors};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contributor login -> count, ordered by login.
pub type ContributorCounts = BTreeMap<String, u64>;

/// Source of per-contributor activity counts.
#[async_trait]
pub trait ContributorSource: Send + Sync {
    /// Commits per contributor.
    async fn commits(&self) -> Result<ContributorCounts, ContributorError>;

    /// Issues opened per contributor (pull requests excluded).
    async fn issues(&self) -> Result<ContributorCounts, ContributorError>;
}

/// Fixed counts. Used when no upstream is configured and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticContributors {
    commits: ContributorCounts,
    issues: ContributorCounts,
}

impl StaticContributors {
    pub fn new(commits: ContributorCounts, issues: ContributorCounts) -> Self {
        Self { commits, issues }
    }

    /// No contributors at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_commits(mut self, login: impl Into<String>, count: u64) -> Self {
        self.commits.insert(login.into(), count);
        self
    }

    pub fn with_issues(mut self, login: impl Into<String>, count: u64) -> Self {
        self.issues.insert(login.into(), count);
        self
    }
}

#[async_trait]
impl ContributorSource for StaticContributors {
    async fn commits(&self) -> Result<ContributorCounts, ContributorError> {
        Ok(self.commits.clone())
    }

    async fn issues(&self) -> Result<ContributorCounts, ContributorError> {
        Ok(self.issues.clone())
    }
}

pub async fn get_commits<S: ContributorSource + ?Sized>(source: &S) -> ContributorCounts {
    source.commits().await.unwrap_or_else(|e| {
        warn!("Failed to fetch commit counts: {}", e);
        ContributorCounts::new()
    })
}

pub async fn get_issues<S: ContributorSource + ?Sized>(source: &S) -> ContributorCounts {
    source.issues().await.unwrap_or_else(|e| {
        warn!("Failed to fetch issue counts: {}", e);
        ContributorCounts::new()
    })
}

pub async fn get_total_commits<S: ContributorSource + ?Sized>(source: &S) -> u64 {
    get_commits(source).await.values().sum()
}

pub async fn get_total_issues<S: ContributorSource + ?Sized>(source: &S) -> u64 {
    get_issues(source).await.values().sum()
}

/// Point-in-time snapshot rendered on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributorStats {
    pub commits: ContributorCounts,
    pub issues: ContributorCounts,
    pub total_commits: u64,
    pub total_issues: u64,
    pub fetched_at: DateTime<Utc>,
}

impl ContributorStats {
    /// Fetch commits and issues concurrently and total them.
    pub async fn collect<S: ContributorSource + ?Sized>(source: &S) -> Self {
        let (commits, issues) = tokio::join!(get_commits(source), get_issues(source));
        let total_commits = commits.values().sum();
        let total_issues = issues.values().sum();
        Self {
            commits,
            issues,
            total_commits,
            total_issues,
            fetched_at: Utc::now(),
        }
    }

    /// Every login that appears in either map, in order.
    pub fn contributors(&self) -> Vec<&str> {
        let mut logins: Vec<&str> = self
            .commits
            .keys()
            .chain(self.issues.keys())
            .map(String::as_str)
            .collect();
        logins.sort_unstable();
        logins.dedup();
        logins
    }
}
