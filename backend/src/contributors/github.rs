//! GitHub REST client for contributor counts.

use async_trait::async_trait;
use log::debug;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::{ContributorCounts, ContributorSource};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const PER_PAGE: usize = 100;
const MAX_PAGES: usize = 10;
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ContributorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode upstream response: {0}")]
    Decode(String),
}

/// Repository whose contributors are reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubConfig {
    pub owner: String,
    pub repo: String,
    pub api_url: String,
    pub token: Option<String>,
}

impl GithubConfig {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
        }
    }

    /// Reads `GITHUB_OWNER`, `GITHUB_REPO`, `GITHUB_TOKEN` and
    /// `GITHUB_API_URL`. Returns `None` unless owner and repo are both set.
    pub fn from_env() -> Option<Self> {
        let owner = std::env::var("GITHUB_OWNER").ok()?;
        let repo = std::env::var("GITHUB_REPO").ok()?;
        let mut config = Self::new(owner, repo);
        if let Ok(api_url) = std::env::var("GITHUB_API_URL") {
            config.api_url = api_url;
        }
        config.token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        Some(config)
    }

    fn endpoint(&self, resource: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            resource
        )
    }
}

#[derive(Debug, Deserialize)]
struct ContributorEntry {
    login: String,
    contributions: u64,
}

#[derive(Debug, Deserialize)]
struct IssueUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct IssueEntry {
    user: Option<IssueUser>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

/// Contributor source backed by the GitHub REST API.
pub struct GithubContributors {
    config: GithubConfig,
    client: Client,
}

impl GithubContributors {
    pub fn new(config: GithubConfig) -> Result<Self, ContributorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GithubConfig {
        &self.config
    }

    /// Follow `page=1..` until a short page or `MAX_PAGES`.
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, ContributorError> {
        let url = self.config.endpoint(resource);
        let mut rows = Vec::new();

        for page in 1..=MAX_PAGES {
            let mut request = self
                .client
                .get(&url)
                .header(USER_AGENT, concat!("interswellar/", env!("CARGO_PKG_VERSION")))
                .query(params)
                .query(&[("per_page", PER_PAGE), ("page", page)]);
            if let Some(ref token) = self.config.token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(ContributorError::Status {
                    status: response.status().as_u16(),
                    url,
                });
            }

            let batch: Vec<T> = response
                .json()
                .await
                .map_err(|e| ContributorError::Decode(e.to_string()))?;
            let len = batch.len();
            debug!("Fetched {} rows from {} (page {})", len, url, page);
            rows.extend(batch);
            if len < PER_PAGE {
                break;
            }
        }

        Ok(rows)
    }
}

#[async_trait]
impl ContributorSource for GithubContributors {
    async fn commits(&self) -> Result<ContributorCounts, ContributorError> {
        let entries: Vec<ContributorEntry> = self.fetch_all("contributors", &[]).await?;
        let mut counts = ContributorCounts::new();
        for entry in entries {
            *counts.entry(entry.login).or_insert(0) += entry.contributions;
        }
        Ok(counts)
    }

    async fn issues(&self) -> Result<ContributorCounts, ContributorError> {
        let entries: Vec<IssueEntry> = self.fetch_all("issues", &[("state", "all")]).await?;
        let mut counts = ContributorCounts::new();
        for entry in entries {
            if entry.pull_request.is_some() {
                continue;
            }
            if let Some(user) = entry.user {
                *counts.entry(user.login).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let mut config = GithubConfig::new("octo", "catalog");
        config.api_url = "http://localhost:8000/".into();
        assert_eq!(
            config.endpoint("issues"),
            "http://localhost:8000/repos/octo/catalog/issues"
        );
    }

    #[test]
    fn test_issue_entry_pull_request_marker() {
        let pr: IssueEntry =
            serde_json::from_str(r#"{"user": {"login": "a"}, "pull_request": {"url": "x"}}"#)
                .unwrap();
        assert!(pr.pull_request.is_some());
        let issue: IssueEntry = serde_json::from_str(r#"{"user": {"login": "a"}}"#).unwrap();
        assert!(issue.pull_request.is_none());
    }
}
