//! Contributor statistics against a mocked GitHub API.

use httpmock::prelude::*;
use serde_json::json;

use interswellar::contributors::{
    get_commits, get_issues, get_total_commits, get_total_issues, ContributorSource,
    ContributorStats, GithubConfig, GithubContributors,
};

fn source_for(server: &MockServer) -> GithubContributors {
    let mut config = GithubConfig::new("interswellar", "catalog");
    config.api_url = server.base_url();
    GithubContributors::new(config).unwrap()
}

#[tokio::test]
async fn test_commits_per_contributor() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/repos/interswellar/catalog/contributors")
                .query_param("per_page", "100")
                .query_param("page", "1")
                .header_exists("user-agent");
            then.status(200).json_body(json!([
                {"login": "sag3289", "contributions": 40},
                {"login": "nye", "contributions": 2}
            ]));
        })
        .await;

    let source = source_for(&server);
    let commits = get_commits(&source).await;
    mock.assert_async().await;

    assert_eq!(commits.len(), 2);
    assert_eq!(commits["sag3289"], 40);
    assert_eq!(commits["nye"], 2);
    assert_eq!(get_total_commits(&source).await, 42);
}

#[tokio::test]
async fn test_issues_skip_pull_requests() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/repos/interswellar/catalog/issues")
                .query_param("state", "all");
            then.status(200).json_body(json!([
                {"number": 1, "user": {"login": "nye"}},
                {"number": 2, "user": {"login": "nye"}},
                {"number": 3, "user": {"login": "tyson"}},
                {"number": 4, "user": {"login": "tyson"}, "pull_request": {"url": "x"}}
            ]));
        })
        .await;

    let source = source_for(&server);
    let issues = get_issues(&source).await;
    assert_eq!(issues["nye"], 2);
    assert_eq!(issues["tyson"], 1);
    assert_eq!(get_total_issues(&source).await, 3);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/repos/interswellar/catalog/contributors")
                .header("authorization", "Bearer s3cret");
            then.status(200).json_body(json!([]));
        })
        .await;

    let mut config = GithubConfig::new("interswellar", "catalog");
    config.api_url = server.base_url();
    config.token = Some("s3cret".into());
    let source = GithubContributors::new(config).unwrap();

    assert!(source.commits().await.unwrap().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upstream_failure_is_empty() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(403).body("rate limited");
        })
        .await;

    let source = source_for(&server);
    assert!(source.commits().await.is_err());
    assert!(get_commits(&source).await.is_empty());
    assert!(get_issues(&source).await.is_empty());
    assert_eq!(get_total_commits(&source).await, 0);
    assert_eq!(get_total_issues(&source).await, 0);
}

#[tokio::test]
async fn test_malformed_body_is_empty() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({"message": "not a list"}));
        })
        .await;

    let stats = ContributorStats::collect(&source_for(&server)).await;
    assert!(stats.commits.is_empty());
    assert!(stats.issues.is_empty());
    assert_eq!(stats.total_commits, 0);
}

#[tokio::test]
async fn test_follows_full_pages() {
    let server = MockServer::start_async().await;
    let full_page: Vec<_> = (0..100)
        .map(|i| json!({"login": format!("user{i}"), "contributions": 1}))
        .collect();
    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/repos/interswellar/catalog/contributors")
                .query_param("page", "1");
            then.status(200).json_body(json!(full_page));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/repos/interswellar/catalog/contributors")
                .query_param("page", "2");
            then.status(200)
                .json_body(json!([{"login": "late", "contributions": 5}]));
        })
        .await;

    let commits = get_commits(&source_for(&server)).await;
    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(commits.len(), 101);
    assert_eq!(commits.values().sum::<u64>(), 105);
}
