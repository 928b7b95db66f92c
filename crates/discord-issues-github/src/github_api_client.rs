//! GitHub REST client used to list option sources and create issues.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::issue_tracker::{
    CreatedIssue, GithubCollaborator, GithubIssueType, GithubLabel, GithubMilestone,
    IssueRequest, IssueTracker,
};
use crate::repo_ref::RepoRef;
use crate::transport_helpers::{request_json_with_retry, RetryPolicy};

const GITHUB_SERVICE: &str = "github";
const PAGE_SIZE: &str = "100";

#[derive(Debug, Clone, Deserialize)]
pub struct GithubRepository {
    pub full_name: String,
}

#[derive(Clone)]
pub struct GithubApiClient {
    http: reqwest::Client,
    api_base: String,
    repo: RepoRef,
    retry: RetryPolicy,
}

impl GithubApiClient {
    pub fn new(
        api_base: String,
        token: String,
        repo: RepoRef,
        request_timeout_ms: u64,
        retry_max_attempts: usize,
        retry_base_delay_ms: u64,
    ) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("discord-issues-bridge"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        let auth_header = format!("Bearer {}", token.trim());
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&auth_header)
                .context("invalid github authorization header")?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create github api client")?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            repo,
            retry: RetryPolicy::new(retry_max_attempts, retry_base_delay_ms),
        })
    }

    fn repo_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.api_base, self.repo.owner, self.repo.name, suffix
        )
    }

    pub async fn get_repository(&self) -> Result<GithubRepository> {
        request_json_with_retry(GITHUB_SERVICE, "get repository", self.retry, || {
            self.http.get(self.repo_url(""))
        })
        .await
    }

    async fn list_repo_collection<T>(&self, operation: &str, suffix: &str) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        request_json_with_retry(GITHUB_SERVICE, operation, self.retry, || {
            self.http
                .get(self.repo_url(suffix))
                .query(&[("per_page", PAGE_SIZE)])
        })
        .await
    }
}

/// Build the create-issue JSON payload; numeric milestones are sent as numbers.
pub(crate) fn create_issue_payload(request: &IssueRequest) -> Value {
    let mut payload = json!({
        "title": request.title,
        "body": request.body,
        "labels": request.labels.iter().collect::<Vec<_>>(),
    });
    if let Some(milestone) = request.milestone.as_deref() {
        payload["milestone"] = match milestone.trim().parse::<u64>() {
            Ok(number) => json!(number),
            Err(_) => json!(milestone),
        };
    }
    if let Some(assignee) = request.assignee.as_deref() {
        payload["assignees"] = json!([assignee]);
    }
    if let Some(category) = request.category.as_deref() {
        payload["type"] = json!(category);
    }
    payload
}

#[async_trait]
impl IssueTracker for GithubApiClient {
    async fn list_labels(&self) -> Result<Vec<GithubLabel>> {
        self.list_repo_collection("list labels", "/labels").await
    }

    async fn list_issue_types(&self, org: &str) -> Result<Vec<GithubIssueType>> {
        request_json_with_retry(GITHUB_SERVICE, "list issue types", self.retry, || {
            self.http
                .get(format!("{}/orgs/{}/issue-types", self.api_base, org))
        })
        .await
    }

    async fn list_milestones(&self) -> Result<Vec<GithubMilestone>> {
        request_json_with_retry(GITHUB_SERVICE, "list milestones", self.retry, || {
            self.http
                .get(self.repo_url("/milestones"))
                .query(&[("state", "open"), ("per_page", PAGE_SIZE)])
        })
        .await
    }

    async fn list_collaborators(&self) -> Result<Vec<GithubCollaborator>> {
        self.list_repo_collection("list collaborators", "/collaborators")
            .await
    }

    async fn create_issue(&self, request: &IssueRequest) -> Result<CreatedIssue> {
        let payload = create_issue_payload(request);
        // A timed-out or failed POST may still have created the issue.
        request_json_with_retry(
            GITHUB_SERVICE,
            "create issue",
            RetryPolicy::single_attempt(),
            || self.http.post(self.repo_url("/issues")).json(&payload),
        )
        .await
    }
}
