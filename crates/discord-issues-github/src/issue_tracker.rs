//! Issue tracker contract and the records it exchanges.

use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;
use discord_issues_forms::OptionSource;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GithubLabel {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GithubIssueType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GithubMilestone {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GithubCollaborator {
    pub login: String,
}

impl OptionSource for GithubLabel {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl OptionSource for GithubIssueType {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl OptionSource for GithubMilestone {
    fn display_name(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn option_value(&self) -> String {
        self.number.to_string()
    }
}

impl OptionSource for GithubCollaborator {
    fn display_name(&self) -> &str {
        &self.login
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Fully resolved payload for one issue creation.
pub struct IssueRequest {
    pub title: String,
    pub body: String,
    pub labels: BTreeSet<String>,
    pub milestone: Option<String>,
    pub assignee: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedIssue {
    pub number: u64,
    pub html_url: String,
}

#[async_trait]
/// Trait contract for the external issue tracker used by the bridge.
pub trait IssueTracker: Send + Sync {
    async fn list_labels(&self) -> Result<Vec<GithubLabel>>;

    async fn list_issue_types(&self, org: &str) -> Result<Vec<GithubIssueType>>;

    async fn list_milestones(&self) -> Result<Vec<GithubMilestone>>;

    async fn list_collaborators(&self) -> Result<Vec<GithubCollaborator>>;

    async fn create_issue(&self, request: &IssueRequest) -> Result<CreatedIssue>;
}
