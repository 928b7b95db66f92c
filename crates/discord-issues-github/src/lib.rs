//! GitHub issue tracker access for the Discord issue bridge.
//! This crate defines the issue-tracker contract consumed by the runtime and
//! a REST client implementing it, plus shared HTTP retry helpers.

pub mod github_api_client;
pub mod issue_tracker;
pub mod repo_ref;
pub mod transport_helpers;

pub use github_api_client::{GithubApiClient, GithubRepository};
pub use issue_tracker::{
    CreatedIssue, GithubCollaborator, GithubIssueType, GithubLabel, GithubMilestone,
    IssueRequest, IssueTracker,
};
pub use repo_ref::RepoRef;
