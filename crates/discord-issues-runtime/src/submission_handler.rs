//! Turns submitted issue forms into exactly one issue-creation call.

use std::collections::BTreeSet;
use std::sync::Arc;

use discord_issues_forms::{IssueCategory, SubmittedForm};
use discord_issues_github::{CreatedIssue, IssueRequest, IssueTracker};
use thiserror::Error;

/// Discord's message content limit.
const MAX_REPLY_CHARS: usize = 2_000;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Failed to create GitHub issue: {cause:#}")]
    CreateIssue { cause: anyhow::Error },
}

/// Build the issue payload for `category` from a decoded submission.
///
/// A `type` selection made on the form takes precedence over the category
/// implied by the invoking command.
pub fn build_issue_request(category: IssueCategory, form: &SubmittedForm) -> IssueRequest {
    IssueRequest {
        title: form.text("title"),
        body: form.text("desc"),
        labels: form.choices("labels").into_iter().collect::<BTreeSet<_>>(),
        milestone: form.single_choice("milestone"),
        assignee: form.single_choice("assignee"),
        category: Some(
            form.single_choice("type")
                .unwrap_or_else(|| category.tracker_type().to_string()),
        ),
    }
}

#[derive(Clone)]
pub struct SubmissionHandler {
    tracker: Arc<dyn IssueTracker>,
}

impl SubmissionHandler {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }

    pub async fn handle(
        &self,
        category: IssueCategory,
        form: &SubmittedForm,
    ) -> Result<CreatedIssue, SubmissionError> {
        let request = build_issue_request(category, form);
        tracing::info!(
            title = %request.title,
            labels = ?request.labels,
            milestone = ?request.milestone,
            assignee = ?request.assignee,
            category = ?request.category,
            "creating issue"
        );
        self.tracker
            .create_issue(&request)
            .await
            .map_err(|cause| SubmissionError::CreateIssue { cause })
    }
}

/// Render the single reply sent for a submission, success or failure.
pub fn render_submission_reply(result: &Result<CreatedIssue, SubmissionError>) -> String {
    let reply = match result {
        Ok(issue) => format!("[Created #{}]({})", issue.number, issue.html_url),
        Err(error) => error.to_string(),
    };
    if reply.chars().count() <= MAX_REPLY_CHARS {
        return reply;
    }
    let mut truncated = reply
        .chars()
        .take(MAX_REPLY_CHARS.saturating_sub(3))
        .collect::<String>();
    truncated.push_str("...");
    truncated
}
