//! Stateless dispatcher from interaction events to forms and submissions.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use discord_issues_forms::{
    build_form, project_options, FieldSpec, FormDescription, FormError, IssueCategory,
};
use discord_issues_github::{
    GithubCollaborator, GithubIssueType, GithubLabel, GithubMilestone, IssueTracker,
};

use crate::interaction_event::{
    CommandInvocation, FormSubmission, InteractionEvent, TargetMessage,
};
use crate::submission_handler::{render_submission_reply, SubmissionHandler};

#[derive(Debug, Clone)]
pub struct CommandRouterConfig {
    /// Organization whose issue types are offered on the form.
    pub organization: String,
    pub option_fetch_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    ShowForm(FormDescription),
    Reply(String),
    Ignored,
}

#[derive(Debug, Default)]
struct OptionSources {
    labels: Vec<GithubLabel>,
    issue_types: Vec<GithubIssueType>,
    milestones: Vec<GithubMilestone>,
    collaborators: Vec<GithubCollaborator>,
}

#[derive(Clone)]
pub struct CommandRouter {
    config: CommandRouterConfig,
    tracker: Arc<dyn IssueTracker>,
    submissions: SubmissionHandler,
}

impl CommandRouter {
    pub fn new(config: CommandRouterConfig, tracker: Arc<dyn IssueTracker>) -> Self {
        Self {
            submissions: SubmissionHandler::new(Arc::clone(&tracker)),
            config,
            tracker,
        }
    }

    pub async fn route(&self, event: InteractionEvent) -> RouteOutcome {
        match event {
            InteractionEvent::CommandInvoked(invocation) => self.on_command(invocation).await,
            InteractionEvent::FormSubmitted(submission) => self.on_submission(submission).await,
            InteractionEvent::Ping | InteractionEvent::Unsupported { .. } => RouteOutcome::Ignored,
        }
    }

    async fn on_command(&self, invocation: CommandInvocation) -> RouteOutcome {
        tracing::info!(
            command = %invocation.command_name,
            user = %invocation.user,
            "received command"
        );
        let Some(category) = IssueCategory::from_command_name(&invocation.command_name) else {
            return RouteOutcome::Ignored;
        };
        let sources = self.fetch_option_sources().await;
        match build_issue_form(category, &invocation, sources) {
            Ok(form) => RouteOutcome::ShowForm(form),
            Err(error) => {
                tracing::error!(%error, category = category.label(), "failed to build issue form");
                RouteOutcome::Ignored
            }
        }
    }

    async fn on_submission(&self, submission: FormSubmission) -> RouteOutcome {
        tracing::info!(
            form_id = %submission.form_id,
            user = %submission.user,
            "received form submission"
        );
        let Some(category) = IssueCategory::from_form_id(&submission.form_id) else {
            return RouteOutcome::Ignored;
        };
        let result = self.submissions.handle(category, &submission.decode()).await;
        match &result {
            Ok(issue) => tracing::info!(number = issue.number, url = %issue.html_url, "created issue"),
            Err(error) => tracing::warn!(%error, "issue creation failed"),
        }
        RouteOutcome::Reply(render_submission_reply(&result))
    }

    async fn fetch_option_sources(&self) -> OptionSources {
        let timeout = self.config.option_fetch_timeout;
        let (labels, issue_types, milestones, collaborators) = tokio::join!(
            fetch_or_empty("labels", timeout, self.tracker.list_labels()),
            fetch_or_empty(
                "issue types",
                timeout,
                self.tracker.list_issue_types(&self.config.organization)
            ),
            fetch_or_empty("milestones", timeout, self.tracker.list_milestones()),
            fetch_or_empty("collaborators", timeout, self.tracker.list_collaborators()),
        );
        OptionSources {
            labels,
            issue_types,
            milestones,
            collaborators,
        }
    }
}

async fn fetch_or_empty<T, F>(source: &'static str, timeout: Duration, fetch: F) -> Vec<T>
where
    F: Future<Output = Result<Vec<T>>>,
{
    match tokio::time::timeout(timeout, fetch).await {
        Ok(Ok(rows)) => rows,
        Ok(Err(error)) => {
            tracing::warn!(source, error = %format!("{error:#}"), "option source unavailable");
            Vec::new()
        }
        Err(_) => {
            tracing::warn!(
                source,
                timeout_ms = timeout.as_millis() as u64,
                "option source timed out"
            );
            Vec::new()
        }
    }
}

/// Default issue body: the target message plus a footer crediting its author.
pub fn render_issue_body(target: &TargetMessage) -> String {
    format!(
        "{}\n\n---\n_Issue created by {} [via Discord]({})_",
        target.content, target.author, target.url
    )
}

fn build_issue_form(
    category: IssueCategory,
    invocation: &CommandInvocation,
    sources: OptionSources,
) -> Result<FormDescription, FormError> {
    let mut description = FieldSpec::text_long("desc", true);
    if let Some(target) = invocation.target_message.as_ref() {
        description = description.with_default_value(render_issue_body(target));
    }
    build_form(
        &category.form_id(),
        &format!("Create GitHub {}", category.label()),
        vec![
            ("Title".to_string(), Some(FieldSpec::text_short("title", true))),
            ("Description".to_string(), Some(description)),
            (
                "Labels".to_string(),
                Some(FieldSpec::choice_multiple(
                    "labels",
                    false,
                    project_options(&sources.labels),
                )),
            ),
            (
                "Milestone".to_string(),
                Some(FieldSpec::choice_single(
                    "milestone",
                    false,
                    project_options(&sources.milestones),
                )),
            ),
            (
                "Assignee".to_string(),
                Some(FieldSpec::choice_single(
                    "assignee",
                    false,
                    project_options(&sources.collaborators),
                )),
            ),
            (
                "Type".to_string(),
                Some(FieldSpec::choice_single(
                    "type",
                    false,
                    project_options(&sources.issue_types),
                )),
            ),
        ],
    )
}

#[cfg(test)]
mod tests;
