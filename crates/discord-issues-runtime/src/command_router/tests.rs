//! Scenario coverage for command routing and submission handling.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use discord_issues_forms::{RenderedControl, SubmittedValue};
use discord_issues_github::{
    CreatedIssue, GithubCollaborator, GithubIssueType, GithubLabel, GithubMilestone,
    IssueRequest, IssueTracker,
};

use super::{render_issue_body, CommandRouter, CommandRouterConfig, RouteOutcome};
use crate::interaction_event::{
    CommandInvocation, FormSubmission, InteractionEvent, TargetMessage,
};

#[derive(Default)]
struct FakeTracker {
    labels: Option<Vec<GithubLabel>>,
    issue_types: Option<Vec<GithubIssueType>>,
    milestones: Option<Vec<GithubMilestone>>,
    collaborators: Option<Vec<GithubCollaborator>>,
    fail_create: bool,
    list_delay: Option<Duration>,
    list_calls: AtomicUsize,
    created: Mutex<Vec<IssueRequest>>,
}

impl FakeTracker {
    async fn list<T: Clone>(&self, rows: &Option<Vec<T>>, source: &str) -> Result<Vec<T>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        rows.clone()
            .ok_or_else(|| anyhow!("{source} unavailable: 404 Not Found"))
    }

    fn created(&self) -> Vec<IssueRequest> {
        self.created.lock().expect("created lock").clone()
    }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn list_labels(&self) -> Result<Vec<GithubLabel>> {
        self.list(&self.labels, "labels").await
    }

    async fn list_issue_types(&self, org: &str) -> Result<Vec<GithubIssueType>> {
        assert_eq!(org, "owner");
        self.list(&self.issue_types, "issue types").await
    }

    async fn list_milestones(&self) -> Result<Vec<GithubMilestone>> {
        self.list(&self.milestones, "milestones").await
    }

    async fn list_collaborators(&self) -> Result<Vec<GithubCollaborator>> {
        self.list(&self.collaborators, "collaborators").await
    }

    async fn create_issue(&self, request: &IssueRequest) -> Result<CreatedIssue> {
        self.created
            .lock()
            .expect("created lock")
            .push(request.clone());
        if self.fail_create {
            return Err(anyhow!(
                "github api create issue failed with status 422: Label does not exist"
            ));
        }
        Ok(CreatedIssue {
            number: 7,
            html_url: "https://github.com/owner/repo/issues/7".to_string(),
        })
    }
}

fn router(tracker: Arc<FakeTracker>) -> CommandRouter {
    CommandRouter::new(
        CommandRouterConfig {
            organization: "owner".to_string(),
            option_fetch_timeout: Duration::from_millis(200),
        },
        tracker,
    )
}

fn label(name: &str) -> GithubLabel {
    GithubLabel {
        name: name.to_string(),
        description: None,
    }
}

fn command(name: &str) -> InteractionEvent {
    InteractionEvent::CommandInvoked(CommandInvocation {
        command_name: name.to_string(),
        user: "carol".to_string(),
        target_message: Some(TargetMessage {
            content: "it crashes on save".to_string(),
            author: "dave".to_string(),
            url: "https://discord.com/channels/1/2/3".to_string(),
        }),
    })
}

fn submission(form_id: &str, values: Vec<(&str, SubmittedValue)>) -> InteractionEvent {
    InteractionEvent::FormSubmitted(FormSubmission {
        form_id: form_id.to_string(),
        user: "carol".to_string(),
        values: values
            .into_iter()
            .map(|(id, value)| (id.to_string(), value))
            .collect(),
        application_id: "app-1".to_string(),
        interaction_token: "token-1".to_string(),
    })
}

fn field_ids(outcome: &RouteOutcome) -> Vec<String> {
    let RouteOutcome::ShowForm(form) = outcome else {
        panic!("expected form, got {outcome:?}");
    };
    form.fields
        .iter()
        .map(|field| field.id.as_str().to_string())
        .collect()
}

#[tokio::test]
async fn integration_bug_command_with_only_labels_available_builds_labels_field() {
    let tracker = Arc::new(FakeTracker {
        labels: Some(vec![label("bug")]),
        ..FakeTracker::default()
    });
    let outcome = router(Arc::clone(&tracker))
        .route(command("To Github Bug"))
        .await;

    let RouteOutcome::ShowForm(form) = &outcome else {
        panic!("expected form, got {outcome:?}");
    };
    assert_eq!(form.form_id, "create github issue Bug");
    assert_eq!(form.title, "Create GitHub Bug");
    assert_eq!(field_ids(&outcome), vec!["title*", "desc*", "labels"]);
    let labels = form.field("labels").expect("labels field");
    assert_eq!(labels.label, "Labels");
    let RenderedControl::Select {
        options,
        max_values,
        min_values,
    } = &labels.control
    else {
        panic!("labels must render as a select");
    };
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].display_name, "bug");
    assert_eq!((*min_values, *max_values), (0, 1));
    assert!(form.field("milestone").is_none());
    assert!(form.field("assignee").is_none());
    assert_eq!(tracker.list_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn functional_command_prefills_description_with_message_and_footer() {
    let tracker = Arc::new(FakeTracker::default());
    let outcome = router(tracker).route(command("To Github Task")).await;
    let RouteOutcome::ShowForm(form) = outcome else {
        panic!("expected form");
    };
    let description = form.field("desc").expect("description field");
    assert_eq!(
        description.control,
        RenderedControl::TextInput {
            long: true,
            default_value: Some(
                "it crashes on save\n\n---\n_Issue created by dave [via Discord](https://discord.com/channels/1/2/3)_"
                    .to_string()
            ),
        }
    );
}

#[tokio::test]
async fn functional_all_sources_available_drops_issue_type_at_field_cap() {
    let tracker = Arc::new(FakeTracker {
        labels: Some(vec![label("bug"), label("ui")]),
        issue_types: Some(vec![GithubIssueType {
            name: "Bug".to_string(),
            description: None,
        }]),
        milestones: Some(vec![GithubMilestone {
            number: 3,
            title: "v1.0".to_string(),
            description: None,
        }]),
        collaborators: Some(vec![GithubCollaborator {
            login: "alice".to_string(),
        }]),
        ..FakeTracker::default()
    });
    let outcome = router(tracker)
        .route(command("To Github Feature Request"))
        .await;
    assert_eq!(
        field_ids(&outcome),
        vec!["title*", "desc*", "labels", "milestone", "assignee"]
    );
    let RouteOutcome::ShowForm(form) = outcome else {
        unreachable!();
    };
    assert_eq!(form.form_id, "create github issue Feature Request");
    let RenderedControl::Select { options, .. } =
        &form.field("milestone").expect("milestone").control
    else {
        panic!("milestone must render as a select");
    };
    assert_eq!(options[0].value, "3");
}

#[tokio::test]
async fn functional_issue_type_field_fills_slot_left_by_missing_source() {
    let tracker = Arc::new(FakeTracker {
        labels: Some(vec![label("bug")]),
        issue_types: Some(vec![GithubIssueType {
            name: "Task".to_string(),
            description: Some("A specific piece of work".to_string()),
        }]),
        collaborators: Some(vec![GithubCollaborator {
            login: "alice".to_string(),
        }]),
        ..FakeTracker::default()
    });
    let outcome = router(tracker).route(command("To Github Task")).await;
    assert_eq!(
        field_ids(&outcome),
        vec!["title*", "desc*", "labels", "assignee", "type"]
    );
}

#[tokio::test]
async fn regression_slow_option_source_degrades_to_empty_without_failing() {
    let tracker = Arc::new(FakeTracker {
        labels: Some(vec![label("bug")]),
        list_delay: Some(Duration::from_secs(5)),
        ..FakeTracker::default()
    });
    let outcome = router(tracker).route(command("To Github Bug")).await;
    assert_eq!(field_ids(&outcome), vec!["title*", "desc*"]);
}

#[tokio::test]
async fn integration_task_submission_creates_issue_and_replies_with_link() {
    let tracker = Arc::new(FakeTracker::default());
    let outcome = router(Arc::clone(&tracker))
        .route(submission(
            "create github issue Task",
            vec![
                ("title*", SubmittedValue::Text("Fix crash".to_string())),
                ("desc*", SubmittedValue::Text("detail".to_string())),
            ],
        ))
        .await;

    assert_eq!(
        outcome,
        RouteOutcome::Reply("[Created #7](https://github.com/owner/repo/issues/7)".to_string())
    );
    assert_eq!(
        tracker.created(),
        vec![IssueRequest {
            title: "Fix crash".to_string(),
            body: "detail".to_string(),
            labels: BTreeSet::new(),
            milestone: None,
            assignee: None,
            category: Some("Task".to_string()),
        }]
    );
    assert_eq!(tracker.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn regression_failed_creation_replies_once_with_error_and_no_retry() {
    let tracker = Arc::new(FakeTracker {
        fail_create: true,
        ..FakeTracker::default()
    });
    let outcome = router(Arc::clone(&tracker))
        .route(submission(
            "create github issue Bug",
            vec![
                ("title*", SubmittedValue::Text("Broken".to_string())),
                ("desc*", SubmittedValue::Text("detail".to_string())),
                (
                    "labels",
                    SubmittedValue::Choices(vec!["missing-label".to_string()]),
                ),
            ],
        ))
        .await;

    let RouteOutcome::Reply(reply) = outcome else {
        panic!("expected a reply");
    };
    assert!(reply.starts_with("Failed to create GitHub issue:"));
    assert!(reply.contains("Label does not exist"));
    let created = tracker.created();
    assert_eq!(created.len(), 1);
    assert_eq!(
        created[0].labels,
        BTreeSet::from(["missing-label".to_string()])
    );
}

#[tokio::test]
async fn regression_unrelated_command_is_ignored_without_external_calls() {
    let tracker = Arc::new(FakeTracker::default());
    let router = router(Arc::clone(&tracker));
    assert_eq!(
        router.route(command("Unrelated Command")).await,
        RouteOutcome::Ignored
    );
    assert_eq!(
        router
            .route(submission("AwesomeForm", Vec::new()))
            .await,
        RouteOutcome::Ignored
    );
    assert_eq!(
        router
            .route(InteractionEvent::Unsupported {
                interaction_type: 3
            })
            .await,
        RouteOutcome::Ignored
    );
    assert_eq!(tracker.list_calls.load(Ordering::SeqCst), 0);
    assert!(tracker.created().is_empty());
}

#[test]
fn unit_render_issue_body_credits_target_message_author() {
    let target = TargetMessage {
        content: "hello".to_string(),
        author: "dave".to_string(),
        url: "https://discord.com/channels/1/2/3".to_string(),
    };
    assert_eq!(
        render_issue_body(&target),
        "hello\n\n---\n_Issue created by dave [via Discord](https://discord.com/channels/1/2/3)_"
    );
}
