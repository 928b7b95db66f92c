//! HTTP interactions endpoint that verifies, routes, and answers Discord events.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use discord_issues_forms::{render_modal, IssueCategory};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::command_router::{CommandRouter, RouteOutcome};
use crate::discord_api_client::DiscordApiClient;
use crate::interaction_event::{parse_interaction, FormSubmission, InteractionEvent};
use crate::interaction_signature::{InteractionVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};

pub const INTERACTIONS_ENDPOINT: &str = "/interactions";
pub const HEALTH_ENDPOINT: &str = "/";
const HEALTH_BODY: &str = "Github issues bot!";

const RESPONSE_TYPE_PONG: u8 = 1;
const RESPONSE_TYPE_CHANNEL_MESSAGE: u8 = 4;
const RESPONSE_TYPE_DEFERRED_CHANNEL_MESSAGE: u8 = 5;
const RESPONSE_TYPE_MODAL: u8 = 9;

pub struct InteractionServerState {
    router: CommandRouter,
    verifier: InteractionVerifier,
    discord: DiscordApiClient,
}

impl InteractionServerState {
    pub fn new(
        router: CommandRouter,
        verifier: InteractionVerifier,
        discord: DiscordApiClient,
    ) -> Self {
        Self {
            router,
            verifier,
            discord,
        }
    }
}

/// Run the interactions server until ctrl-c.
pub async fn run_interaction_server(bind: &str, state: InteractionServerState) -> Result<()> {
    let bind_addr = bind
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid interaction server bind address '{bind}'"))?;
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind interaction server on {bind_addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve bound interaction server address")?;
    tracing::info!(
        addr = %local_addr,
        endpoint = INTERACTIONS_ENDPOINT,
        "interaction server listening"
    );

    let app = build_interaction_router(Arc::new(state));
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("interaction server exited unexpectedly")
}

pub fn build_interaction_router(state: Arc<InteractionServerState>) -> Router {
    Router::new()
        .route(HEALTH_ENDPOINT, get(handle_health))
        .route(INTERACTIONS_ENDPOINT, post(handle_interaction))
        .with_state(state)
}

async fn handle_health() -> &'static str {
    HEALTH_BODY
}

async fn handle_interaction(
    State(state): State<Arc<InteractionServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = header_str(&headers, SIGNATURE_HEADER);
    let timestamp = header_str(&headers, TIMESTAMP_HEADER);
    if let Err(error) = state.verifier.verify(signature, timestamp, &body) {
        tracing::debug!(error = %format!("{error:#}"), "rejected interaction request");
        return (StatusCode::UNAUTHORIZED, "invalid request signature").into_response();
    }

    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!(%error, "malformed interaction payload");
            return (StatusCode::BAD_REQUEST, "malformed interaction payload").into_response();
        }
    };

    let event = parse_interaction(&payload);
    if matches!(event, InteractionEvent::Ping) {
        return Json(json!({ "type": RESPONSE_TYPE_PONG })).into_response();
    }
    if let InteractionEvent::FormSubmitted(submission) = event {
        return defer_submission(state, submission);
    }
    match state.router.route(event).await {
        RouteOutcome::ShowForm(form) => Json(json!({
            "type": RESPONSE_TYPE_MODAL,
            "data": render_modal(&form),
        }))
        .into_response(),
        RouteOutcome::Reply(content) => Json(json!({
            "type": RESPONSE_TYPE_CHANNEL_MESSAGE,
            "data": { "content": content },
        }))
        .into_response(),
        RouteOutcome::Ignored => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Acknowledge a submission within Discord's response window and deliver the
/// creation result as the interaction's single follow-up message.
fn defer_submission(state: Arc<InteractionServerState>, submission: FormSubmission) -> Response {
    if IssueCategory::from_form_id(&submission.form_id).is_none() {
        tracing::debug!(form_id = %submission.form_id, "ignoring unknown form submission");
        return StatusCode::NO_CONTENT.into_response();
    }
    tokio::spawn(deliver_submission_reply(state, submission));
    Json(json!({ "type": RESPONSE_TYPE_DEFERRED_CHANNEL_MESSAGE })).into_response()
}

async fn deliver_submission_reply(
    state: Arc<InteractionServerState>,
    submission: FormSubmission,
) {
    let application_id = submission.application_id.clone();
    let interaction_token = submission.interaction_token.clone();
    let RouteOutcome::Reply(content) = state
        .router
        .route(InteractionEvent::FormSubmitted(submission))
        .await
    else {
        return;
    };
    if let Err(error) = state
        .discord
        .send_follow_up(&application_id, &interaction_token, &content)
        .await
    {
        tracing::error!(error = %format!("{error:#}"), "failed to deliver submission reply");
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}
