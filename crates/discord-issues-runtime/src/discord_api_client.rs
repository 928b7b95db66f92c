//! Discord REST client used to register message commands and deliver
//! interaction follow-up messages.

use std::time::Duration;

use anyhow::{Context, Result};
use discord_issues_forms::IssueCategory;
use discord_issues_github::transport_helpers::{
    request_json_with_retry, send_with_retry, RetryPolicy,
};
use serde::Deserialize;
use serde_json::{json, Value};

const DISCORD_SERVICE: &str = "discord";
const COMMAND_TYPE_MESSAGE: u8 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredCommand {
    pub id: String,
    pub name: String,
}

#[derive(Clone)]
pub struct DiscordApiClient {
    http: reqwest::Client,
    api_base: String,
    retry: RetryPolicy,
}

/// Message context-menu command definitions, one per issue category.
pub fn message_command_definitions() -> Vec<Value> {
    IssueCategory::ALL
        .iter()
        .map(|category| {
            json!({
                "name": category.command_name(),
                "type": COMMAND_TYPE_MESSAGE,
            })
        })
        .collect()
}

impl DiscordApiClient {
    pub fn new(
        api_base: String,
        bot_token: String,
        request_timeout_ms: u64,
        retry_max_attempts: usize,
        retry_base_delay_ms: u64,
    ) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(
                "DiscordBot (https://github.com/discord-issues, 0.1)",
            ),
        );
        let auth_header = format!("Bot {}", bot_token.trim());
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&auth_header)
                .context("invalid discord authorization header")?,
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create discord api client")?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            retry: RetryPolicy::new(retry_max_attempts, retry_base_delay_ms),
        })
    }

    /// Replace every guild command of the application with `commands`.
    pub async fn overwrite_guild_commands(
        &self,
        application_id: &str,
        guild_id: &str,
        commands: &[Value],
    ) -> Result<Vec<RegisteredCommand>> {
        request_json_with_retry(
            DISCORD_SERVICE,
            "bulk overwrite guild commands",
            self.retry,
            || {
                self.http
                    .put(format!(
                        "{}/applications/{}/guilds/{}/commands",
                        self.api_base, application_id, guild_id
                    ))
                    .json(commands)
            },
        )
        .await
    }

    /// Post `content` as the follow-up message of a deferred interaction.
    pub async fn send_follow_up(
        &self,
        application_id: &str,
        interaction_token: &str,
        content: &str,
    ) -> Result<()> {
        let payload = json!({ "content": content });
        // A retried POST could deliver the reply twice.
        send_with_retry(
            DISCORD_SERVICE,
            "send follow-up message",
            RetryPolicy::single_attempt(),
            || {
                self.http
                    .post(format!(
                        "{}/webhooks/{}/{}",
                        self.api_base, application_id, interaction_token
                    ))
                    .json(&payload)
            },
        )
        .await?;
        Ok(())
    }
}
