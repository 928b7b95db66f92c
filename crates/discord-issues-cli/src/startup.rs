use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use discord_issues_github::GithubApiClient;
use discord_issues_runtime::{
    message_command_definitions, run_interaction_server, CommandRouter, CommandRouterConfig,
    DiscordApiClient, InteractionServerState, InteractionVerifier,
};

use crate::cli_args::Cli;

/// Preflight the repository, register message commands, and serve interactions.
pub async fn run_bridge(cli: Cli) -> Result<()> {
    let verifier = InteractionVerifier::from_hex(&cli.discord_public_key)
        .context("invalid DISCORD_PUBLIC_KEY")?;

    let github = GithubApiClient::new(
        cli.github_api_base.clone(),
        cli.github_token.clone(),
        cli.github_repository.clone(),
        cli.request_timeout_ms,
        cli.retry_max_attempts,
        cli.retry_base_delay_ms,
    )?;
    let repository = github
        .get_repository()
        .await
        .with_context(|| format!("failed to load repository {}", cli.github_repository))?;
    tracing::info!(repository = %repository.full_name, "acting on repository");

    let discord = DiscordApiClient::new(
        cli.discord_api_base.clone(),
        cli.discord_bot_token.clone(),
        cli.request_timeout_ms,
        cli.retry_max_attempts,
        cli.retry_base_delay_ms,
    )?;
    if cli.skip_command_registration {
        tracing::info!("skipping message command registration");
    } else {
        let registered = discord
            .overwrite_guild_commands(
                &cli.discord_application_id,
                &cli.discord_guild_id,
                &message_command_definitions(),
            )
            .await
            .context("failed to register message commands")?;
        for command in &registered {
            tracing::info!(id = %command.id, name = %command.name, "registered message command");
        }
    }

    let router = CommandRouter::new(
        CommandRouterConfig {
            organization: cli.issue_type_org().to_string(),
            option_fetch_timeout: Duration::from_millis(cli.option_fetch_timeout_ms),
        },
        Arc::new(github),
    );
    run_interaction_server(
        &cli.bind_address(),
        InteractionServerState::new(router, verifier, discord),
    )
    .await
}
