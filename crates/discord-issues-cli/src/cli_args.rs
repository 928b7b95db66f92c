use clap::Parser;
use discord_issues_github::RepoRef;

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_repo_ref(value: &str) -> Result<RepoRef, String> {
    RepoRef::parse(value).map_err(|error| error.to_string())
}

#[derive(Debug, Parser)]
#[command(
    name = "discord-issues",
    about = "Turn Discord messages into GitHub issues through message commands and modal forms",
    version
)]
/// Process configuration, read from flags or the environment.
pub struct Cli {
    #[arg(
        long = "github-repository",
        env = "GITHUB_REPOSITORY",
        value_parser = parse_repo_ref,
        help = "Repository that receives created issues, as owner/repo"
    )]
    pub github_repository: RepoRef,

    #[arg(
        long = "github-token",
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "Token used to authenticate GitHub API requests"
    )]
    pub github_token: String,

    #[arg(
        long = "github-api-base",
        env = "GITHUB_API_BASE",
        default_value = "https://api.github.com"
    )]
    pub github_api_base: String,

    #[arg(
        long = "github-issue-type-org",
        env = "GITHUB_ISSUE_TYPE_ORG",
        help = "Organization whose issue types are offered; defaults to the repository owner"
    )]
    pub github_issue_type_org: Option<String>,

    #[arg(
        long = "discord-bot-token",
        env = "BOT_TOKEN",
        hide_env_values = true,
        help = "Discord bot token used to register message commands"
    )]
    pub discord_bot_token: String,

    #[arg(long = "discord-application-id", env = "DISCORD_APPLICATION_ID")]
    pub discord_application_id: String,

    #[arg(
        long = "discord-public-key",
        env = "DISCORD_PUBLIC_KEY",
        help = "Hex-encoded application public key used to verify interaction requests"
    )]
    pub discord_public_key: String,

    #[arg(
        long = "discord-guild-id",
        env = "GUILD_ID",
        help = "Guild that receives the message commands"
    )]
    pub discord_guild_id: String,

    #[arg(
        long = "discord-api-base",
        env = "DISCORD_API_BASE",
        default_value = "https://discord.com/api/v10"
    )]
    pub discord_api_base: String,

    #[arg(
        long = "skip-command-registration",
        env = "SKIP_COMMAND_REGISTRATION",
        default_value_t = false,
        help = "Do not overwrite the guild's message commands at startup"
    )]
    pub skip_command_registration: bool,

    #[arg(long = "bind-host", env = "BIND_HOST", default_value = "0.0.0.0")]
    pub bind_host: String,

    #[arg(long, env = "PORT", default_value_t = 3_000)]
    pub port: u16,

    #[arg(
        long = "request-timeout-ms",
        env = "REQUEST_TIMEOUT_MS",
        default_value_t = 10_000,
        value_parser = parse_positive_u64
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long = "retry-max-attempts",
        env = "RETRY_MAX_ATTEMPTS",
        default_value_t = 3,
        value_parser = parse_positive_usize
    )]
    pub retry_max_attempts: usize,

    #[arg(
        long = "retry-base-delay-ms",
        env = "RETRY_BASE_DELAY_MS",
        default_value_t = 250,
        value_parser = parse_positive_u64
    )]
    pub retry_base_delay_ms: u64,

    #[arg(
        long = "option-fetch-timeout-ms",
        env = "OPTION_FETCH_TIMEOUT_MS",
        default_value_t = 2_000,
        value_parser = parse_positive_u64,
        help = "Upper bound for each option-source fetch; Discord expects the form within 3 seconds"
    )]
    pub option_fetch_timeout_ms: u64,
}

impl Cli {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }

    pub fn issue_type_org(&self) -> &str {
        self.github_issue_type_org
            .as_deref()
            .unwrap_or(&self.github_repository.owner)
    }
}
