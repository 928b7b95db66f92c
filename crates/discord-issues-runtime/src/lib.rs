//! Discord interaction runtime for the GitHub issue bridge.
//!
//! Interactions arrive over HTTP, are verified, and are routed either to form
//! construction (message commands) or to issue creation (modal submissions).
//! Every event is handled independently; nothing is kept between events.

pub mod command_router;
pub mod discord_api_client;
pub mod interaction_event;
pub mod interaction_server;
pub mod interaction_signature;
pub mod submission_handler;

pub use command_router::{CommandRouter, CommandRouterConfig, RouteOutcome};
pub use discord_api_client::{message_command_definitions, DiscordApiClient};
pub use interaction_server::{run_interaction_server, InteractionServerState};
pub use interaction_signature::InteractionVerifier;
pub use submission_handler::{SubmissionError, SubmissionHandler};
