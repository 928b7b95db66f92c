//! Command-line entrypoint wiring for the Discord issue bridge.

pub mod bootstrap_helpers;
pub mod cli_args;
pub mod startup;

pub use bootstrap_helpers::{init_tracing, load_dotenv};
pub use cli_args::Cli;
pub use startup::run_bridge;
