//! CLI mode
//!
//! Delegates to the command implementations in `interfaces::cli`.

use crate::cli::Commands;
use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;

/// Run one management command
pub async fn run_cli(config: &StaticConfig, command: Commands) -> Result<(), CliError> {
    crate::interfaces::cli::run_cli_command(config, command).await
}
