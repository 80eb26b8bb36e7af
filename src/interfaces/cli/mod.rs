//! CLI interface module
//!
//! One-shot management commands that talk to the store directly.

pub mod commands;

use std::fmt;
use std::sync::Arc;

use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::errors::ShortlyError;
use crate::services::UrlService;
use crate::storage::StorageFactory;
use commands::{add_url, config_generate, list_urls, remove_url, seed_urls};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ValidationError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ValidationError(msg) => format!("Invalid input: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ValidationError(msg) => {
                format!("{} {}", "Invalid input:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<ShortlyError> for CliError {
    fn from(err: ShortlyError) -> Self {
        match err {
            ShortlyError::Validation(msg) => CliError::ValidationError(msg),
            ShortlyError::NotFound(msg) => CliError::CommandError(msg),
            other => CliError::StorageError(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::CommandError(err.to_string())
    }
}

/// 进程退出前打印的错误文本，CLI 命令错误保留各自的彩色前缀
pub fn render_error(err: &anyhow::Error) -> String {
    use colored::Colorize;
    match err.downcast_ref::<CliError>() {
        Some(cli_err) => cli_err.format_colored(),
        None => format!("{} {:#}", "Error:".red().bold(), err),
    }
}

/// 为需要存储的命令构建 UrlService
async fn open_service(config: &StaticConfig) -> Result<UrlService, CliError> {
    let store = StorageFactory::create(&config.database, &config.codes).await?;
    Ok(UrlService::new(Arc::clone(&store), config.public_base_url()))
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(config: &StaticConfig, cmd: Commands) -> Result<(), CliError> {
    // Generate 不需要数据库连接
    if let Commands::Config { action } = cmd {
        let ConfigCommands::Generate { output_path, force } = action;
        return config_generate(output_path, force).await;
    }

    let service = open_service(config).await?;

    match cmd {
        Commands::Add { url } => add_url(&service, &url).await,
        Commands::List => list_urls(&service).await,
        Commands::Remove { short_code } => remove_url(&service, &short_code).await,
        Commands::Seed => seed_urls(&service).await,
        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server runtime".to_string(),
        )),
        Commands::Config { .. } => unreachable!("handled above"),
    }
}
