//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Shortly - a small URL shortener service
#[derive(Parser, Debug)]
#[command(name = "shortly")]
#[command(version)]
#[command(about = "A small URL shortener service with click tracking", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: ./config.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Shorten a URL
    Add {
        /// Target URL (http or https)
        url: String,
    },

    /// List all short URLs, newest first
    List,

    /// Remove a short URL
    Remove {
        /// Short code to remove
        short_code: String,
    },

    /// Insert a few sample URLs
    Seed,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// 未指定子命令时运行服务器
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
