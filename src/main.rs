use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use shortly::cli::{Cli, Commands};
use shortly::config::StaticConfig;
use shortly::interfaces::cli::render_error;
use shortly::runtime::modes::{run_cli, run_server};
use shortly::system::init_logging;

fn main() {
    // real_main 返回后日志 guard 已经释放，缓冲的日志已写出
    if let Err(e) = real_main() {
        eprintln!("{}", render_error(&e));
        std::process::exit(1);
    }
}

#[tokio::main]
async fn real_main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command_or_default();

    let config = StaticConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // guard 必须存活到进程结束
    let _log_guard = init_logging(&config.logging).context("Failed to initialize logging")?;

    match command {
        Commands::Serve => {
            info!("Shortly v{} starting", env!("CARGO_PKG_VERSION"));
            run_server(config).await.inspect_err(|e| error!("{:#}", e))
        }
        other => run_cli(&config, other).await.map_err(anyhow::Error::from),
    }
}
