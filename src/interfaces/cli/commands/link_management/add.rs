//! Add URL command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::UrlService;

pub async fn add_url(service: &UrlService, url: &str) -> Result<(), CliError> {
    let record = service.shorten(Some(url)).await?;

    println!(
        "{} Added short URL: {} -> {}",
        "✓".bold().green(),
        record.short_code.cyan(),
        record.original_url.blue().underline()
    );
    println!(
        "  {} {}",
        "Short URL:".dimmed(),
        service.short_url(&record.short_code).magenta()
    );
    Ok(())
}
