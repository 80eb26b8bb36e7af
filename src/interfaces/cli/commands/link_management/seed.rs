//! Seed command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::UrlService;

/// 示例数据
pub const SAMPLE_URLS: &[&str] = &[
    "https://github.com/anthropics/claude-code",
    "https://docs.anthropic.com/en/docs/welcome",
    "https://en.wikipedia.org/wiki/URL_shortening",
];

pub async fn seed_urls(service: &UrlService) -> Result<(), CliError> {
    for url in SAMPLE_URLS {
        let record = service.shorten(Some(url)).await?;
        println!(
            "{} Seeded {} -> {}",
            "✓".bold().green(),
            record.short_code.cyan(),
            record.original_url.blue().underline()
        );
    }

    println!(
        "{} Inserted {} sample URLs",
        "ℹ".bold().blue(),
        SAMPLE_URLS.len().to_string().green()
    );
    Ok(())
}
