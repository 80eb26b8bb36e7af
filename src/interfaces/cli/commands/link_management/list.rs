//! List URLs command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::UrlService;

pub async fn list_urls(service: &UrlService) -> Result<(), CliError> {
    let records = service.list().await?;

    if records.is_empty() {
        println!("{} No short URLs found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Short URL list:".bold().green());
    println!();
    for record in &records {
        let mut info_parts = vec![format!(
            "{} -> {}",
            record.short_code.cyan(),
            record.original_url.blue().underline()
        )];

        info_parts.push(
            format!(
                "(created: {})",
                record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            )
            .dimmed()
            .to_string(),
        );

        if record.click_count > 0 {
            info_parts.push(
                format!("(clicks: {})", record.click_count)
                    .dimmed()
                    .cyan()
                    .to_string(),
            );
        }

        println!("  {}", info_parts.join(" "));
    }
    println!();
    println!(
        "{} Total {} short URLs",
        "ℹ".bold().blue(),
        records.len().to_string().green()
    );
    Ok(())
}
