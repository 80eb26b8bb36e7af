//! Remove URL command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::UrlService;

pub async fn remove_url(service: &UrlService, short_code: &str) -> Result<(), CliError> {
    service.remove(short_code).await.map_err(|e| match e {
        crate::errors::ShortlyError::NotFound(_) => {
            CliError::CommandError(format!("Short URL does not exist: {}", short_code))
        }
        other => other.into(),
    })?;

    println!(
        "{} Deleted short URL: {}",
        "✓".bold().green(),
        short_code.cyan()
    );
    Ok(())
}
