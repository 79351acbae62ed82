use super::Config;
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - Every source base URL must be non-empty and start with http:// or https://
/// - User agent cannot be empty
/// - HTTP timeout must be positive
/// - Cutoffs must lie within 0..=100
/// - If a log file path is provided, it cannot be empty and its parent
///   directory must exist or be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    let sources = [
        ("fotmob", &config.sources.fotmob),
        ("fbref", &config.sources.fbref),
        ("official", &config.sources.official),
        ("transfermarkt", &config.sources.transfermarkt),
    ];
    for (source, url) in sources {
        validate_base_url(source, url)?;
    }

    if config.user_agent.trim().is_empty() {
        return Err(AppError::config_error("User agent cannot be empty"));
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error("HTTP timeout must be at least 1 second"));
    }

    let cutoffs = [
        ("competition", config.cutoffs.competition),
        ("team", config.cutoffs.team),
        ("player", config.cutoffs.player),
        ("match", config.cutoffs.fixture),
    ];
    for (kind, cutoff) in cutoffs {
        if !(0.0..=100.0).contains(&cutoff) {
            return Err(AppError::config_error(format!(
                "Cutoff for {kind} must be between 0 and 100, got {cutoff}"
            )));
        }
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

fn validate_base_url(source: &str, url: &str) -> Result<(), AppError> {
    if url.is_empty() {
        return Err(AppError::config_error(format!(
            "Base URL for {source} cannot be empty"
        )));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(AppError::config_error(format!(
            "Base URL for {source} must start with http:// or https://, got '{url}'"
        )));
    }
    Ok(())
}
