use crate::config::types::{Config, HarvestConfig, OutputConfig, SourceConfig};
use crate::ConfigError;
use chrono::{NaiveDate, NaiveDateTime};
use url::Url;

/// Storage format of cursor dates (`yyyy-MM-dd HH:mm:ss`)
pub const CURSOR_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of the server's day token (`dd.MM.yy`)
pub const DAY_TOKEN_FORMAT: &str = "%d.%m.%y";

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_harvest_config(&config.harvest)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the endpoint and the starting cursor
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint: {}", e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Endpoint '{}' must use HTTP or HTTPS",
            config.endpoint
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    validate_timestamp("query-before", &config.query_before)?;
    validate_timestamp("initial-last-date", &config.initial_last_date)?;

    // Echoed verbatim by the cursor, only its shape is checked here
    if NaiveDate::parse_from_str(&config.initial_current_day, DAY_TOKEN_FORMAT).is_err() {
        return Err(ConfigError::Validation(format!(
            "initial-current-day must look like dd.MM.yy, got '{}'",
            config.initial_current_day
        )));
    }

    if config.posts_per_page < 1 || config.posts_per_page > 100 {
        return Err(ConfigError::Validation(format!(
            "posts-per-page must be between 1 and 100, got {}",
            config.posts_per_page
        )));
    }

    Ok(())
}

/// Validates loop limits and timing
fn validate_harvest_config(config: &HarvestConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.backoff_base_ms < 1 {
        return Err(ConfigError::Validation(
            "backoff-base-ms must be >= 1".to_string(),
        ));
    }

    if config.backoff_max_ms < config.backoff_base_ms {
        return Err(ConfigError::Validation(format!(
            "backoff-max-ms ({}) must be >= backoff-base-ms ({})",
            config.backoff_max_ms, config.backoff_base_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.catalog_path.is_empty() {
        return Err(ConfigError::Validation(
            "catalog-path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_timestamp(key: &str, value: &str) -> Result<(), ConfigError> {
    NaiveDateTime::parse_from_str(value, CURSOR_DATE_FORMAT)
        .map(|_| ())
        .map_err(|e| {
            ConfigError::Validation(format!(
                "{} must look like yyyy-MM-dd HH:mm:ss, got '{}': {}",
                key, value, e
            ))
        })
}
