use crate::app_config::{AppConfig, BOT_TOKEN_VAR};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let bot_token = lookup(BOT_TOKEN_VAR)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let log_level = or_default("WBSCRAPE_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("WBSCRAPE_REQUEST_TIMEOUT_SECS", "30")?;
    let connect_timeout_secs = parse_u64("WBSCRAPE_CONNECT_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("WBSCRAPE_USER_AGENT", "wbscrape/0.1 (catalog-export)");

    let fetch_max_attempts = parse_u32("WBSCRAPE_FETCH_MAX_ATTEMPTS", "3")?;
    if fetch_max_attempts == 0 {
        return Err(invalid(
            "WBSCRAPE_FETCH_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }
    let fetch_retry_delay_ms = parse_u64("WBSCRAPE_FETCH_RETRY_DELAY_MS", "2000")?;

    let output_dir = PathBuf::from(or_default("WBSCRAPE_OUTPUT_DIR", "."));
    let poll_timeout_secs = parse_u64("WBSCRAPE_POLL_TIMEOUT_SECS", "30")?;

    let keepalive_addr = match lookup("WBSCRAPE_KEEPALIVE_ADDR") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            raw.trim()
                .parse::<SocketAddr>()
                .map_err(|e| invalid("WBSCRAPE_KEEPALIVE_ADDR", e.to_string()))?,
        ),
        _ => None,
    };

    Ok(AppConfig {
        bot_token,
        log_level,
        request_timeout_secs,
        connect_timeout_secs,
        user_agent,
        fetch_max_attempts,
        fetch_retry_delay_ms,
        output_dir,
        poll_timeout_secs,
        keepalive_addr,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
