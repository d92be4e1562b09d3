use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_applies_defaults_on_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");

    assert!(cfg.bot_token.is_none());
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.connect_timeout_secs, 10);
    assert_eq!(cfg.user_agent, "wbscrape/0.1 (catalog-export)");
    assert_eq!(cfg.fetch_max_attempts, 3);
    assert_eq!(cfg.fetch_retry_delay_ms, 2000);
    assert_eq!(cfg.output_dir, std::path::PathBuf::from("."));
    assert_eq!(cfg.poll_timeout_secs, 30);
    assert!(cfg.keepalive_addr.is_none());
}

#[test]
fn require_bot_token_fails_fast_when_missing() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let result = cfg.require_bot_token();
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "WBSCRAPE_BOT_TOKEN"),
        "expected MissingEnvVar(WBSCRAPE_BOT_TOKEN), got: {result:?}"
    );
}

#[test]
fn blank_bot_token_counts_as_missing() {
    let mut map = HashMap::new();
    map.insert("WBSCRAPE_BOT_TOKEN", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.require_bot_token().is_err());
}

#[test]
fn require_bot_token_returns_configured_token() {
    let mut map = HashMap::new();
    map.insert("WBSCRAPE_BOT_TOKEN", "123:abc");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.require_bot_token().unwrap(), "123:abc");
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("WBSCRAPE_FETCH_MAX_ATTEMPTS", "5");
    map.insert("WBSCRAPE_FETCH_RETRY_DELAY_MS", "10");
    map.insert("WBSCRAPE_OUTPUT_DIR", "/tmp/exports");
    map.insert("WBSCRAPE_KEEPALIVE_ADDR", "0.0.0.0:8080");
    map.insert("WBSCRAPE_CONNECT_TIMEOUT_SECS", "4");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.fetch_max_attempts, 5);
    assert_eq!(cfg.fetch_retry_delay(), std::time::Duration::from_millis(10));
    assert_eq!(cfg.output_dir, std::path::PathBuf::from("/tmp/exports"));
    assert_eq!(cfg.keepalive_addr.unwrap().to_string(), "0.0.0.0:8080");
    assert_eq!(cfg.connect_timeout_secs, 4);
}

#[test]
fn build_app_config_rejects_zero_attempts() {
    let mut map = HashMap::new();
    map.insert("WBSCRAPE_FETCH_MAX_ATTEMPTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WBSCRAPE_FETCH_MAX_ATTEMPTS"),
        "expected InvalidEnvVar(WBSCRAPE_FETCH_MAX_ATTEMPTS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_delay() {
    let mut map = HashMap::new();
    map.insert("WBSCRAPE_FETCH_RETRY_DELAY_MS", "two seconds");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WBSCRAPE_FETCH_RETRY_DELAY_MS"),
        "expected InvalidEnvVar(WBSCRAPE_FETCH_RETRY_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_keepalive_addr() {
    let mut map = HashMap::new();
    map.insert("WBSCRAPE_KEEPALIVE_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WBSCRAPE_KEEPALIVE_ADDR"),
        "expected InvalidEnvVar(WBSCRAPE_KEEPALIVE_ADDR), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_bot_token() {
    let mut map = HashMap::new();
    map.insert("WBSCRAPE_BOT_TOKEN", "123:super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("super-secret"), "token leaked: {debug}");
    assert!(debug.contains("[redacted]"));
}
