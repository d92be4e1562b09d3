use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::ConfigError;

/// Environment variable holding the Telegram bot token.
pub const BOT_TOKEN_VAR: &str = "WBSCRAPE_BOT_TOKEN";

#[derive(Clone)]
pub struct AppConfig {
    /// Only required by the long-running bot; the one-shot scrape command
    /// runs without it.
    pub bot_token: Option<String>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// TCP/TLS connect bound; never longer than the request timeout in effect.
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    /// Total attempts per URL, including the first one.
    pub fetch_max_attempts: u32,
    /// Fixed pause between two attempts on the same URL.
    pub fetch_retry_delay_ms: u64,
    pub output_dir: PathBuf,
    pub poll_timeout_secs: u64,
    pub keepalive_addr: Option<SocketAddr>,
}

impl AppConfig {
    /// Returns the bot token, or the startup error for a missing one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when no token was configured.
    pub fn require_bot_token(&self) -> Result<&str, ConfigError> {
        self.bot_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar(BOT_TOKEN_VAR.to_string()))
    }

    #[must_use]
    pub fn fetch_retry_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_retry_delay_ms)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "[redacted]"))
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("fetch_max_attempts", &self.fetch_max_attempts)
            .field("fetch_retry_delay_ms", &self.fetch_retry_delay_ms)
            .field("output_dir", &self.output_dir)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("keepalive_addr", &self.keepalive_addr)
            .finish()
    }
}
