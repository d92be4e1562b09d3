//! Application context shared by every command handler.

use wbscrape_core::AppConfig;
use wbscrape_scraper::{CatalogClient, CatalogEndpoints, RequestResolver};

use crate::telegram::TelegramClient;

/// Built once at startup and shared behind an `Arc`. Holds no per-request
/// state: every scrape owns its own records and output file.
pub struct App {
    pub config: AppConfig,
    pub telegram: TelegramClient,
    pub catalog: CatalogClient,
    pub resolver: RequestResolver,
}

impl App {
    /// Builds the context for the live bot.
    ///
    /// # Errors
    ///
    /// Fails if the bot token is missing or an HTTP client cannot be built.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let token = config.require_bot_token()?;
        let telegram = TelegramClient::new(token, config.poll_timeout_secs)?;
        let catalog = CatalogClient::from_config(&config)?;
        let resolver = RequestResolver::new(CatalogEndpoints::default())?;
        Ok(Self {
            config,
            telegram,
            catalog,
            resolver,
        })
    }
}
