//! Minimal Telegram Bot API client: long polling, text replies and
//! document uploads.
//!
//! Every method returns the `{ok, result, description}` envelope unwrapped.
//! Telegram reports failures with `ok: false` and a description, usually
//! alongside a 4xx status, so the body is decoded regardless of status.
//! Request URLs embed the bot token; errors are stripped of their URL before
//! they can reach a log line.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const DEFAULT_API_URL: &str = "https://api.telegram.org";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Telegram API error in {method}: {description}")]
    Api {
        method: &'static str,
        description: String,
    },

    #[error("JSON deserialization error for {method}: {source}")]
    Deserialize {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot read document {path}: {source}")]
    Document {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        TelegramError::Http(err.without_url())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Client bound to one bot token.
pub struct TelegramClient {
    client: Client,
    /// `<api>/bot<token>`, without trailing slash.
    bot_url: String,
}

impl TelegramClient {
    /// Creates a client for the production Bot API.
    ///
    /// `poll_timeout_secs` is the long-poll duration; the HTTP timeout is set
    /// comfortably above it.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(token: &str, poll_timeout_secs: u64) -> Result<Self, TelegramError> {
        Self::with_base_url(token, poll_timeout_secs, DEFAULT_API_URL)
    }

    /// Creates a client against a custom API root (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        token: &str,
        poll_timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs.saturating_add(30)))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            bot_url: format!("{}/bot{token}", base_url.trim_end_matches('/')),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.bot_url)
    }

    async fn call<T>(&self, method: &'static str, request: RequestBuilder) -> Result<T, TelegramError>
    where
        T: DeserializeOwned,
    {
        let body = request.send().await?.text().await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|source| TelegramError::Deserialize { method, source })?;

        match envelope {
            Envelope {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            Envelope { description, .. } => Err(TelegramError::Api {
                method,
                description: description.unwrap_or_else(|| "no description".to_owned()),
            }),
        }
    }

    /// Long-polls for message updates starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns a [`TelegramError`] on transport failure or an API error.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let request = self.client.post(self.method_url("getUpdates")).json(&json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        }));
        self.call("getUpdates", request).await
    }

    /// Sends a plain text message.
    ///
    /// # Errors
    ///
    /// Returns a [`TelegramError`] on transport failure or an API error.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let request = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&json!({ "chat_id": chat_id, "text": text }));
        self.call::<Message>("sendMessage", request).await?;
        Ok(())
    }

    /// Uploads the file at `path` as a document, named after its file name.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::Document`] if the file cannot be read, or
    /// another [`TelegramError`] if the upload fails.
    pub async fn send_document(&self, chat_id: i64, path: &Path) -> Result<(), TelegramError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| TelegramError::Document {
                path: path.display().to_string(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "export.xlsx".to_owned(), |n| n.to_string_lossy().into_owned());

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", Part::bytes(bytes).file_name(file_name));
        let request = self
            .client
            .post(self.method_url("sendDocument"))
            .multipart(form);
        self.call::<Message>("sendDocument", request).await?;
        Ok(())
    }
}
