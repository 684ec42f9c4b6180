use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::domain::ROW_WIDTH;
use thiserror::Error;

mod auth;
mod sheets;

pub use auth::{unescape_private_key, AccessToken, ServiceAccount, SCOPES};
pub use sheets::{a1_sheet_name, GoogleSheetsStore, SheetProperties};

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_SHEETS_API: &str = "https://sheets.googleapis.com";

#[derive(Debug, Error)]
pub enum StoreWriteError {
    #[error("record store is not configured: missing {0}")]
    MissingConfig(&'static str),
    #[error("invalid record store endpoint '{0}'")]
    InvalidEndpoint(String),
    #[error("service account private key is unusable: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),
    #[error("service account token exchange refused: {0}")]
    Auth(String),
    #[error("record store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("record store rejected {operation} with status {status}: {message}")]
    Rejected {
        operation: &'static str,
        status: u16,
        message: String,
    },
    #[error("spreadsheet has no sheets")]
    SheetNotFound,
    #[error("sheet '{0}' has no values in its header row")]
    EmptyHeaderRow(String),
}

/// Everything needed to reach the spreadsheet. Unset credentials are only
/// reported when a write is attempted.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: Option<String>,
    pub client_email: Option<String>,
    /// PEM text; `\n` escapes are accepted and unescaped before use.
    pub private_key: Option<String>,
    pub token_uri: String,
    pub api_base: String,
    pub request_timeout: Option<Duration>,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            client_email: None,
            private_key: None,
            token_uri: DEFAULT_TOKEN_URI.into(),
            api_base: DEFAULT_SHEETS_API.into(),
            request_timeout: None,
        }
    }
}

impl SheetsConfig {
    /// Name of the first credential setting that is absent or blank.
    pub fn missing_setting(&self) -> Option<&'static str> {
        [
            ("spreadsheet id", &self.spreadsheet_id),
            ("service account email", &self.client_email),
            ("service account private key", &self.private_key),
        ]
        .into_iter()
        .find(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name)
    }
}

/// Append-only access to the system of record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Appends one row of positional values after the sheet's existing rows.
    async fn append_row(&self, values: [String; ROW_WIDTH]) -> Result<(), StoreWriteError>;
}

/// Builds a fresh [`RecordStore`] handle for each submission attempt.
pub trait StoreFactory: Send + Sync {
    fn open(&self) -> Result<Box<dyn RecordStore>, StoreWriteError>;
}

/// Production factory: one shared HTTP client, a new authenticated store per attempt.
#[derive(Debug, Clone)]
pub struct GoogleSheetsFactory {
    http: Client,
    config: SheetsConfig,
}

impl GoogleSheetsFactory {
    pub fn new(config: SheetsConfig) -> Result<Self, StoreWriteError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }
}

impl StoreFactory for GoogleSheetsFactory {
    fn open(&self) -> Result<Box<dyn RecordStore>, StoreWriteError> {
        let store = GoogleSheetsStore::new(self.http.clone(), &self.config)?;
        Ok(Box::new(store))
    }
}

#[cfg(test)]
#[path = "tests/sheets_tests.rs"]
mod tests;
