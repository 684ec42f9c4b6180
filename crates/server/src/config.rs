use std::{fs, io, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use sheets_integration::{SheetsConfig, DEFAULT_SHEETS_API, DEFAULT_TOKEN_URI};
use tracing::warn;

pub const DEFAULT_COMMUNITY_INVITE_URL: &str = "https://chat.whatsapp.com/GlPdZgODVCF4ZCKpnIabaY";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(alias = "bind_addr")]
    pub server_bind: String,
    pub spreadsheet_id: Option<String>,
    pub google_client_email: Option<String>,
    pub google_service_private_key: Option<String>,
    pub google_token_uri: String,
    pub sheets_api_base: String,
    pub community_invite_url: String,
    pub request_timeout_seconds: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            spreadsheet_id: None,
            google_client_email: None,
            google_service_private_key: None,
            google_token_uri: DEFAULT_TOKEN_URI.into(),
            sheets_api_base: DEFAULT_SHEETS_API.into(),
            community_invite_url: DEFAULT_COMMUNITY_INVITE_URL.into(),
            request_timeout_seconds: None,
        }
    }
}

impl Settings {
    pub fn sheets_config(&self) -> SheetsConfig {
        SheetsConfig {
            spreadsheet_id: self.spreadsheet_id.clone(),
            client_email: self.google_client_email.clone(),
            private_key: self.google_service_private_key.clone(),
            token_uri: self.google_token_uri.clone(),
            api_base: self.sheets_api_base.clone(),
            request_timeout: self.request_timeout_seconds.map(Duration::from_secs),
        }
    }
}

/// Reads `path` when it exists, then applies environment overrides.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(error) if error.kind() == io::ErrorKind::NotFound => Settings::default(),
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };

    apply_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

/// Later keys win, so `APP__` beats `NEXT_PUBLIC_` beats the plain name.
pub fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let last = |keys: &[&str]| keys.iter().filter_map(|key| lookup(key)).last();

    if let Some(v) = last(&["SERVER_BIND", "APP__BIND_ADDR"]) {
        settings.server_bind = v;
    }
    if let Some(v) = last(&[
        "SPREADSHEET_ID",
        "NEXT_PUBLIC_SPREADSHEET_ID",
        "APP__SPREADSHEET_ID",
    ]) {
        settings.spreadsheet_id = Some(v);
    }
    if let Some(v) = last(&[
        "GOOGLE_CLIENT_EMAIL",
        "NEXT_PUBLIC_GOOGLE_CLIENT_EMAIL",
        "APP__GOOGLE_CLIENT_EMAIL",
    ]) {
        settings.google_client_email = Some(v);
    }
    if let Some(v) = last(&[
        "GOOGLE_SERVICE_PRIVATE_KEY",
        "NEXT_PUBLIC_GOOGLE_SERVICE_PRIVATE_KEY",
        "APP__GOOGLE_SERVICE_PRIVATE_KEY",
    ]) {
        settings.google_service_private_key = Some(v);
    }
    if let Some(v) = last(&["GOOGLE_TOKEN_URI", "APP__GOOGLE_TOKEN_URI"]) {
        settings.google_token_uri = v;
    }
    if let Some(v) = last(&["SHEETS_API_BASE", "APP__SHEETS_API_BASE"]) {
        settings.sheets_api_base = v;
    }
    if let Some(v) = last(&["COMMUNITY_INVITE_URL", "APP__COMMUNITY_INVITE_URL"]) {
        settings.community_invite_url = v;
    }
    if let Some(v) = last(&["REQUEST_TIMEOUT_SECONDS", "APP__REQUEST_TIMEOUT_SECONDS"]) {
        match v.trim().parse::<u64>() {
            Ok(seconds) => settings.request_timeout_seconds = Some(seconds),
            Err(_) => warn!(value = %v, "ignoring unparsable request timeout"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
