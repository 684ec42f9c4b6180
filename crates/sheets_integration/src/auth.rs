use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::StoreWriteError;

pub const SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/drive.file",
    "https://www.googleapis.com/auth/spreadsheets",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_TTL_SECONDS: i64 = 3600;

#[derive(Debug, Serialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Bearer token for the Sheets API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
}

/// Environment files usually carry the PEM on one line with literal `\n`.
pub fn unescape_private_key(raw: &str) -> String {
    raw.trim().trim_matches('"').replace("\\n", "\n")
}

/// Service-level identity used for every write; never the visitor's.
#[derive(Clone)]
pub struct ServiceAccount {
    client_email: String,
    token_uri: String,
    key: EncodingKey,
}

impl ServiceAccount {
    pub fn new(
        client_email: impl Into<String>,
        private_key: &str,
        token_uri: impl Into<String>,
    ) -> Result<Self, StoreWriteError> {
        let pem = unescape_private_key(private_key);
        let key = EncodingKey::from_rsa_pem(pem.as_bytes()).map_err(StoreWriteError::InvalidKey)?;
        Ok(Self {
            client_email: client_email.into(),
            token_uri: token_uri.into(),
            key,
        })
    }

    /// Signed RS256 assertion exchanged for an access token.
    pub fn assertion(&self) -> Result<String, StoreWriteError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(ASSERTION_TTL_SECONDS);
        let claims = Claims {
            iss: self.client_email.clone(),
            scope: SCOPES.join(" "),
            aud: self.token_uri.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(StoreWriteError::InvalidKey)
    }

    pub async fn access_token(&self, http: &Client) -> Result<AccessToken, StoreWriteError> {
        let assertion = self.assertion()?;
        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(TokenErrorResponse {
                    error,
                    error_description: Some(description),
                }) => format!("{error}: {description}"),
                Ok(TokenErrorResponse { error, .. }) => error,
                Err(_) => format!("status {}", status.as_u16()),
            };
            return Err(StoreWriteError::Auth(reason));
        }

        let body: TokenResponse = response.json().await?;
        debug!(client_email = %self.client_email, "obtained service account token");
        Ok(AccessToken {
            token: body.access_token,
        })
    }
}
