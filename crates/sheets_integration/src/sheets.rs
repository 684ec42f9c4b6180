use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use shared::{domain::ROW_WIDTH, Field};
use tracing::{debug, warn};
use url::Url;

use crate::{
    auth::{AccessToken, ServiceAccount},
    RecordStore, SheetsConfig, StoreWriteError,
};

// Formulas and numbers typed into the form are interpreted the way the sheet
// would interpret a user typing them.
const VALUE_INPUT_OPTION: &str = "USER_ENTERED";
const INSERT_DATA_OPTION: &str = "OVERWRITE";
const METADATA_FIELDS: &str = "properties.title,sheets.properties";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    pub title: String,
    #[serde(default)]
    pub index: i64,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetInfo {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

impl SpreadsheetInfo {
    /// The sheet with id 0, or the lowest-indexed sheet when that one was deleted.
    fn target_sheet(self) -> Result<SheetProperties, StoreWriteError> {
        let mut sheets: Vec<SheetProperties> =
            self.sheets.into_iter().map(|entry| entry.properties).collect();
        if let Some(position) = sheets.iter().position(|sheet| sheet.sheet_id == 0) {
            return Ok(sheets.swap_remove(position));
        }
        sheets
            .into_iter()
            .min_by_key(|sheet| sheet.index)
            .ok_or(StoreWriteError::SheetNotFound)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    message: String,
}

/// Quotes a sheet title for use in an A1 range.
pub fn a1_sheet_name(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// A store bound to one spreadsheet through one service account.
#[derive(Clone)]
pub struct GoogleSheetsStore {
    http: Client,
    account: ServiceAccount,
    spreadsheet_id: String,
    api_base: Url,
}

impl GoogleSheetsStore {
    pub fn new(http: Client, config: &SheetsConfig) -> Result<Self, StoreWriteError> {
        if let Some(missing) = config.missing_setting() {
            return Err(StoreWriteError::MissingConfig(missing));
        }
        let (Some(spreadsheet_id), Some(client_email), Some(private_key)) = (
            config.spreadsheet_id.as_deref(),
            config.client_email.as_deref(),
            config.private_key.as_deref(),
        ) else {
            return Err(StoreWriteError::MissingConfig("record store credentials"));
        };

        let api_base = Url::parse(&config.api_base)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| StoreWriteError::InvalidEndpoint(config.api_base.clone()))?;
        let account = ServiceAccount::new(client_email.trim(), private_key, &config.token_uri)?;

        Ok(Self {
            http,
            account,
            spreadsheet_id: spreadsheet_id.trim().to_string(),
            api_base,
        })
    }

    fn spreadsheet_url(&self, extra: &[&str]) -> Result<Url, StoreWriteError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| StoreWriteError::InvalidEndpoint(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str()])
            .extend(extra);
        Ok(url)
    }

    async fn load_info(&self, token: &AccessToken) -> Result<SpreadsheetInfo, StoreWriteError> {
        let response = self
            .http
            .get(self.spreadsheet_url(&[])?)
            .bearer_auth(&token.token)
            .query(&[("fields", METADATA_FIELDS)])
            .send()
            .await?;
        Ok(ensure_success(response, "spreadsheet metadata").await?.json().await?)
    }

    async fn load_header_row(
        &self,
        token: &AccessToken,
        sheet: &SheetProperties,
    ) -> Result<Vec<String>, StoreWriteError> {
        let range = format!("{}!1:1", a1_sheet_name(&sheet.title));
        let response = self
            .http
            .get(self.spreadsheet_url(&["values", &range])?)
            .bearer_auth(&token.token)
            .send()
            .await?;
        let body: ValueRange = ensure_success(response, "header row").await?.json().await?;

        let header: Vec<String> = body
            .values
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|cell| cell.trim().to_string())
            .collect();
        if header.iter().all(String::is_empty) {
            return Err(StoreWriteError::EmptyHeaderRow(sheet.title.clone()));
        }
        Ok(header)
    }

    async fn add_row(
        &self,
        token: &AccessToken,
        sheet: &SheetProperties,
        values: [String; ROW_WIDTH],
    ) -> Result<(), StoreWriteError> {
        let range = format!("{}!A1:append", a1_sheet_name(&sheet.title));
        let response = self
            .http
            .post(self.spreadsheet_url(&["values", &range])?)
            .bearer_auth(&token.token)
            .query(&[
                ("valueInputOption", VALUE_INPUT_OPTION),
                ("insertDataOption", INSERT_DATA_OPTION),
            ])
            .json(&ValueRange {
                values: vec![values.to_vec()],
            })
            .send()
            .await?;
        ensure_success(response, "row append").await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for GoogleSheetsStore {
    async fn append_row(&self, values: [String; ROW_WIDTH]) -> Result<(), StoreWriteError> {
        let token = self.account.access_token(&self.http).await?;
        let sheet = self.load_info(&token).await?.target_sheet()?;
        debug!(sheet = %sheet.title, sheet_id = sheet.sheet_id, "resolved target sheet");

        let header = self.load_header_row(&token, &sheet).await?;
        let expected = Field::ALL.map(Field::column);
        if !header.iter().map(String::as_str).eq(expected) {
            warn!(
                sheet = %sheet.title,
                columns = ?header,
                expected = ?expected,
                "header row differs from registration columns; values are appended positionally"
            );
        }

        self.add_row(&token, &sheet, values).await
    }
}

async fn ensure_success(
    response: Response,
    operation: &'static str,
) -> Result<Response, StoreWriteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoogleErrorBody>(&body)
        .map(|parsed| parsed.error.message)
        .unwrap_or(body);
    Err(StoreWriteError::Rejected {
        operation,
        status: status.as_u16(),
        message,
    })
}
