//! Google Sheets REST v4 backend.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::auth::{AccessToken, ServiceAccount, TOKEN_URI};
use super::{Cells, SheetError, SheetRow, SheetSpec, SheetStore, column_letter, parse_row_number};

const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Refresh the access token this many seconds before it expires.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

struct CachedToken {
    token: String,
    expires_at: i64,
}

/// [`SheetStore`] backed by a Google spreadsheet.
pub struct GoogleSheets {
    spreadsheet_id: String,
    account: ServiceAccount,
    http_client: reqwest::Client,
    token: RwLock<Option<CachedToken>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: u32,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    updates: AppendUpdates,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    updated_range: String,
}

/// A1 reference into the tab `title`, quoted so any title is accepted.
/// `cells` of `None` covers the whole tab.
fn a1_range(title: &str, cells: Option<&str>) -> String {
    let quoted = format!("'{}'", title.replace('\'', "''"));
    match cells {
        Some(cells) => format!("{quoted}!{cells}"),
        None => quoted,
    }
}

fn spreadsheet_url(spreadsheet_id: &str, suffix: &str) -> String {
    format!("{SHEETS_API_URL}/{spreadsheet_id}{suffix}")
}

fn values_url(spreadsheet_id: &str, range: &str, suffix: &str) -> String {
    spreadsheet_url(
        spreadsheet_id,
        &format!("/values/{}{suffix}", urlencoding::encode(range)),
    )
}

fn fresh_token(cached: Option<&CachedToken>, now: i64) -> Option<String> {
    cached
        .filter(|c| c.expires_at - TOKEN_REFRESH_MARGIN_SECS > now)
        .map(|c| c.token.clone())
}

impl GoogleSheets {
    pub fn new(spreadsheet_id: impl Into<String>, account: ServiceAccount) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            account,
            http_client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            token: RwLock::new(None),
        }
    }

    /// Current access token, exchanging a fresh assertion when needed.
    async fn access_token(&self) -> Result<String, SheetError> {
        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        if let Some(token) = fresh_token(self.token.read().await.as_ref(), now) {
            return Ok(token);
        }

        let mut guard = self.token.write().await;
        if let Some(token) = fresh_token(guard.as_ref(), now) {
            return Ok(token);
        }

        debug!(account = %self.account.email(), "Requesting Sheets access token");
        let assertion = self.account.assertion(now)?;
        let response = self
            .http_client
            .post(TOKEN_URI)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SheetError::Auth(format!("token exchange failed ({status}): {body}")));
        }
        let token: AccessToken = response.json().await?;
        *guard = Some(CachedToken {
            token: token.access_token.clone(),
            expires_at: now + token.expires_in,
        });
        Ok(token.access_token)
    }

    fn url(&self, suffix: &str) -> String {
        spreadsheet_url(&self.spreadsheet_id, suffix)
    }

    fn values_url(&self, range: &str, suffix: &str) -> String {
        values_url(&self.spreadsheet_id, range, suffix)
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, SheetError> {
        let token = self.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    /// Current title of the tab with `spec.id`, if it exists.
    async fn title_of(&self, spec: &SheetSpec) -> Result<Option<String>, SheetError> {
        let meta: SpreadsheetMeta = self
            .send(
                self.http_client
                    .get(self.url(""))
                    .query(&[("fields", "sheets.properties(sheetId,title)")]),
            )
            .await?;
        Ok(meta
            .sheets
            .into_iter()
            .find(|s| s.properties.sheet_id == spec.id)
            .map(|s| s.properties.title))
    }

    async fn require_title(&self, spec: &SheetSpec) -> Result<String, SheetError> {
        self.title_of(spec)
            .await?
            .ok_or(SheetError::MissingSheet(spec.id))
    }

    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, SheetError> {
        let range: ValueRange = self
            .send(
                self.http_client
                    .get(self.values_url(range, ""))
                    .query(&[("valueRenderOption", "FORMATTED_VALUE")]),
            )
            .await?;
        Ok(range.values)
    }

    async fn header_row(&self, title: &str) -> Result<Vec<String>, SheetError> {
        let mut rows = self.read_range(&a1_range(title, Some("1:1"))).await?;
        Ok(if rows.is_empty() {
            Vec::new()
        } else {
            rows.swap_remove(0)
        })
    }

    async fn batch_update(&self, requests: serde_json::Value) -> Result<(), SheetError> {
        let _: serde_json::Value = self
            .send(
                self.http_client
                    .post(self.url(":batchUpdate"))
                    .json(&json!({ "requests": requests })),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SheetStore for GoogleSheets {
    #[tracing::instrument(skip_all, err, fields(sheet = spec.id))]
    async fn ensure_sheet(&self, spec: &SheetSpec) -> Result<(), SheetError> {
        let title = match self.title_of(spec).await? {
            Some(title) => title,
            None => {
                info!(sheet = spec.id, title = spec.title, "Creating missing sheet");
                let mut properties = json!({ "sheetId": spec.id, "title": spec.title });
                if let Some((rows, columns)) = spec.grid {
                    properties["gridProperties"] =
                        json!({ "rowCount": rows, "columnCount": columns });
                }
                self.batch_update(json!([{ "addSheet": { "properties": properties } }]))
                    .await?;
                spec.title.to_string()
            }
        };

        if !self.header_row(&title).await?.is_empty() {
            return Ok(());
        }

        info!(sheet = spec.id, "Writing header row");
        if let Some((rows, columns)) = spec.grid {
            self.batch_update(json!([{
                "updateSheetProperties": {
                    "properties": {
                        "sheetId": spec.id,
                        "gridProperties": { "rowCount": rows, "columnCount": columns },
                    },
                    "fields": "gridProperties(rowCount,columnCount)",
                }
            }]))
            .await?;
        }
        let _: serde_json::Value = self
            .send(
                self.http_client
                    .put(self.values_url(&a1_range(&title, Some("A1")), ""))
                    .query(&[("valueInputOption", "RAW")])
                    .json(&json!({ "values": [spec.headers] })),
            )
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, err, fields(sheet = spec.id))]
    async fn rows(&self, spec: &SheetSpec) -> Result<Vec<SheetRow>, SheetError> {
        let Some(title) = self.title_of(spec).await? else {
            return Ok(Vec::new());
        };
        let mut values = self.read_range(&a1_range(&title, None)).await?.into_iter();
        let Some(headers) = values.next() else {
            return Ok(Vec::new());
        };
        Ok(values
            .enumerate()
            .map(|(i, row)| SheetRow::from_values(i as u32 + 2, &headers, row))
            .collect())
    }

    #[tracing::instrument(skip_all, err, fields(sheet = spec.id))]
    async fn append_row(&self, spec: &SheetSpec, cells: &Cells) -> Result<u32, SheetError> {
        let title = self.require_title(spec).await?;
        let headers = self.header_row(&title).await?;
        let row: Vec<&str> = headers
            .iter()
            .map(|h| {
                cells
                    .iter()
                    .find(|(name, _)| name == h)
                    .map(|(_, v)| v.as_str())
                    .unwrap_or("")
            })
            .collect();

        let response: AppendResponse = self
            .send(
                self.http_client
                    .post(self.values_url(&a1_range(&title, Some("A1")), ":append"))
                    .query(&[
                        ("valueInputOption", "USER_ENTERED"),
                        ("insertDataOption", "INSERT_ROWS"),
                    ])
                    .json(&json!({ "values": [row] })),
            )
            .await?;
        parse_row_number(&response.updates.updated_range).ok_or_else(|| {
            SheetError::Parse(format!(
                "unexpected updated range {}",
                response.updates.updated_range
            ))
        })
    }

    #[tracing::instrument(skip_all, err, fields(sheet = spec.id, row = row))]
    async fn update_cells(
        &self,
        spec: &SheetSpec,
        row: u32,
        cells: &Cells,
    ) -> Result<(), SheetError> {
        let title = self.require_title(spec).await?;
        let headers = self.header_row(&title).await?;
        let data: Vec<serde_json::Value> = cells
            .iter()
            .filter_map(|(name, value)| {
                let column = headers.iter().position(|h| h == name)?;
                let cell = format!("{}{row}", column_letter(column));
                Some(json!({
                    "range": a1_range(&title, Some(&cell)),
                    "values": [[value]],
                }))
            })
            .collect();
        if data.is_empty() {
            return Ok(());
        }

        let _: serde_json::Value = self
            .send(
                self.http_client
                    .post(self.url("/values:batchUpdate"))
                    .json(&json!({ "valueInputOption": "USER_ENTERED", "data": data })),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a1_range_quotes_titles() {
        assert_eq!(a1_range("Purchases", Some("A1")), "'Purchases'!A1");
        assert_eq!(a1_range("Purchases", None), "'Purchases'");
        assert_eq!(
            a1_range("Juan's Orders", Some("1:1")),
            "'Juan''s Orders'!1:1"
        );
        assert_eq!(a1_range("'", None), "''''");
    }

    #[test]
    fn test_values_url_encodes_range() {
        assert_eq!(
            spreadsheet_url("1AbC", ":batchUpdate"),
            "https://sheets.googleapis.com/v4/spreadsheets/1AbC:batchUpdate"
        );
        assert_eq!(
            values_url("1AbC", &a1_range("Juan's Orders", Some("A1")), ":append"),
            "https://sheets.googleapis.com/v4/spreadsheets/1AbC/values/%27Juan%27%27s%20Orders%27%21A1:append"
        );
    }

    #[test]
    fn test_fresh_token_refresh_margin() {
        let cached = CachedToken {
            token: "ya29.token".to_string(),
            expires_at: 10_000,
        };
        assert_eq!(fresh_token(None, 0), None);
        assert_eq!(
            fresh_token(Some(&cached), 10_000 - TOKEN_REFRESH_MARGIN_SECS - 1).as_deref(),
            Some("ya29.token")
        );
        assert_eq!(
            fresh_token(Some(&cached), 10_000 - TOKEN_REFRESH_MARGIN_SECS),
            None
        );
        assert_eq!(fresh_token(Some(&cached), 10_001), None);
    }

    #[test]
    fn test_append_response_row() {
        let response: AppendResponse = serde_json::from_str(
            r#"{
                "spreadsheetId": "1AbC",
                "updates": {
                    "spreadsheetId": "1AbC",
                    "updatedRange": "'Juan''s Orders'!A7:AA7",
                    "updatedRows": 1
                }
            }"#,
        )
        .unwrap();
        assert_eq!(parse_row_number(&response.updates.updated_range), Some(7));
    }
}
