//! Google Sheets API client for reading and writing cell values.

use super::auth::GoogleAuth;
use crate::capabilities::Spreadsheet;
use anyhow::{Context, Result};
use google_sheets4::api::{Scope, ValueRange};
use google_sheets4::common::{Connector, GetToken};
use google_sheets4::hyper_rustls::HttpsConnector;
use google_sheets4::Sheets;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::Value;

/// Values are stored exactly as given, never parsed as formulas or dates
const VALUE_INPUT_OPTION: &str = "RAW";

/// Read and write on spreadsheets only; granted up front in `auth::SCOPES`
const SHEETS_SCOPE: Scope = Scope::Spreadsheet;

pub struct SheetsClient<C = HttpsConnector<HttpConnector>> {
    hub: Sheets<C>,
    spreadsheet_id: String,
}

impl SheetsClient {
    pub fn new(auth: GoogleAuth, spreadsheet_id: &str) -> Result<Self> {
        Ok(Self::with_connector(super::https_connector()?, auth, spreadsheet_id))
    }
}

impl<C: Connector> SheetsClient<C> {
    pub(super) fn with_connector(
        connector: C,
        auth: impl GetToken + 'static,
        spreadsheet_id: &str,
    ) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            hub: Sheets::new(client, auth),
            spreadsheet_id: spreadsheet_id.to_string(),
        }
    }
}

fn value_range(range: &str, values: Vec<Vec<String>>) -> ValueRange {
    ValueRange {
        range: Some(range.to_string()),
        values: Some(
            values
                .into_iter()
                .map(|row| row.into_iter().map(Value::String).collect())
                .collect(),
        ),
        ..Default::default()
    }
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl<C: Connector> Spreadsheet for SheetsClient<C> {
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>> {
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_get(&self.spreadsheet_id, range)
            .add_scope(SHEETS_SCOPE)
            .doit()
            .await
            .with_context(|| format!("Failed to read range {}", range))?;

        Ok(response
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn write_range(&self, range: &str, values: Vec<Vec<String>>) -> Result<()> {
        self.hub
            .spreadsheets()
            .values_update(value_range(range, values), &self.spreadsheet_id, range)
            .value_input_option(VALUE_INPUT_OPTION)
            .add_scope(SHEETS_SCOPE)
            .doit()
            .await
            .with_context(|| format!("Failed to write range {}", range))?;

        Ok(())
    }

    async fn append_rows(&self, range: &str, values: Vec<Vec<String>>) -> Result<()> {
        let count = values.len();

        self.hub
            .spreadsheets()
            .values_append(value_range(range, values), &self.spreadsheet_id, range)
            .value_input_option(VALUE_INPUT_OPTION)
            .insert_data_option("INSERT_ROWS")
            .add_scope(SHEETS_SCOPE)
            .doit()
            .await
            .with_context(|| format!("Failed to append to range {}", range))?;

        tracing::debug!("Appended {} row(s) to {}", count, range);
        Ok(())
    }
}
