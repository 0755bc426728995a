use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Gmail refuses `maxResults` above this
pub const MAX_RESULTS_CAP: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Target spreadsheet ID (the long token in the sheet URL)
    #[serde(default)]
    pub spreadsheet_id: String,

    /// Tab inside the spreadsheet that receives the rows
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Maximum unread messages fetched per run
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Gmail search query used to list candidate messages
    #[serde(default = "default_query")]
    pub query: String,

    /// Path to Google OAuth client credentials JSON file
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    /// Path to store the OAuth token cache
    #[serde(default = "default_token_cache")]
    pub token_cache_path: PathBuf,

    /// Append-only log of processed message IDs
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
}

fn default_sheet_name() -> String {
    "Sheet1".to_string()
}

fn default_max_results() -> u32 {
    50
}

fn default_query() -> String {
    "is:unread in:inbox".to_string()
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("credentials/credentials.json")
}

fn default_token_cache() -> PathBuf {
    PathBuf::from("token.json")
}

fn default_state_path() -> PathBuf {
    PathBuf::from("processed_emails.txt")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            sheet_name: default_sheet_name(),
            max_results: default_max_results(),
            query: default_query(),
            credentials_path: default_credentials_path(),
            token_cache_path: default_token_cache(),
            state_path: default_state_path(),
        }
    }
}

impl Config {
    /// Load the TOML file at `path`, apply `SHEET_SYNC_*` environment
    /// overrides and validate the result. A missing file is not an error as
    /// long as the environment supplies the required values.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                SyncError::config(format!("failed to read {}: {}", path.display(), e))
            })?;
            Self::from_toml(&content)?
        } else {
            tracing::debug!(
                "No config file at {}, using defaults and environment",
                path.display()
            );
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, SyncError> {
        toml::from_str(content).map_err(|e| SyncError::config(format!("invalid TOML: {}", e)))
    }

    /// Override fields from variables resolved through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), SyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SHEET_SYNC_SPREADSHEET_ID") {
            self.spreadsheet_id = v;
        }
        if let Some(v) = lookup("SHEET_SYNC_SHEET_NAME") {
            self.sheet_name = v;
        }
        if let Some(v) = lookup("SHEET_SYNC_MAX_RESULTS") {
            self.max_results = v.parse().map_err(|_| {
                SyncError::config("SHEET_SYNC_MAX_RESULTS must be a valid number")
            })?;
        }
        if let Some(v) = lookup("SHEET_SYNC_QUERY") {
            self.query = v;
        }
        if let Some(v) = lookup("SHEET_SYNC_CREDENTIALS_PATH") {
            self.credentials_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SHEET_SYNC_TOKEN_CACHE_PATH") {
            self.token_cache_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SHEET_SYNC_STATE_PATH") {
            self.state_path = PathBuf::from(v);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SyncError> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(SyncError::config(
                "spreadsheet_id must be set (config file or SHEET_SYNC_SPREADSHEET_ID)",
            ));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(SyncError::config("sheet_name must not be empty"));
        }
        if self.max_results == 0 || self.max_results > MAX_RESULTS_CAP {
            return Err(SyncError::config(format!(
                "max_results must be between 1 and {}",
                MAX_RESULTS_CAP
            )));
        }
        Ok(())
    }

    pub fn example() -> Self {
        Config {
            spreadsheet_id: "your-spreadsheet-id".to_string(),
            ..Default::default()
        }
    }
}
