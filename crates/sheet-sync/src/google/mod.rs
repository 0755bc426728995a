//! Google-backed implementations of the mailbox and spreadsheet capabilities.
//!
//! Both clients share one OAuth authenticator whose token is cached on disk,
//! so the browser consent flow only runs on first use.

mod auth;
mod gmail_client;
mod sheets_client;

pub use gmail_client::GmailClient;
pub use sheets_client::SheetsClient;

use crate::config::Config;
use crate::error::SyncError;
use anyhow::{Context, Result};
use google_gmail1::hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;

/// Authenticate and build both service clients
pub async fn connect(config: &Config) -> Result<(GmailClient, SheetsClient), SyncError> {
    tracing::info!("[1/6] Authenticating with Google...");

    let auth = auth::authenticate(config).await.map_err(SyncError::Auth)?;
    let gmail = GmailClient::new(auth.clone(), &config.query).map_err(SyncError::Auth)?;
    let sheets = SheetsClient::new(auth, &config.spreadsheet_id).map_err(SyncError::Auth)?;

    tracing::info!("Gmail and Sheets authentication successful");
    Ok((gmail, sheets))
}

/// Authenticate and build only the spreadsheet client
pub async fn connect_sheets(config: &Config) -> Result<SheetsClient, SyncError> {
    let auth = auth::authenticate(config).await.map_err(SyncError::Auth)?;
    SheetsClient::new(auth, &config.spreadsheet_id).map_err(SyncError::Auth)
}

fn https_connector() -> Result<HttpsConnector<HttpConnector>> {
    Ok(HttpsConnectorBuilder::new()
        .with_native_roots()
        .context("Failed to load native TLS roots")?
        .https_or_http()
        .enable_http1()
        .build())
}
