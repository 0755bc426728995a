use crate::config::Config;
use anyhow::{Context, Result};
use google_gmail1::hyper_rustls::HttpsConnector;
use google_gmail1::yup_oauth2::{
    self, authenticator::Authenticator, InstalledFlowAuthenticator, InstalledFlowReturnMethod,
};
use hyper_util::client::legacy::connect::HttpConnector;

pub type GoogleAuth = Authenticator<HttpsConnector<HttpConnector>>;

/// Everything the sync needs: read + label changes on Gmail, write on Sheets
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/gmail.modify",
    "https://www.googleapis.com/auth/spreadsheets",
];

/// Installed-app OAuth flow with the token persisted at `token_cache_path`
pub async fn authenticate(config: &Config) -> Result<GoogleAuth> {
    let secret = yup_oauth2::read_application_secret(&config.credentials_path)
        .await
        .with_context(|| {
            format!(
                "Failed to read OAuth credentials from {}",
                config.credentials_path.display()
            )
        })?;

    let auth = InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::HTTPRedirect)
        .persist_tokens_to_disk(config.token_cache_path.clone())
        .build()
        .await
        .context("Failed to build authenticator")?;

    // Ask for every scope at once so a single consent covers both services
    auth.token(SCOPES)
        .await
        .context("Failed to obtain access token")?;

    Ok(auth)
}
