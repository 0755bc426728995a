//! Gmail API client for listing, fetching and marking messages.

use super::auth::GoogleAuth;
use crate::capabilities::Mailbox;
use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use google_gmail1::api::{Message, ModifyMessageRequest, Scope};
use google_gmail1::common::{Connector, GetToken};
use google_gmail1::hyper_rustls::HttpsConnector;
use google_gmail1::Gmail;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use shared_types::{MessageHeader, MessagePart, MessagePartBody, MessageSummary, RawMessage};

/// Covers listing, reading and label changes; granted up front in `auth::SCOPES`
const GMAIL_SCOPE: Scope = Scope::Modify;

/// Client for interacting with Gmail API
pub struct GmailClient<C = HttpsConnector<HttpConnector>> {
    hub: Gmail<C>,
    query: String,
}

impl GmailClient {
    pub fn new(auth: GoogleAuth, query: &str) -> Result<Self> {
        Ok(Self::with_connector(super::https_connector()?, auth, query))
    }
}

impl<C: Connector> GmailClient<C> {
    pub(super) fn with_connector(connector: C, auth: impl GetToken + 'static, query: &str) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            hub: Gmail::new(client, auth),
            query: query.to_string(),
        }
    }
}

/// Convert the API model into the crate's wire-shaped message.
///
/// The generated client has already base64-decoded part data, so it is
/// re-encoded here to keep [`RawMessage`] identical to the JSON form.
fn to_raw_message(message: Message) -> RawMessage {
    RawMessage {
        id: message.id.unwrap_or_default(),
        payload: message.payload.map(convert_part).unwrap_or_default(),
    }
}

fn convert_part(part: google_gmail1::api::MessagePart) -> MessagePart {
    let headers = part
        .headers
        .unwrap_or_default()
        .into_iter()
        .map(|h| MessageHeader::new(h.name.unwrap_or_default(), h.value.unwrap_or_default()))
        .collect();

    let data = part
        .body
        .and_then(|body| body.data)
        .map(|bytes| URL_SAFE.encode(bytes));

    MessagePart {
        mime_type: part.mime_type.unwrap_or_default(),
        headers,
        body: MessagePartBody { data },
        parts: part
            .parts
            .unwrap_or_default()
            .into_iter()
            .map(convert_part)
            .collect(),
    }
}

impl<C: Connector> Mailbox for GmailClient<C> {
    async fn list_unread(&self, max_results: u32) -> Result<Vec<MessageSummary>> {
        let (_, list_response) = self
            .hub
            .users()
            .messages_list("me")
            .q(&self.query)
            .max_results(max_results)
            .add_scope(GMAIL_SCOPE)
            .doit()
            .await
            .context("Failed to list messages")?;

        Ok(list_response
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|msg| msg.id)
            .map(MessageSummary::new)
            .collect())
    }

    async fn get_details(&self, id: &str) -> Result<RawMessage> {
        let (_, message) = self
            .hub
            .users()
            .messages_get("me", id)
            .format("full")
            .add_scope(GMAIL_SCOPE)
            .doit()
            .await
            .with_context(|| format!("Failed to get message {}", id))?;

        Ok(to_raw_message(message))
    }

    async fn mark_read(&self, id: &str) -> Result<()> {
        let modify_request = ModifyMessageRequest {
            remove_label_ids: Some(vec!["UNREAD".to_string()]),
            add_label_ids: None,
        };

        self.hub
            .users()
            .messages_modify(modify_request, "me", id)
            .add_scope(GMAIL_SCOPE)
            .doit()
            .await
            .with_context(|| format!("Failed to mark message {} as read", id))?;

        tracing::info!("  Marked email {} as read", id);
        Ok(())
    }
}
