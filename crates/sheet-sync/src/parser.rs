//! Turns a structured mailbox message into a flat [`ParsedEmail`].
//!
//! Parsing never fails. Missing headers become empty strings, a date that
//! cannot be understood is passed through untouched and a message without a
//! usable text part yields an empty body.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::{DateTime, NaiveDateTime};
use shared_types::{MessageHeader, MessagePart, ParsedEmail, RawMessage};

/// Rendering used for normalized dates
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Nested multiparts deeper than this are ignored
pub const MAX_PART_DEPTH: usize = 32;

/// URL-safe alphabet, padding optional
const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn parse_email(message: &RawMessage) -> ParsedEmail {
    let headers = &message.payload.headers;

    ParsedEmail {
        id: message.id.clone(),
        from: get_header(headers, "From").to_string(),
        subject: get_header(headers, "Subject").to_string(),
        date: normalize_date(get_header(headers, "Date")),
        content: extract_body(&message.payload).trim().to_string(),
    }
}

/// Case-insensitive header lookup, first match wins, empty when absent
pub fn get_header<'a>(headers: &'a [MessageHeader], name: &str) -> &'a str {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
        .unwrap_or("")
}

/// Reformat an RFC 2822 date as `YYYY-MM-DD HH:MM:SS`, keeping the sender's
/// own offset. Anything unparsable comes back unchanged.
pub fn normalize_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(dt) => dt.format(DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.naive_local());
    }

    // e.g. "Tue, 2 Jul 2024 09:05:03 -0700 (PDT)"
    let without_comment = strip_trailing_comment(trimmed)?;
    DateTime::parse_from_rfc2822(without_comment)
        .ok()
        .map(|dt| dt.naive_local())
}

fn strip_trailing_comment(s: &str) -> Option<&str> {
    if !s.ends_with(')') {
        return None;
    }
    s.rfind('(').map(|idx| s[..idx].trim_end())
}

/// Depth-first search for the first plain-text body in the part tree
pub fn extract_body(payload: &MessagePart) -> String {
    extract_from_part(payload, 0).unwrap_or_default()
}

fn extract_from_part(part: &MessagePart, depth: usize) -> Option<String> {
    if depth > MAX_PART_DEPTH {
        tracing::debug!("Ignoring message parts nested deeper than {}", MAX_PART_DEPTH);
        return None;
    }

    if part.parts.is_empty() {
        return part.body.data.as_deref().and_then(decode_data);
    }

    for sub in &part.parts {
        if is_plain_text(&sub.mime_type) {
            if let Some(text) = sub.body.data.as_deref().and_then(decode_data) {
                return Some(text);
            }
        } else if !sub.parts.is_empty() {
            if let Some(text) = extract_from_part(sub, depth + 1).filter(|t| !t.is_empty()) {
                return Some(text);
            }
        }
    }

    None
}

fn is_plain_text(mime_type: &str) -> bool {
    mime_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case("text/plain"))
}

fn decode_data(data: &str) -> Option<String> {
    match BODY_ENGINE.decode(data.trim()) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            tracing::debug!("Skipping undecodable body data: {}", e);
            None
        }
    }
}
