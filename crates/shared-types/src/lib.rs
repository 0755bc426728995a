use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Mailbox Message Types
// ============================================================================

/// Lightweight listing entry returned by an unread-message search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: String,
}

impl MessageSummary {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Full structured message as delivered by the mailbox.
///
/// The field names follow the Gmail `users.messages.get?format=full` JSON so a
/// captured API response deserializes directly into this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    pub id: String,
    #[serde(default)]
    pub payload: MessagePart,
}

/// One node of the MIME body tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<MessageHeader>,
    #[serde(default)]
    pub body: MessagePartBody,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<MessagePart>,
}

impl MessagePart {
    /// Leaf part carrying inline, URL-safe base64 encoded data
    pub fn leaf(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            body: MessagePartBody {
                data: Some(data.into()),
            },
            ..Default::default()
        }
    }

    /// Container part holding nested sub-parts
    pub fn multipart(mime_type: impl Into<String>, parts: Vec<MessagePart>) -> Self {
        Self {
            mime_type: mime_type.into(),
            parts,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePartBody {
    /// URL-safe base64 text; absent for containers and attachment stubs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    pub name: String,
    pub value: String,
}

impl MessageHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// Spreadsheet Types
// ============================================================================

/// Flat record extracted from a message, lives for one pipeline pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedEmail {
    pub id: String,
    pub from: String,
    pub subject: String,
    pub date: String,
    pub content: String,
}

impl ParsedEmail {
    pub fn to_row(&self) -> SheetRow {
        SheetRow {
            from: self.from.clone(),
            subject: self.subject.clone(),
            date: self.date.clone(),
            content: self.content.clone(),
        }
    }
}

/// Column titles written once to the first row of the sheet
pub const SHEET_HEADERS: [&str; 4] = ["From", "Subject", "Date", "Content"];

/// One spreadsheet row, column order matches [`SHEET_HEADERS`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRow {
    pub from: String,
    pub subject: String,
    pub date: String,
    pub content: String,
}

impl SheetRow {
    pub fn header() -> Vec<String> {
        SHEET_HEADERS.iter().map(|h| h.to_string()).collect()
    }

    pub fn into_cells(self) -> Vec<String> {
        vec![self.from, self.subject, self.date, self.content]
    }

    /// Build a row from cells read back from the sheet. The API omits trailing
    /// empty cells, so missing columns become empty strings.
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        Self {
            from: cell(0),
            subject: cell(1),
            date: cell(2),
            content: cell(3),
        }
    }
}

// ============================================================================
// Run Reporting
// ============================================================================

/// Counts reported at the end of a pipeline pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Messages appended to the sheet during this run
    pub new: usize,
    /// Messages already present in the processed set
    pub skipped: usize,
    /// Messages whose fetch or append failed; eligible again next run
    pub failed: usize,
    /// Unread messages returned by the listing
    pub total: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "new: {}, skipped: {}, failed: {}, total: {}",
            self.new, self.skipped, self.failed, self.total
        )
    }
}
