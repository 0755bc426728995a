#![allow(dead_code)]

use anyhow::{anyhow, bail, Result};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use sheet_sync::{Config, Mailbox, Spreadsheet};
use shared_types::{MessageHeader, MessagePart, MessageSummary, RawMessage};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

pub fn test_config(dir: &Path) -> Config {
    Config {
        spreadsheet_id: "test-spreadsheet".to_string(),
        state_path: dir.join("processed_emails.txt"),
        ..Config::default()
    }
}

/// Plain-text message with the usual headers
pub fn email(id: &str, subject: &str) -> RawMessage {
    RawMessage {
        id: id.to_string(),
        payload: MessagePart {
            headers: vec![
                MessageHeader::new("From", format!("{}@example.com", id)),
                MessageHeader::new("Subject", subject),
                MessageHeader::new("Date", "Mon, 15 Jan 2024 10:30:00 +0000"),
            ],
            ..MessagePart::multipart(
                "multipart/alternative",
                vec![
                    MessagePart::leaf("text/html", URL_SAFE.encode("<p>html</p>")),
                    MessagePart::leaf("text/plain", URL_SAFE.encode(format!("Body of {}\n", id))),
                ],
            )
        },
    }
}

// ============================================================================
// Mailbox
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailCall {
    List(u32),
    Get(String),
    MarkRead(String),
}

impl MailCall {
    fn id(&self) -> Option<&str> {
        match self {
            MailCall::List(_) => None,
            MailCall::Get(id) | MailCall::MarkRead(id) => Some(id),
        }
    }
}

#[derive(Default)]
pub struct FakeMailbox {
    listed: Vec<String>,
    messages: HashMap<String, RawMessage>,
    fail_list: bool,
    fail_fetch: HashSet<String>,
    fail_mark_read: HashSet<String>,
    calls: Mutex<Vec<MailCall>>,
}

impl FakeMailbox {
    /// Messages are listed as unread in the given order
    pub fn with_messages(messages: Vec<RawMessage>) -> Self {
        Self {
            listed: messages.iter().map(|m| m.id.clone()).collect(),
            messages: messages.into_iter().map(|m| (m.id.clone(), m)).collect(),
            ..Default::default()
        }
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_fetch(mut self, id: &str) -> Self {
        self.fail_fetch.insert(id.to_string());
        self
    }

    pub fn failing_mark_read(mut self, id: &str) -> Self {
        self.fail_mark_read.insert(id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<MailCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, id: &str) -> Vec<MailCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.id() == Some(id))
            .collect()
    }

    fn record(&self, call: MailCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Mailbox for FakeMailbox {
    async fn list_unread(&self, max_results: u32) -> Result<Vec<MessageSummary>> {
        self.record(MailCall::List(max_results));
        if self.fail_list {
            bail!("list unavailable");
        }
        Ok(self
            .listed
            .iter()
            .take(max_results as usize)
            .map(|id| MessageSummary::new(id.as_str()))
            .collect())
    }

    async fn get_details(&self, id: &str) -> Result<RawMessage> {
        self.record(MailCall::Get(id.to_string()));
        if self.fail_fetch.contains(id) {
            bail!("fetch failed for {}", id);
        }
        self.messages
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("no message {}", id))
    }

    async fn mark_read(&self, id: &str) -> Result<()> {
        self.record(MailCall::MarkRead(id.to_string()));
        if self.fail_mark_read.contains(id) {
            bail!("modify failed for {}", id);
        }
        Ok(())
    }
}

// ============================================================================
// Spreadsheet
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetCall {
    Read(String),
    Write(String, Vec<Vec<String>>),
    Append(String, Vec<Vec<String>>),
}

/// Whole-sheet grid; only the header range and the full column range are
/// understood.
#[derive(Default)]
pub struct FakeSheet {
    rows: Mutex<Vec<Vec<String>>>,
    fail_read: bool,
    fail_append_subjects: HashSet<String>,
    calls: Mutex<Vec<SheetCall>>,
}

impl FakeSheet {
    pub fn with_rows(rows: Vec<Vec<&str>>) -> Self {
        Self {
            rows: Mutex::new(
                rows.into_iter()
                    .map(|r| r.into_iter().map(String::from).collect())
                    .collect(),
            ),
            ..Default::default()
        }
    }

    pub fn failing_read(mut self) -> Self {
        self.fail_read = true;
        self
    }

    /// Reject appends of rows whose Subject column equals `subject`
    pub fn failing_append_for(mut self, subject: &str) -> Self {
        self.fail_append_subjects.insert(subject.to_string());
        self
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<SheetCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn append_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SheetCall::Append(..)))
            .count()
    }

    fn record(&self, call: SheetCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Spreadsheet for FakeSheet {
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>> {
        self.record(SheetCall::Read(range.to_string()));
        if self.fail_read {
            bail!("sheet unavailable");
        }
        let rows = self.rows.lock().unwrap();
        if range.ends_with("!A1:D1") {
            Ok(rows.first().cloned().into_iter().collect())
        } else if range.ends_with("!A:D") {
            Ok(rows.clone())
        } else {
            bail!("unsupported range {}", range)
        }
    }

    async fn write_range(&self, range: &str, values: Vec<Vec<String>>) -> Result<()> {
        self.record(SheetCall::Write(range.to_string(), values.clone()));
        let mut rows = self.rows.lock().unwrap();
        for (i, row) in values.into_iter().enumerate() {
            if i < rows.len() {
                rows[i] = row;
            } else {
                rows.push(row);
            }
        }
        Ok(())
    }

    async fn append_rows(&self, range: &str, values: Vec<Vec<String>>) -> Result<()> {
        self.record(SheetCall::Append(range.to_string(), values.clone()));
        let rejected = values.iter().any(|row| {
            row.get(1)
                .is_some_and(|subject| self.fail_append_subjects.contains(subject))
        });
        if rejected {
            bail!("append rejected");
        }
        self.rows.lock().unwrap().extend(values);
        Ok(())
    }
}
