//! Narrow interfaces to the two hosted services the pipeline talks to.
//!
//! The Google-backed implementations live in [`crate::google`]; tests drive the
//! pipeline with in-memory fakes instead.

use anyhow::Result;
use shared_types::{MessageSummary, RawMessage};

/// Read/modify access to a mailbox
#[allow(async_fn_in_trait)]
pub trait Mailbox {
    /// List unread inbox messages, at most `max_results`, in mailbox order
    async fn list_unread(&self, max_results: u32) -> Result<Vec<MessageSummary>>;

    /// Fetch the full structured message
    async fn get_details(&self, id: &str) -> Result<RawMessage>;

    /// Clear the unread flag. Idempotent.
    async fn mark_read(&self, id: &str) -> Result<()>;
}

/// Cell-grid access to one spreadsheet
#[allow(async_fn_in_trait)]
pub trait Spreadsheet {
    /// Read a range; empty trailing rows and cells are omitted
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>>;

    /// Overwrite a range with raw (unparsed) values
    async fn write_range(&self, range: &str, values: Vec<Vec<String>>) -> Result<()>;

    /// Insert rows after the last row with data in `range`
    async fn append_rows(&self, range: &str, values: Vec<Vec<String>>) -> Result<()>;
}

/// A1 notation for `cells` on `sheet`, e.g. `'Sheet1'!A1:D1`.
///
/// The sheet name is always quoted so names with spaces work; embedded single
/// quotes are doubled.
pub fn sheet_range(sheet: &str, cells: &str) -> String {
    format!("'{}'!{}", sheet.replace('\'', "''"), cells)
}

/// First row, where the column titles live
pub fn header_range(sheet: &str) -> String {
    sheet_range(sheet, "A1:D1")
}

/// All four data columns
pub fn data_range(sheet: &str) -> String {
    sheet_range(sheet, "A:D")
}
