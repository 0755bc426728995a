//! Copies unread mailbox messages into a spreadsheet, one row per message,
//! remembering which messages have already been copied.

pub mod capabilities;
pub mod config;
pub mod error;
pub mod google;
pub mod parser;
pub mod pipeline;
pub mod store;

pub use capabilities::{Mailbox, Spreadsheet};
pub use config::Config;
pub use error::{StoreError, SyncError};
pub use pipeline::{read_sheet_rows, SyncPipeline};
pub use store::{ProcessedIdStore, ProcessedIds};
