//! Single-pass mailbox-to-sheet sync.
//!
//! Setup failures (header row) abort the run. Once the item loop starts, every
//! failure is contained to the message that caused it.

use crate::capabilities::{data_range, header_range, Mailbox, Spreadsheet};
use crate::config::Config;
use crate::error::SyncError;
use crate::parser::parse_email;
use crate::store::{ProcessedIdStore, ProcessedIds};
use anyhow::{Context, Result};
use shared_types::{RunSummary, SheetRow};

/// Drives fetch → filter → parse → append → mark → record for one run
pub struct SyncPipeline<M, S> {
    config: Config,
    mailbox: M,
    sheet: S,
    store: ProcessedIdStore,
}

/// What happened to a message that was not skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemOutcome {
    Added,
    Failed,
}

impl<M: Mailbox, S: Spreadsheet> SyncPipeline<M, S> {
    pub fn new(config: Config, mailbox: M, sheet: S) -> Self {
        let store = ProcessedIdStore::new(config.state_path.clone());
        Self {
            config,
            mailbox,
            sheet,
            store,
        }
    }

    pub fn mailbox(&self) -> &M {
        &self.mailbox
    }

    pub fn sheet(&self) -> &S {
        &self.sheet
    }

    pub async fn run(&self) -> Result<RunSummary, SyncError> {
        tracing::info!("[2/6] Setting up sheet headers...");
        self.ensure_headers().await.map_err(SyncError::HeaderSetup)?;

        tracing::info!("[3/6] Loading previous state...");
        let mut processed = self.load_processed();

        tracing::info!("[4/6] Fetching unread emails...");
        let messages = match self.mailbox.list_unread(self.config.max_results).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!("Failed to list unread emails: {:#}", e);
                Vec::new()
            }
        };

        let mut summary = RunSummary {
            total: messages.len(),
            ..Default::default()
        };

        if messages.is_empty() {
            tracing::info!("No unread emails found. Nothing to process.");
            return Ok(summary);
        }

        tracing::info!("Found {} unread email(s)", messages.len());
        tracing::info!("[5/6] Processing emails...");

        for (idx, message) in messages.iter().enumerate() {
            let progress = format!("[{}/{}]", idx + 1, summary.total);

            if processed.contains(&message.id) {
                tracing::info!(
                    "{} Skipping already processed email: {}",
                    progress,
                    message.id
                );
                summary.skipped += 1;
                continue;
            }

            match self.process_message(&message.id, &progress).await {
                ItemOutcome::Added => {
                    processed.insert(message.id.as_str());
                    summary.new += 1;
                }
                ItemOutcome::Failed => summary.failed += 1,
            }
        }

        tracing::info!("[6/6] Processing complete ({})", summary);
        Ok(summary)
    }

    /// Write the column titles unless the first row already has content
    async fn ensure_headers(&self) -> Result<()> {
        let range = header_range(&self.config.sheet_name);
        let existing = self
            .sheet
            .read_range(&range)
            .await
            .context("Failed to read header row")?;

        let is_empty = existing
            .iter()
            .all(|row| row.iter().all(String::is_empty));

        if !is_empty {
            tracing::info!("Headers already exist");
            return Ok(());
        }

        self.sheet
            .write_range(&range, vec![SheetRow::header()])
            .await
            .context("Failed to write header row")?;
        tracing::info!("Headers created in sheet '{}'", self.config.sheet_name);
        Ok(())
    }

    fn load_processed(&self) -> ProcessedIds {
        match self.store.load() {
            Ok(ids) if ids.is_empty() => {
                tracing::info!("No previous state found. Starting fresh.");
                ids
            }
            Ok(ids) => {
                tracing::info!("Loaded {} previously processed emails", ids.len());
                ids
            }
            Err(e) => {
                tracing::warn!("{}; continuing with an empty processed set", e);
                ProcessedIds::default()
            }
        }
    }

    async fn process_message(&self, id: &str, progress: &str) -> ItemOutcome {
        tracing::info!("{} Processing email: {}", progress, id);

        let raw = match self.mailbox.get_details(id).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("  Failed to fetch email {}: {:#}", id, e);
                return ItemOutcome::Failed;
            }
        };

        let email = parse_email(&raw);
        tracing::info!("  From: {}", email.from);
        tracing::info!("  Subject: {}", email.subject);
        tracing::info!("  Date: {}", email.date);

        let range = data_range(&self.config.sheet_name);
        if let Err(e) = self
            .sheet
            .append_rows(&range, vec![email.to_row().into_cells()])
            .await
        {
            // Left unread and unrecorded so the next run picks it up again
            tracing::error!("  Failed to add email {} to sheet: {:#}", id, e);
            return ItemOutcome::Failed;
        }

        // The row exists now, so the ID is recorded even if this fails
        if let Err(e) = self.mailbox.mark_read(id).await {
            tracing::warn!("  Failed to mark email {} as read: {:#}", id, e);
        }

        if let Err(e) = self.store.record(id) {
            tracing::error!("  {}; email {} may be added again next run", e, id);
        }

        tracing::info!("  Email processed successfully");
        ItemOutcome::Added
    }
}

/// Rows stored below the header row, padded to four columns
pub async fn read_sheet_rows<S: Spreadsheet>(
    sheet: &S,
    sheet_name: &str,
) -> Result<Vec<SheetRow>> {
    let values = sheet
        .read_range(&data_range(sheet_name))
        .await
        .context("Failed to read rows from sheet")?;

    Ok(values
        .iter()
        .skip(1)
        .map(|cells| SheetRow::from_cells(cells))
        .collect())
}
