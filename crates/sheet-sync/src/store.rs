//! Durable record of message IDs that already have a spreadsheet row.
//!
//! The state file holds one ID per line and is only ever appended to.
//! Duplicate lines are harmless: loading collapses them into a set.

use crate::error::StoreError;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

/// In-memory view of the processed IDs for the current run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedIds {
    ids: HashSet<String>,
}

impl ProcessedIds {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns `false` if the ID was already present
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ProcessedIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Append-only ID log on disk
#[derive(Debug, Clone)]
pub struct ProcessedIdStore {
    path: PathBuf,
}

impl ProcessedIdStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read every recorded ID. A missing file means first run and yields an
    /// empty set; an unreadable file is reported so the caller can warn and
    /// carry on with an empty set.
    pub fn load(&self) -> Result<ProcessedIds, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No state file at {}", self.path.display());
                return Ok(ProcessedIds::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect())
    }

    /// Append `id` as a new line and flush it to disk
    pub fn record(&self, id: &str) -> Result<(), StoreError> {
        self.append_line(id).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn append_line(&self, id: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", id)?;
        file.sync_data()
    }
}
