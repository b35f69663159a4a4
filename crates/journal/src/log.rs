//! JSONL decision log with size-triggered rotation.
//!
//! Each append is a single `write` of one line on a file opened in append
//! mode. Rotation is a plain read-and-rewrite and is not safe against another
//! process appending at the same moment; such an append can be lost.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::record::DecisionRecord;

/// Size above which the log is rotated.
pub const MAX_LOG_BYTES: u64 = 500 * 1024;

/// Lines kept by a rotation.
pub const KEEP_ENTRIES: usize = 500;

/// Decision log I/O failures.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("decision log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize decision record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Append-only decision log stored at a fixed path.
#[derive(Debug, Clone)]
pub struct DecisionLog {
    path: PathBuf,
}

impl DecisionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stamp `record` with the current time and append it.
    ///
    /// Never fails: I/O errors are logged and dropped so routing is never
    /// held up by the log.
    pub fn append(&self, mut record: DecisionRecord) {
        record.ts = Utc::now();

        if let Err(e) = self.try_append(&record) {
            warn!(path = %self.path.display(), error = %e, "Failed to write decision log");
            return;
        }

        if let Err(e) = rotate(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to rotate decision log");
        }
    }

    fn try_append(&self, record: &DecisionRecord) -> Result<(), JournalError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// The newest `n` records, oldest first.
    ///
    /// A missing log reads as empty. Blank, undecodable and malformed lines
    /// are skipped.
    pub fn read_last(&self, n: usize) -> Result<Vec<DecisionRecord>, JournalError> {
        let content = match std::fs::read(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records: Vec<DecisionRecord> = content
            .split(|b| *b == b'\n')
            .filter(|line| !line.trim_ascii().is_empty())
            .filter_map(|line| match serde_json::from_slice(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed decision log line");
                    None
                }
            })
            .collect();

        let skip = records.len().saturating_sub(n);
        Ok(records.split_off(skip))
    }
}

/// Keep only the newest [`KEEP_ENTRIES`] lines once the file exceeds
/// [`MAX_LOG_BYTES`]. Files at or under the threshold are not touched.
fn rotate(path: &Path) -> Result<(), JournalError> {
    let size = std::fs::metadata(path)?.len();
    if size <= MAX_LOG_BYTES {
        return Ok(());
    }

    // Lines are not guaranteed to be valid UTF-8
    let content = std::fs::read(path)?;
    let lines: Vec<&[u8]> = content.trim_ascii().split(|b| *b == b'\n').collect();
    if lines.len() <= KEEP_ENTRIES {
        return Ok(());
    }

    let mut kept = lines[lines.len() - KEEP_ENTRIES..].join(&b'\n');
    kept.push(b'\n');
    std::fs::write(path, kept)?;

    debug!(
        path = %path.display(),
        dropped = lines.len() - KEEP_ENTRIES,
        "Rotated decision log"
    );
    Ok(())
}
