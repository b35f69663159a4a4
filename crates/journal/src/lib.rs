//! Decision log: one JSON line per routing decision.
//!
//! Appends are best-effort. Once the file grows past [`MAX_LOG_BYTES`] it is
//! rewritten to keep only the newest [`KEEP_ENTRIES`] lines.

pub mod log;
pub mod record;

pub use log::{DecisionLog, JournalError, KEEP_ENTRIES, MAX_LOG_BYTES};
pub use record::DecisionRecord;
