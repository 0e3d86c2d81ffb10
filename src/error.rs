use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by the timeline engine and its collaborators.
///
/// `MetadataUnavailable` is recoverable per file: the scanner records it
/// as a warning and keeps going. The others are fatal to the single
/// operation that raised them.
#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("cannot read metadata for {path}: {source}")]
    MetadataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid filter: date_from {from} is after date_to {to}")]
    InvalidFilterSpec {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    #[error("export to {path} failed: {source}")]
    ExportWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}
