//! Event model and timestamp normalization
//!
//! A scanned file contributes up to three events, one per timestamp the
//! platform can supply. Timestamps are normalized to UTC at this boundary;
//! conversion to local time happens in the presentation layer.

use std::fs::Metadata;
use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of timestamp observation an event records.
///
/// Variant order doubles as the tie-break order when events share a
/// timestamp and path: CREATE sorts before MODIFY before ACCESS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "CREATE")]
    Created,
    #[serde(rename = "MODIFY")]
    Modified,
    #[serde(rename = "ACCESS")]
    Accessed,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Created, EventKind::Modified, EventKind::Accessed];

    /// Wire label, shared by the CSV and JSON export formats.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "CREATE",
            EventKind::Modified => "MODIFY",
            EventKind::Accessed => "ACCESS",
        }
    }
}

impl std::str::FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CREATE" | "CREATED" => Ok(EventKind::Created),
            "MODIFY" | "MODIFIED" => Ok(EventKind::Modified),
            "ACCESS" | "ACCESSED" => Ok(EventKind::Accessed),
            other => Err(format!("unknown event type: {}", other)),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single timestamp observation derived from file metadata.
///
/// Field names are the export compatibility contract; both the CSV and
/// JSON writers use them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEvent {
    pub path: PathBuf,
    pub event_type: EventKind,
    pub timestamp: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Raw per-file metadata as read from the filesystem.
///
/// Each timestamp is optional: some platforms cannot supply a true
/// creation time, and that absence is data, not an error.
#[derive(Debug, Clone)]
pub struct RawFileRecord {
    pub path: PathBuf,
    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
    pub accessed: Option<SystemTime>,
    pub size_bytes: u64,
}

impl RawFileRecord {
    /// Build a record from stat results. `Metadata::created()` errors on
    /// platforms without a birth time; that maps to an absent timestamp.
    pub fn from_metadata(path: PathBuf, meta: &Metadata) -> Self {
        Self {
            created: meta.created().ok(),
            modified: meta.modified().ok(),
            accessed: meta.accessed().ok(),
            size_bytes: meta.len(),
            path,
        }
    }

    /// Normalize this record into 0-3 events, one per available timestamp.
    pub fn events(&self) -> impl Iterator<Item = FileEvent> + '_ {
        [
            (EventKind::Created, self.created),
            (EventKind::Modified, self.modified),
            (EventKind::Accessed, self.accessed),
        ]
        .into_iter()
        .filter_map(move |(kind, stamp)| {
            stamp.map(|stamp| FileEvent {
                path: self.path.clone(),
                event_type: kind,
                timestamp: DateTime::<Utc>::from(stamp),
                size_bytes: self.size_bytes,
            })
        })
    }
}
