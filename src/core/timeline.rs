//! The timeline: a globally sorted collection of file events
//!
//! Events arrive in whatever order the directory walk produces them; the
//! timeline re-establishes the global sort after every ingest, so batches
//! from multiple scan roots merge rather than concatenate.

use std::cmp::Ordering;

use crate::core::events::FileEvent;

/// Ordered sequence of events, sorted ascending by timestamp with a
/// deterministic tie-break on path and then event kind.
///
/// Events observed twice (the same path scanned under two overlapping
/// roots) are kept as duplicates: each represents a distinct observation.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    events: Vec<FileEvent>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of events and restore the global sort order.
    ///
    /// Calling this repeatedly accumulates events across batches; the
    /// observable order is always the merged global order, never
    /// per-batch.
    pub fn ingest(&mut self, events: impl IntoIterator<Item = FileEvent>) {
        self.events.extend(events);
        self.events.sort_by(Self::order);
    }

    /// The full sorted event sequence.
    pub fn all(&self) -> &[FileEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn order(a: &FileEvent, b: &FileEvent) -> Ordering {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.path.cmp(&b.path))
            .then_with(|| a.event_type.cmp(&b.event_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::EventKind;
    use chrono::{DateTime, TimeZone, Utc};
    use std::path::PathBuf;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn event(path: &str, kind: EventKind, secs: i64) -> FileEvent {
        FileEvent {
            path: PathBuf::from(path),
            event_type: kind,
            timestamp: at(secs),
            size_bytes: 10,
        }
    }

    #[test]
    fn ingest_sorts_by_timestamp() {
        let mut timeline = Timeline::new();
        timeline.ingest(vec![
            event("/c", EventKind::Modified, 300),
            event("/a", EventKind::Created, 100),
            event("/b", EventKind::Accessed, 200),
        ]);

        let stamps: Vec<_> = timeline.all().iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![at(100), at(200), at(300)]);
    }

    #[test]
    fn equal_timestamps_break_ties_on_path_then_kind() {
        let mut timeline = Timeline::new();
        timeline.ingest(vec![
            event("/b", EventKind::Created, 100),
            event("/a", EventKind::Accessed, 100),
            event("/a", EventKind::Created, 100),
            event("/a", EventKind::Modified, 100),
        ]);

        let order: Vec<_> = timeline
            .all()
            .iter()
            .map(|e| (e.path.clone(), e.event_type))
            .collect();
        assert_eq!(
            order,
            vec![
                (PathBuf::from("/a"), EventKind::Created),
                (PathBuf::from("/a"), EventKind::Modified),
                (PathBuf::from("/a"), EventKind::Accessed),
                (PathBuf::from("/b"), EventKind::Created),
            ]
        );
    }

    #[test]
    fn second_ingest_merges_into_global_order() {
        let mut timeline = Timeline::new();
        timeline.ingest(vec![event("/a", EventKind::Created, 300)]);
        timeline.ingest(vec![event("/b", EventKind::Created, 100)]);

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.all()[0].path, PathBuf::from("/b"));
    }

    #[test]
    fn duplicate_observations_are_kept() {
        let mut timeline = Timeline::new();
        timeline.ingest(vec![event("/a", EventKind::Created, 100)]);
        timeline.ingest(vec![event("/a", EventKind::Created, 100)]);
        assert_eq!(timeline.len(), 2);
    }

    #[test]
    fn empty_timeline_is_valid() {
        let timeline = Timeline::new();
        assert!(timeline.is_empty());
        assert_eq!(timeline.all().len(), 0);
    }
}
