//! Aggregate statistics over a timeline or filtered view
//!
//! Stats are recomputed on demand from whatever event slice the caller
//! supplies; nothing is cached across ingests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::events::{EventKind, FileEvent};

/// Summary metrics for a set of events.
///
/// `total_size_bytes` sums `size_bytes` once per event, so a file that
/// produced three events contributes its size three times. The figure is
/// an activity-volume proxy, not on-disk usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineStats {
    pub total_events: usize,
    pub events_created: usize,
    pub events_modified: usize,
    pub events_accessed: usize,
    pub total_size_bytes: u64,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
    pub duration_secs: i64,
}

impl Default for TimelineStats {
    fn default() -> Self {
        Self {
            total_events: 0,
            events_created: 0,
            events_modified: 0,
            events_accessed: 0,
            total_size_bytes: 0,
            earliest: None,
            latest: None,
            duration_secs: 0,
        }
    }
}

impl TimelineStats {
    /// Compute stats over an event slice. An empty slice yields zero
    /// counts and absent extremes, never an error.
    pub fn summarize(events: &[FileEvent]) -> Self {
        let mut stats = Self::default();

        for event in events {
            stats.total_events += 1;
            match event.event_type {
                EventKind::Created => stats.events_created += 1,
                EventKind::Modified => stats.events_modified += 1,
                EventKind::Accessed => stats.events_accessed += 1,
            }
            stats.total_size_bytes += event.size_bytes;

            stats.earliest = Some(match stats.earliest {
                Some(earliest) => earliest.min(event.timestamp),
                None => event.timestamp,
            });
            stats.latest = Some(match stats.latest {
                Some(latest) => latest.max(event.timestamp),
                None => event.timestamp,
            });
        }

        if let (Some(earliest), Some(latest)) = (stats.earliest, stats.latest) {
            stats.duration_secs = (latest - earliest).num_seconds();
        }

        stats
    }

    pub fn count_for(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::Created => self.events_created,
            EventKind::Modified => self.events_modified,
            EventKind::Accessed => self.events_accessed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn event(kind: EventKind, secs: i64, size: u64) -> FileEvent {
        FileEvent {
            path: PathBuf::from("/a"),
            event_type: kind,
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            size_bytes: size,
        }
    }

    #[test]
    fn empty_input_gives_zeroed_stats() {
        let stats = TimelineStats::summarize(&[]);
        assert_eq!(stats.total_events, 0);
        assert_eq!(stats.total_size_bytes, 0);
        assert_eq!(stats.earliest, None);
        assert_eq!(stats.latest, None);
        assert_eq!(stats.duration_secs, 0);
    }

    #[test]
    fn summarize_counts_sizes_and_span() {
        let t0 = 1_700_000_000;
        let events = vec![
            event(EventKind::Created, t0, 100),
            event(EventKind::Modified, t0 + 10, 200),
            event(EventKind::Accessed, t0 + 30, 50),
        ];
        let stats = TimelineStats::summarize(&events);

        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.total_size_bytes, 350);
        assert_eq!(stats.earliest, Some(Utc.timestamp_opt(t0, 0).unwrap()));
        assert_eq!(stats.latest, Some(Utc.timestamp_opt(t0 + 30, 0).unwrap()));
        assert_eq!(stats.duration_secs, 30);
    }

    #[test]
    fn per_kind_counts() {
        let events = vec![
            event(EventKind::Modified, 100, 1),
            event(EventKind::Modified, 200, 1),
            event(EventKind::Accessed, 300, 1),
        ];
        let stats = TimelineStats::summarize(&events);
        assert_eq!(stats.count_for(EventKind::Created), 0);
        assert_eq!(stats.count_for(EventKind::Modified), 2);
        assert_eq!(stats.count_for(EventKind::Accessed), 1);
    }

    #[test]
    fn single_event_has_zero_duration() {
        let stats = TimelineStats::summarize(&[event(EventKind::Created, 100, 1)]);
        assert_eq!(stats.duration_secs, 0);
        assert_eq!(stats.earliest, stats.latest);
    }

    #[test]
    fn extremes_ignore_input_order() {
        let events = vec![
            event(EventKind::Accessed, 300, 1),
            event(EventKind::Created, 100, 1),
        ];
        let stats = TimelineStats::summarize(&events);
        assert_eq!(stats.earliest, Some(Utc.timestamp_opt(100, 0).unwrap()));
        assert_eq!(stats.latest, Some(Utc.timestamp_opt(300, 0).unwrap()));
        assert_eq!(stats.duration_secs, 200);
    }
}
