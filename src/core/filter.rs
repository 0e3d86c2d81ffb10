//! Timeline filtering
//!
//! A [`FilterSpec`] combines a kind selection with inclusive date bounds.
//! Applying it never mutates or reorders the timeline; the result is a
//! derived copy in the original sort order.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::events::{EventKind, FileEvent};
use crate::core::timeline::Timeline;
use crate::error::TimelineError;

/// Which event kinds a filter admits.
///
/// `Any` (the default) means no restriction at all. `Only` with an empty
/// set is a legal, distinct request for zero events; callers that want
/// "everything" must use `Any`, not an empty `Only`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KindSelection {
    #[default]
    Any,
    Only(BTreeSet<EventKind>),
}

impl KindSelection {
    pub fn only(kinds: impl IntoIterator<Item = EventKind>) -> Self {
        KindSelection::Only(kinds.into_iter().collect())
    }

    pub fn admits(&self, kind: EventKind) -> bool {
        match self {
            KindSelection::Any => true,
            KindSelection::Only(set) => set.contains(&kind),
        }
    }
}

/// Filter configuration: kind selection plus optional inclusive date
/// bounds (UTC).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub kinds: KindSelection,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl FilterSpec {
    /// True if this spec admits every event.
    pub fn is_unrestricted(&self) -> bool {
        self.kinds == KindSelection::Any && self.date_from.is_none() && self.date_to.is_none()
    }

    /// Reject inverted date ranges before any events are touched.
    pub fn validate(&self) -> Result<(), TimelineError> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(TimelineError::InvalidFilterSpec { from, to });
            }
        }
        Ok(())
    }

    /// Apply this filter to a timeline, producing a derived event list in
    /// the timeline's sort order. The timeline itself is never modified.
    pub fn apply(&self, timeline: &Timeline) -> Result<Vec<FileEvent>, TimelineError> {
        self.validate()?;
        Ok(timeline
            .all()
            .iter()
            .filter(|event| self.matches(event))
            .cloned()
            .collect())
    }

    pub fn matches(&self, event: &FileEvent) -> bool {
        if !self.kinds.admits(event.event_type) {
            return false;
        }
        if let Some(from) = self.date_from {
            if event.timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if event.timestamp > to {
                return false;
            }
        }
        true
    }
}
