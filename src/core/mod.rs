//! Core timeline engine
//!
//! Event normalization, the sorted timeline, filtering, and statistics.

pub mod events;
pub mod filter;
pub mod stats;
pub mod timeline;

pub use events::{EventKind, FileEvent, RawFileRecord};
pub use filter::{FilterSpec, KindSelection};
pub use stats::TimelineStats;
pub use timeline::Timeline;
