pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod render;
pub mod scan;
pub mod shell;

pub use crate::core::{
    EventKind, FileEvent, FilterSpec, KindSelection, RawFileRecord, Timeline, TimelineStats,
};
pub use error::TimelineError;
pub use export::{ExportFormat, TimelineExporter};
pub use scan::{DirectoryScanner, ScanOptions, ScanReport, ScanWarning};
