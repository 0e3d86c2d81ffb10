use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Parser, ValueEnum};

use crate::core::{EventKind, FilterSpec, KindSelection};
use crate::export::ExportFormat;

#[derive(Parser)]
#[command(name = "chronoscan")]
#[command(version)]
#[command(about = "Forensic filesystem timeline builder")]
#[command(
    long_about = "Chronoscan scans a directory tree, derives per-file creation, \
modification, and access events, and assembles them into a chronological \
timeline that can be filtered, summarized, and exported to CSV or JSON. \
Run without a directory to enter the interactive shell."
)]
pub struct Cli {
    /// Directory to analyze; omit to start the interactive shell
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Scan subdirectories recursively
    #[arg(short, long, help = "Scan subdirectories recursively")]
    pub recursive: bool,

    /// Restrict the timeline to these event types. Omitting the flag
    /// keeps all types; `--types none` explicitly selects no events.
    #[arg(
        long,
        value_delimiter = ',',
        help = "Event types to keep (create,modify,access) or 'none'"
    )]
    pub types: Option<Vec<String>>,

    /// Inclusive lower date bound (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_name = "DATE", help = "Keep events at or after this date")]
    pub from: Option<String>,

    /// Inclusive upper date bound (RFC 3339 or YYYY-MM-DD; a bare date
    /// covers the whole day)
    #[arg(long, value_name = "DATE", help = "Keep events at or before this date")]
    pub to: Option<String>,

    /// Export format for the filtered timeline
    #[arg(short, long, help = "Export the timeline (csv or json)")]
    pub export: Option<ExportArg>,

    /// Export destination (defaults to timeline_<timestamp>.<ext>)
    #[arg(short, long, value_name = "FILE", help = "Export output path")]
    pub output: Option<PathBuf>,

    /// Maximum events to display
    #[arg(long, default_value = "50", help = "Maximum events to display")]
    pub limit: usize,

    /// Disable colors in output
    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportArg {
    Csv,
    Json,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Csv => ExportFormat::Csv,
            ExportArg::Json => ExportFormat::Json,
        }
    }
}

impl Cli {
    pub fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref directory) = self.directory {
            if !directory.exists() {
                return Err(format!("Path does not exist: {}", directory.display()));
            }
            if !directory.is_dir() {
                return Err(format!("Path is not a directory: {}", directory.display()));
            }
        }

        if self.limit == 0 {
            return Err("Display limit must be greater than 0".to_string());
        }

        if self.output.is_some() && self.export.is_none() {
            return Err("--output requires --export".to_string());
        }

        Ok(())
    }

    /// Build the filter spec from the type and date flags.
    pub fn filter_spec(&self) -> Result<FilterSpec, String> {
        Ok(FilterSpec {
            kinds: self.kind_selection()?,
            date_from: self
                .from
                .as_deref()
                .map(|s| parse_date_bound(s, BoundSide::Lower))
                .transpose()?,
            date_to: self
                .to
                .as_deref()
                .map(|s| parse_date_bound(s, BoundSide::Upper))
                .transpose()?,
        })
    }

    fn kind_selection(&self) -> Result<KindSelection, String> {
        let Some(ref names) = self.types else {
            return Ok(KindSelection::Any);
        };

        if names.len() == 1 && names[0].eq_ignore_ascii_case("none") {
            return Ok(KindSelection::only([]));
        }

        let mut kinds = Vec::new();
        for name in names {
            kinds.push(name.parse::<EventKind>()?);
        }
        Ok(KindSelection::only(kinds))
    }

    pub fn export_output_path(&self, format: ExportFormat) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "timeline_{}.{}",
                Local::now().format("%Y%m%d_%H%M%S"),
                format.extension()
            ))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    Lower,
    Upper,
}

/// Parse a date bound: full RFC 3339, or a bare `YYYY-MM-DD` interpreted
/// in local time. A bare date on the upper side rounds up to the end of
/// the day so the inclusive bound covers the whole day.
pub fn parse_date_bound(input: &str, side: BoundSide) -> Result<DateTime<Utc>, String> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(stamp.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected RFC 3339 or YYYY-MM-DD)", input))?;
    let time = match side {
        BoundSide::Lower => NaiveTime::MIN,
        BoundSide::Upper => NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
            .expect("valid end-of-day time"),
    };
    let naive = date.and_time(time);

    // Ambiguous or skipped local times (DST transitions) fall back to UTC.
    match Local.from_local_datetime(&naive).single() {
        Some(local) => Ok(local.with_timezone(&Utc)),
        None => Ok(Utc.from_utc_datetime(&naive)),
    }
}
