//! Interactive command shell
//!
//! A command dispatcher owning one in-memory timeline and the last
//! applied filter spec. Every command re-queries the engine; there is no
//! hidden cursor state. The reader and writer are generic so the loop
//! is testable without a terminal.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::cli::{parse_date_bound, BoundSide};
use crate::config::ChronoscanConfig;
use crate::core::{EventKind, FilterSpec, KindSelection, Timeline, TimelineStats};
use crate::export::{ExportFormat, TimelineExporter};
use crate::render::{self, RenderOptions};
use crate::scan::{DirectoryScanner, ScanOptions, ScanWarning};

const HELP: &str = "\
Commands:
  scan <dir> [-r]          Scan a directory (use -r for recursive)
  show [N]                 Show the filtered timeline (up to N events)
  filter [KEY=VALUE ...]   Set the filter; keys: types, from, to
                           types=create,modify,access or types=none
                           (omitting 'types' keeps all event types)
  filter clear             Reset the filter
  stats                    Show statistics for the filtered view
  export <csv|json> <file> Export the filtered view
  warnings                 List files the scans could not read
  help                     Show this help
  quit                     Exit
";

pub struct Shell {
    timeline: Timeline,
    filter: FilterSpec,
    warnings: Vec<ScanWarning>,
    config: ChronoscanConfig,
    color: bool,
    cancel: Arc<AtomicBool>,
}

impl Shell {
    pub fn new(config: ChronoscanConfig, color: bool, cancel: Arc<AtomicBool>) -> Self {
        Self {
            timeline: Timeline::new(),
            filter: FilterSpec::default(),
            warnings: Vec::new(),
            config,
            color,
            cancel,
        }
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        writeln!(out, "chronoscan interactive shell (type 'help' for commands)")?;

        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            // Commands taking a path receive the raw remainder of the
            // line, so paths containing spaces survive.
            let (command, rest) = match trimmed.split_once(char::is_whitespace) {
                Some((command, rest)) => (command, rest.trim()),
                None => (trimmed, ""),
            };
            let args: Vec<&str> = rest.split_whitespace().collect();

            match command {
                "help" => write!(out, "{}", HELP)?,
                "scan" => self.cmd_scan(rest, out)?,
                "show" => self.cmd_show(&args, out)?,
                "filter" => self.cmd_filter(&args, out)?,
                "stats" => self.cmd_stats(out)?,
                "export" => self.cmd_export(rest, out)?,
                "warnings" => render::render_warnings(out, &self.warnings)?,
                "quit" | "exit" => break,
                other => writeln!(out, "Unknown command: {} (try 'help')", other)?,
            }
            out.flush()?;
        }
        Ok(())
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    fn render_options(&self, limit: usize) -> RenderOptions {
        RenderOptions {
            color: self.color,
            limit,
        }
    }

    fn cmd_scan<W: Write>(&mut self, rest: &str, out: &mut W) -> io::Result<()> {
        let (recursive, path) = split_scan_args(rest);
        if path.is_empty() {
            return writeln!(out, "Usage: scan <dir> [-r]");
        }
        let directory = PathBuf::from(path);

        self.cancel.store(false, std::sync::atomic::Ordering::SeqCst);
        let options = ScanOptions {
            recursive,
            progress_interval: self.config.scan.progress_interval,
        };
        let scanner = match DirectoryScanner::new(&directory, options) {
            Ok(scanner) => scanner,
            Err(err) => return writeln!(out, "Error: {}", err),
        };

        let report = scanner.scan(&mut self.timeline, &self.cancel);
        writeln!(
            out,
            "Scanned {} files, {} events ingested ({} total in timeline)",
            report.files_indexed,
            report.events_emitted,
            self.timeline.len()
        )?;
        if !report.warnings.is_empty() {
            writeln!(
                out,
                "{} files could not be read (see 'warnings')",
                report.warnings.len()
            )?;
        }
        if report.cancelled {
            writeln!(out, "Scan interrupted; timeline holds a partial result")?;
        }
        self.warnings.extend(report.warnings);
        Ok(())
    }

    fn cmd_show<W: Write>(&mut self, args: &[&str], out: &mut W) -> io::Result<()> {
        let limit = match args.first() {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return writeln!(out, "Usage: show [N] (N must be a positive number)"),
            },
            None => self.config.display.limit,
        };

        match self.filter.apply(&self.timeline) {
            Ok(events) => render::render_timeline(out, &events, self.render_options(limit)),
            Err(err) => writeln!(out, "Error: {}", err),
        }
    }

    fn cmd_filter<W: Write>(&mut self, args: &[&str], out: &mut W) -> io::Result<()> {
        if args.is_empty() {
            return self.describe_filter(out);
        }
        if args == ["clear"] {
            self.filter = FilterSpec::default();
            return writeln!(out, "Filter cleared");
        }

        // Build the candidate first so a bad spec leaves the current one
        // in place.
        let mut candidate = FilterSpec::default();
        for arg in args {
            let Some((key, value)) = arg.split_once('=') else {
                return writeln!(out, "Expected KEY=VALUE, got '{}' (try 'help')", arg);
            };
            match key {
                "types" => match parse_kinds(value) {
                    Ok(kinds) => candidate.kinds = kinds,
                    Err(err) => return writeln!(out, "Error: {}", err),
                },
                "from" => match parse_date_bound(value, BoundSide::Lower) {
                    Ok(stamp) => candidate.date_from = Some(stamp),
                    Err(err) => return writeln!(out, "Error: {}", err),
                },
                "to" => match parse_date_bound(value, BoundSide::Upper) {
                    Ok(stamp) => candidate.date_to = Some(stamp),
                    Err(err) => return writeln!(out, "Error: {}", err),
                },
                other => return writeln!(out, "Unknown filter key: {}", other),
            }
        }

        if let Err(err) = candidate.validate() {
            return writeln!(out, "Error: {}", err);
        }
        self.filter = candidate;
        self.describe_filter(out)
    }

    fn describe_filter<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.filter.is_unrestricted() {
            return writeln!(out, "Filter: all events");
        }
        let kinds = match &self.filter.kinds {
            KindSelection::Any => "all".to_string(),
            KindSelection::Only(set) if set.is_empty() => "none".to_string(),
            KindSelection::Only(set) => set
                .iter()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(","),
        };
        writeln!(
            out,
            "Filter: types={} from={} to={}",
            kinds,
            self.filter
                .date_from
                .map(|d| d.to_rfc3339())
                .unwrap_or_else(|| "-".to_string()),
            self.filter
                .date_to
                .map(|d| d.to_rfc3339())
                .unwrap_or_else(|| "-".to_string()),
        )
    }

    fn cmd_stats<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match self.filter.apply(&self.timeline) {
            Ok(events) => {
                let stats = TimelineStats::summarize(&events);
                render::render_stats(out, &stats, self.render_options(self.config.display.limit))
            }
            Err(err) => writeln!(out, "Error: {}", err),
        }
    }

    fn cmd_export<W: Write>(&mut self, rest: &str, out: &mut W) -> io::Result<()> {
        let (format, path) = match rest.split_once(char::is_whitespace) {
            Some((format, path)) if !path.trim().is_empty() => {
                (format, PathBuf::from(path.trim()))
            }
            _ => return writeln!(out, "Usage: export <csv|json> <file>"),
        };
        let format = match format {
            "csv" => ExportFormat::Csv,
            "json" => ExportFormat::Json,
            other => return writeln!(out, "Unknown export format: {}", other),
        };

        let events = match self.filter.apply(&self.timeline) {
            Ok(events) => events,
            Err(err) => return writeln!(out, "Error: {}", err),
        };
        let stats = TimelineStats::summarize(&events);

        match TimelineExporter::new(format).export_to_path(&events, &stats, &path) {
            Ok(()) => writeln!(out, "Exported {} events to {}", events.len(), path.display()),
            Err(err) => writeln!(out, "Error: {}", err),
        }
    }
}

/// Separate the recursive flag from the scan path. The path may contain
/// spaces, so the flag is only recognized as a whole word at either end
/// of the argument text.
fn split_scan_args(rest: &str) -> (bool, &str) {
    let mut rest = rest.trim();
    let mut recursive = false;

    loop {
        let mut changed = false;
        for flag in ["--recursive", "-r"] {
            if let Some(tail) = rest.strip_prefix(flag) {
                if tail.is_empty() || tail.starts_with(char::is_whitespace) {
                    recursive = true;
                    rest = tail.trim_start();
                    changed = true;
                }
            }
            if let Some(head) = rest.strip_suffix(flag) {
                if head.is_empty() || head.ends_with(char::is_whitespace) {
                    recursive = true;
                    rest = head.trim_end();
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    (recursive, rest)
}

fn parse_kinds(value: &str) -> Result<KindSelection, String> {
    if value.eq_ignore_ascii_case("none") {
        return Ok(KindSelection::only([]));
    }
    let mut kinds = Vec::new();
    for name in value.split(',').filter(|s| !s.is_empty()) {
        kinds.push(name.parse::<EventKind>()?);
    }
    if kinds.is_empty() {
        return Err("expected at least one event type or 'none'".to_string());
    }
    Ok(KindSelection::only(kinds))
}
