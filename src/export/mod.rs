//! Timeline export to CSV and JSON
//!
//! Both formats carry the same per-event fields (`path`, `event_type`,
//! `timestamp`, `size_bytes`) with RFC 3339 timestamps, and both can be
//! read back without losing type or timestamp precision. JSON documents
//! additionally carry the stats block for the exported view.

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{EventKind, FileEvent, TimelineStats};
use crate::error::TimelineError;

pub const CSV_HEADER: &str = "path,event_type,timestamp,size_bytes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Top-level JSON export document.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportDocument {
    pub generated_at: DateTime<Utc>,
    pub stats: TimelineStats,
    pub events: Vec<FileEvent>,
}

/// Writes a timeline view to a file or writer. Export is one-shot: a
/// write failure surfaces as `ExportWriteFailure` and is never retried.
pub struct TimelineExporter {
    format: ExportFormat,
}

impl TimelineExporter {
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }

    pub fn export_to_path<P: AsRef<Path>>(
        &self,
        events: &[FileEvent],
        stats: &TimelineStats,
        path: P,
    ) -> Result<(), TimelineError> {
        let path = path.as_ref();
        let wrap = |source: io::Error| TimelineError::ExportWriteFailure {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(wrap)?;
        let mut writer = BufWriter::new(file);
        self.write(events, stats, &mut writer).map_err(wrap)?;
        writer.flush().map_err(wrap)?;
        Ok(())
    }

    pub fn write<W: Write>(
        &self,
        events: &[FileEvent],
        stats: &TimelineStats,
        writer: &mut W,
    ) -> io::Result<()> {
        match self.format {
            ExportFormat::Csv => write_csv(events, writer),
            ExportFormat::Json => write_json(events, stats, writer),
        }
    }
}

fn write_csv<W: Write>(events: &[FileEvent], writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for event in events {
        writeln!(
            writer,
            "{},{},{},{}",
            csv_field(&event.path.to_string_lossy()),
            event.event_type,
            event.timestamp.to_rfc3339(),
            event.size_bytes
        )?;
    }
    Ok(())
}

fn write_json<W: Write>(events: &[FileEvent], stats: &TimelineStats, writer: &mut W) -> io::Result<()> {
    let document = ExportDocument {
        generated_at: Utc::now(),
        stats: stats.clone(),
        events: events.to_vec(),
    };
    serde_json::to_writer_pretty(&mut *writer, &document)?;
    writeln!(writer)
}

/// Quote a CSV field only when it needs it (commas, quotes, newlines).
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Read back a CSV export. Primarily used to verify round-trips; also
/// lets a previously exported timeline be re-examined.
///
/// A quoted field may contain newlines, so a record ends only at a
/// newline outside any quoted field; physical lines are accumulated
/// until the quotes balance.
pub fn read_csv<R: BufRead>(mut reader: R) -> io::Result<Vec<FileEvent>> {
    let invalid = |msg: String| io::Error::new(io::ErrorKind::InvalidData, msg);
    let mut events = Vec::new();
    let mut record = String::new();
    let mut line = String::new();
    let mut header_seen = false;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        record.push_str(&line);
        if has_open_quote(&record) {
            continue;
        }

        let text = strip_record_terminator(&record);
        if !header_seen {
            if text != CSV_HEADER {
                return Err(invalid(format!("unexpected CSV header: {}", text)));
            }
            header_seen = true;
        } else if !text.is_empty() {
            events.push(parse_record(text).map_err(invalid)?);
        }
        record.clear();
    }

    if !record.is_empty() {
        return Err(invalid(format!("unterminated quote in record: {}", record)));
    }

    Ok(events)
}

fn parse_record(text: &str) -> Result<FileEvent, String> {
    let fields = split_csv_line(text)?;
    if fields.len() != 4 {
        return Err(format!("expected 4 fields, got {}", fields.len()));
    }

    let event_type: EventKind = fields[1].parse()?;
    let timestamp = DateTime::parse_from_rfc3339(&fields[2])
        .map_err(|e| format!("bad timestamp {}: {}", fields[2], e))?
        .with_timezone(&Utc);
    let size_bytes = fields[3]
        .parse::<u64>()
        .map_err(|e| format!("bad size {}: {}", fields[3], e))?;

    Ok(FileEvent {
        path: PathBuf::from(&fields[0]),
        event_type,
        timestamp,
        size_bytes,
    })
}

/// Strip the record terminator only; interior carriage returns belong
/// to the data.
fn strip_record_terminator(record: &str) -> &str {
    let record = record.strip_suffix('\n').unwrap_or(record);
    record.strip_suffix('\r').unwrap_or(record)
}

fn has_open_quote(record: &str) -> bool {
    let mut chars = record.chars().peekable();
    let mut quoted = false;
    let mut field_start = true;

    while let Some(c) = chars.next() {
        match c {
            '"' if field_start && !quoted => {
                quoted = true;
                field_start = false;
            }
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    quoted = false;
                }
            }
            ',' if !quoted => field_start = true,
            _ => field_start = false,
        }
    }
    quoted
}

/// Read back a JSON export document.
pub fn read_json<R: io::Read>(reader: R) -> io::Result<ExportDocument> {
    serde_json::from_reader(reader).map_err(io::Error::from)
}

fn split_csv_line(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    let mut quoted = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if current.is_empty() && !quoted => quoted = true,
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    quoted = false;
                }
            }
            ',' if !quoted => {
                fields.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    if quoted {
        return Err(format!("unterminated quote in line: {}", line));
    }
    fields.push(current);
    Ok(fields)
}
