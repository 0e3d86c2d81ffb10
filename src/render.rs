//! Plain-text presentation of timelines and stats
//!
//! The engine exposes read-only iteration and stats; everything about
//! color and layout lives here. Color is an explicit option on
//! [`RenderOptions`], never global state. Timestamps are stored in UTC
//! and shown in local time.

use std::io::{self, Write};

use chrono::Local;

use crate::core::{EventKind, FileEvent, TimelineStats};
use crate::scan::ScanWarning;

const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub color: bool,
    /// Maximum events to print; the remainder is summarized in one line.
    pub limit: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: true,
            limit: 50,
        }
    }
}

fn kind_color(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Created => GREEN,
        EventKind::Modified => YELLOW,
        EventKind::Accessed => BLUE,
    }
}

fn paint(text: &str, color: &str, enabled: bool) -> String {
    if enabled {
        format!("{}{}{}", color, text, RESET)
    } else {
        text.to_string()
    }
}

pub fn render_timeline<W: Write>(
    out: &mut W,
    events: &[FileEvent],
    options: RenderOptions,
) -> io::Result<()> {
    if events.is_empty() {
        writeln!(out, "No events match the specified criteria.")?;
        return Ok(());
    }

    writeln!(out, "{}", paint(&"=".repeat(72), CYAN, options.color))?;
    writeln!(out, "TIMELINE - {} events", events.len())?;
    writeln!(out, "{}", paint(&"=".repeat(72), CYAN, options.color))?;

    for event in events.iter().take(options.limit) {
        let local = event.timestamp.with_timezone(&Local);
        let label = format!("{:<7}", event.event_type.as_str());
        writeln!(
            out,
            "[{}] {} {} ({})",
            local.format("%Y-%m-%d %H:%M:%S"),
            paint(&label, kind_color(event.event_type), options.color),
            event.path.display(),
            human_size(event.size_bytes)
        )?;
    }

    if events.len() > options.limit {
        writeln!(out, "... and {} more events", events.len() - options.limit)?;
    }
    Ok(())
}

pub fn render_stats<W: Write>(
    out: &mut W,
    stats: &TimelineStats,
    options: RenderOptions,
) -> io::Result<()> {
    writeln!(out, "{}", paint("TIMELINE STATISTICS", CYAN, options.color))?;
    writeln!(out, "Total events: {}", stats.total_events)?;

    if let (Some(earliest), Some(latest)) = (stats.earliest, stats.latest) {
        writeln!(
            out,
            "Time range: {} to {}",
            earliest.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            latest.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        )?;
        writeln!(out, "Duration: {}", human_duration(stats.duration_secs))?;
    }
    writeln!(out, "Total data size: {}", human_size(stats.total_size_bytes))?;

    if stats.total_events > 0 {
        writeln!(out, "Event distribution:")?;
        for kind in EventKind::ALL {
            let count = stats.count_for(kind);
            let percentage = (count as f64 / stats.total_events as f64) * 100.0;
            let label = format!("{:<7}", kind.as_str());
            writeln!(
                out,
                "  {}: {:>5} events ({:.1}%)",
                paint(&label, kind_color(kind), options.color),
                count,
                percentage
            )?;
        }
    }
    Ok(())
}

pub fn render_warnings<W: Write>(out: &mut W, warnings: &[ScanWarning]) -> io::Result<()> {
    if warnings.is_empty() {
        writeln!(out, "No scan warnings.")?;
        return Ok(());
    }
    writeln!(out, "{} files could not be read:", warnings.len())?;
    for warning in warnings {
        writeln!(out, "  {}: {}", warning.path.display(), warning.message)?;
    }
    Ok(())
}

pub fn human_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if value < 1024.0 {
            return format!("{:.1} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.1} TB", value)
}

pub fn human_duration(secs: i64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    if days > 0 {
        format!("{}d {:02}h {:02}m {:02}s", days, hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn event(secs: i64) -> FileEvent {
        FileEvent {
            path: PathBuf::from("/a"),
            event_type: EventKind::Created,
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            size_bytes: 2048,
        }
    }

    #[test]
    fn human_size_ladder() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(512), "512.0 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn human_duration_formats() {
        assert_eq!(human_duration(30), "00:00:30");
        assert_eq!(human_duration(3_661), "01:01:01");
        assert_eq!(human_duration(90_061), "1d 01h 01m 01s");
    }

    #[test]
    fn empty_timeline_renders_notice() {
        let mut out = Vec::new();
        render_timeline(&mut out, &[], RenderOptions::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("No events"));
    }

    #[test]
    fn no_color_output_has_no_escapes() {
        let mut out = Vec::new();
        let options = RenderOptions {
            color: false,
            limit: 50,
        };
        render_timeline(&mut out, &[event(100)], options).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains('\x1b'));
        assert!(text.contains("CREATE"));
    }

    #[test]
    fn limit_truncates_and_reports_remainder() {
        let events: Vec<_> = (0..10).map(|i| event(i * 60)).collect();
        let mut out = Vec::new();
        let options = RenderOptions {
            color: false,
            limit: 3,
        };
        render_timeline(&mut out, &events, options).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("and 7 more events"));
    }

    #[test]
    fn stats_render_includes_distribution() {
        let events = vec![event(0), event(60)];
        let stats = TimelineStats::summarize(&events);
        let mut out = Vec::new();
        let options = RenderOptions {
            color: false,
            limit: 50,
        };
        render_stats(&mut out, &stats, options).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total events: 2"));
        assert!(text.contains("CREATE"));
        assert!(text.contains("100.0%"));
    }
}
