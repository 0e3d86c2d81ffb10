//! Directory scanning: the timestamp source feeding the timeline
//!
//! Walks a subtree, stats every regular file, normalizes the timestamps
//! into events, and ingests them as one batch. Per-file failures become
//! warnings on the report; only a missing or non-directory root aborts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use ignore::WalkBuilder;

use crate::core::{RawFileRecord, Timeline};
use crate::error::TimelineError;

#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    pub recursive: bool,
    /// Log a progress line every this many files.
    pub progress_interval: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            progress_interval: 500,
        }
    }
}

/// A per-file failure that did not stop the scan.
#[derive(Debug, Clone)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of one scan pass over one root.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub files_seen: usize,
    pub files_indexed: usize,
    pub events_emitted: usize,
    pub warnings: Vec<ScanWarning>,
    pub cancelled: bool,
}

pub struct DirectoryScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl DirectoryScanner {
    pub fn new<P: AsRef<Path>>(root: P, options: ScanOptions) -> Result<Self, TimelineError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(TimelineError::NotADirectory(root));
        }
        Ok(Self { root, options })
    }

    /// Walk the root and ingest every derived event into `timeline`.
    ///
    /// The walk visits everything a forensic pass should see: hidden
    /// files included, no gitignore handling. Checks `cancel` between
    /// files; a cancelled scan leaves a valid partial timeline.
    pub fn scan(&self, timeline: &mut Timeline, cancel: &AtomicBool) -> ScanReport {
        let mut report = ScanReport::default();
        let mut batch = Vec::new();

        let max_depth = if self.options.recursive { None } else { Some(1) };
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .max_depth(max_depth)
            .build();

        tracing::info!("scanning {}", self.root.display());

        for entry in walker {
            if cancel.load(Ordering::SeqCst) {
                tracing::info!("scan interrupted after {} files", report.files_seen);
                report.cancelled = true;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("walk error: {}", err);
                    report.warnings.push(ScanWarning {
                        path: self.root.clone(),
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }

            report.files_seen += 1;
            match self.stat_file(entry.path()) {
                Ok(record) => {
                    let before = batch.len();
                    batch.extend(record.events());
                    report.events_emitted += batch.len() - before;
                    report.files_indexed += 1;
                }
                Err(err) => {
                    tracing::warn!("{}", err);
                    report.warnings.push(ScanWarning {
                        path: entry.path().to_path_buf(),
                        message: err.to_string(),
                    });
                }
            }

            if report.files_seen % self.options.progress_interval == 0 {
                tracing::info!("processed {} files...", report.files_seen);
            }
        }

        timeline.ingest(batch);
        tracing::info!(
            "scan complete: {} events from {} files ({} warnings)",
            report.events_emitted,
            report.files_indexed,
            report.warnings.len()
        );
        report
    }

    fn stat_file(&self, path: &Path) -> Result<RawFileRecord, TimelineError> {
        let meta = fs::symlink_metadata(path).map_err(|source| {
            TimelineError::MetadataUnavailable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(RawFileRecord::from_metadata(path.to_path_buf(), &meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents).unwrap();
        path
    }

    #[test]
    fn scan_indexes_regular_files_only() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.txt", b"aaa");
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_file(&dir.path().join("sub"), "b.txt", b"bb");

        let scanner = DirectoryScanner::new(dir.path(), ScanOptions::default()).unwrap();
        let mut timeline = Timeline::new();
        let report = scanner.scan(&mut timeline, &AtomicBool::new(false));

        assert_eq!(report.files_seen, 2);
        assert_eq!(report.files_indexed, 2);
        assert!(report.warnings.is_empty());
        assert!(!report.cancelled);
        // Every file yields at least modified + accessed.
        assert!(timeline.len() >= 4);
    }

    #[test]
    fn non_recursive_scan_stays_at_top_level() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "top.txt", b"top");
        fs::create_dir(dir.path().join("nested")).unwrap();
        write_file(&dir.path().join("nested"), "deep.txt", b"deep");

        let options = ScanOptions {
            recursive: false,
            ..Default::default()
        };
        let scanner = DirectoryScanner::new(dir.path(), options).unwrap();
        let mut timeline = Timeline::new();
        let report = scanner.scan(&mut timeline, &AtomicBool::new(false));

        assert_eq!(report.files_seen, 1);
        assert!(timeline
            .all()
            .iter()
            .all(|e| e.path.file_name().unwrap() == "top.txt"));
    }

    #[test]
    fn missing_root_is_rejected() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("nope");
        assert!(matches!(
            DirectoryScanner::new(&gone, ScanOptions::default()),
            Err(TimelineError::NotADirectory(_))
        ));
    }

    #[test]
    fn cancelled_scan_yields_valid_partial_timeline() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.txt", b"aaa");

        let scanner = DirectoryScanner::new(dir.path(), ScanOptions::default()).unwrap();
        let mut timeline = Timeline::new();
        let report = scanner.scan(&mut timeline, &AtomicBool::new(true));

        assert!(report.cancelled);
        assert_eq!(report.files_seen, 0);
        assert!(timeline.is_empty());
    }

    #[test]
    fn events_share_path_and_size() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.txt", b"12345");

        let scanner = DirectoryScanner::new(dir.path(), ScanOptions::default()).unwrap();
        let mut timeline = Timeline::new();
        scanner.scan(&mut timeline, &AtomicBool::new(false));

        assert!(timeline.all().iter().all(|e| e.size_bytes == 5));
    }
}
