//! Ingestion layer for assistant session logs
//!
//! Turns the JSONL files under the Claude Code projects directory into a flat
//! list of [`Event`]s.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │  Source Files   │ ──► │    LogSource     │ ──► │  dedup::dedup   │
//! │ (~/.claude/...) │     │  reader::read_*  │     │ (first wins)    │
//! └─────────────────┘     └──────────────────┘     └─────────────────┘
//! ```
//!
//! Discovery is recursive and sorted, so reads (and therefore "first
//! occurrence" during deduplication) are deterministic.

pub mod dedup;
pub mod reader;

pub use dedup::dedup;
pub use reader::{parse_line, read_file, ReadStats};

use crate::error::{Error, Result};
use crate::types::Event;
use chrono::{DateTime, Local, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Glob, relative to the root, matching session log files.
pub const SESSION_PATTERN: &str = "**/*.jsonl";

/// A discovered log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Last modification time (local), if the filesystem reports one
    pub modified_at: Option<NaiveDateTime>,
    pub size_bytes: u64,
}

/// Result of reading every candidate file.
#[derive(Debug, Default)]
pub struct ReadResult {
    /// Events in file order, files in path order
    pub events: Vec<Event>,
    pub files_read: usize,
    /// Files skipped because they were empty or last modified before the window
    pub files_skipped: usize,
    /// Total size of the files that were read
    pub bytes_read: u64,
    /// Line accounting summed over all files
    pub stats: ReadStats,
}

/// A directory tree of Claude Code session logs.
#[derive(Debug, Clone)]
pub struct LogSource {
    root: PathBuf,
}

impl LogSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find every `*.jsonl` file under the root, sorted by path.
    ///
    /// A missing root is not an error; it yields no files.
    pub fn discover_files(&self) -> Result<Vec<SourceFile>> {
        if !self.root.is_dir() {
            tracing::debug!(root = %self.root.display(), "Log root not found");
            return Ok(Vec::new());
        }

        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        let pattern = format!("{}/{}", root.trim_end_matches('/'), SESSION_PATTERN);
        let entries = glob::glob(&pattern)
            .map_err(|e| Error::Discovery(format!("invalid glob pattern: {}", e)))?;

        let mut files: Vec<SourceFile> = entries
            .flatten()
            .filter(|path| path.is_file())
            .map(|path| {
                let metadata = std::fs::metadata(&path).ok();
                let modified_at = metadata
                    .as_ref()
                    .and_then(|m| m.modified().ok())
                    .map(|t| DateTime::<Local>::from(t).naive_local());
                let size_bytes = metadata.map(|m| m.len()).unwrap_or(0);
                SourceFile {
                    path,
                    modified_at,
                    size_bytes,
                }
            })
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::debug!(
            root = %self.root.display(),
            count = files.len(),
            "Discovered source files"
        );

        Ok(files)
    }

    /// Read all events from files that may hold activity at or after `since`.
    ///
    /// Empty files and files last modified before `since` cannot contain newer
    /// lines and are skipped without being opened. Events are neither deduplicated nor
    /// window-filtered here.
    pub fn read_since(&self, since: NaiveDateTime) -> Result<ReadResult> {
        let mut result = ReadResult::default();

        for file in self.discover_files()? {
            if file.size_bytes == 0 || file.modified_at.is_some_and(|m| m < since) {
                result.files_skipped += 1;
                continue;
            }

            let (events, stats) = read_file(&file.path);
            result.files_read += 1;
            result.bytes_read += file.size_bytes;
            result.stats.lines += stats.lines;
            result.stats.accepted += stats.accepted;
            result.stats.malformed += stats.malformed;
            result.stats.missing_timestamp += stats.missing_timestamp;
            result.stats.missing_usage += stats.missing_usage;
            result.events.extend(events);
        }

        tracing::info!(
            files_read = result.files_read,
            files_skipped = result.files_skipped,
            bytes_read = result.bytes_read,
            events = result.events.len(),
            rejected_lines = result.stats.rejected(),
            "Read session logs"
        );

        Ok(result)
    }
}
