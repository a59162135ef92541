//! Claude Code JSONL reader
//!
//! Reads session logs from `~/.claude/projects/[encoded-path]/*.jsonl`, one
//! JSON object per line, into [`Event`]s.
//!
//! # Strict mode
//!
//! A line contributes an event only if all of the following hold:
//!
//! - it decodes as a JSON object with the expected field types,
//! - it carries a parseable `timestamp`,
//! - its `message.usage` block has both `input_tokens` and `output_tokens`.
//!
//! Everything else (user prompts, summaries, snapshots, truncated lines) is
//! skipped silently and only counted in [`ReadStats`]. Token totals downstream
//! depend on this exact rule.

use crate::types::{Event, MessageType};
use chrono::{DateTime, Local, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// Characters kept in [`Event::content_preview`] before truncation.
pub const PREVIEW_CHARS: usize = 100;

// ============================================
// Raw JSONL record types (serde deserialization)
// ============================================

/// A single line from a Claude Code JSONL file.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawRecord {
    timestamp: Option<String>,
    session_id: Option<String>,
    cwd: Option<String>,
    uuid: Option<String>,
    request_id: Option<String>,
    #[serde(rename = "type")]
    record_type: Option<String>,
    message: Option<RawMessage>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawMessage {
    id: Option<String>,
    role: Option<String>,
    content: Option<serde_json::Value>,
    usage: Option<RawUsage>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawUsage {
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
    cache_creation_input_tokens: Option<u64>,
    cache_read_input_tokens: Option<u64>,
}

/// Why a line did not produce an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Not valid JSON, or fields of the wrong type
    Malformed,
    /// `timestamp` absent or unparseable
    NoTimestamp,
    /// No usage block, or one without input/output token counts
    NoUsage,
}

/// Per-file line accounting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    /// Non-blank lines seen
    pub lines: usize,
    /// Lines that produced an event
    pub accepted: usize,
    pub malformed: usize,
    pub missing_timestamp: usize,
    pub missing_usage: usize,
}

impl ReadStats {
    pub fn rejected(&self) -> usize {
        self.malformed + self.missing_timestamp + self.missing_usage
    }

    fn record(&mut self, outcome: &std::result::Result<Event, Rejection>) {
        self.lines += 1;
        match outcome {
            Ok(_) => self.accepted += 1,
            Err(Rejection::Malformed) => self.malformed += 1,
            Err(Rejection::NoTimestamp) => self.missing_timestamp += 1,
            Err(Rejection::NoUsage) => self.missing_usage += 1,
        }
    }
}

/// Read every event from one JSONL file.
///
/// Open or read failures (missing file, permission denied) yield whatever was
/// read so far, usually nothing. Never returns an error.
pub fn read_file(path: &Path) -> (Vec<Event>, ReadStats) {
    let mut events = Vec::new();
    let mut stats = ReadStats::default();

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable log file");
            return (events, stats);
        }
    };

    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(l) => l,
            // Invalid UTF-8 affects only this line
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                stats.lines += 1;
                stats.malformed += 1;
                continue;
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Stopped reading log file");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let outcome = parse_line(&line);
        stats.record(&outcome);
        if let Ok(event) = outcome {
            events.push(event);
        }
    }

    tracing::debug!(
        path = %path.display(),
        accepted = stats.accepted,
        rejected = stats.rejected(),
        "Read log file"
    );

    (events, stats)
}

/// Parse one log line into an event.
pub fn parse_line(line: &str) -> std::result::Result<Event, Rejection> {
    let record: RawRecord = serde_json::from_str(line.trim()).map_err(|_| Rejection::Malformed)?;

    let timestamp = record
        .timestamp
        .as_deref()
        .and_then(parse_timestamp)
        .ok_or(Rejection::NoTimestamp)?;

    let message = record.message.unwrap_or_default();
    let usage = message.usage.as_ref().ok_or(Rejection::NoUsage)?;
    let (input_tokens, output_tokens) = match (usage.input_tokens, usage.output_tokens) {
        (Some(input), Some(output)) => (input, output),
        _ => return Err(Rejection::NoUsage),
    };

    let label = message
        .role
        .as_deref()
        .or(record.record_type.as_deref())
        .unwrap_or("unknown");

    Ok(Event {
        timestamp,
        session_id: record.session_id.unwrap_or_default(),
        directory: record.cwd.unwrap_or_default(),
        message_type: MessageType::from_label(label),
        content_preview: content_preview(message.content.as_ref()),
        uuid: record.uuid.unwrap_or_default(),
        input_tokens,
        output_tokens,
        cache_creation_tokens: usage.cache_creation_input_tokens.unwrap_or(0),
        cache_read_tokens: usage.cache_read_input_tokens.unwrap_or(0),
        message_id: message.id,
        request_id: record.request_id,
    })
}

/// Parse an ISO-8601 timestamp into local naive time.
///
/// Values with an offset (including `Z`) are converted to the local zone;
/// values without one are taken to be local already.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Textual preview of message content.
fn content_preview(content: Option<&serde_json::Value>) -> String {
    let text = match content {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(parts)) => parts
            .iter()
            .filter(|part| part.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join(" "),
        Some(other) => other.to_string(),
    };
    truncate_preview(&text)
}

fn truncate_preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().nth(PREVIEW_CHARS).is_some() {
        preview.push_str("...");
    }
    preview.replace(['\n', '\r'], " ")
}
