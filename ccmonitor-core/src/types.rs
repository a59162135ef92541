//! Core domain types for ccmonitor.
//!
//! All timestamps are local naive instants: log timestamps are converted to
//! the local zone at read time and the zone is dropped, so window arithmetic
//! and axis labels agree with the wall clock of the machine.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analytics::ActivityPolicy;

// ============================================
// Events
// ============================================

/// Who produced a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    User,
    Assistant,
    /// Anything else, including records with no role or type ("unknown").
    Other,
}

impl MessageType {
    /// Classify a role/type label from the log.
    pub fn from_label(label: &str) -> Self {
        match label {
            "user" => MessageType::User,
            "assistant" => MessageType::Assistant,
            _ => MessageType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::User => "user",
            MessageType::Assistant => "assistant",
            MessageType::Other => "other",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observed message/action, parsed from a single log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Local naive time of the event
    pub timestamp: NaiveDateTime,
    /// Source session grouping key (may be empty)
    pub session_id: String,
    /// Working directory at event time (may be empty)
    pub directory: String,
    pub message_type: MessageType,
    /// First 100 characters of textual content, newlines collapsed
    pub content_preview: String,
    /// Source-assigned identifier, not unique across files
    pub uuid: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_creation_tokens: u64,
    pub cache_read_tokens: u64,
    /// `message.id`, used only for deduplication
    pub message_id: Option<String>,
    /// Top-level `requestId`, used only for deduplication
    pub request_id: Option<String>,
}

impl Event {
    /// Composite identity `message_id:request_id`, present only when both parts are non-empty.
    pub fn dedup_key(&self) -> Option<String> {
        match (self.message_id.as_deref(), self.request_id.as_deref()) {
            (Some(message_id), Some(request_id))
                if !message_id.is_empty() && !request_id.is_empty() =>
            {
                Some(format!("{}:{}", message_id, request_id))
            }
            _ => None,
        }
    }
}

// ============================================
// Query parameters
// ============================================

/// How events are grouped into timelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingMode {
    /// One timeline per resolved repository (default).
    #[default]
    ByRepository,
    /// One timeline per working directory, linked to a parent repository ("threads").
    ByDirectory,
}

impl GroupingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingMode::ByRepository => "by_repository",
            GroupingMode::ByDirectory => "by_directory",
        }
    }
}

/// Inclusive `[start, end]` range of local naive instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Window spanning `start..=end`; the bounds are swapped if given in reverse.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// The `days` days leading up to `now`.
    pub fn last_days(days: u32, now: NaiveDateTime) -> Self {
        Self::new(now - Duration::days(i64::from(days)), now)
    }

    /// The `hours` hours leading up to `now`.
    pub fn last_hours(hours: u32, now: NaiveDateTime) -> Self {
        Self::new(now - Duration::hours(i64::from(hours)), now)
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

// ============================================
// Timelines
// ============================================

/// Aggregated activity for one project (or one thread directory) in a window.
///
/// Built once per aggregation run via [`ProjectTimeline::from_events`], which
/// guarantees a non-empty, time-ordered event list and consistent bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTimeline {
    /// `dir:<directory>` or `repo:<name>`
    pub identity: String,
    /// Representative path (first contributing directory)
    pub directory: String,
    pub display_name: String,
    /// Events ascending by timestamp
    pub events: Vec<Event>,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub active_minutes: u32,
    /// Display name of the parent repository when this is a thread
    pub parent_display_name: Option<String>,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
}

impl ProjectTimeline {
    /// Build a timeline from its events, computing all derived fields.
    ///
    /// Returns `None` when `events` is empty.
    pub fn from_events(
        identity: String,
        display_name: String,
        parent_display_name: Option<String>,
        mut events: Vec<Event>,
        policy: &ActivityPolicy,
    ) -> Option<Self> {
        // Stable sort keeps input order for equal timestamps
        events.sort_by_key(|e| e.timestamp);
        let first = events.first()?;
        let last = events.last()?;

        let directory = first.directory.clone();
        let window_start = first.timestamp;
        let window_end = last.timestamp;
        let active_minutes = policy.active_minutes(&events);
        let (total_input_tokens, total_output_tokens) = crate::analytics::token_totals(&events);

        Some(Self {
            identity,
            directory,
            display_name,
            events,
            window_start,
            window_end,
            active_minutes,
            parent_display_name,
            total_input_tokens,
            total_output_tokens,
        })
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Whether this timeline is a thread of another repository.
    pub fn is_thread(&self) -> bool {
        self.parent_display_name.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn event(ts: NaiveDateTime, dir: &str) -> Event {
        Event {
            timestamp: ts,
            session_id: "s1".to_string(),
            directory: dir.to_string(),
            message_type: MessageType::Assistant,
            content_preview: String::new(),
            uuid: String::new(),
            input_tokens: 10,
            output_tokens: 5,
            cache_creation_tokens: 100,
            cache_read_tokens: 200,
            message_id: Some("m".to_string()),
            request_id: Some("r".to_string()),
        }
    }

    #[test]
    fn test_message_type_from_label() {
        assert_eq!(MessageType::from_label("user"), MessageType::User);
        assert_eq!(MessageType::from_label("assistant"), MessageType::Assistant);
        assert_eq!(MessageType::from_label("unknown"), MessageType::Other);
        assert_eq!(MessageType::from_label("summary"), MessageType::Other);
    }

    #[test]
    fn test_dedup_key_requires_both_parts() {
        let mut e = event(at(9, 0, 0), "/a");
        assert_eq!(e.dedup_key().as_deref(), Some("m:r"));

        e.request_id = Some(String::new());
        assert_eq!(e.dedup_key(), None);

        e.request_id = Some("r".to_string());
        e.message_id = None;
        assert_eq!(e.dedup_key(), None);
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let window = TimeWindow::new(at(9, 0, 0), at(10, 0, 0));
        assert!(window.contains(at(9, 0, 0)));
        assert!(window.contains(at(10, 0, 0)));
        assert!(!window.contains(at(10, 0, 1)));
        assert!(!window.contains(at(8, 59, 59)));
    }

    #[test]
    fn test_window_new_orders_bounds() {
        let window = TimeWindow::new(at(10, 0, 0), at(9, 0, 0));
        assert_eq!(window.start, at(9, 0, 0));
        assert_eq!(window.end, at(10, 0, 0));
    }

    #[test]
    fn test_last_hours_and_days() {
        let now = at(12, 0, 0);
        assert_eq!(TimeWindow::last_hours(3, now).start, at(9, 0, 0));
        assert_eq!(TimeWindow::last_days(1, now).duration(), Duration::days(1));
    }

    #[test]
    fn test_timeline_from_events_sorts_and_bounds() {
        let events = vec![
            event(at(9, 2, 0), "/repo/b"),
            event(at(9, 0, 0), "/repo/a"),
        ];
        let timeline = ProjectTimeline::from_events(
            "repo:a".to_string(),
            "a".to_string(),
            None,
            events,
            &ActivityPolicy::default(),
        )
        .unwrap();

        assert_eq!(timeline.window_start, at(9, 0, 0));
        assert_eq!(timeline.window_end, at(9, 2, 0));
        assert_eq!(timeline.directory, "/repo/a");
        assert_eq!(timeline.total_input_tokens, 20);
        assert_eq!(timeline.total_output_tokens, 10);
        assert!(!timeline.is_thread());
    }

    #[test]
    fn test_timeline_from_no_events() {
        let timeline = ProjectTimeline::from_events(
            "repo:a".to_string(),
            "a".to_string(),
            None,
            Vec::new(),
            &ActivityPolicy::default(),
        );
        assert!(timeline.is_none());
    }
}
