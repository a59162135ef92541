//! Timeline aggregation
//!
//! Groups events into [`ProjectTimeline`]s and derives their metrics.
//!
//! ## Pipeline
//!
//! ```text
//! LogSource::read_since ─► dedup ─► window filter ─► list_timelines ─► Vec<ProjectTimeline>
//!                                                        │
//!                                                        └─ RepoCache (one per call)
//! ```

mod grouping;
mod summary;

pub use summary::{ProjectSummary, Summary};

use crate::error::Result;
use crate::git::{RepoCache, RepositoryResolver};
use crate::ingest::{self, LogSource};
use crate::types::{Event, GroupingMode, ProjectTimeline, TimeWindow};

/// Rules turning event timestamps into active minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityPolicy {
    /// Gaps between consecutive events up to this many minutes count as active
    pub idle_threshold_minutes: f64,
    /// Credit for a timeline holding exactly one event
    pub single_event_minutes: u32,
}

/// Gaps of up to 3 minutes count as active, so two replies at 09:00 and 09:02
/// give 2 active minutes. A 1-minute threshold would count that pair as idle.
/// Override with `timeline.idle_threshold_minutes`.
impl Default for ActivityPolicy {
    fn default() -> Self {
        Self {
            idle_threshold_minutes: 3.0,
            single_event_minutes: 5,
        }
    }
}

impl ActivityPolicy {
    /// Active minutes of a time-ordered event list.
    ///
    /// Sums the fractional minutes of every gap no longer than the idle
    /// threshold and floors the total.
    pub fn active_minutes(&self, events: &[Event]) -> u32 {
        match events.len() {
            0 => 0,
            1 => self.single_event_minutes,
            _ => {
                let total: f64 = events
                    .windows(2)
                    .map(|pair| {
                        let gap = pair[1].timestamp - pair[0].timestamp;
                        gap.num_milliseconds() as f64 / 60_000.0
                    })
                    .filter(|minutes| *minutes <= self.idle_threshold_minutes)
                    .sum();
                total.max(0.0).floor() as u32
            }
        }
    }
}

/// Sum of input and output tokens. Cache tokens are not included.
pub fn token_totals(events: &[Event]) -> (u64, u64) {
    events.iter().fold((0, 0), |(input, output), e| {
        (input + e.input_tokens, output + e.output_tokens)
    })
}

/// Parameters of one timeline listing.
#[derive(Debug, Clone)]
pub struct TimelineQuery {
    pub window: TimeWindow,
    pub mode: GroupingMode,
    /// Case-insensitive substring matched against display names
    pub project_filter: Option<String>,
    pub policy: ActivityPolicy,
}

impl TimelineQuery {
    pub fn new(window: TimeWindow, mode: GroupingMode) -> Self {
        Self {
            window,
            mode,
            project_filter: None,
            policy: ActivityPolicy::default(),
        }
    }

    fn matches(&self, timeline: &ProjectTimeline) -> bool {
        match self.project_filter.as_deref() {
            None | Some("") => true,
            Some(filter) => timeline
                .display_name
                .to_lowercase()
                .contains(&filter.to_lowercase()),
        }
    }
}

/// Group deduplicated, in-window events into ordered timelines.
///
/// Events outside `query.window` are ignored. The resolver is consulted
/// through a fresh [`RepoCache`], so each distinct directory is looked up at
/// most once per call.
pub fn list_timelines(
    events: Vec<Event>,
    query: &TimelineQuery,
    resolver: &dyn RepositoryResolver,
) -> Vec<ProjectTimeline> {
    let events: Vec<Event> = events
        .into_iter()
        .filter(|e| query.window.contains(e.timestamp))
        .collect();
    if events.is_empty() {
        return Vec::new();
    }

    let mut cache = RepoCache::new(resolver);
    let timelines = match query.mode {
        GroupingMode::ByRepository => grouping::by_repository(events, &mut cache, &query.policy),
        GroupingMode::ByDirectory => grouping::by_directory(events, &mut cache, &query.policy),
    };

    tracing::debug!(
        mode = query.mode.as_str(),
        timelines = timelines.len(),
        directories_resolved = cache.len(),
        "Aggregated timelines"
    );

    timelines.into_iter().filter(|t| query.matches(t)).collect()
}

/// Read, deduplicate, filter and aggregate everything under `source`.
pub fn load_timelines(
    source: &LogSource,
    query: &TimelineQuery,
    resolver: &dyn RepositoryResolver,
) -> Result<Vec<ProjectTimeline>> {
    let read = source.read_since(query.window.start)?;
    let events = ingest::dedup(read.events);
    Ok(list_timelines(events, query, resolver))
}
