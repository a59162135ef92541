//! Totals across a listing of timelines, for the summary footer and exports.

use crate::types::ProjectTimeline;
use serde::Serialize;

/// One row of the per-project table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub display_name: String,
    /// Set for thread rows
    pub parent: Option<String>,
    pub events: usize,
    pub active_minutes: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl From<&ProjectTimeline> for ProjectSummary {
    fn from(timeline: &ProjectTimeline) -> Self {
        Self {
            display_name: timeline.display_name.clone(),
            parent: timeline.parent_display_name.clone(),
            events: timeline.event_count(),
            active_minutes: timeline.active_minutes,
            input_tokens: timeline.total_input_tokens,
            output_tokens: timeline.total_output_tokens,
        }
    }
}

/// Aggregate statistics for a set of timelines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    // Totals
    /// Number of timelines (threads count individually)
    pub project_count: usize,
    pub event_count: usize,
    /// Sum of per-timeline active minutes
    pub active_minutes: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,

    /// Rows in listing order
    pub projects: Vec<ProjectSummary>,
}

impl Summary {
    pub fn from_timelines(timelines: &[ProjectTimeline]) -> Self {
        let projects: Vec<ProjectSummary> = timelines.iter().map(ProjectSummary::from).collect();

        Self {
            project_count: projects.len(),
            event_count: projects.iter().map(|p| p.events).sum(),
            active_minutes: projects.iter().map(|p| p.active_minutes).sum(),
            input_tokens: projects.iter().map(|p| p.input_tokens).sum(),
            output_tokens: projects.iter().map(|p| p.output_tokens).sum(),
            projects,
        }
    }

    /// The row with the most events; the earliest listed wins ties.
    pub fn most_active(&self) -> Option<&ProjectSummary> {
        self.projects
            .iter()
            .fold(None, |best: Option<&ProjectSummary>, p| match best {
                Some(b) if b.events >= p.events => Some(b),
                _ => Some(p),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.project_count == 0
    }
}
