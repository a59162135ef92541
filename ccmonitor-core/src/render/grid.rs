use super::axis::{time_axis, TimeAxis};
use super::density::{density_row, DensityTier};
use crate::types::{ProjectTimeline, TimeWindow};
use serde::Serialize;

/// Prefix marking a thread row under its parent.
pub const THREAD_PREFIX: &str = " └─";

/// One rendered timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub display_name: String,
    pub parent_display_name: Option<String>,
    pub cells: Vec<DensityTier>,
    pub events: usize,
    pub active_minutes: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl GridRow {
    fn from_timeline(timeline: &ProjectTimeline, window: &TimeWindow, width: usize) -> Self {
        Self {
            display_name: timeline.display_name.clone(),
            parent_display_name: timeline.parent_display_name.clone(),
            cells: density_row(timeline, window, width),
            events: timeline.event_count(),
            active_minutes: timeline.active_minutes,
            input_tokens: timeline.total_input_tokens,
            output_tokens: timeline.total_output_tokens,
        }
    }

    /// Row label, indented with a tree marker for threads.
    pub fn label(&self) -> String {
        if self.parent_display_name.is_some() {
            format!("{}{}", THREAD_PREFIX, self.display_name)
        } else {
            self.display_name.clone()
        }
    }
}

/// Density rows plus the shared axis for one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineGrid {
    pub window: TimeWindow,
    pub width: usize,
    pub rows: Vec<GridRow>,
    pub axis: TimeAxis,
}

impl TimelineGrid {
    /// Lay out `timelines` (already ordered) over `width` columns.
    pub fn build(
        timelines: &[ProjectTimeline],
        window: &TimeWindow,
        width: usize,
        label_gap: usize,
    ) -> Self {
        Self {
            window: *window,
            width,
            rows: timelines
                .iter()
                .map(|t| GridRow::from_timeline(t, window, width))
                .collect(),
            axis: time_axis(window, width, label_gap),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
