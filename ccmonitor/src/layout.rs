//! Column layout and text cells shared by the printed report and the TUI.

use ccmonitor_core::analytics::Summary;
use ccmonitor_core::format::{
    format_minutes, format_number, format_tokens, format_window_bound, truncate_label,
};
use ccmonitor_core::render::{AxisUnit, DensityTier, GridRow, THREAD_PREFIX};
use ccmonitor_core::{ProjectTimeline, TimeWindow};

/// Terminal width assumed when it cannot be queried.
pub const DEFAULT_TERMINAL_WIDTH: usize = 120;

const NAME_MIN: usize = 7;
const NAME_MAX: usize = 30;
const TIMELINE_MIN: usize = 10;
const EVENTS_WIDTH: usize = 7;
const ACTIVE_WIDTH: usize = 8;
const TOKENS_WIDTH: usize = 12;
/// Spaces between adjacent columns
const GAP: usize = 2;

pub const NO_DATA: &str = "No Claude sessions found in the specified time range";

/// Widths of the name and timeline columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub name: usize,
    pub timeline: usize,
}

impl Columns {
    /// Fit the table into `total` columns.
    ///
    /// The name column is as wide as the longest label within limits; the
    /// timeline takes what remains unless `timeline_override` fixes it.
    pub fn fit(
        total: usize,
        timelines: &[ProjectTimeline],
        timeline_override: Option<usize>,
    ) -> Self {
        let longest = timelines
            .iter()
            .map(|t| {
                let prefix = if t.is_thread() { THREAD_PREFIX.chars().count() } else { 0 };
                prefix + t.display_name.chars().count()
            })
            .max()
            .unwrap_or(0);
        let name = longest.clamp(NAME_MIN, NAME_MAX);

        let fixed = name + EVENTS_WIDTH + ACTIVE_WIDTH + 2 * TOKENS_WIDTH + 4 * GAP;
        let timeline = timeline_override
            .unwrap_or_else(|| total.saturating_sub(fixed + GAP).max(TIMELINE_MIN))
            .max(1);

        Self { name, timeline }
    }

    /// Padded label cell.
    pub fn name_cell(&self, label: &str) -> String {
        format!("{:<width$}", truncate_label(label, self.name), width = self.name)
    }

    /// Blank cell as wide as the name column plus its gap.
    pub fn indent(&self) -> String {
        " ".repeat(self.name + GAP)
    }

    pub fn gap() -> &'static str {
        "  "
    }

    /// Header text for the numeric columns, aligned with [`Columns::numbers`].
    pub fn numbers_header() -> String {
        format!(
            "{:>ew$}  {:>aw$}  {:>tw$}  {:>tw$}",
            "Events",
            "Active",
            "Input",
            "Output",
            ew = EVENTS_WIDTH,
            aw = ACTIVE_WIDTH,
            tw = TOKENS_WIDTH
        )
    }

    /// Right-aligned numeric cells of a row.
    pub fn numbers(row: &GridRow) -> String {
        format!(
            "{:>ew$}  {:>aw$}  {:>tw$}  {:>tw$}",
            format_number(row.events as u64),
            format_minutes(row.active_minutes),
            format_tokens(row.input_tokens),
            format_tokens(row.output_tokens),
            ew = EVENTS_WIDTH,
            aw = ACTIVE_WIDTH,
            tw = TOKENS_WIDTH
        )
    }
}

/// Label at the start of the timeline column header.
const TIMELINE_LABEL: &str = "Timeline ";

/// Header label and number of legend tiers that fit in a timeline column of
/// `width` cells. The label is cut first; legend tiers fill what remains.
pub fn timeline_legend(width: usize) -> (String, usize) {
    let label: String = TIMELINE_LABEL.chars().take(width).collect();
    let tiers = width
        .saturating_sub(label.chars().count())
        .min(DensityTier::ALL.len() - 1);
    (label, tiers)
}

/// `Claude Project Timeline | <start> - <end> (<unit>) | N projects`
pub fn title(window: &TimeWindow, unit: AxisUnit, project_count: usize) -> String {
    let include_date = window.start.date() != window.end.date();
    format!(
        "Claude Project Timeline | {} - {} ({}) | {} {}",
        format_window_bound(window.start, include_date),
        format_window_bound(window.end, include_date),
        unit.as_str(),
        project_count,
        if project_count == 1 { "project" } else { "projects" }
    )
}

/// Summary block lines below the table.
pub fn summary_lines(summary: &Summary) -> Vec<String> {
    let mut lines = vec![
        "Summary Statistics:".to_string(),
        format!("  • Total Projects: {}", summary.project_count),
        format!("  • Total Events: {}", format_number(summary.event_count as u64)),
        format!(
            "  • Total Active Time: {}",
            format_minutes(summary.active_minutes)
        ),
        format!(
            "  • Tokens: {} in / {} out",
            format_number(summary.input_tokens),
            format_number(summary.output_tokens)
        ),
    ];
    if let Some(top) = summary.most_active() {
        lines.push(format!(
            "  • Most Active: {} ({} events)",
            top.display_name,
            format_number(top.events as u64)
        ));
    }
    lines
}

/// Glyph for a tier when colour is unavailable.
pub fn plain_glyph(tier: DensityTier) -> char {
    match tier {
        DensityTier::Idle => '·',
        DensityTier::Low => '░',
        DensityTier::Medium => '▒',
        DensityTier::High => '▓',
        DensityTier::Peak => '█',
    }
}

/// Glyph drawn in every coloured cell.
pub const CELL_GLYPH: char = '■';

/// Cell colour per tier, dim gray through bright green.
pub fn tier_rgb(tier: DensityTier) -> (u8, u8, u8) {
    match tier {
        DensityTier::Idle => (60, 60, 60),
        DensityTier::Low => (0, 100, 0),
        DensityTier::Medium => (0, 140, 0),
        DensityTier::High => (0, 180, 0),
        DensityTier::Peak => (50, 205, 50),
    }
}
