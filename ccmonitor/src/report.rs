//! One-shot output: the printed timeline table and the JSON export.

use crate::app::Snapshot;
use crate::layout::{self, Columns, CELL_GLYPH};
use ccmonitor_core::render::{DensityTier, GridRow, TimelineGrid};
use ccmonitor_core::{GroupingMode, ProjectTimeline};
use chrono::NaiveDateTime;
use crossterm::style::{Color, Stylize};
use serde::Serialize;
use std::io::{self, Write};

/// How the table is drawn.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
    /// Glyph-only cells without ANSI colour
    pub plain: bool,
    pub terminal_width: usize,
    pub timeline_width: Option<usize>,
    pub label_gap: usize,
}

/// Render the snapshot as text lines (without trailing newlines).
pub fn render_lines(snapshot: &Snapshot, options: &PrintOptions) -> Vec<String> {
    let columns = Columns::fit(
        options.terminal_width,
        &snapshot.timelines,
        options.timeline_width,
    );
    let grid = TimelineGrid::build(
        &snapshot.timelines,
        &snapshot.window,
        columns.timeline,
        options.label_gap,
    );

    let mut lines = vec![
        layout::title(&snapshot.window, grid.axis.unit, grid.rows.len()),
        String::new(),
    ];

    if grid.is_empty() {
        lines.push(layout::NO_DATA.to_string());
        return lines;
    }

    lines.push(format!(
        "{}{}{}{}{}",
        columns.name_cell("Project"),
        Columns::gap(),
        timeline_header(columns.timeline, options.plain),
        Columns::gap(),
        Columns::numbers_header()
    ));

    for row in &grid.rows {
        lines.push(format!(
            "{}{}{}{}{}",
            columns.name_cell(&row.label()),
            Columns::gap(),
            cells(row, options.plain),
            Columns::gap(),
            Columns::numbers(row)
        ));
    }

    lines.push(format!("{}{}", columns.indent(), grid.axis.render()));
    lines.push(String::new());
    lines.extend(layout::summary_lines(&snapshot.summary));
    lines
}

/// Print the snapshot to stdout.
pub fn print(snapshot: &Snapshot, options: &PrintOptions) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in render_lines(snapshot, options) {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

/// "Timeline" plus a legend of the active tiers, cut or padded to the column width.
fn timeline_header(width: usize, plain: bool) -> String {
    let (label, tiers) = layout::timeline_legend(width);
    let used = label.chars().count() + tiers;
    let legend: String = DensityTier::ALL[1..=tiers]
        .iter()
        .map(|t| cell(*t, plain))
        .collect();
    format!("{}{}{}", label, legend, " ".repeat(width.saturating_sub(used)))
}

fn cells(row: &GridRow, plain: bool) -> String {
    row.cells.iter().map(|t| cell(*t, plain)).collect()
}

fn cell(tier: DensityTier, plain: bool) -> String {
    if plain {
        layout::plain_glyph(tier).to_string()
    } else {
        let (r, g, b) = layout::tier_rgb(tier);
        CELL_GLYPH.with(Color::Rgb { r, g, b }).to_string()
    }
}

// ============================================
// JSON export
// ============================================

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub mode: GroupingMode,
    pub summary: JsonSummary<'a>,
    pub timelines: Vec<JsonTimeline<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    pub projects: usize,
    pub events: usize,
    pub active_minutes: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub most_active: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct JsonTimeline<'a> {
    pub identity: &'a str,
    pub display_name: &'a str,
    pub parent: Option<&'a str>,
    pub directory: &'a str,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub events: usize,
    pub active_minutes: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl<'a> From<&'a ProjectTimeline> for JsonTimeline<'a> {
    fn from(t: &'a ProjectTimeline) -> Self {
        Self {
            identity: &t.identity,
            display_name: &t.display_name,
            parent: t.parent_display_name.as_deref(),
            directory: &t.directory,
            window_start: t.window_start,
            window_end: t.window_end,
            events: t.event_count(),
            active_minutes: t.active_minutes,
            input_tokens: t.total_input_tokens,
            output_tokens: t.total_output_tokens,
        }
    }
}

impl<'a> JsonReport<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        let summary = &snapshot.summary;
        Self {
            window_start: snapshot.window.start,
            window_end: snapshot.window.end,
            mode: snapshot.mode,
            summary: JsonSummary {
                projects: summary.project_count,
                events: summary.event_count,
                active_minutes: summary.active_minutes,
                input_tokens: summary.input_tokens,
                output_tokens: summary.output_tokens,
                most_active: summary.most_active().map(|p| p.display_name.as_str()),
            },
            timelines: snapshot.timelines.iter().map(JsonTimeline::from).collect(),
        }
    }
}
