//! UI rendering for watch mode.

use ccmonitor_core::render::{DensityTier, TimelineGrid};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::layout::{self, Columns, CELL_GLYPH};

/// Render the whole watch screen.
pub fn render(frame: &mut Frame, app: &App, plain: bool) {
    let area = frame.area();

    // Layout: title, table, summary, footer
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(4),
        Constraint::Length(7),
        Constraint::Length(1),
    ])
    .split(area);

    let columns = Columns::fit(
        area.width as usize,
        &app.snapshot.timelines,
        app.settings.timeline_width,
    );
    let grid = TimelineGrid::build(
        &app.snapshot.timelines,
        &app.snapshot.window,
        columns.timeline,
        app.settings.label_gap,
    );

    render_title(frame, app, &grid, chunks[0]);
    render_table(frame, app, &grid, &columns, plain, chunks[1]);
    render_summary(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

fn render_title(frame: &mut Frame, app: &App, grid: &TimelineGrid, area: Rect) {
    let title = layout::title(&app.snapshot.window, grid.axis.unit, grid.rows.len());
    let line = Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_table(
    frame: &mut Frame,
    app: &App,
    grid: &TimelineGrid,
    columns: &Columns,
    plain: bool,
    area: Rect,
) {
    if grid.is_empty() {
        let message = Paragraph::new(Line::from(Span::styled(
            layout::NO_DATA,
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(message, area);
        return;
    }

    let header_style = Style::default().add_modifier(Modifier::BOLD);
    let (label, tiers) = layout::timeline_legend(columns.timeline);
    let legend_len = label.chars().count() + tiers;
    let mut header = vec![
        Span::styled(columns.name_cell("Project"), header_style),
        Span::raw(Columns::gap()),
        Span::styled(label, header_style),
    ];
    header.extend(DensityTier::ALL[1..=tiers].iter().map(|t| cell_span(*t, plain)));
    header.push(Span::raw(" ".repeat(columns.timeline.saturating_sub(legend_len))));
    header.push(Span::raw(Columns::gap()));
    header.push(Span::styled(Columns::numbers_header(), header_style));

    // Header and axis take one line each
    let visible = (area.height as usize).saturating_sub(2);
    let start = app.scroll.min(grid.rows.len().saturating_sub(1));

    let mut lines = vec![Line::from(header)];
    for row in grid.rows.iter().skip(start).take(visible) {
        let name_style = if row.parent_display_name.is_some() {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        };
        let mut spans = vec![
            Span::styled(columns.name_cell(&row.label()), name_style),
            Span::raw(Columns::gap()),
        ];
        spans.extend(row.cells.iter().map(|t| cell_span(*t, plain)));
        spans.push(Span::raw(Columns::gap()));
        spans.push(Span::raw(Columns::numbers(row)));
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(vec![
        Span::raw(columns.indent()),
        Span::styled(grid.axis.render(), Style::default().fg(Color::DarkGray)),
    ]));

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = layout::summary_lines(&app.snapshot.summary)
        .into_iter()
        .map(Line::from)
        .collect();
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut footer_spans = vec![
        Span::styled(" t", Style::default().fg(Color::Yellow)),
        Span::raw(" threads  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" refresh  "),
        Span::styled("j/k", Style::default().fg(Color::Yellow)),
        Span::raw(" scroll  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit  "),
        Span::raw("│ "),
        Span::styled(
            format!("updated {}", app.snapshot.loaded_at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if let Some(error) = &app.last_error {
        footer_spans.push(Span::raw(" │ "));
        footer_spans.push(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(footer_spans)), area);
}

fn cell_span(tier: DensityTier, plain: bool) -> Span<'static> {
    if plain {
        Span::raw(layout::plain_glyph(tier).to_string())
    } else {
        Span::styled(CELL_GLYPH.to_string(), Style::default().fg(tier_color(tier)))
    }
}

fn tier_color(tier: DensityTier) -> Color {
    let (r, g, b) = layout::tier_rgb(tier);
    Color::Rgb(r, g, b)
}
