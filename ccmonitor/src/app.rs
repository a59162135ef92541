//! Application state shared by the one-shot report and watch mode.

use anyhow::{Context, Result};
use ccmonitor_core::analytics::{load_timelines, ActivityPolicy, Summary, TimelineQuery};
use ccmonitor_core::format::format_home_path;
use ccmonitor_core::git::GitMetadataResolver;
use ccmonitor_core::ingest::LogSource;
use ccmonitor_core::{GroupingMode, ProjectTimeline, TimeWindow};
use chrono::{Local, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// How far back the window reaches from "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookBack {
    Days(u32),
    Hours(u32),
}

impl LookBack {
    pub fn window_ending(self, now: NaiveDateTime) -> TimeWindow {
        match self {
            LookBack::Days(days) => TimeWindow::last_days(days, now),
            LookBack::Hours(hours) => TimeWindow::last_hours(hours, now),
        }
    }
}

/// Everything needed to (re)load timelines.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logs_dir: std::path::PathBuf,
    pub look_back: LookBack,
    pub mode: GroupingMode,
    pub project_filter: Option<String>,
    pub policy: ActivityPolicy,
    /// Blank columns between axis labels
    pub label_gap: usize,
    /// Fixed timeline column count instead of fitting the terminal
    pub timeline_width: Option<usize>,
}

/// Result of one load.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub window: TimeWindow,
    pub mode: GroupingMode,
    pub timelines: Vec<ProjectTimeline>,
    pub summary: Summary,
    pub loaded_at: NaiveDateTime,
}

impl Snapshot {
    fn empty(window: TimeWindow, mode: GroupingMode) -> Self {
        Self {
            window,
            mode,
            timelines: Vec::new(),
            summary: Summary::default(),
            loaded_at: window.end,
        }
    }
}

pub struct App {
    pub settings: Settings,
    source: LogSource,
    pub snapshot: Snapshot,
    /// Last refresh failure, shown in the status line until the next success
    pub last_error: Option<String>,
    /// First visible row in watch mode
    pub scroll: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let source = LogSource::new(settings.logs_dir.clone());
        let window = settings.look_back.window_ending(Local::now().naive_local());
        let snapshot = Snapshot::empty(window, settings.mode);
        Self {
            settings,
            source,
            snapshot,
            last_error: None,
            scroll: 0,
            should_quit: false,
        }
    }

    /// Reload everything with the window ending now.
    pub fn refresh(&mut self) -> Result<()> {
        self.refresh_at(Local::now().naive_local())
    }

    pub fn refresh_at(&mut self, now: NaiveDateTime) -> Result<()> {
        let query = TimelineQuery {
            window: self.settings.look_back.window_ending(now),
            mode: self.settings.mode,
            project_filter: self.settings.project_filter.clone(),
            policy: self.settings.policy,
        };

        let timelines = load_timelines(&self.source, &query, &GitMetadataResolver)
            .with_context(|| {
                format!(
                    "failed to read logs under {}",
                    format_home_path(&self.source.root().to_string_lossy())
                )
            })?;

        tracing::debug!(timelines = timelines.len(), "Refreshed timelines");

        self.snapshot = Snapshot {
            window: query.window,
            mode: query.mode,
            summary: Summary::from_timelines(&timelines),
            timelines,
            loaded_at: now,
        };
        self.scroll = self.scroll.min(self.snapshot.timelines.len().saturating_sub(1));
        Ok(())
    }

    /// Refresh for watch mode: failures are kept for display instead of aborting.
    pub fn refresh_or_record(&mut self) {
        match self.refresh() {
            Ok(()) => self.last_error = None,
            Err(e) => {
                tracing::warn!(error = %e, "Refresh failed");
                self.last_error = Some(format!("{:#}", e));
            }
        }
    }

    /// Handle keyboard input in watch mode.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('t') => {
                self.settings.mode = match self.settings.mode {
                    GroupingMode::ByRepository => GroupingMode::ByDirectory,
                    GroupingMode::ByDirectory => GroupingMode::ByRepository,
                };
                self.scroll = 0;
                self.refresh_or_record();
            }
            KeyCode::Char('r') => {
                self.refresh_or_record();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.scroll + 1 < self.snapshot.timelines.len() {
                    self.scroll += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.scroll = 0;
            }
            _ => {}
        }
    }
}
