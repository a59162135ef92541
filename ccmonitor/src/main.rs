//! ccmonitor - Timeline of Claude Code activity
//!
//! Reads Claude Code session logs and shows, per project, when work happened
//! in the selected window. Prints once by default; `--watch` keeps a live view
//! open in the terminal.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/ccmonitor/config.toml (~/.config/ccmonitor/config.toml)
//! - Logs: $XDG_STATE_HOME/ccmonitor/ccmonitor.log (~/.local/state/ccmonitor/ccmonitor.log)

mod app;
mod layout;
mod report;
mod ui;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use ccmonitor_core::{Config, GroupingMode};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use indicatif::{ProgressBar, ProgressStyle};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{App, LookBack, Settings};
use crate::report::{JsonReport, PrintOptions};

#[derive(Parser)]
#[command(name = "ccmonitor")]
#[command(about = "Timeline of Claude Code activity across your projects")]
#[command(version)]
struct Args {
    /// Days to look back (default from config, 1)
    #[arg(short, long)]
    days: Option<u32>,

    /// Hours to look back (overrides --days)
    #[arg(short = 'H', long)]
    hours: Option<u32>,

    /// Only show projects whose name contains this text (case-insensitive)
    #[arg(short, long)]
    project: Option<String>,

    /// One row per working directory, grouped under its repository
    #[arg(short, long, visible_alias = "worktree")]
    threads: bool,

    /// Timeline width in columns (default: fit the terminal)
    #[arg(long)]
    width: Option<usize>,

    /// Plain glyphs without colour
    #[arg(long)]
    plain: bool,

    /// Print the timelines as JSON
    #[arg(long, conflicts_with = "watch")]
    json: bool,

    /// Keep a live view open, refreshing periodically
    #[arg(short, long)]
    watch: bool,

    /// Seconds between refreshes in watch mode (default from config, 1)
    #[arg(long)]
    interval: Option<u64>,

    /// Claude Code projects directory (default: ~/.claude/projects)
    #[arg(long)]
    logs_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "ccmonitor failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging (to file, not stdout since stdout carries the report)
    let _log_guard =
        ccmonitor_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("ccmonitor starting");

    let settings = settings_from(&args, &config)?;
    let plain = args.plain || no_color_requested() || (!args.watch && !io::stdout().is_terminal());
    let mut app = App::new(settings);

    if args.watch {
        let interval =
            Duration::from_secs(args.interval.unwrap_or(config.monitor.interval_secs).max(1));
        return run_watch(&mut app, interval, plain);
    }

    let spinner = loading_spinner(args.json);
    let loaded = app.refresh();
    spinner.finish_and_clear();
    loaded?;

    if args.json {
        let json = serde_json::to_string_pretty(&JsonReport::new(&app.snapshot))
            .context("failed to serialize report")?;
        println!("{}", json);
    } else {
        let options = PrintOptions {
            plain,
            terminal_width: terminal_width(),
            timeline_width: app.settings.timeline_width,
            label_gap: app.settings.label_gap,
        };
        report::print(&app.snapshot, &options).context("failed to write report")?;
    }

    tracing::info!(
        timelines = app.snapshot.timelines.len(),
        events = app.snapshot.summary.event_count,
        "ccmonitor complete"
    );
    Ok(())
}

fn settings_from(args: &Args, config: &Config) -> Result<Settings> {
    let look_back = match (args.hours, args.days) {
        (Some(0), _) => bail!("--hours must be at least 1"),
        (Some(hours), _) => LookBack::Hours(hours),
        (None, Some(0)) => bail!("--days must be at least 1"),
        (None, Some(days)) => LookBack::Days(days),
        (None, None) => LookBack::Days(config.timeline.default_days),
    };
    if args.width == Some(0) {
        bail!("--width must be at least 1");
    }

    Ok(Settings {
        logs_dir: args
            .logs_dir
            .clone()
            .unwrap_or_else(|| config.claude_projects_path()),
        look_back,
        mode: if args.threads {
            GroupingMode::ByDirectory
        } else {
            GroupingMode::ByRepository
        },
        project_filter: args.project.clone().filter(|p| !p.is_empty()),
        policy: config.timeline.activity_policy(),
        label_gap: config.timeline.label_gap,
        timeline_width: args.width,
    })
}

fn no_color_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}

fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .ok()
        .filter(|w| *w > 0)
        .unwrap_or(layout::DEFAULT_TERMINAL_WIDTH)
}

/// Spinner on stderr while logs load; hidden for JSON output and non-TTY stderr.
fn loading_spinner(json: bool) -> ProgressBar {
    if json || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Loading Claude sessions...");
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Run watch mode until the user quits or the process is interrupted.
fn run_watch(app: &mut App, interval: Duration, plain: bool) -> Result<()> {
    // Set up signal handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    app.refresh_or_record();

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = watch_loop(&mut terminal, app, interval, plain, &running);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    tracing::info!("ccmonitor watch mode stopped");
    println!("Stopped monitoring Claude sessions. Goodbye!");

    result
}

fn watch_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    interval: Duration,
    plain: bool,
    running: &AtomicBool,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    loop {
        if last_refresh.elapsed() >= interval {
            app.refresh_or_record();
            last_refresh = Instant::now();
        }

        // Render
        terminal.draw(|frame| ui::render(frame, app, plain))?;

        // Handle events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Check if we should quit
        if app.should_quit || !running.load(Ordering::SeqCst) {
            break;
        }
    }

    Ok(())
}
