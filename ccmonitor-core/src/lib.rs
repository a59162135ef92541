//! # ccmonitor-core
//!
//! Core library for ccmonitor - a timeline of AI coding assistant activity
//! reconstructed from local JSONL session logs.
//!
//! This library provides:
//! - Domain types for events and per-project timelines
//! - A strict JSONL log reader with deduplication
//! - Repository resolution from local git metadata
//! - Aggregation into project/thread timelines with active-time metrics
//! - Pure density-grid and time-axis computation for rendering
//! - Configuration management and logging infrastructure
//!
//! ## Pipeline
//!
//! Log Reader → Deduplicator → window filter → Aggregator (via [`git::RepoCache`])
//! → Timeline Renderer. None of the stages fail on bad input: malformed lines,
//! missing metadata and unreadable files simply contribute nothing.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ccmonitor_core::analytics::{load_timelines, TimelineQuery};
//! use ccmonitor_core::git::GitMetadataResolver;
//! use ccmonitor_core::ingest::LogSource;
//! use ccmonitor_core::{Config, GroupingMode, TimeWindow};
//!
//! let config = Config::load().expect("failed to load config");
//! let source = LogSource::new(config.claude_projects_path());
//! let query = TimelineQuery {
//!     window: TimeWindow::last_days(1, chrono::Local::now().naive_local()),
//!     mode: GroupingMode::ByRepository,
//!     project_filter: None,
//!     policy: config.timeline.activity_policy(),
//! };
//! let timelines = load_timelines(&source, &query, &GitMetadataResolver)
//!     .expect("failed to load timelines");
//! println!("{} projects", timelines.len());
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod git;
pub mod ingest;
pub mod logging;
pub mod render;
pub mod types;
