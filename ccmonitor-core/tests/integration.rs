//! Integration tests for the ccmonitor pipeline
//!
//! These tests use fixture files in `tests/fixtures/claude-code/` and
//! temporary log trees to verify reading, deduplication, grouping and the
//! rendering model end to end.

use ccmonitor_core::analytics::{list_timelines, load_timelines, Summary, TimelineQuery};
use ccmonitor_core::git::{GitMetadataResolver, RepositoryResolver};
use ccmonitor_core::ingest::{dedup, read_file, LogSource};
use ccmonitor_core::render::{DensityTier, TimelineGrid};
use ccmonitor_core::{GroupingMode, MessageType, TimeWindow};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get the path to a fixture file
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/claude-code")
        .join(name)
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn whole_day() -> TimeWindow {
    TimeWindow::new(at(0, 0), at(23, 59))
}

/// Resolver that knows nothing, so every name comes from paths.
struct NoRepositories;

impl RepositoryResolver for NoRepositories {
    fn resolve(&self, _directory: &Path) -> Option<String> {
        None
    }
}

/// Resolver treating `/work/webapp` as a checkout of `webapp-repo`.
struct WebappRepository;

impl RepositoryResolver for WebappRepository {
    fn resolve(&self, directory: &Path) -> Option<String> {
        (directory == Path::new("/work/webapp")).then(|| "webapp-repo".to_string())
    }
}

fn fixture_events() -> Vec<ccmonitor_core::Event> {
    ccmonitor_core::logging::init_test();
    let source = LogSource::new(fixture_path(""));
    let read = source.read_since(at(0, 0)).expect("read should succeed");
    dedup(read.events)
}

// ============================================
// Reading
// ============================================

#[test]
fn test_read_minimal_session() {
    let (events, stats) = read_file(&fixture_path("minimal-session.jsonl"));

    // Only the two assistant messages with complete usage survive
    assert_eq!(events.len(), 2);
    assert_eq!(stats.lines, 7);
    assert_eq!(stats.accepted, 2);
    assert_eq!(stats.missing_timestamp, 1);
    assert_eq!(stats.missing_usage, 3);
    assert_eq!(stats.malformed, 1);

    let first = &events[0];
    assert_eq!(first.timestamp, at(9, 0));
    assert_eq!(first.session_id, "sess-001");
    assert_eq!(first.directory, "/work/webapp");
    assert_eq!(first.message_type, MessageType::Assistant);
    assert_eq!(first.content_preview, "Looking at the router.");
    assert_eq!(first.cache_creation_tokens, 1200);
    assert_eq!(first.cache_read_tokens, 800);

    assert_eq!(
        events[1].content_preview,
        "The guard runs twice. Remove the second call."
    );
}

#[test]
fn test_cross_file_duplicates_collapse() {
    let events = fixture_events();

    let ids: Vec<_> = events
        .iter()
        .map(|e| e.message_id.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(ids, vec!["msg_01", "msg_02", "msg_10"]);

    // The first occurrence (minimal-session.jsonl sorts first) is kept
    assert_eq!(events[0].session_id, "sess-001");
}

// ============================================
// Aggregation
// ============================================

#[test]
fn test_by_repository_from_paths() {
    let query = TimelineQuery::new(whole_day(), GroupingMode::ByRepository);
    let timelines = list_timelines(fixture_events(), &query, &NoRepositories);

    assert_eq!(timelines.len(), 2);

    let webapp = &timelines[0];
    assert_eq!(webapp.display_name, "webapp");
    assert_eq!(webapp.identity, "repo:webapp");
    assert_eq!(webapp.event_count(), 2);
    assert_eq!(webapp.active_minutes, 2);
    assert_eq!(webapp.total_input_tokens, 20);
    assert_eq!(webapp.total_output_tokens, 10);
    assert_eq!(webapp.window_start, at(9, 0));
    assert_eq!(webapp.window_end, at(9, 2));

    let api = &timelines[1];
    assert_eq!(api.display_name, "api");
    assert_eq!(api.event_count(), 1);
    assert_eq!(api.active_minutes, 5);
}

#[test]
fn test_subdirectory_joins_resolved_repository() {
    let query = TimelineQuery::new(whole_day(), GroupingMode::ByRepository);
    let timelines = list_timelines(fixture_events(), &query, &WebappRepository);

    assert_eq!(timelines.len(), 1);
    assert_eq!(timelines[0].display_name, "webapp-repo");
    assert_eq!(timelines[0].directory, "/work/webapp");
    assert_eq!(timelines[0].event_count(), 3);
    assert_eq!(timelines[0].total_input_tokens, 60);
}

#[test]
fn test_by_directory_threads() {
    let query = TimelineQuery::new(whole_day(), GroupingMode::ByDirectory);
    let timelines = list_timelines(fixture_events(), &query, &WebappRepository);

    assert_eq!(timelines.len(), 2);
    assert_eq!(timelines[0].identity, "dir:/work/webapp");
    assert_eq!(timelines[0].display_name, "webapp-repo");
    assert!(timelines[0].parent_display_name.is_none());

    assert_eq!(timelines[1].identity, "dir:/work/webapp/packages/api");
    assert_eq!(timelines[1].display_name, "packages-api");
    assert_eq!(
        timelines[1].parent_display_name.as_deref(),
        Some("webapp-repo")
    );
}

#[test]
fn test_window_is_applied_after_dedup() {
    let query = TimelineQuery::new(
        TimeWindow::new(at(9, 5), at(10, 0)),
        GroupingMode::ByRepository,
    );
    let timelines = list_timelines(fixture_events(), &query, &NoRepositories);

    assert_eq!(timelines.len(), 1);
    assert_eq!(timelines[0].display_name, "api");
}

#[test]
fn test_summary_over_fixture() {
    let query = TimelineQuery::new(whole_day(), GroupingMode::ByRepository);
    let timelines = list_timelines(fixture_events(), &query, &NoRepositories);
    let summary = Summary::from_timelines(&timelines);

    assert_eq!(summary.project_count, 2);
    assert_eq!(summary.event_count, 3);
    assert_eq!(summary.active_minutes, 7);
    assert_eq!(summary.input_tokens, 60);
    assert_eq!(summary.output_tokens, 30);
    assert_eq!(summary.most_active().unwrap().display_name, "webapp");
}

// ============================================
// Full pipeline over a temporary log tree
// ============================================

/// Lay out `~/.claude/projects/<encoded>/session.jsonl` with events in `cwd`.
fn write_log(root: &Path, encoded: &str, cwd: &Path, lines: &[(&str, &str, &str)]) {
    let dir = root.join(encoded);
    fs::create_dir_all(&dir).unwrap();
    let body: String = lines
        .iter()
        .map(|(ts, message_id, request_id)| {
            format!(
                r#"{{"timestamp":"{}","sessionId":"s","cwd":"{}","requestId":"{}","type":"assistant","message":{{"id":"{}","role":"assistant","content":"ok","usage":{{"input_tokens":10,"output_tokens":5}}}}}}"#,
                ts,
                cwd.display(),
                request_id,
                message_id
            ) + "\n"
        })
        .collect();
    fs::write(dir.join("session.jsonl"), body).unwrap();
}

#[test]
fn test_usage_less_line_leaves_single_event_credit() {
    let temp = TempDir::new().unwrap();
    let logs = temp.path().join("projects");
    write_log(
        &logs,
        "-repo-a",
        Path::new("/repo/a"),
        &[
            ("2025-03-14T09:00:00", "m1", "r1"),
            ("2025-03-14T09:02:00", "m2", "r2"),
        ],
    );

    // Strip the usage block from the second line.
    let session = logs.join("-repo-a/session.jsonl");
    let content = fs::read_to_string(&session).unwrap();
    let lines: Vec<String> = content
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 1 {
                line.replace(r#","usage":{"input_tokens":10,"output_tokens":5}"#, "")
            } else {
                line.to_string()
            }
        })
        .collect();
    assert!(!lines[1].contains("usage"));
    fs::write(&session, lines.join("\n") + "\n").unwrap();

    let read = LogSource::new(&logs).read_since(at(0, 0)).unwrap();
    assert_eq!(read.events.len(), 1);
    assert_eq!(read.stats.missing_usage, 1);

    let query = TimelineQuery::new(whole_day(), GroupingMode::ByRepository);
    let timelines = list_timelines(dedup(read.events), &query, &NoRepositories);

    assert_eq!(timelines.len(), 1);
    assert_eq!(timelines[0].display_name, "a");
    assert_eq!(timelines[0].event_count(), 1);
    assert_eq!(timelines[0].active_minutes, 5);
}

#[test]
fn test_load_timelines_resolves_git_remote() {
    let temp = TempDir::new().unwrap();
    let repo = temp.path().join("checkouts/my-local-dir");
    fs::create_dir_all(repo.join(".git")).unwrap();
    fs::write(
        repo.join(".git/config"),
        "[remote \"origin\"]\n\turl = git@github.com:me/proj.git\n",
    )
    .unwrap();

    let logs = temp.path().join("projects");
    write_log(
        &logs,
        "-checkouts-my-local-dir",
        &repo,
        &[
            ("2025-03-14T09:00:00", "m1", "r1"),
            ("2025-03-14T09:02:00", "m2", "r2"),
        ],
    );

    let query = TimelineQuery::new(whole_day(), GroupingMode::ByRepository);
    let timelines =
        load_timelines(&LogSource::new(&logs), &query, &GitMetadataResolver).unwrap();

    assert_eq!(timelines.len(), 1);
    assert_eq!(timelines[0].display_name, "proj");
    assert_eq!(timelines[0].active_minutes, 2);
    assert_eq!(timelines[0].total_input_tokens, 20);
    assert_eq!(timelines[0].total_output_tokens, 10);
}

#[test]
fn test_load_timelines_missing_root_is_empty() {
    let temp = TempDir::new().unwrap();
    let query = TimelineQuery::new(whole_day(), GroupingMode::ByRepository);
    let timelines = load_timelines(
        &LogSource::new(temp.path().join("absent")),
        &query,
        &GitMetadataResolver,
    )
    .unwrap();
    assert!(timelines.is_empty());
}

#[test]
fn test_grid_from_loaded_timelines() {
    let query = TimelineQuery::new(
        TimeWindow::new(at(9, 0), at(10, 0)),
        GroupingMode::ByRepository,
    );
    let timelines = list_timelines(fixture_events(), &query, &NoRepositories);
    let grid = TimelineGrid::build(&timelines, &query.window, 60, 1);

    assert_eq!(grid.rows.len(), 2);
    // webapp: 09:00 and 09:02 land in columns 0 and 2
    assert_eq!(grid.rows[0].cells[0], DensityTier::Peak);
    assert_eq!(grid.rows[0].cells[1], DensityTier::Idle);
    assert_eq!(grid.rows[0].cells[2], DensityTier::Peak);
    // api: 09:10 lands in column 10
    assert_eq!(grid.rows[1].cells[10], DensityTier::Peak);
    assert_eq!(grid.axis.render().chars().count(), 60);
    assert_eq!(grid.axis.ticks[0].label, "09:00");
}
