use chrono::{Duration, Local};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const NO_DATA: &str = "No Claude sessions found in the specified time range";

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
    logs_dir: PathBuf,
    repo: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");
        let logs_dir = base.join("projects");
        let repo = base.join("checkout");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");
        fs::create_dir_all(&logs_dir).expect("failed to create logs dir");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
            logs_dir,
            repo,
        }
    }

    fn logs_arg(&self) -> String {
        self.logs_dir.to_string_lossy().into_owned()
    }

    fn write_config(&self, content: &str) {
        let dir = self.xdg_config.join("ccmonitor");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), content).expect("failed to write config");
    }
}

/// A git checkout with a remote, plus a session that touched its root and a
/// nested package a few minutes ago.
fn seed_recent_sessions(env: &CliTestEnv) {
    let git_dir = env.repo.join(".git");
    fs::create_dir_all(&git_dir).expect("failed to create .git");
    fs::write(
        git_dir.join("config"),
        "[remote \"origin\"]\n\turl = git@github.com:me/proj.git\n",
    )
    .expect("failed to write git config");
    let nested = env.repo.join("packages/api");
    fs::create_dir_all(&nested).expect("failed to create nested dir");

    let now = Local::now().naive_local();
    let records = [
        (&env.repo, 20, "msg_a", "req_a"),
        (&env.repo, 18, "msg_b", "req_b"),
        (&nested, 10, "msg_c", "req_c"),
    ];
    let lines: Vec<String> = records
        .iter()
        .map(|(cwd, minutes_ago, msg, req)| {
            let ts = (now - Duration::minutes(*minutes_ago))
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string();
            serde_json::json!({
                "type": "assistant",
                "timestamp": ts,
                "cwd": cwd.to_string_lossy(),
                "sessionId": "sess-cli",
                "requestId": req,
                "message": {
                    "id": msg,
                    "role": "assistant",
                    "content": [{"type": "text", "text": "done"}],
                    "usage": {"input_tokens": 100, "output_tokens": 50}
                }
            })
            .to_string()
        })
        .collect();

    let session_dir = env.logs_dir.join("-checkout");
    fs::create_dir_all(&session_dir).expect("failed to create session dir");
    fs::write(session_dir.join("sess-cli.jsonl"), lines.join("\n") + "\n")
        .expect("failed to write session");
}

fn run_bin(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("ccmonitor"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("NO_COLOR")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute ccmonitor: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "ccmonitor {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

fn stdout_of(env: &CliTestEnv, args: &[&str]) -> String {
    let output = run_bin(env, args);
    assert_success(args, &output);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn log_file_exists(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .any(|e| e.file_name().to_string_lossy().starts_with("ccmonitor.log"))
        })
        .unwrap_or(false)
}

#[test]
fn empty_logs_dir_reports_no_sessions() {
    let env = CliTestEnv::new();
    let logs = env.logs_arg();

    let stdout = stdout_of(&env, &["--logs-dir", &logs, "--plain"]);
    assert!(stdout.starts_with("Claude Project Timeline |"), "got:\n{stdout}");
    assert!(stdout.contains("| 0 projects"));
    assert!(stdout.contains(NO_DATA));
    assert!(log_file_exists(&env.xdg_state.join("ccmonitor")));
}

#[test]
fn recent_sessions_print_repository_row_and_summary() {
    let env = CliTestEnv::new();
    seed_recent_sessions(&env);
    let logs = env.logs_arg();
    let args = ["--logs-dir", logs.as_str(), "-H", "2", "--plain", "--width", "40"];

    let stdout = stdout_of(&env, &args);
    assert!(stdout.contains("| 1 project"), "got:\n{stdout}");
    assert!(stdout.contains("\nproj "));
    assert!(!stdout.contains(" └─"));
    assert!(stdout.contains("Summary Statistics:"));
    assert!(stdout.contains("  • Total Projects: 1"));
    assert!(stdout.contains("  • Total Events: 3"));
    assert!(!stdout.contains('\u{1b}'), "plain output must not carry ANSI codes");
}

#[test]
fn threads_flag_splits_nested_directory() {
    let env = CliTestEnv::new();
    seed_recent_sessions(&env);
    let logs = env.logs_arg();

    for flag in ["-t", "--worktree"] {
        let args = ["--logs-dir", logs.as_str(), "-H", "2", "--plain", "--width", "40", flag];
        let stdout = stdout_of(&env, &args);
        assert!(stdout.contains("\nproj "), "got:\n{stdout}");
        assert!(stdout.contains(" └─packages-api"), "got:\n{stdout}");
        assert!(stdout.contains("| 2 projects"));
    }
}

#[test]
fn json_output_lists_timelines() {
    let env = CliTestEnv::new();
    seed_recent_sessions(&env);
    let logs = env.logs_arg();

    let stdout = stdout_of(&env, &["--logs-dir", &logs, "-H", "2", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be JSON");

    assert_eq!(value["mode"], "by_repository");
    assert_eq!(value["summary"]["projects"], 1);
    assert_eq!(value["summary"]["events"], 3);
    assert_eq!(value["summary"]["input_tokens"], 300);
    let timelines = value["timelines"].as_array().expect("timelines array");
    assert_eq!(timelines.len(), 1);
    assert_eq!(timelines[0]["display_name"], "proj");
    assert_eq!(timelines[0]["identity"], "repo:proj");
}

#[test]
fn project_filter_is_case_insensitive() {
    let env = CliTestEnv::new();
    seed_recent_sessions(&env);
    let logs = env.logs_arg();

    let stdout = stdout_of(&env, &["--logs-dir", &logs, "-H", "2", "--plain", "-p", "PRO"]);
    assert!(stdout.contains("\nproj "), "got:\n{stdout}");

    let stdout = stdout_of(&env, &["--logs-dir", &logs, "-H", "2", "--plain", "-p", "nomatch"]);
    assert!(stdout.contains(NO_DATA), "got:\n{stdout}");
}

#[test]
fn hour_and_day_windows_include_recent_sessions() {
    let env = CliTestEnv::new();
    seed_recent_sessions(&env);
    let logs = env.logs_arg();

    // The closest event is ten minutes old; a one-hour window still sees it.
    let stdout = stdout_of(&env, &["--logs-dir", &logs, "-H", "1", "--plain"]);
    assert!(stdout.contains("\nproj "));

    let days = stdout_of(&env, &["--logs-dir", &logs, "-d", "3", "--plain"]);
    assert!(days.contains("\nproj "));
}

#[test]
fn config_override_supplies_logs_dir() {
    let env = CliTestEnv::new();
    seed_recent_sessions(&env);
    env.write_config(&format!(
        "[paths]\nclaude_projects = {:?}\n",
        env.logs_dir.to_string_lossy()
    ));

    let stdout = stdout_of(&env, &["-H", "2", "--plain"]);
    assert!(stdout.contains("\nproj "), "got:\n{stdout}");
}

#[test]
fn invalid_config_fails_with_error_message() {
    let env = CliTestEnv::new();
    env.write_config("[timeline]\ndefault_days = 0\n");
    let logs = env.logs_arg();

    let output = run_bin(&env, &["--logs-dir", &logs]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error:"), "got:\n{stderr}");
    assert!(stderr.contains("default_days"));
}

#[test]
fn zero_hours_is_rejected() {
    let env = CliTestEnv::new();
    let logs = env.logs_arg();

    let output = run_bin(&env, &["--logs-dir", &logs, "-H", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--hours"));
}
