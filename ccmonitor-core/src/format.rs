//! Formatting helpers shared by the report printer and the TUI.

use chrono::NaiveDateTime;

/// Format an integer with thousands separators (e.g., "1,234,567").
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Token count for table cells: "-" for zero, otherwise [`format_number`].
pub fn format_tokens(n: u64) -> String {
    if n == 0 {
        "-".to_string()
    } else {
        format_number(n)
    }
}

/// Format active minutes in human-readable form ("45m", "2h 5m").
pub fn format_minutes(minutes: u32) -> String {
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        let hours = minutes / 60;
        let mins = minutes % 60;
        if mins > 0 {
            format!("{}h {}m", hours, mins)
        } else {
            format!("{}h", hours)
        }
    }
}

/// Window bounds for headers: time only within a day, date and time otherwise.
pub fn format_window_bound(ts: NaiveDateTime, include_date: bool) -> String {
    if include_date {
        ts.format("%Y-%m-%d %H:%M").to_string()
    } else {
        ts.format("%H:%M").to_string()
    }
}

/// Truncate to at most `max_chars` characters, ending with "…" when cut.
pub fn truncate_label(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/// Replace a leading `$HOME` with `~`.
pub fn format_home_path(path: &str) -> String {
    let home = std::env::var("HOME").unwrap_or_default();
    match path.strip_prefix(home.as_str()) {
        Some(rest) if !home.is_empty() && (rest.is_empty() || rest.starts_with('/')) => {
            format!("~{}", rest)
        }
        _ => path.to_string(),
    }
}
