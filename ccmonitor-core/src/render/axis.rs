//! Adaptive time axis.
//!
//! The unit follows the window length, the interval is the finest one whose
//! labels fit the available width, and ticks sit on natural boundaries
//! (quarter hours, midnight, the first of a month, ...).

use super::density::column_of;
use crate::types::TimeWindow;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

/// Upper bound on generated ticks per candidate interval.
const MAX_TICKS: usize = 10_000;

/// Granularity of axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisUnit {
    Minutes,
    Hours,
    Days,
    Months,
    Years,
}

impl AxisUnit {
    /// Unit appropriate for a window of length `duration`.
    pub fn for_duration(duration: Duration) -> Self {
        if duration <= Duration::hours(2) {
            AxisUnit::Minutes
        } else if duration <= Duration::hours(24) {
            AxisUnit::Hours
        } else if duration <= Duration::days(60) {
            AxisUnit::Days
        } else if duration <= Duration::days(365) {
            AxisUnit::Months
        } else {
            AxisUnit::Years
        }
    }

    /// Candidate intervals, finest first.
    pub fn intervals(self) -> &'static [u32] {
        match self {
            AxisUnit::Minutes => &[15, 30],
            AxisUnit::Hours => &[1, 2, 3, 4, 6, 12],
            AxisUnit::Days => &[1, 2, 3, 7, 14],
            AxisUnit::Months => &[1, 2, 3, 6],
            AxisUnit::Years => &[1, 2, 5, 10],
        }
    }

    /// `strftime` pattern of a tick label.
    pub fn label_format(self) -> &'static str {
        match self {
            AxisUnit::Minutes => "%H:%M",
            AxisUnit::Hours => "%H",
            AxisUnit::Days => "%m/%d",
            AxisUnit::Months => "%b",
            AxisUnit::Years => "%Y",
        }
    }

    /// Width in characters of every label of this unit.
    pub fn label_width(self) -> usize {
        match self {
            AxisUnit::Minutes | AxisUnit::Days => 5,
            AxisUnit::Hours => 2,
            AxisUnit::Months => 3,
            AxisUnit::Years => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AxisUnit::Minutes => "minutes",
            AxisUnit::Hours => "hours",
            AxisUnit::Days => "days",
            AxisUnit::Months => "months",
            AxisUnit::Years => "years",
        }
    }

    /// First boundary at or after `t` for the given interval.
    fn first_tick(self, t: NaiveDateTime, interval: u32) -> Option<NaiveDateTime> {
        let aligned = match self {
            AxisUnit::Minutes => {
                let minute = t.minute() / interval * interval;
                t.date().and_hms_opt(t.hour(), minute, 0)?
            }
            AxisUnit::Hours => {
                let hour = t.hour() / interval * interval;
                t.date().and_hms_opt(hour, 0, 0)?
            }
            AxisUnit::Days => t.date().and_time(NaiveTime::MIN),
            AxisUnit::Months => {
                let month0 = t.month0() / interval * interval;
                NaiveDate::from_ymd_opt(t.year(), month0 + 1, 1)?.and_time(NaiveTime::MIN)
            }
            AxisUnit::Years => {
                let year = t.year().div_euclid(interval as i32) * interval as i32;
                NaiveDate::from_ymd_opt(year, 1, 1)?.and_time(NaiveTime::MIN)
            }
        };
        if aligned < t {
            self.advance(aligned, interval)
        } else {
            Some(aligned)
        }
    }

    fn advance(self, t: NaiveDateTime, interval: u32) -> Option<NaiveDateTime> {
        let step = i64::from(interval);
        match self {
            AxisUnit::Minutes => t.checked_add_signed(Duration::minutes(step)),
            AxisUnit::Hours => t.checked_add_signed(Duration::hours(step)),
            AxisUnit::Days => t.checked_add_signed(Duration::days(step)),
            AxisUnit::Months => t.checked_add_months(chrono::Months::new(interval)),
            AxisUnit::Years => t.checked_add_months(chrono::Months::new(interval * 12)),
        }
    }

    /// Boundaries inside `window`, at most `limit` of them.
    fn ticks(self, window: &TimeWindow, interval: u32, limit: usize) -> Vec<NaiveDateTime> {
        let mut ticks = Vec::new();
        let mut next = self.first_tick(window.start, interval);
        while let Some(t) = next {
            if t > window.end || ticks.len() >= limit {
                break;
            }
            ticks.push(t);
            next = self.advance(t, interval);
        }
        ticks
    }
}

/// A placed label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisTick {
    pub time: NaiveDateTime,
    /// Column of the label's first character
    pub column: usize,
    pub label: String,
}

/// Labels for a `width`-column timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeAxis {
    pub unit: AxisUnit,
    /// Units between consecutive boundaries
    pub interval: u32,
    /// Labels actually placed, left to right
    pub ticks: Vec<AxisTick>,
    pub width: usize,
}

impl TimeAxis {
    fn blank(unit: AxisUnit, width: usize) -> Self {
        Self {
            unit,
            interval: unit.intervals()[0],
            ticks: Vec::new(),
            width,
        }
    }

    /// The axis as a line of exactly `width` characters.
    pub fn render(&self) -> String {
        let mut line: Vec<char> = vec![' '; self.width];
        for tick in &self.ticks {
            for (i, c) in tick.label.chars().enumerate() {
                if let Some(slot) = line.get_mut(tick.column + i) {
                    *slot = c;
                }
            }
        }
        line.into_iter().collect()
    }
}

/// Build the axis for `window` spread over `width` columns.
///
/// Labels need `label_width + label_gap` columns each. The finest interval
/// producing no more ticks than fit is chosen; if none fits, the coarsest.
/// A tick whose label would overlap the previous one or run past the edge is
/// not placed.
pub fn time_axis(window: &TimeWindow, width: usize, label_gap: usize) -> TimeAxis {
    let unit = AxisUnit::for_duration(window.duration());
    if width == 0 || window.duration() <= Duration::zero() {
        return TimeAxis::blank(unit, width);
    }

    let min_spacing = unit.label_width() + label_gap;
    let capacity = width / min_spacing.max(1);

    let intervals = unit.intervals();
    let interval = intervals
        .iter()
        .copied()
        .find(|&i| unit.ticks(window, i, capacity + 1).len() <= capacity)
        .unwrap_or(intervals[intervals.len() - 1]);

    let mut ticks = Vec::new();
    let mut next_free = 0;
    for time in unit.ticks(window, interval, MAX_TICKS) {
        let Some(column) = column_of(time, window, width) else {
            continue;
        };
        let label = time.format(unit.label_format()).to_string();
        let label_len = label.chars().count();
        if column < next_free || column + label_len > width {
            continue;
        }
        next_free = column + label_len + label_gap;
        ticks.push(AxisTick {
            time,
            column,
            label,
        });
    }

    TimeAxis {
        unit,
        interval,
        ticks,
        width,
    }
}
