//! Event counts per column and their density tiers.

use crate::types::{ProjectTimeline, TimeWindow};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Relative activity of one timeline column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityTier {
    Idle,
    Low,
    Medium,
    High,
    Peak,
}

impl DensityTier {
    /// All tiers, least to most active.
    pub const ALL: [DensityTier; 5] = [
        DensityTier::Idle,
        DensityTier::Low,
        DensityTier::Medium,
        DensityTier::High,
        DensityTier::Peak,
    ];

    /// Tier of a column holding `count` events in a row whose busiest column holds `max`.
    ///
    /// Non-zero counts map to `min(4, floor(count / max * 4) + 1)`.
    pub fn from_count(count: usize, max: usize) -> Self {
        if count == 0 {
            return DensityTier::Idle;
        }
        let max = max.max(count);
        match (count * 4 / max + 1).min(4) {
            1 => DensityTier::Low,
            2 => DensityTier::Medium,
            3 => DensityTier::High,
            _ => DensityTier::Peak,
        }
    }

    /// 0 for idle through 4 for peak.
    pub fn level(self) -> u8 {
        self as u8
    }
}

/// Column index of `ts` in a `width`-column rendering of `window`.
///
/// `None` when the timestamp falls outside the window, the window has no
/// duration or there are no columns.
pub fn column_of(ts: NaiveDateTime, window: &TimeWindow, width: usize) -> Option<usize> {
    if width == 0 || !window.contains(ts) {
        return None;
    }
    let total = window.duration().num_milliseconds();
    if total <= 0 {
        return None;
    }
    let offset = (ts - window.start).num_milliseconds();
    let index = i128::from(offset) * width as i128 / i128::from(total);
    Some((index.max(0) as usize).min(width - 1))
}

/// Number of timestamps falling into each of `width` equal columns.
pub fn bucket_counts<I>(timestamps: I, window: &TimeWindow, width: usize) -> Vec<usize>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    let mut counts = vec![0; width];
    for ts in timestamps {
        if let Some(column) = column_of(ts, window, width) {
            counts[column] += 1;
        }
    }
    counts
}

/// Tiers for one timeline, normalized to that timeline's busiest column.
pub fn density_row(
    timeline: &ProjectTimeline,
    window: &TimeWindow,
    width: usize,
) -> Vec<DensityTier> {
    let counts = bucket_counts(timeline.events.iter().map(|e| e.timestamp), window, width);
    let max = counts.iter().copied().max().unwrap_or(0);
    counts
        .into_iter()
        .map(|count| DensityTier::from_count(count, max))
        .collect()
}
