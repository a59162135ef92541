//! Removal of events logged more than once.
//!
//! Claude Code writes the same API response into several files (resumed
//! sessions, sidechains), so token totals are only correct after collapsing
//! repeats. Identity is `message_id:request_id`.

use crate::types::Event;
use std::collections::HashSet;

/// Keep the first occurrence of each identity, preserving order.
///
/// Events without both a message id and a request id cannot be identified and
/// are dropped.
pub fn dedup(events: Vec<Event>) -> Vec<Event> {
    let before = events.len();
    let mut seen = HashSet::new();

    let kept: Vec<Event> = events
        .into_iter()
        .filter(|event| match event.dedup_key() {
            Some(key) => seen.insert(key),
            None => false,
        })
        .collect();

    tracing::debug!(before, after = kept.len(), "Deduplicated events");
    kept
}
