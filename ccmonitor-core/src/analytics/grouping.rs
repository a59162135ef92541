//! Name resolution and the two grouping modes.

use super::ActivityPolicy;
use crate::git::RepoCache;
use crate::types::{Event, ProjectTimeline};
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// How one event directory got its name.
#[derive(Debug, Clone)]
struct DirectoryName {
    name: String,
    /// The directory itself carries repository metadata
    direct: bool,
}

/// Resolve a display name for every distinct directory in `directories`.
///
/// A directory with its own metadata uses the repository name. Otherwise it
/// inherits from the deepest directly-resolved event directory above it, or
/// falls back to its leaf segment.
fn resolve_names(
    directories: &[&str],
    cache: &mut RepoCache<'_>,
) -> HashMap<String, DirectoryName> {
    let direct: Vec<(&str, String)> = directories
        .iter()
        .filter_map(|dir| cache.resolve(dir).map(|name| (*dir, name)))
        .collect();

    directories
        .iter()
        .map(|dir| {
            let resolved = if let Some((_, name)) = direct.iter().find(|(d, _)| d == dir) {
                DirectoryName {
                    name: name.clone(),
                    direct: true,
                }
            } else {
                let inherited = direct
                    .iter()
                    .filter(|(ancestor, _)| is_descendant(dir, ancestor))
                    .max_by_key(|(ancestor, _)| ancestor.len())
                    .map(|(_, name)| name.clone());
                DirectoryName {
                    name: inherited.unwrap_or_else(|| leaf_name(dir)),
                    direct: false,
                }
            };
            (dir.to_string(), resolved)
        })
        .collect()
}

/// Whether `dir` lies strictly below `ancestor`.
fn is_descendant(dir: &str, ancestor: &str) -> bool {
    let prefix = ancestor.trim_end_matches('/');
    dir.len() > prefix.len() + 1
        && dir.starts_with(prefix)
        && dir.as_bytes()[prefix.len()] == b'/'
}

/// Last path segment; `"/"` for the root and `"unknown"` for an empty path.
pub(crate) fn leaf_name(dir: &str) -> String {
    if dir.is_empty() {
        return "unknown".to_string();
    }
    match dir.trim_end_matches('/').rsplit('/').next() {
        Some(leaf) if !leaf.is_empty() => leaf.to_string(),
        _ => "/".to_string(),
    }
}

/// Events bucketed by key, keys in order of first appearance.
fn bucket_by<F>(events: Vec<Event>, key: F) -> Vec<(String, Vec<Event>)>
where
    F: Fn(&Event) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<Event>)> = Vec::new();
    for event in events {
        let k = key(&event);
        match index.get(&k) {
            Some(&i) => buckets[i].1.push(event),
            None => {
                index.insert(k.clone(), buckets.len());
                buckets.push((k, vec![event]));
            }
        }
    }
    buckets
}

/// One timeline per resolved repository name.
pub(super) fn by_repository(
    events: Vec<Event>,
    cache: &mut RepoCache<'_>,
    policy: &ActivityPolicy,
) -> Vec<ProjectTimeline> {
    let directories = distinct_directories(&events);
    let names = resolve_names(&directories, cache);

    let mut timelines: Vec<ProjectTimeline> =
        bucket_by(events, |e| names[&e.directory].name.clone())
            .into_iter()
            .filter_map(|(name, events)| {
                ProjectTimeline::from_events(format!("repo:{}", name), name, None, events, policy)
            })
            .collect();

    timelines.sort_by(|a, b| {
        b.event_count()
            .cmp(&a.event_count())
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
    timelines
}

/// Per-directory facts used to pick a cluster parent.
struct DirectoryGroup {
    directory: String,
    events: Vec<Event>,
    first_seen: NaiveDateTime,
    direct: bool,
}

/// One timeline per working directory, clustered under a parent repository.
pub(super) fn by_directory(
    events: Vec<Event>,
    cache: &mut RepoCache<'_>,
    policy: &ActivityPolicy,
) -> Vec<ProjectTimeline> {
    let directories = distinct_directories(&events);
    let names = resolve_names(&directories, cache);

    let mut clusters: Vec<(String, Vec<DirectoryGroup>)> = Vec::new();
    for (directory, events) in bucket_by(events, |e| e.directory.clone()) {
        let resolved = &names[&directory];
        let Some(first_seen) = events.iter().map(|e| e.timestamp).min() else {
            continue;
        };
        let group = DirectoryGroup {
            directory,
            events,
            first_seen,
            direct: resolved.direct,
        };
        match clusters.iter_mut().find(|(name, _)| *name == resolved.name) {
            Some((_, groups)) => groups.push(group),
            None => clusters.push((resolved.name.clone(), vec![group])),
        }
    }

    clusters.sort_by(|(name_a, a), (name_b, b)| {
        cluster_size(b)
            .cmp(&cluster_size(a))
            .then_with(|| name_a.cmp(name_b))
    });

    clusters
        .into_iter()
        .flat_map(|(name, groups)| cluster_timelines(name, groups, policy))
        .collect()
}

fn cluster_size(groups: &[DirectoryGroup]) -> usize {
    groups.iter().map(|g| g.events.len()).sum()
}

/// Timelines for one name cluster: parent first, then children by size.
fn cluster_timelines(
    name: String,
    mut groups: Vec<DirectoryGroup>,
    policy: &ActivityPolicy,
) -> Vec<ProjectTimeline> {
    // Exact repository roots take precedence, then the earliest activity.
    groups.sort_by(|a, b| {
        b.direct
            .cmp(&a.direct)
            .then_with(|| a.first_seen.cmp(&b.first_seen))
            .then_with(|| a.directory.cmp(&b.directory))
    });
    let parent = groups.remove(0);
    let parent_dir = parent.directory.clone();

    let mut timelines = Vec::with_capacity(groups.len() + 1);
    timelines.extend(ProjectTimeline::from_events(
        format!("dir:{}", parent.directory),
        name.clone(),
        None,
        parent.events,
        policy,
    ));

    let mut children: Vec<ProjectTimeline> = groups
        .into_iter()
        .filter_map(|group| {
            let display_name = child_display_name(&group.directory, &parent_dir);
            ProjectTimeline::from_events(
                format!("dir:{}", group.directory),
                display_name,
                Some(name.clone()),
                group.events,
                policy,
            )
        })
        .collect();

    children.sort_by(|a, b| {
        b.event_count()
            .cmp(&a.event_count())
            .then_with(|| a.display_name.cmp(&b.display_name))
            .then_with(|| a.directory.cmp(&b.directory))
    });
    timelines.extend(children);
    timelines
}

/// `a/b` under the parent becomes `a-b`; anything else keeps its leaf name.
fn child_display_name(directory: &str, parent_dir: &str) -> String {
    if is_descendant(directory, parent_dir) {
        let relative = &directory[parent_dir.trim_end_matches('/').len()..];
        let name = relative.replace('/', "-");
        let name = name.trim_start_matches('-');
        if !name.is_empty() {
            return name.to_string();
        }
    }
    leaf_name(directory)
}

fn distinct_directories(events: &[Event]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    events
        .iter()
        .map(|e| e.directory.as_str())
        .filter(|d| seen.insert(*d))
        .collect()
}
