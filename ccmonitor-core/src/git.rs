//! Repository name resolution from on-disk git metadata.
//!
//! Only files are read (`.git/config`, the worktree `.git` redirect and
//! `commondir`); no `git` subprocess is spawned. Anything missing or
//! unparseable resolves to `None`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Maps a working directory to the name of the repository rooted exactly there.
pub trait RepositoryResolver {
    /// Name of the repository whose metadata lives directly in `directory`.
    ///
    /// Ancestors are not searched; a subdirectory of a checkout resolves to
    /// `None`.
    fn resolve(&self, directory: &Path) -> Option<String>;
}

/// Filesystem resolver reading `.git` metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitMetadataResolver;

impl RepositoryResolver for GitMetadataResolver {
    fn resolve(&self, directory: &Path) -> Option<String> {
        let metadata_dir = resolve_metadata_dir(directory)?;
        let config = fs::read_to_string(metadata_dir.join("config")).ok()?;
        repo_name_from_config(&config)
    }
}

/// Locate the directory holding the shared `config` for `directory`.
///
/// A `.git` directory is used as-is. A `.git` file (`gitdir: <path>`) is
/// followed, and then its `commondir` if present, so linked worktrees resolve
/// to the main repository's metadata.
fn resolve_metadata_dir(directory: &Path) -> Option<PathBuf> {
    let git_entry = directory.join(".git");
    if git_entry.is_dir() {
        return Some(git_entry);
    }
    if !git_entry.is_file() {
        return None;
    }

    let content = fs::read_to_string(&git_entry).ok()?;
    let gitdir = content
        .lines()
        .find_map(|line| line.trim().strip_prefix("gitdir:"))?
        .trim();
    if gitdir.is_empty() {
        return None;
    }
    let gitdir = directory.join(gitdir);

    match fs::read_to_string(gitdir.join("commondir")) {
        Ok(common) if !common.trim().is_empty() => Some(gitdir.join(common.trim())),
        _ => Some(gitdir),
    }
}

/// First `url = ...` value in a git config that yields a repository name.
pub fn repo_name_from_config(config: &str) -> Option<String> {
    config
        .lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("url")?;
            rest.trim_start().strip_prefix('=')
        })
        .find_map(|url| repo_name_from_url(url.trim()))
}

/// Repository name from a remote URL: the last path segment without `.git`.
///
/// Handles `git@host:owner/repo.git`, `ssh://git@host/owner/repo.git`,
/// `https://host/owner/repo` and plain filesystem paths.
pub fn repo_name_from_url(url: &str) -> Option<String> {
    let url = url.trim().trim_end_matches('/');

    let path = match url.split_once("://") {
        // Drop the host; a URL without a path has no repository
        Some((_, rest)) => rest.split_once('/')?.1,
        None => url.split_once(':').map(|(_, p)| p).unwrap_or(url),
    };

    let segment = path.rsplit('/').next()?;
    let name = segment.strip_suffix(".git").unwrap_or(segment);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Memoized resolver lookups, scoped to one aggregation run.
pub struct RepoCache<'a> {
    resolver: &'a dyn RepositoryResolver,
    names: HashMap<String, Option<String>>,
}

impl<'a> RepoCache<'a> {
    pub fn new(resolver: &'a dyn RepositoryResolver) -> Self {
        Self {
            resolver,
            names: HashMap::new(),
        }
    }

    /// Resolve `directory`, consulting the resolver at most once per path.
    pub fn resolve(&mut self, directory: &str) -> Option<String> {
        if directory.is_empty() {
            return None;
        }
        if let Some(cached) = self.names.get(directory) {
            return cached.clone();
        }

        let name = self.resolver.resolve(Path::new(directory));
        tracing::trace!(directory, name = ?name, "Resolved repository");
        self.names.insert(directory.to_string(), name.clone());
        name
    }

    /// Number of distinct directories looked up so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
