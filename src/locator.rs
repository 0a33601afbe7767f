//! Finds the GitHub repository behind a local git working copy.

use std::path::{Path, PathBuf};
use url::Url;

use crate::types::RepositoryRef;

/// Host of the issue tracking service
pub const GITHUB_HOST: &str = "github.com";

/// Only this remote is consulted
pub const ORIGIN: &str = "origin";

/// Read access to version control remote metadata
pub trait RemoteMetadata: Send + Sync {
    /// Nearest enclosing working copy at or above `path`
    fn discover_working_copy(&self, path: &Path) -> Option<PathBuf>;

    /// URL configured for `remote` in the working copy
    fn remote_url(&self, working_copy: &Path, remote: &str) -> Option<String>;
}

/// Remote metadata backed by libgit2
#[derive(Debug, Default, Clone, Copy)]
pub struct GitRemotes;

impl RemoteMetadata for GitRemotes {
    fn discover_working_copy(&self, path: &Path) -> Option<PathBuf> {
        match git2::Repository::discover(path) {
            Ok(repo) => Some(repo.path().to_path_buf()),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no git working copy found");
                None
            }
        }
    }

    fn remote_url(&self, working_copy: &Path, remote: &str) -> Option<String> {
        let repo = git2::Repository::open(working_copy).ok()?;
        let remote = match repo.find_remote(remote) {
            Ok(remote) => remote,
            Err(e) => {
                tracing::debug!(remote, error = %e, "remote not configured");
                return None;
            }
        };

        remote.url().map(str::to_owned)
    }
}

pub struct RepositoryLocator {
    metadata: Box<dyn RemoteMetadata>,
    host: String,
}

impl Default for RepositoryLocator {
    fn default() -> Self {
        Self::new(GitRemotes)
    }
}

impl RepositoryLocator {
    pub fn new(metadata: impl RemoteMetadata + 'static) -> Self {
        Self {
            metadata: Box::new(metadata),
            host: GITHUB_HOST.to_string(),
        }
    }

    /// Repository that the `origin` remote of the working copy enclosing
    /// `start` points to. Anything unexpected yields `None`.
    pub fn discover(&self, start: &Path) -> Option<RepositoryRef> {
        let working_copy = self.metadata.discover_working_copy(start)?;
        let remote_url = self.metadata.remote_url(&working_copy, ORIGIN)?;

        let repository = parse_remote_url(&remote_url, &self.host);
        tracing::debug!(remote_url, ?repository, "inspected origin remote");
        repository
    }
}

/// Extract owner/name from a git remote URL pointing at `host`.
///
/// Accepts `https://host/owner/name(.git)`, `ssh://git@host/owner/name`
/// and the scp-like `git@host:owner/name(.git)`.
pub fn parse_remote_url(remote_url: &str, host: &str) -> Option<RepositoryRef> {
    let trimmed = remote_url.trim();
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let url = Url::parse(&scp_to_url(trimmed)).ok()?;

    let url_host = url.host_str()?.to_ascii_lowercase();
    if !url_host.ends_with(&host.to_ascii_lowercase()) {
        return None;
    }

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let name = segments.next()?;

    Some(RepositoryRef::new(owner, name))
}

/// `git@host:owner/name` -> `ssh://git@host/owner/name`
fn scp_to_url(remote: &str) -> String {
    // Some tooling writes `https:git@host:path`
    let remote = match remote.strip_prefix("https:") {
        Some(rest) if !rest.starts_with("//") => rest,
        _ => remote,
    };

    if remote.contains("://") {
        return remote.to_string();
    }

    match remote.split_once(':') {
        Some((authority, path)) if !authority.contains('/') => {
            format!("ssh://{}/{}", authority, path.trim_start_matches('/'))
        }
        _ => remote.to_string(),
    }
}
