use std::path::PathBuf;

use crate::backend::{Backend, OrNotFound};
use crate::error::{ResolveError, ResolveResult};
use crate::locator::RepositoryLocator;
use crate::parser::parse_reference;
use crate::types::{RemoteIssue, RemoteRepository, RepositoryRef};

/// Turns an explicit or directory-derived repository into the repository
/// that issue operations should target
pub struct RepositoryResolver<'a, B: Backend + ?Sized> {
    backend: &'a B,
    locator: &'a RepositoryLocator,
    working_dir: PathBuf,
}

impl<'a, B: Backend + ?Sized> RepositoryResolver<'a, B> {
    pub fn new(backend: &'a B, locator: &'a RepositoryLocator, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            locator,
            working_dir: working_dir.into(),
        }
    }

    pub fn backend(&self) -> &'a B {
        self.backend
    }

    /// Resolve the repository, redirecting a fork to its parent
    pub async fn resolve(&self, explicit: Option<&RepositoryRef>) -> ResolveResult<RemoteRepository> {
        let repository = match explicit {
            Some(reference) => self.fetch(reference).await?,
            None => self.discover().await?.ok_or(ResolveError::NoRepositoryContext)?,
        };

        Ok(redirect_fork(repository))
    }

    /// Repository of the working directory as the service reports it,
    /// without fork redirection
    pub async fn discover(&self) -> ResolveResult<Option<RemoteRepository>> {
        let Some(reference) = self.locator.discover(&self.working_dir) else {
            tracing::debug!(dir = %self.working_dir.display(), "no repository found in working directory");
            return Ok(None);
        };

        self.fetch(&reference).await.map(Some)
    }

    async fn fetch(&self, reference: &RepositoryRef) -> ResolveResult<RemoteRepository> {
        self.backend
            .get_repository(reference)
            .await
            .or_not_found(|| ResolveError::RepositoryNotFound(reference.clone()))
    }
}

/// Issues of a fork are tracked against its parent. Only one level is
/// followed.
pub fn redirect_fork(mut repository: RemoteRepository) -> RemoteRepository {
    if !repository.is_fork {
        return repository;
    }

    let fork_name = repository.full_name();
    match repository.parent.take() {
        Some(parent) => {
            tracing::debug!(fork = %fork_name, parent = %parent.full_name(), "redirecting fork to parent");
            *parent
        }
        None => {
            tracing::warn!(fork = %fork_name, "fork reported without a parent");
            repository
        }
    }
}

/// Resolves free-form issue references for `view`, `close` and `open`
pub struct IssueResolver<'a, B: Backend + ?Sized> {
    repositories: RepositoryResolver<'a, B>,
}

impl<'a, B: Backend + ?Sized> IssueResolver<'a, B> {
    pub fn new(repositories: RepositoryResolver<'a, B>) -> Self {
        Self { repositories }
    }

    pub fn backend(&self) -> &'a B {
        self.repositories.backend()
    }

    /// Resolve `reference` to the issue and the repository it lives in
    pub async fn resolve_issue(&self, reference: &str) -> ResolveResult<(RemoteIssue, RemoteRepository)> {
        let parsed = parse_reference(reference)?;
        let repository = self.repositories.resolve(parsed.repository.as_ref()).await?;
        let target = repository.reference();

        let issue = self
            .backend()
            .get_issue(&target, parsed.number)
            .await
            .or_not_found(|| ResolveError::IssueNotFound {
                number: parsed.number,
                repository: target.clone(),
            })?;

        Ok((issue, repository))
    }
}
