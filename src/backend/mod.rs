use async_trait::async_trait;
use thiserror::Error;

use crate::error::ResolveError;
use crate::types::{
    IssueState, NewIssue, RemoteIssue, RemoteRepository, RepositoryIssueFilter, RepositoryRef,
    UserIssueFilter,
};

pub mod github;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The service answered 404
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Remote(#[from] anyhow::Error),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Remote issue tracker operations
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get repository metadata, including its fork parent
    async fn get_repository(&self, repository: &RepositoryRef) -> BackendResult<RemoteRepository>;

    /// Get an issue by number
    async fn get_issue(&self, repository: &RepositoryRef, number: u64) -> BackendResult<RemoteIssue>;

    /// Create a new issue
    async fn create_issue(&self, repository: &RepositoryRef, issue: &NewIssue) -> BackendResult<RemoteIssue>;

    /// Set the state of an existing issue
    async fn update_issue_state(
        &self,
        repository: &RepositoryRef,
        number: u64,
        state: IssueState,
    ) -> BackendResult<RemoteIssue>;

    /// Add a comment to an issue
    async fn create_comment(&self, repository: &RepositoryRef, number: u64, body: &str) -> BackendResult<()>;

    /// Login of the authenticated caller
    async fn get_current_user(&self) -> BackendResult<String>;

    /// Canonical login for a user
    async fn get_user(&self, login: &str) -> BackendResult<String>;

    async fn list_issues_for_repository(
        &self,
        repository: &RepositoryRef,
        filter: &RepositoryIssueFilter,
    ) -> BackendResult<Vec<RemoteIssue>>;

    async fn list_issues_for_current_user(&self, filter: &UserIssueFilter) -> BackendResult<Vec<RemoteIssue>>;
}

/// Maps the 404 signal of a backend call onto a resolution error
pub trait OrNotFound<T> {
    fn or_not_found(self, err: impl FnOnce() -> ResolveError) -> Result<T, ResolveError>;
}

impl<T> OrNotFound<T> for BackendResult<T> {
    fn or_not_found(self, err: impl FnOnce() -> ResolveError) -> Result<T, ResolveError> {
        match self {
            Ok(value) => Ok(value),
            Err(BackendError::NotFound) => Err(err()),
            Err(BackendError::Remote(e)) => Err(ResolveError::Remote(e)),
        }
    }
}

impl From<BackendError> for ResolveError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound => ResolveError::Remote(anyhow::anyhow!("unexpected 404 from GitHub")),
            BackendError::Remote(e) => ResolveError::Remote(e),
        }
    }
}
