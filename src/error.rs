use thiserror::Error;

use crate::types::{IssueRef, IssueState, RepositoryRef};

/// Failures while turning user input into a concrete target on the service
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("'{0}' should be in the format owner/repo#number, or simply the issue number when inside a directory containing a GitHub repository")]
    InvalidReference(String),

    #[error("No repository specified. You need to either specify the issue number in the format owner/repo#number, or alternatively you need to run the command from a directory containing a GitHub repository")]
    NoRepositoryContext,

    #[error("'{0}' is not a valid GitHub repository")]
    RepositoryNotFound(RepositoryRef),

    #[error("Issue #{number} not found in repository {repository}")]
    IssueNotFound { number: u64, repository: RepositoryRef },

    #[error("'{0}' is not a valid GitHub user")]
    InvalidUser(String),

    #[error("'{0}' is not a valid GitHub repository")]
    InvalidRepository(String),

    #[error("In order to filter issues by user, you need to specify a repository")]
    UserFilterRequiresRepository,

    #[error("Issue {issue} is already {state}. No action taken.")]
    AlreadyInState { issue: IssueRef, state: IssueState },

    /// Transport or API failure from the remote client
    #[error(transparent)]
    Remote(anyhow::Error),
}

impl ResolveError {
    /// Whether the error is reported at the command boundary instead of
    /// aborting the process
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ResolveError::Remote(_))
    }

    /// Reported as a warning rather than an error
    pub fn is_warning(&self) -> bool {
        matches!(self, ResolveError::AlreadyInState { .. })
    }
}

pub type ResolveResult<T> = std::result::Result<T, ResolveError>;
