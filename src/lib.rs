pub mod backend;
pub mod config;
pub mod create;
pub mod criteria;
pub mod error;
pub mod locator;
pub mod parser;
pub mod resolve;
pub mod transition;
pub mod types;

// Re-export commonly used types
pub use error::{ResolveError, ResolveResult};
pub use types::{IssueRef, IssueState, ListingCriteria, RemoteIssue, RemoteRepository, RepositoryRef};
