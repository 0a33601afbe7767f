use crate::backend::{Backend, OrNotFound};
use crate::error::{ResolveError, ResolveResult};
use crate::resolve::RepositoryResolver;
use crate::types::{IssueRef, NewIssue, RepositoryRef};

/// Create an issue in `explicit` or, failing that, in the repository of the
/// working directory. Forks are redirected to their parent and every
/// assignee must be a known user.
pub async fn create_issue<B: Backend + ?Sized>(
    repositories: &RepositoryResolver<'_, B>,
    explicit: Option<&RepositoryRef>,
    issue: &NewIssue,
) -> ResolveResult<IssueRef> {
    let repository = repositories.resolve(explicit).await?.reference();
    let backend = repositories.backend();

    for assignee in &issue.assignees {
        backend
            .get_user(assignee)
            .await
            .or_not_found(|| ResolveError::InvalidUser(assignee.clone()))?;
    }

    let created = backend.create_issue(&repository, issue).await?;
    tracing::debug!(%repository, number = created.number, "issue created");

    Ok(IssueRef {
        repository,
        number: created.number,
    })
}
