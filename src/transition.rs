use crate::backend::Backend;
use crate::error::{ResolveError, ResolveResult};
use crate::resolve::IssueResolver;
use crate::types::{IssueRef, IssueState};

/// Move the referenced issue to `target`.
///
/// A non-empty `comment` is posted before the state changes. Asking for the
/// state the issue is already in is rejected with
/// [`ResolveError::AlreadyInState`] and touches nothing.
pub async fn transition<B: Backend + ?Sized>(
    resolver: &IssueResolver<'_, B>,
    reference: &str,
    target: IssueState,
    comment: Option<&str>,
) -> ResolveResult<IssueRef> {
    let (issue, repository) = resolver.resolve_issue(reference).await?;
    let issue_ref = IssueRef {
        repository: repository.reference(),
        number: issue.number,
    };

    if issue.state == target {
        return Err(ResolveError::AlreadyInState {
            issue: issue_ref,
            state: target,
        });
    }

    let backend = resolver.backend();

    if let Some(comment) = comment.filter(|c| !c.is_empty()) {
        backend
            .create_comment(&issue_ref.repository, issue_ref.number, comment)
            .await?;
    }

    backend
        .update_issue_state(&issue_ref.repository, issue_ref.number, target)
        .await?;

    tracing::debug!(issue = %issue_ref, state = %target, "issue state updated");
    Ok(issue_ref)
}
