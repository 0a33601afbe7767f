mod common;

use common::*;
use ghi::create::create_issue;
use ghi::resolve::{IssueResolver, RepositoryResolver};
use ghi::types::{IssueRef, NewIssue, RepositoryRef};
use ghi::ResolveError;

const CWD: &str = "/work/widgets";

#[tokio::test]
async fn test_qualified_reference_resolves_issue() {
    let backend = RecordingBackend::new("octocat")
        .with_repository(repository("acme", "widgets"))
        .with_issue("acme/widgets", open_issue(42));
    let locator = outside_working_copy();
    let resolver = IssueResolver::new(RepositoryResolver::new(&backend, &locator, CWD));

    let (issue, repository) = resolver.resolve_issue("acme/widgets#42").await.unwrap();

    assert_eq!(issue.number, 42);
    assert_eq!(repository.full_name(), "acme/widgets");
    assert_eq!(
        backend.calls(),
        vec![
            Call::GetRepository("acme/widgets".into()),
            Call::GetIssue("acme/widgets".into(), 42),
        ]
    );
}

#[tokio::test]
async fn test_bare_number_in_fork_resolves_against_parent() {
    let upstream = repository("acme-upstream", "widgets");
    let backend = RecordingBackend::new("octocat")
        .with_repository(fork("acme", "widgets", upstream.clone()))
        .with_repository(upstream)
        .with_issue("acme/widgets", open_issue(42))
        .with_issue("acme-upstream/widgets", open_issue(42));
    let locator = inside_working_copy("git@github.com:acme/widgets.git");
    let resolver = IssueResolver::new(RepositoryResolver::new(&backend, &locator, CWD));

    let (issue, repository) = resolver.resolve_issue("42").await.unwrap();

    assert_eq!(issue.number, 42);
    assert_eq!(repository.full_name(), "acme-upstream/widgets");
    assert_eq!(backend.count(|c| *c == Call::GetIssue("acme-upstream/widgets".into(), 42)), 1);
    assert_eq!(backend.count(|c| *c == Call::GetIssue("acme/widgets".into(), 42)), 0);
}

#[tokio::test]
async fn test_explicit_fork_redirected_to_parent() {
    let upstream = repository("acme-upstream", "widgets");
    let backend = RecordingBackend::new("octocat").with_repository(fork("acme", "widgets", upstream));
    let locator = outside_working_copy();
    let resolver = RepositoryResolver::new(&backend, &locator, CWD);

    let explicit = RepositoryRef::new("acme", "widgets");
    let resolved = resolver.resolve(Some(&explicit)).await.unwrap();

    assert_eq!(resolved.full_name(), "acme-upstream/widgets");
}

#[tokio::test]
async fn test_fork_redirect_is_single_level() {
    let root = repository("root", "widgets");
    let middle = fork("middle", "widgets", root);
    let backend = RecordingBackend::new("octocat").with_repository(fork("leaf", "widgets", middle));
    let locator = outside_working_copy();
    let resolver = RepositoryResolver::new(&backend, &locator, CWD);

    let resolved = resolver.resolve(Some(&RepositoryRef::new("leaf", "widgets"))).await.unwrap();

    assert_eq!(resolved.full_name(), "middle/widgets");
}

#[tokio::test]
async fn test_unknown_repository() {
    let backend = RecordingBackend::new("octocat");
    let locator = outside_working_copy();
    let resolver = IssueResolver::new(RepositoryResolver::new(&backend, &locator, CWD));

    let err = resolver.resolve_issue("acme/missing#1").await.unwrap_err();

    assert!(matches!(err, ResolveError::RepositoryNotFound(ref r) if *r == RepositoryRef::new("acme", "missing")));
    assert_eq!(err.to_string(), "'acme/missing' is not a valid GitHub repository");
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_bare_number_outside_working_copy() {
    let backend = RecordingBackend::new("octocat");
    let locator = outside_working_copy();
    let resolver = IssueResolver::new(RepositoryResolver::new(&backend, &locator, CWD));

    let err = resolver.resolve_issue("42").await.unwrap_err();

    assert!(matches!(err, ResolveError::NoRepositoryContext));
    assert!(err.to_string().contains("owner/repo#number"));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_non_github_origin_is_no_context() {
    let backend = RecordingBackend::new("octocat");
    let locator = inside_working_copy("https://gitlab.com/acme/widgets.git");
    let resolver = IssueResolver::new(RepositoryResolver::new(&backend, &locator, CWD));

    let err = resolver.resolve_issue("42").await.unwrap_err();

    assert!(matches!(err, ResolveError::NoRepositoryContext));
}

#[tokio::test]
async fn test_missing_issue() {
    let backend = RecordingBackend::new("octocat").with_repository(repository("acme", "widgets"));
    let locator = outside_working_copy();
    let resolver = IssueResolver::new(RepositoryResolver::new(&backend, &locator, CWD));

    let err = resolver.resolve_issue("acme/widgets#7").await.unwrap_err();

    assert_eq!(err.to_string(), "Issue #7 not found in repository acme/widgets");
}

#[tokio::test]
async fn test_malformed_reference() {
    let backend = RecordingBackend::new("octocat");
    let locator = outside_working_copy();
    let resolver = IssueResolver::new(RepositoryResolver::new(&backend, &locator, CWD));

    let err = resolver.resolve_issue("acme/widgets").await.unwrap_err();

    assert!(matches!(err, ResolveError::InvalidReference(_)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_create_issue_in_working_copy() {
    let backend = RecordingBackend::new("octocat")
        .with_user("hubot")
        .with_repository(repository("acme", "widgets"));
    let locator = inside_working_copy("https://github.com/acme/widgets.git");
    let resolver = RepositoryResolver::new(&backend, &locator, CWD);

    let issue = NewIssue {
        title: "Broken gear".to_string(),
        body: Some("It squeaks".to_string()),
        assignees: vec!["hubot".to_string()],
        labels: vec!["bug".to_string()],
    };
    let created = create_issue(&resolver, None, &issue).await.unwrap();

    assert_eq!(
        created,
        IssueRef {
            repository: RepositoryRef::new("acme", "widgets"),
            number: 1,
        }
    );
    assert_eq!(created.to_string(), "acme/widgets#1");
    assert_eq!(backend.count(|c| matches!(c, Call::CreateIssue(..))), 1);
}

#[tokio::test]
async fn test_create_issue_rejects_unknown_assignee() {
    let backend = RecordingBackend::new("octocat").with_repository(repository("acme", "widgets"));
    let locator = outside_working_copy();
    let resolver = RepositoryResolver::new(&backend, &locator, CWD);

    let issue = NewIssue {
        title: "Broken gear".to_string(),
        assignees: vec!["ghost".to_string()],
        ..Default::default()
    };
    let err = create_issue(&resolver, Some(&RepositoryRef::new("acme", "widgets")), &issue)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "'ghost' is not a valid GitHub user");
    assert_eq!(backend.count(|c| matches!(c, Call::CreateIssue(..))), 0);
}
