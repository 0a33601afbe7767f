#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ghi::backend::{Backend, BackendError, BackendResult};
use ghi::locator::{RemoteMetadata, RepositoryLocator};
use ghi::types::{
    IssueState, NewIssue, RemoteIssue, RemoteRepository, RepositoryIssueFilter, RepositoryRef,
    UserIssueFilter,
};

/// Every call made against the backend, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetRepository(String),
    GetIssue(String, u64),
    CreateIssue(String, String),
    UpdateIssueState(String, u64, IssueState),
    CreateComment(String, u64, String),
    GetCurrentUser,
    GetUser(String),
    ListForRepository(String, RepositoryIssueFilter),
    ListForCurrentUser(UserIssueFilter),
}

fn key(repository: &RepositoryRef) -> String {
    repository.to_string().to_lowercase()
}

/// In-memory GitHub that records every call
pub struct RecordingBackend {
    current_user: String,
    users: Vec<String>,
    repositories: HashMap<String, RemoteRepository>,
    issues: Mutex<HashMap<(String, u64), RemoteIssue>>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingBackend {
    pub fn new(current_user: &str) -> Self {
        Self {
            current_user: current_user.to_string(),
            users: vec![current_user.to_string()],
            repositories: HashMap::new(),
            issues: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_user(mut self, login: &str) -> Self {
        self.users.push(login.to_string());
        self
    }

    pub fn with_repository(mut self, repository: RemoteRepository) -> Self {
        self.repositories.insert(key(&repository.reference()), repository);
        self
    }

    pub fn with_issue(self, repository: &str, issue: RemoteIssue) -> Self {
        let (owner, name) = repository.split_once('/').unwrap();
        let k = key(&RepositoryRef::new(owner, name));
        self.issues.lock().unwrap().insert((k, issue.number), issue);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }

    pub fn issue_state(&self, repository: &str, number: u64) -> Option<IssueState> {
        self.issues
            .lock()
            .unwrap()
            .get(&(repository.to_lowercase(), number))
            .map(|i| i.state)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    async fn get_repository(&self, repository: &RepositoryRef) -> BackendResult<RemoteRepository> {
        self.record(Call::GetRepository(repository.to_string()));
        self.repositories
            .get(&key(repository))
            .cloned()
            .ok_or(BackendError::NotFound)
    }

    async fn get_issue(&self, repository: &RepositoryRef, number: u64) -> BackendResult<RemoteIssue> {
        self.record(Call::GetIssue(repository.to_string(), number));
        self.issues
            .lock()
            .unwrap()
            .get(&(key(repository), number))
            .cloned()
            .ok_or(BackendError::NotFound)
    }

    async fn create_issue(&self, repository: &RepositoryRef, issue: &NewIssue) -> BackendResult<RemoteIssue> {
        self.record(Call::CreateIssue(repository.to_string(), issue.title.clone()));

        let mut issues = self.issues.lock().unwrap();
        let number = issues.keys().filter(|(r, _)| *r == key(repository)).count() as u64 + 1;
        let mut created = open_issue(number);
        created.title = issue.title.clone();
        created.body = issue.body.clone().unwrap_or_default();
        created.assignees = issue.assignees.clone();
        issues.insert((key(repository), number), created.clone());

        Ok(created)
    }

    async fn update_issue_state(
        &self,
        repository: &RepositoryRef,
        number: u64,
        state: IssueState,
    ) -> BackendResult<RemoteIssue> {
        self.record(Call::UpdateIssueState(repository.to_string(), number, state));

        let mut issues = self.issues.lock().unwrap();
        let issue = issues
            .get_mut(&(key(repository), number))
            .ok_or(BackendError::NotFound)?;
        issue.state = state;
        Ok(issue.clone())
    }

    async fn create_comment(&self, repository: &RepositoryRef, number: u64, body: &str) -> BackendResult<()> {
        self.record(Call::CreateComment(repository.to_string(), number, body.to_string()));
        Ok(())
    }

    async fn get_current_user(&self) -> BackendResult<String> {
        self.record(Call::GetCurrentUser);
        Ok(self.current_user.clone())
    }

    async fn get_user(&self, login: &str) -> BackendResult<String> {
        self.record(Call::GetUser(login.to_string()));
        self.users
            .iter()
            .find(|u| u.eq_ignore_ascii_case(login))
            .cloned()
            .ok_or(BackendError::NotFound)
    }

    async fn list_issues_for_repository(
        &self,
        repository: &RepositoryRef,
        filter: &RepositoryIssueFilter,
    ) -> BackendResult<Vec<RemoteIssue>> {
        self.record(Call::ListForRepository(repository.to_string(), filter.clone()));
        Ok(Vec::new())
    }

    async fn list_issues_for_current_user(&self, filter: &UserIssueFilter) -> BackendResult<Vec<RemoteIssue>> {
        self.record(Call::ListForCurrentUser(*filter));
        Ok(Vec::new())
    }
}

/// Remote metadata for a pretend working copy
pub struct FakeRemotes {
    origin: Option<String>,
}

impl RemoteMetadata for FakeRemotes {
    fn discover_working_copy(&self, path: &Path) -> Option<PathBuf> {
        self.origin.as_ref().map(|_| path.to_path_buf())
    }

    fn remote_url(&self, _working_copy: &Path, remote: &str) -> Option<String> {
        (remote == "origin").then(|| self.origin.clone()).flatten()
    }
}

/// Locator for a working copy whose origin is `url`
pub fn inside_working_copy(url: &str) -> RepositoryLocator {
    RepositoryLocator::new(FakeRemotes {
        origin: Some(url.to_string()),
    })
}

/// Locator for a directory outside any working copy
pub fn outside_working_copy() -> RepositoryLocator {
    RepositoryLocator::new(FakeRemotes { origin: None })
}

pub fn repository(owner: &str, name: &str) -> RemoteRepository {
    RemoteRepository {
        owner: owner.to_string(),
        name: name.to_string(),
        is_fork: false,
        parent: None,
    }
}

pub fn fork(owner: &str, name: &str, parent: RemoteRepository) -> RemoteRepository {
    RemoteRepository {
        owner: owner.to_string(),
        name: name.to_string(),
        is_fork: true,
        parent: Some(Box::new(parent)),
    }
}

pub fn open_issue(number: u64) -> RemoteIssue {
    RemoteIssue {
        number,
        title: format!("Issue {}", number),
        body: String::new(),
        state: IssueState::Open,
        author: "octocat".to_string(),
        assignees: Vec::new(),
        labels: Vec::new(),
        closed_by: None,
        closed_at: None,
        repository: None,
    }
}

pub fn closed_issue(number: u64) -> RemoteIssue {
    RemoteIssue {
        state: IssueState::Closed,
        ..open_issue(number)
    }
}
