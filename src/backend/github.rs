use anyhow::Context;
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{Backend, BackendError, BackendResult};
use crate::parser::is_valid_login;
use crate::types::{
    IssueState, Label, NewIssue, Relation, RemoteIssue, RemoteRepository, RepositoryIssueFilter,
    RepositoryRef, StateFilter, UserIssueFilter,
};

/// Results requested per listing call; only the first page is read
const PAGE_SIZE: u8 = 100;

/// GitHub backend using octocrab
pub struct GitHubBackend {
    client: Octocrab,
}

#[derive(Deserialize)]
struct UserLogin {
    login: String,
}

#[derive(Serialize)]
struct CurrentUserIssuesParams {
    filter: &'static str,
    state: &'static str,
    per_page: u8,
}

impl GitHubBackend {
    /// Create a new GitHub backend with a personal access token
    pub fn new(token: &str) -> anyhow::Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .context("Failed to create GitHub client")?;

        Ok(Self { client })
    }

    /// Convert an octocrab repository to our RemoteRepository type
    fn convert_repository(repo: octocrab::models::Repository) -> RemoteRepository {
        let owner = repo
            .owner
            .map(|owner| owner.login)
            .or_else(|| {
                repo.full_name
                    .as_deref()
                    .and_then(|full| full.split_once('/'))
                    .map(|(owner, _)| owner.to_string())
            })
            .unwrap_or_default();

        RemoteRepository {
            owner,
            name: repo.name,
            is_fork: repo.fork.unwrap_or(false),
            parent: repo.parent.map(|parent| Box::new(Self::convert_repository(*parent))),
        }
    }

    /// Convert an octocrab issue to our RemoteIssue type
    fn convert_issue(issue: octocrab::models::issues::Issue) -> RemoteIssue {
        let state = match issue.state {
            octocrab::models::IssueState::Closed => IssueState::Closed,
            _ => IssueState::Open,
        };

        RemoteIssue {
            number: issue.number,
            title: issue.title,
            body: issue.body.unwrap_or_default(),
            state,
            author: issue.user.login,
            assignees: issue.assignees.into_iter().map(|a| a.login).collect(),
            labels: issue
                .labels
                .into_iter()
                .map(|l| Label {
                    name: l.name,
                    color: l.color,
                })
                .collect(),
            closed_by: issue.closed_by.map(|u| u.login),
            closed_at: issue.closed_at,
            repository: repository_from_api_url(issue.repository_url.as_str()),
        }
    }
}

/// `https://api.github.com/repos/{owner}/{name}` -> owner/name
fn repository_from_api_url(api_url: &str) -> Option<RepositoryRef> {
    let url = Url::parse(api_url).ok()?;
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    if segments.next()? != "repos" {
        return None;
    }

    let owner = segments.next()?;
    let name = segments.next()?;
    Some(RepositoryRef::new(owner, name))
}

fn octocrab_state(state: IssueState) -> octocrab::models::IssueState {
    match state {
        IssueState::Open => octocrab::models::IssueState::Open,
        IssueState::Closed => octocrab::models::IssueState::Closed,
    }
}

fn params_state(state: StateFilter) -> octocrab::params::State {
    match state {
        StateFilter::Open => octocrab::params::State::Open,
        StateFilter::Closed => octocrab::params::State::Closed,
        StateFilter::All => octocrab::params::State::All,
    }
}

fn query_state(state: StateFilter) -> &'static str {
    match state {
        StateFilter::Open => "open",
        StateFilter::Closed => "closed",
        StateFilter::All => "all",
    }
}

fn query_filter(relation: Relation) -> &'static str {
    match relation {
        Relation::Assigned => "assigned",
        Relation::Created => "created",
        Relation::Mentioned => "mentioned",
    }
}

/// Separates 404 responses from every other failure
fn classify(context: &'static str) -> impl FnOnce(octocrab::Error) -> BackendError {
    move |err| {
        if let octocrab::Error::GitHub { source, .. } = &err {
            if source.status_code.as_u16() == 404 {
                return BackendError::NotFound;
            }
        }
        BackendError::Remote(anyhow::Error::new(err).context(context))
    }
}

#[async_trait]
impl Backend for GitHubBackend {
    async fn get_repository(&self, repository: &RepositoryRef) -> BackendResult<RemoteRepository> {
        tracing::debug!(%repository, "fetching repository");

        let repo = self
            .client
            .repos(&repository.owner, &repository.name)
            .get()
            .await
            .map_err(classify("Failed to get GitHub repository"))?;

        Ok(Self::convert_repository(repo))
    }

    async fn get_issue(&self, repository: &RepositoryRef, number: u64) -> BackendResult<RemoteIssue> {
        tracing::debug!(%repository, number, "fetching issue");

        let issue = self
            .client
            .issues(&repository.owner, &repository.name)
            .get(number)
            .await
            .map_err(classify("Failed to get GitHub issue"))?;

        Ok(Self::convert_issue(issue))
    }

    async fn create_issue(&self, repository: &RepositoryRef, issue: &NewIssue) -> BackendResult<RemoteIssue> {
        let handler = self.client.issues(&repository.owner, &repository.name);
        let mut request = handler.create(issue.title.as_str());

        if let Some(body) = &issue.body {
            request = request.body(body.as_str());
        }
        if !issue.assignees.is_empty() {
            request = request.assignees(issue.assignees.clone());
        }
        if !issue.labels.is_empty() {
            request = request.labels(issue.labels.clone());
        }

        let created = request
            .send()
            .await
            .map_err(classify("Failed to create GitHub issue"))?;

        Ok(Self::convert_issue(created))
    }

    async fn update_issue_state(
        &self,
        repository: &RepositoryRef,
        number: u64,
        state: IssueState,
    ) -> BackendResult<RemoteIssue> {
        tracing::debug!(%repository, number, %state, "updating issue state");

        let issue = self
            .client
            .issues(&repository.owner, &repository.name)
            .update(number)
            .state(octocrab_state(state))
            .send()
            .await
            .map_err(classify("Failed to update GitHub issue"))?;

        Ok(Self::convert_issue(issue))
    }

    async fn create_comment(&self, repository: &RepositoryRef, number: u64, body: &str) -> BackendResult<()> {
        tracing::debug!(%repository, number, "adding comment");

        self.client
            .issues(&repository.owner, &repository.name)
            .create_comment(number, body)
            .await
            .map_err(classify("Failed to comment on GitHub issue"))?;

        Ok(())
    }

    async fn get_current_user(&self) -> BackendResult<String> {
        let user = self
            .client
            .current()
            .user()
            .await
            .map_err(classify("Failed to get the authenticated GitHub user"))?;

        Ok(user.login)
    }

    async fn get_user(&self, login: &str) -> BackendResult<String> {
        // The login becomes part of the request path
        if !is_valid_login(login) {
            tracing::debug!(login, "rejecting malformed login");
            return Err(BackendError::NotFound);
        }

        let user: UserLogin = self
            .client
            .get(format!("/users/{login}"), None::<&()>)
            .await
            .map_err(classify("Failed to get GitHub user"))?;

        Ok(user.login)
    }

    async fn list_issues_for_repository(
        &self,
        repository: &RepositoryRef,
        filter: &RepositoryIssueFilter,
    ) -> BackendResult<Vec<RemoteIssue>> {
        tracing::debug!(%repository, ?filter, "listing repository issues");

        let handler = self.client.issues(&repository.owner, &repository.name);
        let mut request = handler
            .list()
            .state(params_state(filter.state))
            .per_page(PAGE_SIZE);

        if let Some(assignee) = filter.assignee.as_deref() {
            request = request.assignee(assignee);
        }
        if let Some(creator) = filter.creator.as_deref() {
            request = request.creator(creator);
        }
        if let Some(mentioned) = filter.mentioned.as_deref() {
            request = request.mentioned(mentioned);
        }

        let page = request
            .send()
            .await
            .map_err(classify("Failed to list GitHub issues"))?;

        Ok(page.items.into_iter().map(Self::convert_issue).collect())
    }

    async fn list_issues_for_current_user(&self, filter: &UserIssueFilter) -> BackendResult<Vec<RemoteIssue>> {
        tracing::debug!(?filter, "listing issues for the authenticated user");

        let params = CurrentUserIssuesParams {
            filter: query_filter(filter.relation),
            state: query_state(filter.state),
            per_page: PAGE_SIZE,
        };

        let issues: Vec<octocrab::models::issues::Issue> = self
            .client
            .get("/issues", Some(&params))
            .await
            .map_err(classify("Failed to list GitHub issues"))?;

        Ok(issues.into_iter().map(Self::convert_issue).collect())
    }
}
