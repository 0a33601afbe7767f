use chrono::{DateTime, Utc};
use clap::ValueEnum;
use std::fmt;

/// Identifies a repository on the service by owner and name
#[derive(Debug, Clone, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

// Owner logins are case-insensitive on the service.
impl PartialEq for RepositoryRef {
    fn eq(&self, other: &Self) -> bool {
        self.owner.eq_ignore_ascii_case(&other.owner) && self.name == other.name
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A single issue within a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub repository: RepositoryRef,
    pub number: u64,
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repository, self.number)
    }
}

/// Repository metadata as reported by the service
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRepository {
    pub owner: String,
    pub name: String,
    pub is_fork: bool,
    pub parent: Option<Box<RemoteRepository>>,
}

impl RemoteRepository {
    pub fn reference(&self) -> RepositoryRef {
        RepositoryRef::new(&self.owner, &self.name)
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
    Closed,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Open => f.write_str("open"),
            IssueState::Closed => f.write_str("closed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub color: String,
}

/// An issue as reported by the service
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteIssue {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub state: IssueState,
    pub author: String,
    pub assignees: Vec<String>,
    pub labels: Vec<Label>,
    pub closed_by: Option<String>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Repository the issue lives in, when the listing endpoint reports it
    pub repository: Option<RepositoryRef>,
}

/// Data for a new issue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewIssue {
    pub title: String,
    pub body: Option<String>,
    pub assignees: Vec<String>,
    pub labels: Vec<String>,
}

/// How the listed issues relate to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Relation {
    #[default]
    Assigned,
    Created,
    Mentioned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StateFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateFilter::Open => f.write_str("open"),
            StateFilter::Closed => f.write_str("closed"),
            StateFilter::All => f.write_str("all"),
        }
    }
}

/// Filter for listing the issues of one repository.
///
/// At most one of `assignee`, `creator` and `mentioned` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryIssueFilter {
    pub assignee: Option<String>,
    pub creator: Option<String>,
    pub mentioned: Option<String>,
    pub state: StateFilter,
}

/// Filter for listing issues across every repository visible to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserIssueFilter {
    pub relation: Relation,
    pub state: StateFilter,
}

/// Fully resolved criteria for the `list` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCriteria {
    pub owner: Option<String>,
    pub repository: Option<String>,
    pub user: String,
    pub relation: Relation,
    pub state: StateFilter,
    pub include_all_users: bool,
}

/// The listing endpoint a set of criteria maps onto
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueQuery {
    Repository {
        repository: RepositoryRef,
        filter: RepositoryIssueFilter,
    },
    CurrentUser(UserIssueFilter),
}

impl ListingCriteria {
    pub fn repository_ref(&self) -> Option<RepositoryRef> {
        match (&self.owner, &self.repository) {
            (Some(owner), Some(name)) => Some(RepositoryRef::new(owner, name)),
            _ => None,
        }
    }

    pub fn query(&self) -> IssueQuery {
        let Some(repository) = self.repository_ref() else {
            return IssueQuery::CurrentUser(UserIssueFilter {
                relation: self.relation,
                state: self.state,
            });
        };

        let mut filter = RepositoryIssueFilter {
            state: self.state,
            ..Default::default()
        };

        if !self.include_all_users {
            let user = Some(self.user.clone());
            match self.relation {
                Relation::Assigned => filter.assignee = user,
                Relation::Created => filter.creator = user,
                Relation::Mentioned => filter.mentioned = user,
            }
        }

        IssueQuery::Repository { repository, filter }
    }
}
