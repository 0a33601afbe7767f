use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use ghi::backend::Backend;
use ghi::config::{settings_path, Settings};
use ghi::create::create_issue;
use ghi::criteria::{ListFlags, ListingCriteriaBuilder};
use ghi::error::ResolveError;
use ghi::locator::RepositoryLocator;
use ghi::parser::parse_repository;
use ghi::resolve::{IssueResolver, RepositoryResolver};
use ghi::transition::transition;
use ghi::types::{IssueQuery, IssueState, ListingCriteria, NewIssue, Relation, RemoteIssue, RemoteRepository};

/// Everything a command needs to talk to GitHub from a directory
pub struct Session<B: Backend> {
    pub backend: B,
    pub locator: RepositoryLocator,
    pub working_dir: PathBuf,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B, working_dir: PathBuf) -> Self {
        Self {
            backend,
            locator: RepositoryLocator::default(),
            working_dir,
        }
    }

    fn repositories(&self) -> RepositoryResolver<'_, B> {
        RepositoryResolver::new(&self.backend, &self.locator, self.working_dir.clone())
    }
}

/// Report a resolution failure on stderr and turn it into the exit code.
/// Remote failures are not reported here; they abort the invocation.
fn report(err: ResolveError) -> Result<ExitCode> {
    if !err.is_recoverable() {
        return Err(err.into());
    }

    if err.is_warning() {
        eprintln!("warning: {}", err);
    } else {
        eprintln!("error: {}", err);
    }
    Ok(ExitCode::FAILURE)
}

/// Execute the list command
pub async fn list<B: Backend>(session: &Session<B>, flags: ListFlags) -> Result<ExitCode> {
    let builder = ListingCriteriaBuilder::new(session.repositories());
    let mut warnings = Vec::new();
    let built = builder.build(flags, &mut warnings).await;

    for warning in &warnings {
        eprintln!("warning: {}", warning);
    }

    let criteria = match built {
        Ok(criteria) => criteria,
        Err(e) => return report(e),
    };

    let issues = match criteria.query() {
        IssueQuery::Repository { repository, filter } => {
            session.backend.list_issues_for_repository(&repository, &filter).await?
        }
        IssueQuery::CurrentUser(filter) => session.backend.list_issues_for_current_user(&filter).await?,
    };

    print!("{}", render_listing(&criteria, &issues));
    Ok(ExitCode::SUCCESS)
}

/// Execute the view command
pub async fn view<B: Backend>(session: &Session<B>, reference: &str) -> Result<ExitCode> {
    let resolver = IssueResolver::new(session.repositories());

    match resolver.resolve_issue(reference).await {
        Ok((issue, repository)) => {
            print!("{}", render_issue(&issue, &repository));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => report(e),
    }
}

/// Execute the new command
pub async fn new<B: Backend>(session: &Session<B>, repo: Option<&str>, issue: NewIssue) -> Result<ExitCode> {
    let explicit = match repo.map(parse_repository).transpose() {
        Ok(explicit) => explicit,
        Err(e) => return report(e),
    };

    match create_issue(&session.repositories(), explicit.as_ref(), &issue).await {
        Ok(created) => {
            println!("Created {}", created);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => report(e),
    }
}

/// Execute the close and open commands
pub async fn set_state<B: Backend>(
    session: &Session<B>,
    reference: &str,
    target: IssueState,
    comment: Option<&str>,
) -> Result<ExitCode> {
    let resolver = IssueResolver::new(session.repositories());

    match transition(&resolver, reference, target, comment).await {
        Ok(issue) => {
            let verb = match target {
                IssueState::Closed => "Closed",
                IssueState::Open => "Re-opened",
            };
            println!("{} {}", verb, issue);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => report(e),
    }
}

/// Execute the auth command
pub fn auth(token: &str) -> Result<()> {
    let path = settings_path()?;
    let mut settings = Settings::load_from_path(&path)?;
    settings.token = Some(token.to_string());
    settings
        .save_to_path(&path)
        .context("Failed to save GitHub access token")?;

    println!("GitHub access token saved to {}", path.display());
    Ok(())
}

fn listing_header(criteria: &ListingCriteria) -> String {
    let mut header = format!("Listing {} issues ", criteria.state);

    if !criteria.include_all_users {
        let relation = match criteria.relation {
            Relation::Assigned => "assigned to",
            Relation::Created => "created by",
            Relation::Mentioned => "mentioning",
        };
        header.push_str(&format!("{} @{} ", relation, criteria.user));
    }

    if let Some(repository) = criteria.repository_ref() {
        header.push_str(&format!("in {}", repository));
    }

    header.trim_end().to_string()
}

fn issue_line(issue: &RemoteIssue, indent: usize) -> String {
    let mut line = format!("{}#{} {} @{}", "  ".repeat(indent), issue.number, issue.title, issue.author);
    for label in &issue.labels {
        line.push_str(&format!(" [{}]", label.name));
    }
    line
}

fn render_listing(criteria: &ListingCriteria, issues: &[RemoteIssue]) -> String {
    let mut out = format!("{}\n\n", listing_header(criteria));

    if issues.is_empty() {
        out.push_str("-- No issues found --\n");
        return out;
    }

    // Issues for a specific repository are shown flat
    if criteria.repository_ref().is_some() {
        for issue in issues {
            out.push_str(&issue_line(issue, 0));
            out.push('\n');
        }
        return out;
    }

    let mut grouped: BTreeMap<String, Vec<&RemoteIssue>> = BTreeMap::new();
    for issue in issues {
        let key = issue
            .repository
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "(unknown repository)".to_string());
        grouped.entry(key).or_default().push(issue);
    }

    for (repository, issues) in grouped {
        out.push_str(&format!("» {}\n", repository));
        for issue in issues {
            out.push_str(&issue_line(issue, 1));
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

fn render_issue(issue: &RemoteIssue, repository: &RemoteRepository) -> String {
    let mut out = format!("{} ({}#{})\n\n", issue.title, repository.full_name(), issue.number);

    if !issue.body.is_empty() {
        out.push_str(&format!("{}\n\n", issue.body));
    }

    if !issue.labels.is_empty() {
        let labels: Vec<String> = issue.labels.iter().map(|l| format!("[{}]", l.name)).collect();
        out.push_str(&format!("{}\n\n", labels.join(" ")));
    }

    out.push_str(&format!("Opened by: {}\n", issue.author));

    out.push_str(&format!("Status: {}", issue.state));
    if issue.state == IssueState::Closed {
        if let (Some(closed_by), Some(closed_at)) = (&issue.closed_by, issue.closed_at) {
            out.push_str(&format!(" by {} on {}", closed_by, closed_at.format("%Y-%m-%d")));
        }
    }
    out.push('\n');

    if issue.state == IssueState::Open {
        let assigned = if issue.assignees.is_empty() {
            "UNASSIGNED".to_string()
        } else {
            issue.assignees.join(", ")
        };
        out.push_str(&format!("Assigned to: {}\n", assigned));
    }

    out
}
