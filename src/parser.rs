use pest::Parser;
use pest_derive::Parser;

use crate::error::{ResolveError, ResolveResult};
use crate::types::RepositoryRef;

#[derive(Parser)]
#[grammar = "reference.pest"]
pub struct ReferenceParser;

/// A parsed issue reference: `42` or `owner/repo#42`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReference {
    /// `None` when the repository has to come from the working directory
    pub repository: Option<RepositoryRef>,
    pub number: u64,
}

/// Parse an issue reference
pub fn parse_reference(reference: &str) -> ResolveResult<IssueReference> {
    let invalid = || ResolveError::InvalidReference(reference.to_string());

    let pair = ReferenceParser::parse(Rule::reference, reference)
        .map_err(|_| invalid())?
        .next()
        .ok_or_else(invalid)?;

    let mut owner = None;
    let mut repo = None;
    let mut number = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::owner => owner = Some(inner.as_str()),
            Rule::repo => repo = Some(inner.as_str()),
            Rule::number => number = Some(inner.as_str()),
            _ => {}
        }
    }

    let number = number
        .and_then(|n| n.parse::<u64>().ok())
        .filter(|n| *n > 0)
        .ok_or_else(invalid)?;

    let repository = match (owner, repo) {
        (Some(owner), Some(repo)) => Some(RepositoryRef::new(owner, repo)),
        _ => None,
    };

    Ok(IssueReference { repository, number })
}

/// Parse an `owner/name` repository argument
pub fn parse_repository(value: &str) -> ResolveResult<RepositoryRef> {
    let invalid = || ResolveError::InvalidReference(value.to_string());

    let pair = ReferenceParser::parse(Rule::repository, value)
        .map_err(|_| invalid())?
        .next()
        .ok_or_else(invalid)?;

    let mut owner = None;
    let mut repo = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::owner => owner = Some(inner.as_str()),
            Rule::repo => repo = Some(inner.as_str()),
            _ => {}
        }
    }

    match (owner, repo) {
        (Some(owner), Some(repo)) => Ok(RepositoryRef::new(owner, repo)),
        _ => Err(invalid()),
    }
}

/// GitHub logins are alphanumerics and dashes, never starting with a dash
pub fn is_valid_login(login: &str) -> bool {
    ReferenceParser::parse(Rule::user, login).is_ok()
}

/// clap value parser that checks the reference format up front and keeps the raw string
pub fn validate_reference(value: &str) -> Result<String, String> {
    parse_reference(value)
        .map(|_| value.to_string())
        .map_err(|e| e.to_string())
}

/// clap value parser for `--repo`
pub fn validate_repository(value: &str) -> Result<String, String> {
    parse_repository(value)
        .map(|_| value.to_string())
        .map_err(|_| format!("'{}' must be in the format owner/repo", value))
}
