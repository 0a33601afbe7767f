use crate::backend::{Backend, OrNotFound};
use crate::error::{ResolveError, ResolveResult};
use crate::parser::parse_repository;
use crate::resolve::RepositoryResolver;
use crate::types::{ListingCriteria, Relation, RemoteRepository, StateFilter};

/// Raw `list` options
#[derive(Debug, Clone, Default)]
pub struct ListFlags {
    pub repo: Option<String>,
    pub user: Option<String>,
    pub relation: Relation,
    pub state: StateFilter,
    pub all: bool,
}

pub const ALL_WITHOUT_REPOSITORY: &str =
    "The --all flag is only valid when listing issues for a specific repository. Flag will be ignored.";

/// Builds the listing criteria from the `list` flags, the working directory
/// and the authenticated caller.
///
/// Listing uses the repository exactly as named; forks are not redirected.
/// Non-fatal warnings are pushed to the caller's list as they arise, so they
/// survive a later failure.
pub struct ListingCriteriaBuilder<'a, B: Backend + ?Sized> {
    repositories: RepositoryResolver<'a, B>,
}

impl<'a, B: Backend + ?Sized> ListingCriteriaBuilder<'a, B> {
    pub fn new(repositories: RepositoryResolver<'a, B>) -> Self {
        Self { repositories }
    }

    pub async fn build(&self, flags: ListFlags, warnings: &mut Vec<String>) -> ResolveResult<ListingCriteria> {
        let backend = self.repositories.backend();
        let mut include_all_users = flags.all;

        let repository = match &flags.repo {
            Some(repo) => Some(self.fetch_repo_option(repo).await?),
            None => self.repositories.discover().await?,
        };

        if include_all_users && repository.is_none() {
            tracing::debug!("ignoring --all without a repository");
            warnings.push(ALL_WITHOUT_REPOSITORY.to_string());
            include_all_users = false;
        }

        let current_user = backend.get_current_user().await?;

        let user = match &flags.user {
            Some(login) => backend
                .get_user(login)
                .await
                .or_not_found(|| ResolveError::InvalidUser(login.clone()))?,
            None => current_user.clone(),
        };

        // The cross-repository endpoint only knows about the caller
        if repository.is_none() && !user.eq_ignore_ascii_case(&current_user) {
            return Err(ResolveError::UserFilterRequiresRepository);
        }

        let criteria = ListingCriteria {
            owner: repository.as_ref().map(|r| r.owner.clone()),
            repository: repository.map(|r| r.name),
            user,
            relation: flags.relation,
            state: flags.state,
            include_all_users,
        };
        tracing::debug!(?criteria, "built listing criteria");

        Ok(criteria)
    }

    async fn fetch_repo_option(&self, repo: &str) -> ResolveResult<RemoteRepository> {
        let invalid = || ResolveError::InvalidRepository(repo.to_string());
        let reference = parse_repository(repo).map_err(|_| invalid())?;

        self.repositories
            .backend()
            .get_repository(&reference)
            .await
            .or_not_found(invalid)
    }
}
