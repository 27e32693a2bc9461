//! Organization listing through the GitHub REST API.

use crate::discovery::rate_limit::ensure_core_rate_limit;
use crate::discovery::{DiscoveryError, RepositoryRef, RepositorySource};
use octocrab::models::Repository;
use octocrab::Octocrab;
use tracing::{debug, info, info_span, Instrument};
use url::Url;

/// Results per page for repository listing.
const RESULTS_PER_PAGE: u8 = 100;

/// Branch assumed when the listing omits a default branch.
const FALLBACK_BRANCH: &str = "main";

/// Lists organization repositories with an authenticated octocrab client.
#[derive(Debug, Clone)]
pub struct GitHubSource {
    octocrab: Octocrab,
}

impl GitHubSource {
    /// Builds a client authenticated with a personal access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(token: &str) -> Result<Self, octocrab::Error> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .build()?;
        Ok(Self { octocrab })
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn from_client(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }
}

impl RepositorySource for GitHubSource {
    async fn list_repositories(
        &self,
        organization: &str,
    ) -> Result<Vec<RepositoryRef>, DiscoveryError> {
        let span = info_span!("list_repositories", org = %organization);

        async {
            ensure_core_rate_limit(&self.octocrab).await?;

            let first = self
                .octocrab
                .orgs(organization)
                .list_repos()
                .per_page(RESULTS_PER_PAGE)
                .send()
                .await
                .map_err(|e| classify_error(e, organization))?;

            let mut repositories: Vec<RepositoryRef> = first
                .items
                .iter()
                .map(|repo| to_repository_ref(organization, repo))
                .collect();

            let mut next = first.next;
            while next.is_some() {
                ensure_core_rate_limit(&self.octocrab).await?;

                let Some(page) = self.octocrab.get_page::<Repository>(&next).await? else {
                    break;
                };
                debug!(count = page.items.len(), "Fetched repository page");
                repositories.extend(
                    page.items
                        .iter()
                        .map(|repo| to_repository_ref(organization, repo)),
                );
                next = page.next;
            }

            info!(count = repositories.len(), "Listed organization repositories");
            Ok::<_, DiscoveryError>(repositories)
        }
        .instrument(span)
        .await
    }
}

/// Maps a 404 on the organization endpoint to a dedicated error.
fn classify_error(error: octocrab::Error, organization: &str) -> DiscoveryError {
    let not_found = matches!(
        &error,
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404
    );

    if not_found {
        DiscoveryError::OrganizationNotFound {
            organization: organization.to_string(),
        }
    } else {
        DiscoveryError::GitHubError(error)
    }
}

fn to_repository_ref(organization: &str, repo: &Repository) -> RepositoryRef {
    build_repository_ref(
        organization,
        &repo.name,
        repo.clone_url.as_ref(),
        repo.html_url.as_ref(),
        repo.default_branch.as_deref(),
    )
}

/// Fills in the clone URL and default branch when the API leaves them out.
fn build_repository_ref(
    organization: &str,
    name: &str,
    clone_url: Option<&Url>,
    html_url: Option<&Url>,
    default_branch: Option<&str>,
) -> RepositoryRef {
    let clone_url = clone_url.map_or_else(
        || format!("https://github.com/{organization}/{name}.git"),
        Url::to_string,
    );
    let default_branch = default_branch.unwrap_or(FALLBACK_BRANCH);

    let repository = RepositoryRef::new(name, clone_url, default_branch);
    match html_url {
        Some(url) => repository.with_html_url(url.as_str()),
        None => repository,
    }
}
