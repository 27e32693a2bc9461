//! Candidate selection from the organization listing.

use crate::config::RepoSelection;
use crate::discovery::RepositoryRef;
use tracing::debug;

/// Resolves the listing against the selection rules and the limit.
///
/// The listing order is preserved. Inclusion filtering runs first, then
/// every excluded name is removed, then the result is truncated to `limit`
/// entries. Inclusion names that are not in the listing are ignored.
#[must_use]
pub fn select_candidates(
    listing: Vec<RepositoryRef>,
    selection: &RepoSelection,
    limit: Option<usize>,
) -> Vec<RepositoryRef> {
    let listed = listing.len();
    for missing in selection
        .inclusions()
        .iter()
        .filter(|name| !listing.iter().any(|repo| repo.name == *name))
    {
        debug!(repo = %missing, "Included repository not found in organization");
    }

    let mut candidates: Vec<RepositoryRef> = listing
        .into_iter()
        .filter(|repo| {
            let included = selection.is_included(&repo.name);
            if !included {
                debug!(repo = %repo.name, "Skipping repository not in inclusion list");
            }
            included
        })
        .filter(|repo| {
            let excluded = selection.is_excluded(&repo.name);
            if excluded {
                debug!(repo = %repo.name, "Skipping excluded repository");
            }
            !excluded
        })
        .collect();

    if let Some(limit) = limit {
        candidates.truncate(limit);
    }

    debug!(listed, selected = candidates.len(), "Selected candidates");
    candidates
}
