//! Repository reference resolved from the organization listing.

use serde::Serialize;

/// A repository to scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryRef {
    /// Repository name, without the owner.
    pub name: String,

    /// URL passed to the checkout collaborator.
    pub clone_url: String,

    /// Default branch name (e.g., "main").
    pub default_branch: String,

    /// Browser URL of the repository, when the listing provides one.
    pub html_url: Option<String>,
}

impl RepositoryRef {
    /// Creates a reference without a browser URL.
    pub fn new(
        name: impl Into<String>,
        clone_url: impl Into<String>,
        default_branch: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            clone_url: clone_url.into(),
            default_branch: default_branch.into(),
            html_url: None,
        }
    }

    /// Sets the browser URL.
    #[must_use]
    pub fn with_html_url(mut self, html_url: impl Into<String>) -> Self {
        self.html_url = Some(html_url.into());
        self
    }

    /// URL written to reports: the browser URL, or the clone URL without it.
    #[must_use]
    pub fn report_url(&self) -> &str {
        self.html_url.as_deref().unwrap_or(&self.clone_url)
    }
}
