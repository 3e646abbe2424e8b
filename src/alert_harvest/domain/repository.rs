use crate::shared::error::HarvestError;
use crate::shared::Result;

/// Reference to one repository discovered by topic search.
///
/// Read-only input to the finding fetcher; the full name is always in
/// `owner/name` form, which is enforced at construction so URL paths built
/// from it later cannot be malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    full_name: String,
    html_url: String,
}

impl RepoRef {
    pub fn new(full_name: String, html_url: String) -> Result<Self> {
        let Some((owner, name)) = full_name.split_once('/') else {
            return Err(HarvestError::InvalidRepositoryName { full_name }.into());
        };
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(HarvestError::InvalidRepositoryName { full_name }.into());
        }
        Ok(Self {
            full_name,
            html_url,
        })
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn html_url(&self) -> &str {
        &self.html_url
    }

    /// Owner and repository name as separate path segments.
    pub fn path_segments(&self) -> (&str, &str) {
        // Validated in new(), the '/' is always present.
        self.full_name
            .split_once('/')
            .unwrap_or((&self.full_name, ""))
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name)
    }
}
