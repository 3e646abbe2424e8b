use crate::alert_harvest::domain::{Finding, RepoRef};
use crate::shared::Result;
use async_trait::async_trait;

/// AlertSource port for discovering repositories and their open findings
///
/// The one error implementations may return from either method is the fatal
/// retry-budget exhaustion; every recoverable upstream condition (feature not
/// enabled, no access, partial pagination) is absorbed into an empty or
/// truncated sequence so one repository can never sink the run.
#[async_trait]
pub trait AlertSource: Send + Sync {
    /// Repositories whose topic list contains `topic`, in the order the
    /// search endpoint returned them.
    async fn repositories_by_topic(&self, topic: &str) -> Result<Vec<RepoRef>>;

    /// Open findings for one repository, in pagination order. Empty when the
    /// scanning feature is not enabled or the credential has no access.
    async fn open_findings(&self, repo: &RepoRef) -> Result<Vec<Finding>>;
}
