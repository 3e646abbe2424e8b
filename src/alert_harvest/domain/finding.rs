use chrono::{DateTime, Utc};
use serde::Serialize;

use super::repository::RepoRef;

/// Security severity reported by the scanning tool for a rule.
///
/// Anything the upstream reports outside these four levels (or omits
/// entirely) carries no severity and is excluded from both output buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecuritySeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl SecuritySeverity {
    /// Parse the upstream severity label. Unrecognized or absent labels map
    /// to `None` rather than an error; they are valid findings, just not
    /// routable to an output bucket.
    pub fn parse(label: Option<&str>) -> Option<Self> {
        match label {
            Some("critical") => Some(SecuritySeverity::Critical),
            Some("high") => Some(SecuritySeverity::High),
            Some("medium") => Some(SecuritySeverity::Medium),
            Some("low") => Some(SecuritySeverity::Low),
            _ => None,
        }
    }
}

/// One open static-analysis alert, extracted from a raw API record.
///
/// Immutable once built. Field names in the serialized form match the
/// published snapshot schema consumed downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub repository: String,
    pub repo_url: String,
    pub alert_number: Option<u64>,
    pub html_url: Option<String>,
    pub state: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub rule_id: Option<String>,
    pub rule_description: Option<String>,
    pub severity: Option<SecuritySeverity>,
    pub original_severity: Option<String>,
    pub message: Option<String>,
}

impl Finding {
    /// Builder seeded with the owning repository. The remaining fields are
    /// filled by the extraction step at the API boundary.
    pub fn for_repository(repo: &RepoRef) -> Self {
        Self {
            repository: repo.full_name().to_string(),
            repo_url: repo.html_url().to_string(),
            alert_number: None,
            html_url: None,
            state: None,
            created_at: None,
            rule_id: None,
            rule_description: None,
            severity: None,
            original_severity: None,
            message: None,
        }
    }
}
