use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::alert_harvest::domain::{Finding, RepoRef, SecuritySeverity};
use crate::ports::outbound::{AlertSource, ApiResponse, HttpGateway};
use crate::shared::error::HarvestError;
use crate::shared::{Result, COMPONENT};

use super::pagination::{collect_all, Page};
use super::request_executor::RateLimitedExecutor;

/// Public GitHub REST endpoint root.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Page size requested from both listing endpoints.
const PAGE_SIZE: usize = 100;

/// Pause before each repository's alert fetch, smoothing request rate over
/// the whole repository set.
const PER_REPO_DELAY: Duration = Duration::from_secs(1);

/// Cooldown after the repository search, letting the shared quota recover
/// before the higher-volume per-repository phase starts.
const POST_SEARCH_COOLDOWN: Duration = Duration::from_secs(2);

/// Static-analysis tool whose alerts are harvested.
const TOOL_NAME: &str = "CodeQL";

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    items: Vec<RawRepo>,
}

#[derive(Debug, Deserialize)]
struct RawRepo {
    full_name: String,
    #[serde(default)]
    html_url: String,
}

/// Raw alert record as the code-scanning endpoint returns it. Every field is
/// optional; absence becomes a `None` in the extracted [`Finding`] instead of
/// a decode failure.
#[derive(Debug, Deserialize)]
struct RawAlert {
    number: Option<u64>,
    html_url: Option<String>,
    state: Option<String>,
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    rule: RawRule,
    most_recent_instance: Option<RawInstance>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRule {
    id: Option<String>,
    description: Option<String>,
    security_severity_level: Option<String>,
    severity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawInstance {
    message: Option<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    text: Option<String>,
}

/// GithubAlertSource adapter - repository discovery and alert fetching over
/// the GitHub REST API
///
/// Both operations run through the shared [`RateLimitedExecutor`] and the
/// paginated collector, so there is exactly one outstanding request at a
/// time and every throttling signal feeds the same budget.
pub struct GithubAlertSource<G: HttpGateway> {
    executor: RateLimitedExecutor<G>,
    api_base: String,
}

impl<G: HttpGateway> GithubAlertSource<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_api_base(gateway, GITHUB_API_BASE)
    }

    pub fn with_api_base(gateway: G, api_base: impl Into<String>) -> Self {
        Self {
            executor: RateLimitedExecutor::new(gateway),
            api_base: api_base.into(),
        }
    }

    fn alerts_url(&self, repo: &RepoRef) -> String {
        let (owner, name) = repo.path_segments();
        format!(
            "{}/repos/{}/{}/code-scanning/alerts",
            self.api_base,
            urlencoding::encode(owner),
            urlencoding::encode(name)
        )
    }
}

fn parse_search_page(response: &ApiResponse) -> Result<Page<RawRepo>> {
    let page: SearchPage = response.json()?;
    Ok(Page {
        declared_total: Some(page.total_count as usize),
        items: page.items,
    })
}

fn parse_alert_page(response: &ApiResponse) -> Result<Page<RawAlert>> {
    Ok(Page {
        items: response.json()?,
        declared_total: None,
    })
}

/// Extraction boundary from a raw alert record to the immutable domain
/// finding. Missing or renamed upstream fields surface here, not downstream.
fn extract_finding(alert: RawAlert, repo: &RepoRef) -> Finding {
    Finding {
        alert_number: alert.number,
        html_url: alert.html_url,
        state: alert.state,
        created_at: alert.created_at,
        rule_id: alert.rule.id,
        rule_description: alert.rule.description,
        severity: SecuritySeverity::parse(alert.rule.security_severity_level.as_deref()),
        original_severity: alert.rule.severity,
        message: alert
            .most_recent_instance
            .and_then(|instance| instance.message)
            .and_then(|message| message.text),
        ..Finding::for_repository(repo)
    }
}

/// Swallow everything except the fatal error classes, logging a warning and
/// degrading to an empty sequence. One resource's failure must not prevent
/// processing of the remainder.
fn absorb_nonfatal<T>(result: Result<Vec<T>>, resource: &str) -> Result<Vec<T>> {
    match result {
        Ok(items) => Ok(items),
        Err(error) => {
            let fatal = error
                .downcast_ref::<HarvestError>()
                .is_some_and(HarvestError::is_fatal);
            if fatal {
                Err(error)
            } else {
                warn!(
                    component = COMPONENT,
                    resource,
                    error = %error,
                    "fetch failed, continuing with empty result"
                );
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl<G: HttpGateway> AlertSource for GithubAlertSource<G> {
    async fn repositories_by_topic(&self, topic: &str) -> Result<Vec<RepoRef>> {
        let url = format!("{}/search/repositories", self.api_base);
        let query = vec![
            ("q".to_string(), format!("topic:{topic}")),
            ("per_page".to_string(), PAGE_SIZE.to_string()),
        ];

        let raw = absorb_nonfatal(
            collect_all(
                &self.executor,
                &url,
                &query,
                PAGE_SIZE,
                "repository search",
                parse_search_page,
            )
            .await,
            "repository search",
        )?;

        let mut repos = Vec::with_capacity(raw.len());
        for item in raw {
            match RepoRef::new(item.full_name, item.html_url) {
                Ok(repo) => repos.push(repo),
                Err(error) => warn!(
                    component = COMPONENT,
                    error = %error,
                    "skipping malformed search result"
                ),
            }
        }

        info!(
            component = COMPONENT,
            topic,
            count = repos.len(),
            "repository discovery complete"
        );
        tokio::time::sleep(POST_SEARCH_COOLDOWN).await;
        Ok(repos)
    }

    async fn open_findings(&self, repo: &RepoRef) -> Result<Vec<Finding>> {
        tokio::time::sleep(PER_REPO_DELAY).await;

        let url = self.alerts_url(repo);
        let query = vec![
            ("tool_name".to_string(), TOOL_NAME.to_string()),
            ("state".to_string(), "open".to_string()),
            ("per_page".to_string(), PAGE_SIZE.to_string()),
        ];

        let alerts = absorb_nonfatal(
            collect_all(
                &self.executor,
                &url,
                &query,
                PAGE_SIZE,
                repo.full_name(),
                parse_alert_page,
            )
            .await,
            repo.full_name(),
        )?;

        Ok(alerts
            .into_iter()
            .map(|alert| extract_finding(alert, repo))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedGateway {
        responses: Mutex<VecDeque<ApiResponse>>,
        calls: AtomicUsize,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<ApiResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HttpGateway for ScriptedGateway {
        async fn get(&self, _url: &str, _query: &[(String, String)]) -> Result<ApiResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("gateway called more times than scripted"))
        }
    }

    fn json_response(status: u16, body: serde_json::Value) -> ApiResponse {
        ApiResponse {
            status,
            headers: Default::default(),
            body: body.to_string(),
        }
    }

    fn repo() -> RepoRef {
        RepoRef::new(
            "org/app".to_string(),
            "https://github.com/org/app".to_string(),
        )
        .unwrap()
    }

    fn sample_alert(number: u64, level: &str) -> serde_json::Value {
        json!({
            "number": number,
            "html_url": format!("https://github.com/org/app/security/code-scanning/{number}"),
            "state": "open",
            "created_at": "2026-08-01T12:30:00Z",
            "rule": {
                "id": "js/sql-injection",
                "description": "Database query built from user-controlled sources",
                "security_severity_level": level,
                "severity": "error"
            },
            "most_recent_instance": {
                "message": { "text": "Query depends on a user-provided value." }
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_discovery_maps_search_items_in_order() {
        let source = GithubAlertSource::with_api_base(
            ScriptedGateway::new(vec![json_response(
                200,
                json!({
                    "total_count": 2,
                    "items": [
                        { "full_name": "org/a", "html_url": "https://github.com/org/a" },
                        { "full_name": "org/b", "html_url": "https://github.com/org/b" }
                    ]
                }),
            )]),
            "https://api.example",
        );

        let repos = source.repositories_by_topic("bcregistry").await.unwrap();

        let names: Vec<_> = repos.iter().map(RepoRef::full_name).collect();
        assert_eq!(names, vec!["org/a", "org/b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_discovery_skips_malformed_items() {
        let source = GithubAlertSource::with_api_base(
            ScriptedGateway::new(vec![json_response(
                200,
                json!({
                    "total_count": 2,
                    "items": [
                        { "full_name": "missing-slash", "html_url": "" },
                        { "full_name": "org/b", "html_url": "https://github.com/org/b" }
                    ]
                }),
            )]),
            "https://api.example",
        );

        let repos = source.repositories_by_topic("bcregistry").await.unwrap();

        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].full_name(), "org/b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_discovery_failure_degrades_to_empty() {
        let source = GithubAlertSource::with_api_base(
            ScriptedGateway::new(vec![json_response(500, json!({"message": "boom"}))]),
            "https://api.example",
        );

        let repos = source.repositories_by_topic("bcregistry").await.unwrap();

        assert!(repos.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_findings_extracted_from_alert_records() {
        let source = GithubAlertSource::with_api_base(
            ScriptedGateway::new(vec![json_response(
                200,
                json!([sample_alert(7, "critical"), sample_alert(9, "high")]),
            )]),
            "https://api.example",
        );

        let findings = source.open_findings(&repo()).await.unwrap();

        assert_eq!(findings.len(), 2);
        let first = &findings[0];
        assert_eq!(first.repository, "org/app");
        assert_eq!(first.repo_url, "https://github.com/org/app");
        assert_eq!(first.alert_number, Some(7));
        assert_eq!(first.severity, Some(SecuritySeverity::Critical));
        assert_eq!(first.rule_id.as_deref(), Some("js/sql-injection"));
        assert_eq!(first.original_severity.as_deref(), Some("error"));
        assert_eq!(
            first.message.as_deref(),
            Some("Query depends on a user-provided value.")
        );
        assert_eq!(findings[1].severity, Some(SecuritySeverity::High));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scanning_not_enabled_yields_empty() {
        let source = GithubAlertSource::with_api_base(
            ScriptedGateway::new(vec![json_response(
                404,
                json!({"message": "Not Found"}),
            )]),
            "https://api.example",
        );

        let findings = source.open_findings(&repo()).await.unwrap();

        assert!(findings.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_access_yields_empty() {
        // Genuine 403: quota to spare, no retry hint, no abuse wording.
        let mut response = json_response(
            403,
            json!({"message": "Resource not accessible by integration"}),
        );
        response
            .headers
            .insert("x-ratelimit-remaining".to_string(), "4000".to_string());
        let source = GithubAlertSource::with_api_base(
            ScriptedGateway::new(vec![response]),
            "https://api.example",
        );

        let findings = source.open_findings(&repo()).await.unwrap();

        assert!(findings.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_budget_propagates_from_findings() {
        let throttle = ApiResponse {
            status: 429,
            headers: Default::default(),
            body: String::new(),
        };
        let source = GithubAlertSource::with_api_base(
            ScriptedGateway::new(vec![throttle; 5]),
            "https://api.example",
        );

        let error = source.open_findings(&repo()).await.unwrap_err();

        assert!(error
            .downcast_ref::<HarvestError>()
            .is_some_and(HarvestError::is_fatal));
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_alert_body_degrades_to_empty() {
        let source = GithubAlertSource::with_api_base(
            ScriptedGateway::new(vec![ApiResponse {
                status: 200,
                headers: Default::default(),
                body: "{\"unexpected\": \"shape\"}".to_string(),
            }]),
            "https://api.example",
        );

        let findings = source.open_findings(&repo()).await.unwrap();

        assert!(findings.is_empty());
    }
}
