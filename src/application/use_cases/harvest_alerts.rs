use chrono::Utc;
use tracing::{error, info, warn};

use crate::alert_harvest::domain::{AggregateResult, Finding};
use crate::alert_harvest::services::SeverityAggregator;
use crate::application::dto::HarvestReport;
use crate::ports::outbound::{AlertSource, ObjectStore};
use crate::shared::{Result, COMPONENT};

/// Cap on findings embedded in the CRITICAL alert log record, keeping the
/// payload within the log pipeline's entry size limit.
const ALERT_PAYLOAD_LIMIT: usize = 10;

/// Where the severity snapshots are published.
pub struct PublishTarget<O: ObjectStore> {
    bucket: String,
    store: O,
}

impl<O: ObjectStore> PublishTarget<O> {
    pub fn new(bucket: String, store: O) -> Self {
        Self { bucket, store }
    }
}

/// HarvestAlertsUseCase - the run orchestrator
///
/// Sequences discovery, per-repository fetching, severity aggregation, and
/// publishing, strictly one step at a time. Only missing configuration
/// (checked before this use case is built) and a spent retry budget abort a
/// run; per-repository failures are already absorbed inside the alert source
/// and publish failures are logged and skipped.
pub struct HarvestAlertsUseCase<S: AlertSource, O: ObjectStore> {
    alert_source: S,
    destination: Option<PublishTarget<O>>,
}

impl<S: AlertSource, O: ObjectStore> HarvestAlertsUseCase<S, O> {
    pub fn new(alert_source: S, destination: Option<PublishTarget<O>>) -> Self {
        Self {
            alert_source,
            destination,
        }
    }

    pub async fn execute(&self, topic: &str) -> Result<HarvestReport> {
        info!(component = COMPONENT, topic, "starting CodeQL alert fetch");

        let repos = self.alert_source.repositories_by_topic(topic).await?;
        info!(
            component = COMPONENT,
            count = repos.len(),
            "found repositories"
        );

        let mut findings: Vec<Finding> = Vec::new();
        for repo in &repos {
            findings.extend(self.alert_source.open_findings(repo).await?);
        }

        let aggregate = SeverityAggregator::aggregate(findings);
        info!(
            component = COMPONENT,
            critical = aggregate.critical_count(),
            high = aggregate.high_count(),
            "processing complete"
        );

        if aggregate.critical_count() > 0 {
            let preview_len = aggregate.critical_count().min(ALERT_PAYLOAD_LIMIT);
            let preview = serde_json::to_value(&aggregate.critical[..preview_len])?;
            error!(
                component = COMPONENT,
                severity = "CRITICAL",
                alert_count = aggregate.critical_count(),
                findings = %preview,
                "found CRITICAL CodeQL alerts"
            );
        }

        match &self.destination {
            None => {
                warn!(
                    component = COMPONENT,
                    "no bucket configured, skipping upload"
                );
                Ok(HarvestReport::unpublished(
                    aggregate.critical_count(),
                    aggregate.high_count(),
                ))
            }
            Some(target) => {
                self.publish(target, &aggregate).await;
                Ok(HarvestReport::published(
                    target.bucket.clone(),
                    aggregate.critical_count(),
                    aggregate.high_count(),
                ))
            }
        }
    }

    /// Write the timestamped snapshots plus the overwritten "latest"
    /// pointers. A failed write is logged and the remaining writes still
    /// proceed.
    async fn publish(&self, target: &PublishTarget<O>, aggregate: &AggregateResult) {
        let timestamp = Utc::now().format("%Y-%m-%d_%H-%M-%S");
        let objects = [
            (
                format!("codeql_critical_{timestamp}.json"),
                &aggregate.critical,
            ),
            (format!("codeql_high_{timestamp}.json"), &aggregate.high),
            (
                "codeql_critical_latest.json".to_string(),
                &aggregate.critical,
            ),
            ("codeql_high_latest.json".to_string(), &aggregate.high),
        ];

        for (name, findings) in objects {
            let payload = match serde_json::to_value(findings) {
                Ok(payload) => payload,
                Err(err) => {
                    error!(
                        component = COMPONENT,
                        object = %name,
                        error = %err,
                        "failed to serialize snapshot"
                    );
                    continue;
                }
            };
            match target.store.put_json(&name, &payload).await {
                Ok(()) => info!(
                    component = COMPONENT,
                    object = %name,
                    bucket = %target.bucket,
                    "uploaded snapshot"
                ),
                Err(err) => error!(
                    component = COMPONENT,
                    object = %name,
                    bucket = %target.bucket,
                    error = %err,
                    "failed to upload snapshot"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert_harvest::domain::{RepoRef, SecuritySeverity};
    use crate::shared::error::HarvestError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockAlertSource {
        repos: Vec<RepoRef>,
        findings: HashMap<String, Vec<Finding>>,
        fatal_for: Option<String>,
    }

    impl MockAlertSource {
        fn new(repos: Vec<RepoRef>) -> Self {
            Self {
                repos,
                findings: HashMap::new(),
                fatal_for: None,
            }
        }

        fn with_findings(mut self, full_name: &str, findings: Vec<Finding>) -> Self {
            self.findings.insert(full_name.to_string(), findings);
            self
        }
    }

    #[async_trait]
    impl AlertSource for MockAlertSource {
        async fn repositories_by_topic(&self, _topic: &str) -> Result<Vec<RepoRef>> {
            Ok(self.repos.clone())
        }

        async fn open_findings(&self, repo: &RepoRef) -> Result<Vec<Finding>> {
            if self.fatal_for.as_deref() == Some(repo.full_name()) {
                return Err(HarvestError::RetryBudgetExhausted {
                    url: "https://api.github.com".to_string(),
                    attempts: 5,
                }
                .into());
            }
            Ok(self
                .findings
                .get(repo.full_name())
                .cloned()
                .unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct MockObjectStore {
        puts: Mutex<Vec<(String, serde_json::Value)>>,
        fail_on: Option<String>,
    }

    #[async_trait]
    impl ObjectStore for MockObjectStore {
        async fn put_json(&self, object_name: &str, payload: &serde_json::Value) -> Result<()> {
            if self.fail_on.as_deref() == Some(object_name) {
                anyhow::bail!("simulated storage failure");
            }
            self.puts
                .lock()
                .unwrap()
                .push((object_name.to_string(), payload.clone()));
            Ok(())
        }
    }

    fn repo(full_name: &str) -> RepoRef {
        RepoRef::new(
            full_name.to_string(),
            format!("https://github.com/{full_name}"),
        )
        .unwrap()
    }

    fn finding(repo: &RepoRef, number: u64, level: &str) -> Finding {
        Finding {
            alert_number: Some(number),
            severity: SecuritySeverity::parse(Some(level)),
            ..Finding::for_repository(repo)
        }
    }

    #[tokio::test]
    async fn test_disabled_repo_and_critical_repo_yield_one_critical() {
        // org/a has code scanning disabled (empty from the source), org/b
        // reports a single critical alert.
        let b = repo("org/b");
        let source = MockAlertSource::new(vec![repo("org/a"), b.clone()])
            .with_findings("org/b", vec![finding(&b, 1, "critical")]);
        let use_case =
            HarvestAlertsUseCase::<_, MockObjectStore>::new(source, None);

        let report = use_case.execute("bcregistry").await.unwrap();

        assert_eq!(report.status, "success");
        assert_eq!(report.critical_count, 1);
        assert_eq!(report.high_count, 0);
    }

    #[tokio::test]
    async fn test_no_destination_skips_publishing_and_carries_notice() {
        let a = repo("org/a");
        let source = MockAlertSource::new(vec![a.clone()])
            .with_findings("org/a", vec![finding(&a, 1, "high")]);
        let use_case =
            HarvestAlertsUseCase::<_, MockObjectStore>::new(source, None);

        let report = use_case.execute("bcregistry").await.unwrap();

        assert!(report.bucket.is_none());
        assert!(report
            .message
            .as_deref()
            .is_some_and(|message| message.contains("no bucket configured")));
        assert_eq!(report.high_count, 1);
    }

    #[tokio::test]
    async fn test_publish_writes_snapshots_and_latest_pointers() {
        let a = repo("org/a");
        let source = MockAlertSource::new(vec![a.clone()]).with_findings(
            "org/a",
            vec![finding(&a, 1, "critical"), finding(&a, 2, "high")],
        );
        let store = MockObjectStore::default();
        let use_case = HarvestAlertsUseCase::new(
            source,
            Some(PublishTarget::new("findings".to_string(), store)),
        );

        let report = use_case.execute("bcregistry").await.unwrap();

        assert_eq!(report.bucket.as_deref(), Some("findings"));
        let puts = use_case
            .destination
            .as_ref()
            .unwrap()
            .store
            .puts
            .lock()
            .unwrap();
        let names: Vec<&str> = puts.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(puts.len(), 4);
        assert!(names[0].starts_with("codeql_critical_") && names[0].ends_with(".json"));
        assert!(names[1].starts_with("codeql_high_") && names[1].ends_with(".json"));
        assert_eq!(names[2], "codeql_critical_latest.json");
        assert_eq!(names[3], "codeql_high_latest.json");

        // The critical snapshot carries the critical finding only.
        let critical_payload = &puts[2].1;
        assert_eq!(critical_payload.as_array().unwrap().len(), 1);
        assert_eq!(critical_payload[0]["alert_number"], 1);
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_abort_run() {
        let a = repo("org/a");
        let source = MockAlertSource::new(vec![a.clone()])
            .with_findings("org/a", vec![finding(&a, 1, "critical")]);
        let store = MockObjectStore {
            fail_on: Some("codeql_critical_latest.json".to_string()),
            ..Default::default()
        };
        let use_case = HarvestAlertsUseCase::new(
            source,
            Some(PublishTarget::new("findings".to_string(), store)),
        );

        let report = use_case.execute("bcregistry").await.unwrap();

        assert_eq!(report.status, "success");
        // The failed write is skipped; the other three still land.
        let puts = use_case
            .destination
            .as_ref()
            .unwrap()
            .store
            .puts
            .lock()
            .unwrap();
        assert_eq!(puts.len(), 3);
    }

    #[tokio::test]
    async fn test_retry_budget_exhaustion_aborts_the_run() {
        let source = MockAlertSource {
            fatal_for: Some("org/a".to_string()),
            ..MockAlertSource::new(vec![repo("org/a"), repo("org/b")])
        };
        let use_case =
            HarvestAlertsUseCase::<_, MockObjectStore>::new(source, None);

        let error = use_case.execute("bcregistry").await.unwrap_err();

        assert!(error
            .downcast_ref::<HarvestError>()
            .is_some_and(HarvestError::is_fatal));
    }

    #[tokio::test]
    async fn test_findings_keep_discovery_then_pagination_order() {
        let a = repo("org/a");
        let b = repo("org/b");
        let source = MockAlertSource::new(vec![a.clone(), b.clone()])
            .with_findings(
                "org/a",
                vec![finding(&a, 10, "high"), finding(&a, 11, "critical")],
            )
            .with_findings(
                "org/b",
                vec![finding(&b, 20, "critical"), finding(&b, 21, "high")],
            );
        let store = MockObjectStore::default();
        let use_case = HarvestAlertsUseCase::new(
            source,
            Some(PublishTarget::new("findings".to_string(), store)),
        );

        use_case.execute("bcregistry").await.unwrap();

        let puts = use_case
            .destination
            .as_ref()
            .unwrap()
            .store
            .puts
            .lock()
            .unwrap();
        let critical = &puts[2].1;
        let high = &puts[3].1;
        assert_eq!(critical[0]["alert_number"], 11);
        assert_eq!(critical[1]["alert_number"], 20);
        assert_eq!(high[0]["alert_number"], 10);
        assert_eq!(high[1]["alert_number"], 21);
    }
}
