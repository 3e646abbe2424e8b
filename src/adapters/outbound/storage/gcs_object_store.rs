use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::BucketSpec;
use crate::ports::outbound::ObjectStore;
use crate::shared::Result;

/// GCS JSON API upload root.
const UPLOAD_ENDPOINT: &str = "https://storage.googleapis.com/upload/storage/v1";

/// Ambient-credential token endpoint available inside GCP runtimes.
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// GcsObjectStore adapter - publishes JSON snapshots to a Cloud Storage bucket
///
/// Authenticates with the runtime's ambient service account via the metadata
/// server, so no storage credential appears in the environment. Object names
/// are prefixed with the path embedded in the bucket destination, when one
/// was configured.
pub struct GcsObjectStore {
    client: reqwest::Client,
    bucket: String,
    prefix: Option<String>,
}

impl GcsObjectStore {
    pub fn new(spec: &BucketSpec) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(format!("codeql-harvest/{}", version))
            .build()?;

        Ok(Self {
            client,
            bucket: spec.bucket().to_string(),
            prefix: spec.prefix().map(str::to_string),
        })
    }

    async fn access_token(&self) -> Result<String> {
        let token: MetadataToken = self
            .client
            .get(METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .context("metadata server unreachable")?
            .error_for_status()
            .context("metadata server refused token request")?
            .json()
            .await
            .context("malformed metadata token response")?;
        Ok(token.access_token)
    }

    fn object_name(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}/{name}"),
            None => name.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn put_json(&self, object_name: &str, payload: &serde_json::Value) -> Result<()> {
        let token = self.access_token().await?;
        let object = self.object_name(object_name);
        let url = format!(
            "{}/b/{}/o",
            UPLOAD_ENDPOINT,
            urlencoding::encode(&self.bucket)
        );

        let response = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", object.as_str())])
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .body(serde_json::to_string_pretty(payload)?)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!(
                "upload of {} to bucket {} returned status {}",
                object,
                self.bucket,
                response.status()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_applies_prefix() {
        let spec = BucketSpec::parse("gs://findings/reports/codeql").unwrap();
        let store = GcsObjectStore::new(&spec).unwrap();
        assert_eq!(
            store.object_name("codeql_critical_latest.json"),
            "reports/codeql/codeql_critical_latest.json"
        );
    }

    #[test]
    fn test_object_name_without_prefix() {
        let spec = BucketSpec::parse("findings").unwrap();
        let store = GcsObjectStore::new(&spec).unwrap();
        assert_eq!(
            store.object_name("codeql_high_latest.json"),
            "codeql_high_latest.json"
        );
    }
}
