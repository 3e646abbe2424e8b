//! Environment-variable configuration for the harvester.
//!
//! The hosted trigger carries no request body; everything about a run is
//! decided by three environment variables, optionally overridden by CLI
//! flags.

use std::env;

use crate::cli::Args;
use crate::shared::error::HarvestError;
use crate::shared::Result;

/// Required bearer credential for the upstream API.
pub const ENV_GITHUB_TOKEN: &str = "CODEQL_GITHUB_TOKEN";
/// Optional publish destination, `[scheme://]bucket[/prefix]`.
pub const ENV_BUCKET: &str = "CODEQL_GCS_BUCKET_NAME";
/// Optional repository topic to scan.
pub const ENV_TOPIC: &str = "CODEQL_GITHUB_TOPIC";

/// Organization tag scanned when no topic is configured.
const DEFAULT_TOPIC: &str = "bcregistry";

/// A parsed publish destination.
///
/// Accepts a bare bucket name, a `gs://bucket` form, or `gs://bucket/some/prefix`
/// where the prefix is prepended to every object name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSpec {
    bucket: String,
    prefix: Option<String>,
}

impl BucketSpec {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let without_scheme = match trimmed.split_once("://") {
            Some((_, rest)) => rest,
            None => trimmed,
        };

        let (bucket, prefix) = match without_scheme.split_once('/') {
            Some((bucket, prefix)) => (bucket, Some(prefix.trim_matches('/'))),
            None => (without_scheme, None),
        };

        if bucket.is_empty() {
            return Err(HarvestError::InvalidBucketSpec {
                spec: raw.to_string(),
                reason: "bucket name is empty".to_string(),
            }
            .into());
        }

        Ok(Self {
            bucket: bucket.to_string(),
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

/// Fully resolved run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub bucket: Option<BucketSpec>,
    pub topic: String,
}

impl Config {
    /// Resolve configuration from the process environment, with CLI flags
    /// taking precedence. The missing-credential case is the one
    /// configuration error that stops a run before it starts.
    pub fn resolve(args: &Args) -> Result<Self> {
        let github_token = env::var(ENV_GITHUB_TOKEN)
            .ok()
            .filter(|token| !token.is_empty())
            .ok_or(HarvestError::MissingConfiguration {
                variable: ENV_GITHUB_TOKEN,
            })?;

        let raw_bucket = args
            .bucket
            .clone()
            .or_else(|| env::var(ENV_BUCKET).ok())
            .filter(|value| !value.is_empty());
        let bucket = raw_bucket.as_deref().map(BucketSpec::parse).transpose()?;

        let topic = args
            .topic
            .clone()
            .or_else(|| env::var(ENV_TOPIC).ok())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_TOPIC.to_string());

        Ok(Self {
            github_token,
            bucket,
            topic,
        })
    }
}
