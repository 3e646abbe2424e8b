//! codeql-harvest - severity-filtered CodeQL alert summaries for an organization
//!
//! This library walks GitHub's paginated repository-search and code-scanning
//! endpoints under a shared, adaptive request budget, classifies every open
//! alert by security severity, and publishes critical/high snapshots to
//! object storage.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`alert_harvest`): Findings, repository references,
//!   rate-limit snapshots, and the pure severity aggregator
//! - **Application Layer** (`application`): The harvest orchestrator and run
//!   report DTO
//! - **Ports** (`ports`): Interface definitions for the upstream API and the
//!   publish destination
//! - **Adapters** (`adapters`): The rate-limited executor, paginated
//!   collector, GitHub client, and Cloud Storage publisher
//! - **Shared** (`shared`): Error taxonomy and the crate-wide Result alias
//!
//! # Example
//!
//! ```no_run
//! use codeql_harvest::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let gateway = ReqwestGateway::new("ghp_example".to_string())?;
//! let alert_source = GithubAlertSource::new(gateway);
//!
//! let use_case: HarvestAlertsUseCase<_, GcsObjectStore> =
//!     HarvestAlertsUseCase::new(alert_source, None);
//! let report = use_case.execute("bcregistry").await?;
//! println!("{}", serde_json::to_string(&report)?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod alert_harvest;
pub mod application;
pub mod cli;
pub mod config;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::network::{
        GithubAlertSource, RateLimitedExecutor, ReqwestGateway,
    };
    pub use crate::adapters::outbound::storage::GcsObjectStore;
    pub use crate::alert_harvest::domain::{
        AggregateResult, Finding, RateLimitSnapshot, RepoRef, SecuritySeverity,
    };
    pub use crate::alert_harvest::services::SeverityAggregator;
    pub use crate::application::dto::HarvestReport;
    pub use crate::application::use_cases::{HarvestAlertsUseCase, PublishTarget};
    pub use crate::cli::Args;
    pub use crate::config::{BucketSpec, Config};
    pub use crate::ports::outbound::{AlertSource, ApiResponse, HttpGateway, ObjectStore};
    pub use crate::shared::error::{ExitCode, HarvestError};
    pub use crate::shared::Result;
}
