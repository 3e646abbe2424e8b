pub mod aggregate;
pub mod finding;
pub mod rate_limit;
pub mod repository;

pub use aggregate::AggregateResult;
pub use finding::{Finding, SecuritySeverity};
pub use rate_limit::RateLimitSnapshot;
pub use repository::RepoRef;
