/// Shared utilities - error types and the crate-wide Result alias
pub mod error;
pub mod result;

pub use result::Result;

/// Fixed component identifier attached to every structured log record so the
/// hosting log pipeline can route records from this service.
pub const COMPONENT: &str = "codeql-alert-fetcher";
