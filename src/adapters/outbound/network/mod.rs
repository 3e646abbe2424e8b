/// Network adapters for the upstream API
mod github_alert_source;
mod pagination;
mod request_executor;
mod reqwest_gateway;

pub use github_alert_source::{GithubAlertSource, GITHUB_API_BASE};
pub use pagination::{collect_all, Page};
pub use request_executor::{Execution, RateLimitedExecutor, DEFAULT_MAX_ATTEMPTS};
pub use reqwest_gateway::ReqwestGateway;
