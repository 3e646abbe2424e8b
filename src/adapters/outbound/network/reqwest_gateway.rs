use std::time::Duration;

use async_trait::async_trait;

use crate::ports::outbound::{ApiResponse, HttpGateway};
use crate::shared::Result;

/// Per-request timeout for the upstream API.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Media type GitHub expects on REST calls.
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// ReqwestGateway adapter - the real transport behind [`HttpGateway`]
///
/// Attaches the bearer credential and Accept header to every request and
/// flattens the reqwest response into the status/headers/body triple the
/// executor inspects. Issues exactly one request per call; all retry policy
/// lives in the executor.
pub struct ReqwestGateway {
    client: reqwest::Client,
    token: String,
}

impl ReqwestGateway {
    pub fn new(token: String) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("codeql-harvest/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, token })
    }
}

#[async_trait]
impl HttpGateway for ReqwestGateway {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<ApiResponse> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", GITHUB_ACCEPT)
            .query(query)
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_ascii_lowercase(), value.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}
