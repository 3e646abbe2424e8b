use crate::shared::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// A completed HTTP exchange, reduced to what the harvester inspects.
///
/// Header names are lowercased by the gateway so lookups are
/// case-insensitive.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn header_u64(&self, name: &str) -> Option<u64> {
        self.header(name).and_then(|value| value.parse().ok())
    }

    pub fn header_i64(&self, name: &str) -> Option<i64> {
        self.header(name).and_then(|value| value.parse().ok())
    }

    /// Decode the body as JSON. This is the single boundary where upstream
    /// schema drift surfaces as an error instead of silent nulls.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// HttpGateway port for the upstream API transport
///
/// Implementations issue exactly one GET per call and never retry. Any HTTP
/// status is a successful exchange from the gateway's point of view; only
/// transport-level failures (connect, timeout) are errors. Retry and
/// throttling policy live above this port, in the request executor.
#[async_trait]
pub trait HttpGateway: Send + Sync {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<ApiResponse>;
}
