use crate::shared::Result;
use async_trait::async_trait;

/// ObjectStore port for the publish destination
///
/// A single write primitive: store a JSON document under a name, overwriting
/// any existing object of that name.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_json(&self, object_name: &str, payload: &serde_json::Value) -> Result<()>;
}
