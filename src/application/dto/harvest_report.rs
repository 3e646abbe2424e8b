use serde::Serialize;

/// Notice embedded in the success payload when no destination is configured.
const NO_BUCKET_MESSAGE: &str = "Processed successfully, but no bucket configured.";

/// Final run payload printed on success, mirroring the response body of the
/// hosted trigger. Exactly one of `bucket` and `message` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestReport {
    pub status: String,
    pub critical_count: usize,
    pub high_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HarvestReport {
    pub fn published(bucket: String, critical_count: usize, high_count: usize) -> Self {
        Self {
            status: "success".to_string(),
            critical_count,
            high_count,
            bucket: Some(bucket),
            message: None,
        }
    }

    pub fn unpublished(critical_count: usize, high_count: usize) -> Self {
        Self {
            status: "success".to_string(),
            critical_count,
            high_count,
            bucket: None,
            message: Some(NO_BUCKET_MESSAGE.to_string()),
        }
    }
}
