use crate::alert_harvest::domain::{AggregateResult, Finding};

/// SeverityAggregator - partitions findings into the published severity buckets
///
/// Pure function over an ordered input sequence. Classification key is the
/// tool-reported security severity level; medium, low, and unrecognized
/// levels appear in neither bucket. Output order within each bucket is the
/// first-seen order of the input, with no re-sorting.
pub struct SeverityAggregator;

impl SeverityAggregator {
    pub fn aggregate(findings: impl IntoIterator<Item = Finding>) -> AggregateResult {
        let mut result = AggregateResult::default();
        for finding in findings {
            result.absorb(finding);
        }
        result
    }
}
