use serde::Serialize;

use super::finding::{Finding, SecuritySeverity};

/// Severity-partitioned outcome of one harvest run.
///
/// Built once per run and immutable after assembly. Each bucket preserves
/// first-seen order; a finding lands in at most one bucket.
#[derive(Debug, Default, Clone, Serialize)]
pub struct AggregateResult {
    pub critical: Vec<Finding>,
    pub high: Vec<Finding>,
}

impl AggregateResult {
    /// Route one finding to its bucket. Findings without a critical or high
    /// security severity are dropped here; they stay available upstream in
    /// whatever raw archive the caller keeps.
    pub fn absorb(&mut self, finding: Finding) {
        match finding.severity {
            Some(SecuritySeverity::Critical) => self.critical.push(finding),
            Some(SecuritySeverity::High) => self.high.push(finding),
            _ => {}
        }
    }

    pub fn critical_count(&self) -> usize {
        self.critical.len()
    }

    pub fn high_count(&self) -> usize {
        self.high.len()
    }
}
