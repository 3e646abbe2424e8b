/// Domain services - pure logic over the domain model
pub mod severity_aggregator;

pub use severity_aggregator::SeverityAggregator;
