/// Data Transfer Objects for application layer
mod harvest_report;

pub use harvest_report::HarvestReport;
