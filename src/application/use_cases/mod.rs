/// Use cases module containing application business logic orchestration
mod harvest_alerts;

pub use harvest_alerts::{HarvestAlertsUseCase, PublishTarget};
