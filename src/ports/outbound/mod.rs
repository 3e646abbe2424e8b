/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses to
/// interact with external systems (upstream API, object storage).
pub mod alert_source;
pub mod http_gateway;
pub mod object_store;

pub use alert_source::AlertSource;
pub use http_gateway::{ApiResponse, HttpGateway};
pub use object_store::ObjectStore;
