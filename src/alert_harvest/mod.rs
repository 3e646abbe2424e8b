/// Alert harvest core - domain model and pure services
///
/// This layer has no knowledge of HTTP, storage, or the process environment.
pub mod domain;
pub mod services;
