/// Ports module defining interfaces for hexagonal architecture
///
/// All ports here are outbound (driven): interfaces the application core uses
/// to reach the upstream API and the publish destination.
pub mod outbound;
