/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the ports, providing the
/// actual integration with the GitHub API and Cloud Storage.
pub mod outbound;
