/// Application layer - Use cases and DTOs
///
/// Orchestrates the domain services and reaches external systems only
/// through the outbound ports.
pub mod dto;
pub mod use_cases;
