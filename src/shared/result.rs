/// Type alias for Result with anyhow::Error as the error type, used as the
/// single error-handling currency across the crate.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
