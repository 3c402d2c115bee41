/// Rational frame rates and canvas dimensions.
pub mod core;
/// Error types.
pub mod error;
/// Filesystem helpers.
pub mod fs;
