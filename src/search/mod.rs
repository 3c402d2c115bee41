//! Quality/size search over encoder candidates.

/// Candidate generation and scoring.
pub mod candidate;
/// Budget fitting with score-based skip-ahead.
pub mod fit;
