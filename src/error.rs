//! Construction-time validation errors.

use thiserror::Error;

/// Error raised when staging or building a retry config with an
/// out-of-range value. Always caller-fixable; never retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The attempt budget must allow at least the first attempt.
    #[error("max_total_attempts: {0} (expected: > 0)")]
    InvalidMaxTotalAttempts(u32),
}
