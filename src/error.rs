//! Error types for the clockshard library.
//!
//! ## Key Components
//!
//! - [`ShardError`]: Returned by shard operations (construction with a bad
//!   capacity, lookup/delete misses, allocation failure during insert).
//! - [`ConfigError`]: Returned when table configuration parameters are
//!   invalid (e.g. zero shards).
//! - [`InvariantError`]: Returned by `check_invariants` methods when internal
//!   data-structure invariants are violated.
//!
//! Every operation that returns an error leaves the shard exactly as it was
//! before the call.
//!
//! ## Example Usage
//!
//! ```
//! use clockshard::error::ShardError;
//! use clockshard::policy::clock::ClockShard;
//!
//! let err = ClockShard::<String, String>::try_new(1).unwrap_err();
//! assert_eq!(err, ShardError::InvalidCapacity { capacity: 1 });
//!
//! let shard: ClockShard<String, String> = ClockShard::try_new(4).unwrap();
//! assert_eq!(shard.get("missing"), Err(ShardError::NotFound));
//! ```

use std::collections::TryReserveError;
use std::fmt;

// ---------------------------------------------------------------------------
// ShardError
// ---------------------------------------------------------------------------

/// Error returned by shard operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardError {
    /// Construction was attempted with a capacity below
    /// [`MIN_CAPACITY`](crate::policy::clock::MIN_CAPACITY).
    InvalidCapacity { capacity: usize },
    /// No entry matches the requested key.
    NotFound,
    /// Storage for a new entry could not be reserved.
    AllocationFailure,
}

impl ShardError {
    /// Returns `true` for [`ShardError::NotFound`], the expected miss case.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl fmt::Display for ShardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity { capacity } => write!(
                f,
                "invalid capacity {capacity}: shard capacity must be at least 2"
            ),
            Self::NotFound => f.write_str("key not found"),
            Self::AllocationFailure => f.write_str("allocation failed while inserting entry"),
        }
    }
}

impl std::error::Error for ShardError {}

impl From<TryReserveError> for ShardError {
    fn from(_: TryReserveError) -> Self {
        Self::AllocationFailure
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when table configuration parameters are invalid.
///
/// Produced by [`ShardTableBuilder::try_build`](crate::builder::ShardTableBuilder::try_build).
/// Carries a human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use clockshard::builder::ShardTableBuilder;
///
/// let err = ShardTableBuilder::new(8).shards(0).try_build::<u64, u64>().unwrap_err();
/// assert!(err.to_string().contains("shards"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

impl From<ShardError> for ConfigError {
    fn from(err: ShardError) -> Self {
        Self(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal shard invariants are violated.
///
/// Produced by [`ClockCache::check_invariants`](crate::policy::clock::ClockCache::check_invariants)
/// and [`IntrusiveList::check_invariants`](crate::ds::IntrusiveList::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_error<T: std::error::Error>() {}

    // -- ShardError -------------------------------------------------------

    #[test]
    fn shard_error_display_messages() {
        assert_eq!(
            ShardError::InvalidCapacity { capacity: 1 }.to_string(),
            "invalid capacity 1: shard capacity must be at least 2"
        );
        assert_eq!(ShardError::NotFound.to_string(), "key not found");
        assert_eq!(
            ShardError::AllocationFailure.to_string(),
            "allocation failed while inserting entry"
        );
    }

    #[test]
    fn shard_error_not_found_predicate() {
        assert!(ShardError::NotFound.is_not_found());
        assert!(!ShardError::AllocationFailure.is_not_found());
        assert!(!ShardError::InvalidCapacity { capacity: 0 }.is_not_found());
    }

    #[test]
    fn shard_error_from_try_reserve() {
        let mut v: Vec<u8> = Vec::new();
        let reserve_err = v.try_reserve(usize::MAX).unwrap_err();
        assert_eq!(ShardError::from(reserve_err), ShardError::AllocationFailure);
    }

    #[test]
    fn shard_error_implements_std_error() {
        assert_error::<ShardError>();
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("shards must be > 0");
        assert_eq!(err.to_string(), "shards must be > 0");
        assert_eq!(err.message(), "shards must be > 0");
    }

    #[test]
    fn config_from_shard_error() {
        let err = ConfigError::from(ShardError::InvalidCapacity { capacity: 0 });
        assert!(err.message().contains("at least 2"));
    }

    #[test]
    fn config_implements_std_error() {
        assert_error::<ConfigError>();
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_and_accessor() {
        let err = InvariantError::new("index length mismatch");
        assert_eq!(err.to_string(), "index length mismatch");
        assert_eq!(err.message(), "index length mismatch");
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn invariant_implements_std_error() {
        assert_error::<InvariantError>();
    }
}
