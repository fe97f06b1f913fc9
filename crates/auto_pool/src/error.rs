//! Pool error types

use thiserror::Error;

/// Result alias for fallible pool operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors reported by pools and the registry
///
/// None of these are fatal: the pool that reported one is left in a
/// consistent state and the caller may retry later.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// No pool is registered for the key
    #[error("No pool found for key '{key}'")]
    NotFound {
        /// The key that was looked up
        key: String,
    },

    /// The key is unknown and the registry may not create pools
    #[error("Pool creation disallowed for key '{key}'")]
    CreationDisallowed {
        /// The key that would have been created
        key: String,
    },

    /// A pool already exists under the key
    #[error("Pool already exists for key '{key}'")]
    DuplicatePool {
        /// The conflicting key
        key: String,
    },

    /// The pool is empty and its policy refused to grow or reclaim
    #[error("Pool '{key}' exhausted: {capacity} instances, max {max_size}")]
    CapacityExceeded {
        /// The pool's key
        key: String,
        /// Current instance count
        capacity: usize,
        /// Configured maximum (0 = unbounded)
        max_size: usize,
    },

    /// The index pointed at a pool that no longer exists
    #[error("Stale pool reference for key '{key}'")]
    StaleReference {
        /// The pruned key
        key: String,
    },

    /// The handle does not address a live activation in this pool
    #[error("Invalid instance handle: {reason}")]
    InvalidHandle {
        /// Why the handle was rejected
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PoolError::CapacityExceeded {
            key: "bullet".to_string(),
            capacity: 2,
            max_size: 2,
        };
        assert_eq!(err.to_string(), "Pool 'bullet' exhausted: 2 instances, max 2");

        let err = PoolError::InvalidHandle { reason: "instance is already free" };
        assert_eq!(err.to_string(), "Invalid instance handle: instance is already free");
    }
}
