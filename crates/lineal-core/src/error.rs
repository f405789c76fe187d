//! Error types shared by every lineal crate.
//!
//! Validation failures are raised at the point of detection and never retried
//! internally. Recoverable numerical non-success (a singular system, a
//! rank-deficient least-squares problem, a non-converging decomposition) is
//! reported through a boolean return instead, since it is an expected outcome
//! the caller must check.

use thiserror::Error;

/// Unified error type for lineal operations
#[derive(Error, Debug)]
pub enum Error {
    /// Length or shape mismatch between operands
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    Dimension {
        expected: usize,
        actual: usize,
        context: String,
    },

    /// Storage-order mismatch between matrix operands
    #[error("order mismatch in {0}")]
    Order(String),

    /// Out-of-range index or sub-view bounds
    #[error("index out of range in {0}")]
    Index(String),

    /// Invalid argument value
    #[error("invalid argument: {0}")]
    Argument(String),

    /// Evaluation outside the supported domain
    #[error("out of range: {0}")]
    Range(String),

    /// Storage could not be allocated; not recoverable
    #[error("cannot allocate {0}")]
    Allocation(String),

    /// The numerical backend reported an internal error; not recoverable
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a dimension-mismatch error naming the offending operand
    pub fn dimension(expected: usize, actual: usize, context: impl Into<String>) -> Self {
        Self::Dimension {
            expected,
            actual,
            context: context.into(),
        }
    }

    /// Create an order-mismatch error naming the offending operand
    pub fn order(context: impl Into<String>) -> Self {
        Self::Order(context.into())
    }

    /// Create an out-of-range index error naming the offending argument
    pub fn index(context: impl Into<String>) -> Self {
        Self::Index(context.into())
    }

    /// Create an invalid-argument error
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }

    /// Create a domain error for out-of-range evaluation
    pub fn range(message: impl Into<String>) -> Self {
        Self::Range(message.into())
    }

    /// Create a fatal backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Create a fatal allocation error
    pub fn allocation(what: impl Into<String>) -> Self {
        Self::Allocation(what.into())
    }
}
