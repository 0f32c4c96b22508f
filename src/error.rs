//! Error types for simdweave
//!
//! The numeric core has no runtime error surface: every vector operation is
//! total. Errors only arise at the edges, when memory views are built,
//! masks are validated, and files or configuration are processed.

use thiserror::Error;

/// Main error type for simdweave operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A memory region does not satisfy the alignment a backend requires
    #[error("Misaligned region: address {address:#x} is not aligned to {required} bytes")]
    Misaligned {
        /// Start address of the rejected region
        address: usize,
        /// Required alignment in bytes
        required: usize,
    },

    /// Inputs that must have equal lengths do not
    #[error("Length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// Expected element count
        expected: usize,
        /// Actual element count
        actual: usize,
    },

    /// A vector lane is neither all-zeros nor all-ones
    #[error("Invalid mask: lane {lane} is neither all-zeros nor all-ones")]
    InvalidMask {
        /// Index of the first offending lane
        lane: usize,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for simdweave operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a length mismatch error
    pub fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }
}
