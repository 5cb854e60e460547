//! # Error Types
//!
//! Leaf error types shared by every crate in the workspace. Domain crates
//! (`ssi-did`, `ssi-vc`) define their own sentinel enums and convert from
//! these with `#[from]`.

use thiserror::Error;

/// Errors raised by the foundational types in this crate.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// The identifier does not satisfy the W3C DID grammar.
    #[error("invalid DID: {0:?}")]
    InvalidDid(String),

    /// The identifier is not a valid account address.
    #[error("invalid account address: {0:?}")]
    InvalidAddress(String),

    /// Timestamp parsing or construction failed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
