//! # Cryptographic Error Types
//!
//! Cryptographic errors fail loudly with the offending value or index.

use ssi_core::CurveId;
use thiserror::Error;

/// Errors from account-key operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key parsing failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// Key bytes of a length no supported scheme uses.
    #[error("unsupported key format: {0}")]
    UnsupportedKeyFormat(String),
}

/// Errors from the anonymous credential protocol.
#[derive(Error, Debug)]
pub enum AnonCredError {
    /// Configured curve differs from the curve the call was instantiated
    /// with, or from the curve recorded in the public parameters.
    #[error("curve mismatch: expected {expected}, got {actual}")]
    CurveMismatch {
        /// Curve the call requires.
        expected: CurveId,
        /// Curve found.
        actual: CurveId,
    },

    /// Parameters are structurally invalid.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Number of messages differs from the key's message length.
    #[error("expected {expected} messages, got {actual}")]
    MessageCount {
        /// Message length of the key.
        expected: usize,
        /// Messages supplied.
        actual: usize,
    },

    /// Message index outside the key's message length.
    #[error("message index {index} out of range for length {len}")]
    MessageIndex {
        /// Offending index.
        index: usize,
        /// Message length of the key.
        len: usize,
    },

    /// A BBS+ signature did not verify.
    #[error("invalid signature")]
    InvalidSignature,

    /// A proof failed verification.
    #[error("proof verification failed: {0}")]
    InvalidProof(String),

    /// Recomputed challenge bytes differ from the declared challenge.
    #[error("challenge mismatch")]
    ChallengeMismatch,

    /// The two sub-proofs do not commit to the same linking secret.
    #[error("linking secret blinding mismatch")]
    LinkMismatch,

    /// The accumulator update contained no additions and no deletions.
    #[error("accumulator update is empty")]
    EmptyUpdate,

    /// Accumulator state index outside the published history.
    #[error("accumulator state index {index} out of range ({len} states)")]
    StateIndex {
        /// Offending index.
        index: usize,
        /// Number of published states.
        len: usize,
    },

    /// The witness's element was removed from the accumulator.
    #[error("member has been revoked")]
    MemberRevoked,

    /// A witness does not verify against the target accumulator value.
    #[error("witness does not verify against accumulator state {0}")]
    InvalidWitness(usize),

    /// A scalar that must be invertible was zero.
    #[error("degenerate value: {0}")]
    Degenerate(&'static str),

    /// Point or scalar (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<ark_serialize::SerializationError> for AnonCredError {
    fn from(e: ark_serialize::SerializationError) -> Self {
        Self::Serialization(e.to_string())
    }
}
