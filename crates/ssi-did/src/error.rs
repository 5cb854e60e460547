//! # DID Registry Errors
//!
//! Sentinel kinds for every DID operation. Each variant carries the
//! offending identifier and all are terminal: the registry never retries,
//! and a failed call leaves the store untouched.

use ssi_core::{AccountAddress, CoreError, Did, StoreError};
use thiserror::Error;

/// Errors from DID document validation, resolution and mutation.
#[derive(Error, Debug)]
pub enum DidError {
    /// No document is stored under the DID.
    #[error("DID document not found: {0}")]
    NotFound(String),

    /// A document is already stored under the DID.
    #[error("DID already exists: {0}")]
    DidAlreadyExists(String),

    /// The identifier fails the DID grammar.
    #[error("invalid DID format: {0:?}")]
    InvalidDidFormat(String),

    /// A verification method id fails the DID URL grammar.
    #[error("invalid DID URL format: {0:?}")]
    InvalidDidUrlFormat(String),

    /// A service id or endpoint is not an RFC 3986 URI.
    #[error("invalid RFC 3986 URI format: {0:?}")]
    InvalidRfc3986UriFormat(String),

    /// A verification method was attached without any relationship.
    #[error("verification method {0} has no verification relationships")]
    EmptyRelationships(String),

    /// The signer is neither an authorized verification method nor a
    /// controller of the document.
    #[error("signer {signer} is not authorized on {did}")]
    Unauthorized {
        /// Transaction signer.
        signer: AccountAddress,
        /// The DID the signer tried to act on.
        did: Did,
    },

    /// The operation is not permitted in the document's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Malformed or conflicting input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The referenced verification method is not in the document.
    #[error("verification method not found: {0}")]
    VerificationMethodNotFound(String),

    /// The verification material encodes no supported key.
    #[error("unsupported key format: {0}")]
    UnsupportedKeyFormat(String),

    /// Store collaborator failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Hashing or encoding failure.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<CoreError> for DidError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidDid(s) => Self::InvalidDidFormat(s),
            CoreError::InvalidAddress(s) => Self::InvalidInput(format!("invalid account address {s:?}")),
            other => Self::Serialization(other.to_string()),
        }
    }
}

impl DidError {
    /// Short, stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::DidAlreadyExists(_) => "did_already_exists",
            Self::InvalidDidFormat(_) => "invalid_did_format",
            Self::InvalidDidUrlFormat(_) => "invalid_did_url_format",
            Self::InvalidRfc3986UriFormat(_) => "invalid_rfc3986_uri_format",
            Self::EmptyRelationships(_) => "empty_relationships",
            Self::Unauthorized { .. } => "unauthorized",
            Self::InvalidState(_) => "invalid_state",
            Self::InvalidInput(_) => "invalid_input",
            Self::VerificationMethodNotFound(_) => "verification_method_not_found",
            Self::UnsupportedKeyFormat(_) => "unsupported_key_format",
            Self::Store(_) => "store",
            Self::Serialization(_) => "serialization",
        }
    }
}
