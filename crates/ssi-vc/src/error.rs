//! # Credential Registry Errors

use ssi_core::{AccountAddress, CanonicalizationError, Did, StoreError};
use ssi_did::{DidError, VerificationRelationship};
use thiserror::Error;

/// Errors from the account service collaborator.
#[derive(Error, Debug)]
pub enum AccountError {
    /// No account, or an account that has never published its key.
    #[error("no public key for account {0}")]
    NotFound(AccountAddress),

    /// The service could not be reached.
    #[error("account service unavailable: {0}")]
    Unavailable(String),
}

/// Errors from credential signing, validation and the registry.
#[derive(Error, Debug)]
pub enum VcError {
    /// A credential with this id is already stored.
    #[error("credential {0} already exists")]
    AlreadyExists(String),

    /// No credential (or no metadata) under this id.
    #[error("credential {0} not found")]
    NotFound(String),

    /// The credential subject is not the variant the operation expects.
    #[error("credential {id} is not a {expected} credential")]
    WrongSubtype {
        /// Credential id.
        id: String,
        /// Expected subject variant.
        expected: &'static str,
    },

    /// The credential is deactivated.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The subject DID does not resolve.
    #[error("subject DID {did} is not resolvable: {source}")]
    SubjectUnresolvable {
        /// Subject DID.
        did: Did,
        /// Resolution failure.
        #[source]
        source: DidError,
    },

    /// The issuer DID does not resolve.
    #[error("issuer DID {did} is not resolvable: {source}")]
    IssuerUnresolvable {
        /// Issuer DID.
        did: Did,
        /// Resolution failure.
        #[source]
        source: DidError,
    },

    /// The credential carries no proof.
    #[error("credential {0} has no proof")]
    MissingProof(String),

    /// The proof's verification method is not listed under any of the
    /// required relationships of the issuer document.
    #[error("verification method {method} is not listed under {required:?} in {issuer}")]
    ProofNotAuthorized {
        /// Verification method named by the proof.
        method: String,
        /// Issuer DID.
        issuer: Did,
        /// Relationships that would have been accepted.
        required: Vec<VerificationRelationship>,
    },

    /// The proof signature does not verify.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// The proof signature is not valid hex.
    #[error("invalid proof value: {0}")]
    InvalidProofValue(String),

    /// DID registry failure, including signer authorization.
    #[error("DID error: {0}")]
    Did(#[from] DidError),

    /// Account service failure.
    #[error("account error: {0}")]
    Account(#[from] AccountError),

    /// Canonicalization of the credential body failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Store collaborator failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl VcError {
    /// Short, stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyExists(_) => "already_exists",
            Self::NotFound(_) => "not_found",
            Self::WrongSubtype { .. } => "wrong_subtype",
            Self::InvalidState(_) => "invalid_state",
            Self::SubjectUnresolvable { .. } => "subject_unresolvable",
            Self::IssuerUnresolvable { .. } => "issuer_unresolvable",
            Self::MissingProof(_) => "missing_proof",
            Self::ProofNotAuthorized { .. } => "proof_not_authorized",
            Self::VerificationFailed(_) => "verification_failed",
            Self::InvalidProofValue(_) => "invalid_proof_value",
            Self::Did(_) => "did",
            Self::Account(_) => "account",
            Self::Canonicalization(_) => "canonicalization",
            Self::Json(_) => "json",
            Self::Store(_) => "store",
        }
    }
}
