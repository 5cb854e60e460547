//! # Credential Proofs
//!
//! The issuer proof attached to a credential: a signature by an account
//! key over the credential's canonical bytes with the proof removed.
//!
//! ## Security Invariant
//!
//! `signature` holds hex-encoded signature bytes computed over
//! [`CanonicalBytes`](ssi_core::CanonicalBytes) of the credential body. The
//! signature scheme is the native scheme of the key type named in `type`.

use serde::{Deserialize, Serialize};
use ssi_core::Timestamp;
use ssi_crypto::KeyType;

/// The purpose of a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    /// The issuer asserts the credential claims.
    AssertionMethod,
    /// The signer authenticates itself.
    Authentication,
}

impl std::fmt::Display for ProofPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofPurpose::AssertionMethod => write!(f, "assertionMethod"),
            ProofPurpose::Authentication => write!(f, "authentication"),
        }
    }
}

/// A signature proof on a verifiable credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Signing key scheme.
    #[serde(rename = "type")]
    pub proof_type: KeyType,

    /// When the proof was created.
    pub created: Timestamp,

    /// The purpose of this proof.
    #[serde(rename = "proofPurpose")]
    pub proof_purpose: ProofPurpose,

    /// DID URL of the verification method that signed.
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,

    /// Hex-encoded signature bytes.
    pub signature: String,
}

impl Proof {
    /// Build an assertion proof.
    pub fn new(
        proof_type: KeyType,
        created: Timestamp,
        verification_method: impl Into<String>,
        signature: &[u8],
    ) -> Self {
        Self {
            proof_type,
            created,
            proof_purpose: ProofPurpose::AssertionMethod,
            verification_method: verification_method.into(),
            signature: hex::encode(signature),
        }
    }
}
