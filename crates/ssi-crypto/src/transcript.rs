//! # Fiat-Shamir Transcript and Challenge Combination
//!
//! Each sub-protocol (signature proof of knowledge, accumulator membership)
//! feeds its public values and commitments into its own [`Transcript`] and
//! extracts 64 bytes of output key material (`okm`). The prover combines the
//! `okm` of every sub-protocol with [`combine_okm()`] and hashes the result to
//! one challenge scalar with [`challenge_scalar()`]. A verifier recomputes
//! each `okm` from the responses and checks that the recombined bytes equal
//! the declared challenge bytes.

use ark_ff::PrimeField;
use ark_serialize::CanonicalSerialize;
use sha2::{Digest, Sha512};

use crate::curve::hash_to_scalar;
use crate::error::AnonCredError;

/// Prefix of combined challenge bytes and of the challenge hash input.
pub const CHALLENGE_PREFIX: &[u8] = b"Create Challenge Bytes";

/// Separator written before each sub-protocol's `okm`.
pub const CHALLENGE_SEPARATOR: &[u8] = b"dom-sep-challenge";

/// Running SHA-512 transcript with labelled, length-prefixed entries.
#[derive(Clone)]
pub struct Transcript {
    hasher: Sha512,
}

impl Transcript {
    /// Start a transcript under a protocol label.
    pub fn new(label: &'static [u8]) -> Self {
        let mut transcript = Self {
            hasher: Sha512::new(),
        };
        transcript.append_message(b"protocol", label);
        transcript
    }

    /// Append a labelled byte string.
    pub fn append_message(&mut self, label: &'static [u8], message: &[u8]) {
        self.hasher.update((label.len() as u64).to_le_bytes());
        self.hasher.update(label);
        self.hasher.update((message.len() as u64).to_le_bytes());
        self.hasher.update(message);
    }

    /// Append the compressed encoding of a point or scalar.
    pub fn append_serializable<T: CanonicalSerialize>(
        &mut self,
        label: &'static [u8],
        value: &T,
    ) -> Result<(), AnonCredError> {
        let bytes = crate::curve::to_bytes(value)?;
        self.append_message(label, &bytes);
        Ok(())
    }

    /// Extract 64 bytes of output key material.
    pub fn okm(&self, label: &'static [u8]) -> Vec<u8> {
        let mut hasher = self.hasher.clone();
        hasher.update((label.len() as u64).to_le_bytes());
        hasher.update(label);
        hasher.finalize().to_vec()
    }
}

/// `PREFIX ‖ (SEPARATOR ‖ okm)*`
pub fn combine_okm(parts: &[&[u8]]) -> Vec<u8> {
    let mut combined = CHALLENGE_PREFIX.to_vec();
    for okm in parts {
        combined.extend_from_slice(CHALLENGE_SEPARATOR);
        combined.extend_from_slice(okm);
    }
    combined
}

/// Challenge scalar for combined challenge bytes.
pub fn challenge_scalar<F: PrimeField>(combined_okm: &[u8]) -> F {
    hash_to_scalar(&[CHALLENGE_PREFIX, combined_okm])
}
