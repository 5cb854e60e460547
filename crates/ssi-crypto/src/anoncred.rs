//! # Anonymous Credentials
//!
//! Composes a BBS+ signature over an attribute vector with a revocation
//! accumulator. Slot 0 of every attribute vector is the holder's linking
//! secret: it is signed by the issuer and is also the element accumulated for
//! the holder.
//!
//! ## Proof
//!
//! A proof shows possession of a validly signed attribute vector, current
//! membership of the linking secret in the latest accumulator state, and that
//! both refer to the same secret, without revealing the secret or any
//! undisclosed attribute.
//!
//! 1. One random blinding is used for slot 0 in both sub-proofs.
//! 2. Each sub-proof commits and yields its `okm`; the two are combined into
//!    the challenge bytes, which both sub-proofs answer.
//! 3. The verifier recomputes both `okm`, recombines them, and requires the
//!    result to equal the declared challenge bytes. It then requires the
//!    slot-0 response of the signature proof to equal the accumulator proof's
//!    public blinding.
//!
//! ## Security Invariant
//!
//! Slot 0 is never revealed. Every call checks the configured curve against
//! the curve recorded in the public parameters.

use std::collections::{BTreeMap, BTreeSet};

use ark_ec::pairing::Pairing;
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use ssi_core::{AnonCredConfig, CurveId};

use crate::accumulator::{
    self, AccumulatorParams, AccumulatorSecretKey, AccumulatorState, MembershipProof,
    MembershipWitness,
};
use crate::bbs::{self, BbsPlusParams, BbsSecretKey, BbsSignature, PokSignatureProof, ProofMessage};
use crate::curve::{ensure_curve, ensure_curve_id, to_bytes, SchemeCurve};
use crate::error::AnonCredError;
use crate::transcript::combine_okm;

type Scalar<E> = <E as Pairing>::ScalarField;

/// Attribute slot holding the linking secret.
pub const LINK_INDEX: usize = 0;

/// Public parameters of an anonymous credential schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicParameters {
    /// Curve both primitives run over.
    pub curve: CurveId,
    /// Signature parameters.
    pub bbs_plus_params: BbsPlusParams,
    /// Accumulator public key and state history.
    pub accumulator_params: AccumulatorParams,
}

impl PublicParameters {
    fn check<E: SchemeCurve>(&self, config: &AnonCredConfig) -> Result<(), AnonCredError> {
        ensure_curve::<E>(config)?;
        ensure_curve_id::<E>(self.curve)
    }

    /// Number of attributes, linking secret included.
    pub fn msg_len(&self) -> usize {
        self.bbs_plus_params.msg_len()
    }

    /// Index of the latest accumulator state.
    pub fn latest_state(&self) -> Result<usize, AnonCredError> {
        self.accumulator_params.latest_index()
    }
}

/// Issuer secret keys. Never serialized.
pub struct AnonCredSecretKey<E: Pairing> {
    bbs: BbsSecretKey<E>,
    accumulator: AccumulatorSecretKey<E>,
}

impl<E: Pairing> std::fmt::Debug for AnonCredSecretKey<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AnonCredSecretKey(<private>)")
    }
}

/// Create a schema for attribute vectors of `msg_length` (slot 0 included)
/// with an empty accumulator.
pub fn new_schema<E: SchemeCurve, R: RngCore + CryptoRng>(
    config: &AnonCredConfig,
    msg_length: usize,
    rng: &mut R,
) -> Result<(AnonCredSecretKey<E>, PublicParameters), AnonCredError> {
    let (bbs_key, bbs_plus_params) = bbs::generate_keypair::<E, R>(config, msg_length, rng)?;
    let (accumulator_key, accumulator_params) = accumulator::setup::<E, R>(config, &[], rng)?;
    Ok((
        AnonCredSecretKey {
            bbs: bbs_key,
            accumulator: accumulator_key,
        },
        PublicParameters {
            curve: E::ID,
            bbs_plus_params,
            accumulator_params,
        },
    ))
}

/// What a holder receives at issuance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedCredential<E: Pairing> {
    /// Signature over the attribute vector.
    pub signature: BbsSignature<E>,
    /// Witness for the linking secret against the latest state at issuance.
    pub witness: MembershipWitness<E>,
    /// State index the witness is valid at.
    pub state_index: usize,
}

/// Sign `messages` and compute a witness for `messages[0]`.
pub fn issue<E: SchemeCurve, R: RngCore + CryptoRng>(
    config: &AnonCredConfig,
    secret_key: &AnonCredSecretKey<E>,
    params: &PublicParameters,
    messages: &[Scalar<E>],
    rng: &mut R,
) -> Result<IssuedCredential<E>, AnonCredError> {
    params.check::<E>(config)?;
    let signature = bbs::sign(config, &secret_key.bbs, &params.bbs_plus_params, messages, rng)?;
    let witness = accumulator::create_witness(
        config,
        &secret_key.accumulator,
        &params.accumulator_params,
        messages[LINK_INDEX],
    )?;
    Ok(IssuedCredential {
        signature,
        witness,
        state_index: params.latest_state()?,
    })
}

/// Append an accumulator state. Deleting a linking secret revokes its holder.
pub fn update_state<E: SchemeCurve>(
    config: &AnonCredConfig,
    secret_key: &AnonCredSecretKey<E>,
    params: &mut PublicParameters,
    additions: &[Scalar<E>],
    deletions: &[Scalar<E>],
) -> Result<AccumulatorState, AnonCredError> {
    params.check::<E>(config)?;
    accumulator::update_state(
        config,
        &secret_key.accumulator,
        &mut params.accumulator_params,
        additions,
        deletions,
    )
}

/// Advance a holder's witness to the latest published state.
pub fn update_witness<E: SchemeCurve>(
    config: &AnonCredConfig,
    params: &PublicParameters,
    credential: &IssuedCredential<E>,
) -> Result<IssuedCredential<E>, AnonCredError> {
    params.check::<E>(config)?;
    let latest = params.latest_state()?;
    let witness = accumulator::update_witness(
        config,
        &params.accumulator_params,
        &credential.witness,
        credential.state_index,
        latest,
    )?;
    Ok(IssuedCredential {
        signature: credential.signature.clone(),
        witness,
        state_index: latest,
    })
}

/// Wire form of a composed proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousCredentialProof {
    /// Verifier-chosen nonce bound into the signature proof.
    #[serde(with = "hex::serde")]
    pub nonce: Vec<u8>,
    /// Combined challenge bytes.
    #[serde(with = "hex::serde")]
    pub challenge: Vec<u8>,
    /// Encoded signature proof of knowledge.
    #[serde(with = "hex::serde")]
    pub bbs_plus_proof: Vec<u8>,
    /// Entropy behind the membership proof generators.
    #[serde(with = "hex::serde")]
    pub accumulator_entropy: Vec<u8>,
    /// Encoded membership proof.
    #[serde(with = "hex::serde")]
    pub accumulator_proof: Vec<u8>,
}

/// Prove possession of `credential` over `messages`, disclosing the
/// attributes at `revealed`.
pub fn create_proof<E: SchemeCurve, R: RngCore + CryptoRng>(
    config: &AnonCredConfig,
    params: &PublicParameters,
    credential: &IssuedCredential<E>,
    messages: &[Scalar<E>],
    revealed: &BTreeSet<usize>,
    nonce: &[u8],
    rng: &mut R,
) -> Result<AnonymousCredentialProof, AnonCredError> {
    params.check::<E>(config)?;
    check_revealed(params.msg_len(), revealed.iter().copied())?;
    if messages.len() != params.msg_len() {
        return Err(AnonCredError::MessageCount {
            expected: params.msg_len(),
            actual: messages.len(),
        });
    }

    let blinding = Scalar::<E>::rand(rng);
    let proof_messages: Vec<ProofMessage<Scalar<E>>> = messages
        .iter()
        .enumerate()
        .map(|(i, m)| match i {
            LINK_INDEX => ProofMessage::SharedBlinding {
                message: *m,
                blinding,
            },
            _ if revealed.contains(&i) => ProofMessage::Revealed(*m),
            _ => ProofMessage::Hidden(*m),
        })
        .collect();

    let pok = bbs::create_proof_pre(
        config,
        &params.bbs_plus_params,
        &credential.signature,
        &proof_messages,
        nonce,
        rng,
    )?;
    let committing = accumulator::create_membership_proof_pre(
        config,
        &params.accumulator_params,
        &credential.witness,
        Some(blinding),
        rng,
    )?;
    let challenge = combine_okm(&[pok.okm(), committing.okm()]);
    let accumulator_entropy = committing.entropy().to_vec();

    let bbs_plus_proof = bbs::create_proof_post(pok, &challenge);
    let accumulator_proof = accumulator::create_membership_proof_post(committing, &challenge);
    Ok(AnonymousCredentialProof {
        nonce: nonce.to_vec(),
        challenge,
        bbs_plus_proof: bbs_plus_proof.to_bytes()?,
        accumulator_entropy,
        accumulator_proof: accumulator_proof.to_bytes()?,
    })
}

/// Verify a composed proof against the disclosed attributes.
pub fn verify_proof<E: SchemeCurve>(
    config: &AnonCredConfig,
    params: &PublicParameters,
    revealed: &BTreeMap<usize, Scalar<E>>,
    proof: &AnonymousCredentialProof,
) -> Result<(), AnonCredError> {
    params.check::<E>(config)?;
    check_revealed(params.msg_len(), revealed.keys().copied())?;
    let bbs_proof = PokSignatureProof::<E>::from_bytes(&proof.bbs_plus_proof)?;
    let membership_proof = MembershipProof::<E>::from_bytes(&proof.accumulator_proof)?;

    let bbs_okm = bbs::verify_proof(
        config,
        &params.bbs_plus_params,
        revealed,
        &proof.nonce,
        &proof.challenge,
        &bbs_proof,
    )?;
    let accumulator_okm = accumulator::verify_membership_proof(
        config,
        &params.accumulator_params,
        &proof.accumulator_entropy,
        &proof.challenge,
        &membership_proof,
    )?;
    if combine_okm(&[bbs_okm.as_slice(), accumulator_okm.as_slice()]) != proof.challenge {
        return Err(AnonCredError::ChallengeMismatch);
    }

    let linked = bbs_proof
        .hidden_response(params.msg_len(), revealed, LINK_INDEX)
        .ok_or(AnonCredError::LinkMismatch)?;
    if to_bytes(&linked)? != to_bytes(&membership_proof.public_blinding())? {
        return Err(AnonCredError::LinkMismatch);
    }
    Ok(())
}

fn check_revealed(len: usize, indices: impl IntoIterator<Item = usize>) -> Result<(), AnonCredError> {
    for index in indices {
        if index == LINK_INDEX {
            return Err(AnonCredError::InvalidParameters(
                "the linking secret cannot be revealed".to_string(),
            ));
        }
        if index >= len {
            return Err(AnonCredError::MessageIndex { index, len });
        }
    }
    Ok(())
}
