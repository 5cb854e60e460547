//! # BBS+ Multi-Message Signatures
//!
//! Signatures over a fixed-length vector of scalar messages, with a
//! zero-knowledge proof of knowledge of a signature that reveals a chosen
//! subset of the messages.
//!
//! ## Scheme
//!
//! - Secret key `x`, public key `w = g2·x`.
//! - Generators `h0, h1..hL` in G1 are hashed from the generator domain and
//!   the public key bytes, so they never need to be published.
//! - Signature `(A, e, s)` with `A = (g1 + h0·s + Σ hi·mi) · 1/(x + e)`.
//! - Verification: `e(A, w + g2·e) == e(g1 + h0·s + Σ hi·mi, g2)`.
//!
//! ## Proof of knowledge
//!
//! The prover randomizes the signature (`A' = A·r1`, `Ā = A'·(-e) + b·r1`,
//! `d = b·r1 - h0·r2`) and runs two Schnorr proofs under one Fiat-Shamir
//! challenge: knowledge of `(-e, r2)` in `Ā - d = A'·(-e) + h0·r2`, and
//! knowledge of `(1/r1, s - r2/r1, hidden mj)` in
//! `g1 + Σrev hi·mi = d·(1/r1) - h0·(s - r2/r1) - Σhid hj·mj`.
//!
//! Proof generation is split in two phases so the signature proof can share
//! a challenge with other sub-proofs. [`create_proof_pre()`] commits and
//! yields the `okm` for the challenge; [`create_proof_post()`] finishes with
//! the combined challenge bytes. A hidden message proved with
//! [`ProofMessage::SharedBlinding`] has response `blinding + c·m`, which lets
//! a verifier check that another sub-proof used the same message.

use std::collections::BTreeMap;

use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_ff::Field;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use ssi_core::AnonCredConfig;

use crate::curve::{ensure_curve, from_bytes, random_nonzero, to_bytes, SchemeCurve};
use crate::error::AnonCredError;
use crate::transcript::{challenge_scalar, Transcript};

type Scalar<E> = <E as Pairing>::ScalarField;

/// BBS+ secret key. Never serialized.
pub struct BbsSecretKey<E: Pairing> {
    x: E::ScalarField,
}

impl<E: Pairing> std::fmt::Debug for BbsSecretKey<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BbsSecretKey(<private>)")
    }
}

/// BBS+ public key `w = g2·x`.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct BbsPublicKey<E: Pairing> {
    w: E::G2Affine,
}

/// Published signature parameters: message length and encoded public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BbsPlusParams {
    /// Number of messages every signature covers.
    pub msg_length: u32,
    /// Compressed public key.
    #[serde(with = "hex::serde")]
    pub public_key: Vec<u8>,
}

impl BbsPlusParams {
    /// Message length as `usize`.
    pub fn msg_len(&self) -> usize {
        self.msg_length as usize
    }

    /// Decode the public key.
    pub fn public_key<E: SchemeCurve>(&self) -> Result<BbsPublicKey<E>, AnonCredError> {
        from_bytes(&self.public_key)
    }

    /// Derive the message generators for this key.
    pub fn generators<E: SchemeCurve>(&self, config: &AnonCredConfig) -> MessageGenerators<E> {
        MessageGenerators::derive(config, &self.public_key, self.msg_len())
    }

    fn check_len(&self, actual: usize) -> Result<(), AnonCredError> {
        if actual != self.msg_len() {
            return Err(AnonCredError::MessageCount {
                expected: self.msg_len(),
                actual,
            });
        }
        Ok(())
    }
}

/// Generators `h0, h1..hL`.
#[derive(Clone, Debug)]
pub struct MessageGenerators<E: Pairing> {
    h0: E::G1Affine,
    h: Vec<E::G1Affine>,
}

impl<E: SchemeCurve> MessageGenerators<E> {
    fn derive(config: &AnonCredConfig, public_key: &[u8], len: usize) -> Self {
        let domain = config.generator_domain.as_bytes();
        let h0 = E::hash_to_g1(domain, &generator_seed(public_key, b"h0", 0));
        let h = (0..len)
            .map(|i| E::hash_to_g1(domain, &generator_seed(public_key, b"h", i as u32)))
            .collect();
        Self { h0, h }
    }

    /// `g1 + h0·s + Σ hi·mi`
    fn commit(&self, s: Scalar<E>, messages: &[Scalar<E>]) -> E::G1 {
        let mut b = E::G1::generator() + self.h0 * s;
        for (h, m) in self.h.iter().zip(messages) {
            b += *h * *m;
        }
        b
    }
}

fn generator_seed(public_key: &[u8], tag: &[u8], index: u32) -> Vec<u8> {
    let mut seed = Vec::with_capacity(public_key.len() + tag.len() + 4);
    seed.extend_from_slice(public_key);
    seed.extend_from_slice(tag);
    seed.extend_from_slice(&index.to_be_bytes());
    seed
}

/// A BBS+ signature `(A, e, s)`.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct BbsSignature<E: Pairing> {
    a: E::G1Affine,
    e: E::ScalarField,
    s: E::ScalarField,
}

impl<E: SchemeCurve> BbsSignature<E> {
    /// Compressed encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, AnonCredError> {
        to_bytes(self)
    }

    /// Decode a compressed encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AnonCredError> {
        from_bytes(bytes)
    }
}

/// Generate a key pair for signatures over `msg_length` messages.
pub fn generate_keypair<E: SchemeCurve, R: RngCore + CryptoRng>(
    config: &AnonCredConfig,
    msg_length: usize,
    rng: &mut R,
) -> Result<(BbsSecretKey<E>, BbsPlusParams), AnonCredError> {
    ensure_curve::<E>(config)?;
    if msg_length == 0 {
        return Err(AnonCredError::InvalidParameters(
            "message length must be at least 1".to_string(),
        ));
    }
    let msg_length = u32::try_from(msg_length)
        .map_err(|_| AnonCredError::InvalidParameters(format!("message length {msg_length}")))?;
    let x: Scalar<E> = random_nonzero(rng);
    let public_key = BbsPublicKey::<E> {
        w: (E::G2::generator() * x).into_affine(),
    };
    let params = BbsPlusParams {
        msg_length,
        public_key: to_bytes(&public_key)?,
    };
    Ok((BbsSecretKey { x }, params))
}

/// Sign a message vector.
pub fn sign<E: SchemeCurve, R: RngCore + CryptoRng>(
    config: &AnonCredConfig,
    secret_key: &BbsSecretKey<E>,
    params: &BbsPlusParams,
    messages: &[Scalar<E>],
    rng: &mut R,
) -> Result<BbsSignature<E>, AnonCredError> {
    ensure_curve::<E>(config)?;
    params.check_len(messages.len())?;
    let public_key = params.public_key::<E>()?;
    if (E::G2::generator() * secret_key.x).into_affine() != public_key.w {
        return Err(AnonCredError::InvalidParameters(
            "secret key does not match public key".to_string(),
        ));
    }

    let e = Scalar::<E>::rand(rng);
    let s = Scalar::<E>::rand(rng);
    let exponent = (secret_key.x + e)
        .inverse()
        .ok_or(AnonCredError::Degenerate("x + e"))?;
    let b = params.generators::<E>(config).commit(s, messages);
    Ok(BbsSignature {
        a: (b * exponent).into_affine(),
        e,
        s,
    })
}

/// Verify a signature over a message vector.
pub fn verify_signature<E: SchemeCurve>(
    config: &AnonCredConfig,
    params: &BbsPlusParams,
    messages: &[Scalar<E>],
    signature: &BbsSignature<E>,
) -> Result<(), AnonCredError> {
    ensure_curve::<E>(config)?;
    params.check_len(messages.len())?;
    if signature.a.is_zero() {
        return Err(AnonCredError::InvalidSignature);
    }
    let public_key = params.public_key::<E>()?;
    let b = params.generators::<E>(config).commit(signature.s, messages);
    let lhs = E::pairing(
        signature.a,
        public_key.w.into_group() + E::G2::generator() * signature.e,
    );
    let rhs = E::pairing(b, E::G2Affine::generator());
    if lhs != rhs {
        return Err(AnonCredError::InvalidSignature);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Proof of knowledge
// ---------------------------------------------------------------------------

/// How a message takes part in a proof.
#[derive(Clone, Copy, Debug)]
pub enum ProofMessage<F> {
    /// Disclosed to the verifier.
    Revealed(F),
    /// Hidden, with a fresh random blinding.
    Hidden(F),
    /// Hidden, with a caller-chosen blinding shared with another sub-proof.
    SharedBlinding {
        /// The message.
        message: F,
        /// The external blinding.
        blinding: F,
    },
}

impl<F: Copy> ProofMessage<F> {
    /// The underlying message.
    pub fn value(&self) -> F {
        match self {
            Self::Revealed(m) | Self::Hidden(m) => *m,
            Self::SharedBlinding { message, .. } => *message,
        }
    }
}

struct Commitments<E: Pairing> {
    a_prime: E::G1Affine,
    a_bar: E::G1Affine,
    d: E::G1Affine,
    t1: E::G1Affine,
    t2: E::G1Affine,
}

fn proof_okm<E: SchemeCurve>(
    params: &BbsPlusParams,
    revealed: &BTreeMap<usize, Scalar<E>>,
    nonce: &[u8],
    commitments: &Commitments<E>,
) -> Result<Vec<u8>, AnonCredError> {
    let mut transcript = Transcript::new(b"bbs+ signature proof of knowledge");
    transcript.append_message(b"public-key", &params.public_key);
    transcript.append_message(b"message-length", &params.msg_length.to_le_bytes());
    for (index, message) in revealed {
        transcript.append_message(b"revealed-index", &(*index as u64).to_le_bytes());
        transcript.append_serializable(b"revealed-message", message)?;
    }
    transcript.append_serializable(b"a-prime", &commitments.a_prime)?;
    transcript.append_serializable(b"a-bar", &commitments.a_bar)?;
    transcript.append_serializable(b"d", &commitments.d)?;
    transcript.append_serializable(b"t1", &commitments.t1)?;
    transcript.append_serializable(b"t2", &commitments.t2)?;
    transcript.append_message(b"nonce", nonce);
    Ok(transcript.okm(b"okm"))
}

/// Prover state between commitment and response.
pub struct PokSignature<E: Pairing> {
    a_prime: E::G1Affine,
    a_bar: E::G1Affine,
    d: E::G1Affine,
    secrets1: [E::ScalarField; 2],
    blindings1: [E::ScalarField; 2],
    secrets2: Vec<E::ScalarField>,
    blindings2: Vec<E::ScalarField>,
    okm: Vec<u8>,
}

impl<E: Pairing> std::fmt::Debug for PokSignature<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PokSignature(<secret>)")
    }
}

impl<E: SchemeCurve> PokSignature<E> {
    /// Output key material of the commitment phase.
    pub fn okm(&self) -> &[u8] {
        &self.okm
    }

    /// Compute responses `blinding + c·secret`.
    pub fn generate_proof(self, challenge: Scalar<E>) -> PokSignatureProof<E> {
        let respond = |blindings: &[Scalar<E>], secrets: &[Scalar<E>]| -> Vec<Scalar<E>> {
            blindings
                .iter()
                .zip(secrets)
                .map(|(b, s)| *b + challenge * s)
                .collect()
        };
        PokSignatureProof {
            a_prime: self.a_prime,
            a_bar: self.a_bar,
            d: self.d,
            proof1: respond(&self.blindings1[..], &self.secrets1[..]),
            proof2: respond(&self.blindings2, &self.secrets2),
        }
    }
}

/// A finished proof of knowledge of a signature.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PokSignatureProof<E: Pairing> {
    a_prime: E::G1Affine,
    a_bar: E::G1Affine,
    d: E::G1Affine,
    proof1: Vec<E::ScalarField>,
    proof2: Vec<E::ScalarField>,
}

impl<E: SchemeCurve> PokSignatureProof<E> {
    /// Compressed encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, AnonCredError> {
        to_bytes(self)
    }

    /// Decode a compressed encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AnonCredError> {
        from_bytes(bytes)
    }

    /// Response for hidden message `index`. With a shared blinding this is
    /// the value another sub-proof must reproduce.
    pub fn hidden_response(
        &self,
        msg_length: usize,
        revealed: &BTreeMap<usize, Scalar<E>>,
        index: usize,
    ) -> Option<Scalar<E>> {
        if index >= msg_length || revealed.contains_key(&index) {
            return None;
        }
        let position = (0..index).filter(|i| !revealed.contains_key(i)).count();
        self.proof2.get(2 + position).copied()
    }
}

/// Commit phase of a signature proof of knowledge.
pub fn create_proof_pre<E: SchemeCurve, R: RngCore + CryptoRng>(
    config: &AnonCredConfig,
    params: &BbsPlusParams,
    signature: &BbsSignature<E>,
    messages: &[ProofMessage<Scalar<E>>],
    nonce: &[u8],
    rng: &mut R,
) -> Result<PokSignature<E>, AnonCredError> {
    let values: Vec<Scalar<E>> = messages.iter().map(ProofMessage::value).collect();
    verify_signature(config, params, &values, signature)?;
    let generators = params.generators::<E>(config);

    let r1: Scalar<E> = random_nonzero(rng);
    let r2 = Scalar::<E>::rand(rng);
    let r3 = r1.inverse().ok_or(AnonCredError::Degenerate("r1"))?;
    let b = generators.commit(signature.s, &values);
    let a_prime = signature.a * r1;
    let a_bar = a_prime * (-signature.e) + b * r1;
    let d = b * r1 - generators.h0 * r2;
    let s_prime = signature.s - r2 * r3;

    let secrets1 = [-signature.e, r2];
    let blindings1 = [Scalar::<E>::rand(rng), Scalar::<E>::rand(rng)];
    let t1 = a_prime * blindings1[0] + generators.h0 * blindings1[1];

    let mut secrets2 = vec![r3, s_prime];
    let mut blindings2 = vec![Scalar::<E>::rand(rng), Scalar::<E>::rand(rng)];
    let mut t2 = d * blindings2[0] - generators.h0 * blindings2[1];
    let mut revealed = BTreeMap::new();
    for (i, message) in messages.iter().enumerate() {
        let (m, blinding) = match *message {
            ProofMessage::Revealed(m) => {
                revealed.insert(i, m);
                continue;
            }
            ProofMessage::Hidden(m) => (m, Scalar::<E>::rand(rng)),
            ProofMessage::SharedBlinding { message, blinding } => (message, blinding),
        };
        secrets2.push(m);
        blindings2.push(blinding);
        t2 -= generators.h[i] * blinding;
    }

    let commitments = Commitments::<E> {
        a_prime: a_prime.into_affine(),
        a_bar: a_bar.into_affine(),
        d: d.into_affine(),
        t1: t1.into_affine(),
        t2: t2.into_affine(),
    };
    let okm = proof_okm(params, &revealed, nonce, &commitments)?;
    Ok(PokSignature {
        a_prime: commitments.a_prime,
        a_bar: commitments.a_bar,
        d: commitments.d,
        secrets1,
        blindings1,
        secrets2,
        blindings2,
        okm,
    })
}

/// Response phase: derive the challenge from the combined challenge bytes.
pub fn create_proof_post<E: SchemeCurve>(
    pok: PokSignature<E>,
    challenge_okm: &[u8],
) -> PokSignatureProof<E> {
    pok.generate_proof(challenge_scalar(challenge_okm))
}

/// Verify a signature proof against the declared challenge bytes and return
/// the recomputed `okm`. The caller recombines it with the other
/// sub-proofs' `okm` and compares against the declared challenge bytes.
pub fn verify_proof<E: SchemeCurve>(
    config: &AnonCredConfig,
    params: &BbsPlusParams,
    revealed: &BTreeMap<usize, Scalar<E>>,
    nonce: &[u8],
    challenge_okm: &[u8],
    proof: &PokSignatureProof<E>,
) -> Result<Vec<u8>, AnonCredError> {
    ensure_curve::<E>(config)?;
    let len = params.msg_len();
    if let Some((&index, _)) = revealed.range(len..).next() {
        return Err(AnonCredError::MessageIndex { index, len });
    }
    let hidden: Vec<usize> = (0..len).filter(|i| !revealed.contains_key(i)).collect();
    if proof.proof1.len() != 2 || proof.proof2.len() != 2 + hidden.len() {
        return Err(AnonCredError::InvalidProof(
            "unexpected number of responses".to_string(),
        ));
    }
    if proof.a_prime.is_zero() {
        return Err(AnonCredError::InvalidProof("A' is the identity".to_string()));
    }

    let public_key = params.public_key::<E>()?;
    if E::pairing(proof.a_prime, public_key.w) != E::pairing(proof.a_bar, E::G2Affine::generator())
    {
        return Err(AnonCredError::InvalidProof("pairing check failed".to_string()));
    }

    let generators = params.generators::<E>(config);
    let c: Scalar<E> = challenge_scalar(challenge_okm);

    let t1 = proof.a_prime * proof.proof1[0] + generators.h0 * proof.proof1[1]
        - (proof.a_bar.into_group() - proof.d.into_group()) * c;

    let mut base = E::G1::generator();
    for (index, message) in revealed {
        base += generators.h[*index] * *message;
    }
    let mut t2 = proof.d * proof.proof2[0] - generators.h0 * proof.proof2[1] - base * c;
    for (k, j) in hidden.iter().enumerate() {
        t2 -= generators.h[*j] * proof.proof2[2 + k];
    }

    let commitments = Commitments::<E> {
        a_prime: proof.a_prime,
        a_bar: proof.a_bar,
        d: proof.d,
        t1: t1.into_affine(),
        t2: t2.into_affine(),
    };
    proof_okm(params, revealed, nonce, &commitments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::message_from_bytes;
    use crate::transcript::combine_okm;
    use ark_bls12_381::{Bls12_381, Fr};
    use rand::rngs::OsRng;

    fn config() -> AnonCredConfig {
        AnonCredConfig::default()
    }

    fn messages(n: usize) -> Vec<Fr> {
        (0..n)
            .map(|i| message_from_bytes(format!("attribute-{i}").as_bytes()))
            .collect()
    }

    #[test]
    fn test_sign_verify() {
        let (sk, params) = generate_keypair::<Bls12_381, _>(&config(), 4, &mut OsRng).unwrap();
        let msgs = messages(4);
        let sig = sign(&config(), &sk, &params, &msgs, &mut OsRng).unwrap();
        verify_signature(&config(), &params, &msgs, &sig).unwrap();

        let mut tampered = msgs.clone();
        tampered[2] = Fr::from(7u64);
        assert!(matches!(
            verify_signature(&config(), &params, &tampered, &sig),
            Err(AnonCredError::InvalidSignature)
        ));
    }

    #[test]
    fn test_message_count_enforced() {
        let (sk, params) = generate_keypair::<Bls12_381, _>(&config(), 3, &mut OsRng).unwrap();
        assert!(matches!(
            sign(&config(), &sk, &params, &messages(2), &mut OsRng),
            Err(AnonCredError::MessageCount { expected: 3, actual: 2 })
        ));
        assert!(generate_keypair::<Bls12_381, _>(&config(), 0, &mut OsRng).is_err());
    }

    #[test]
    fn test_wrong_secret_key_rejected() {
        let (_, params) = generate_keypair::<Bls12_381, _>(&config(), 2, &mut OsRng).unwrap();
        let (other_sk, _) = generate_keypair::<Bls12_381, _>(&config(), 2, &mut OsRng).unwrap();
        assert!(matches!(
            sign(&config(), &other_sk, &params, &messages(2), &mut OsRng),
            Err(AnonCredError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_signature_encoding() {
        let (sk, params) = generate_keypair::<Bls12_381, _>(&config(), 2, &mut OsRng).unwrap();
        let sig = sign(&config(), &sk, &params, &messages(2), &mut OsRng).unwrap();
        let decoded = BbsSignature::<Bls12_381>::from_bytes(&sig.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, sig);
    }

    fn prove(
        params: &BbsPlusParams,
        sig: &BbsSignature<Bls12_381>,
        proof_msgs: &[ProofMessage<Fr>],
    ) -> (Vec<u8>, PokSignatureProof<Bls12_381>) {
        let pok = create_proof_pre(&config(), params, sig, proof_msgs, b"nonce", &mut OsRng).unwrap();
        let challenge = combine_okm(&[pok.okm()]);
        let proof = create_proof_post(pok, &challenge);
        (challenge, proof)
    }

    #[test]
    fn test_selective_disclosure_proof() {
        let (sk, params) = generate_keypair::<Bls12_381, _>(&config(), 4, &mut OsRng).unwrap();
        let msgs = messages(4);
        let sig = sign(&config(), &sk, &params, &msgs, &mut OsRng).unwrap();
        let proof_msgs = [
            ProofMessage::Hidden(msgs[0]),
            ProofMessage::Revealed(msgs[1]),
            ProofMessage::Hidden(msgs[2]),
            ProofMessage::Revealed(msgs[3]),
        ];
        let (challenge, proof) = prove(&params, &sig, &proof_msgs);
        let revealed: BTreeMap<usize, Fr> = [(1, msgs[1]), (3, msgs[3])].into_iter().collect();

        let okm = verify_proof(&config(), &params, &revealed, b"nonce", &challenge, &proof).unwrap();
        assert_eq!(combine_okm(&[okm.as_slice()]), challenge);

        let proof = PokSignatureProof::<Bls12_381>::from_bytes(&proof.to_bytes().unwrap()).unwrap();
        let okm = verify_proof(&config(), &params, &revealed, b"nonce", &challenge, &proof).unwrap();
        assert_eq!(combine_okm(&[okm.as_slice()]), challenge);
    }

    #[test]
    fn test_mutated_revealed_message_changes_okm() {
        let (sk, params) = generate_keypair::<Bls12_381, _>(&config(), 3, &mut OsRng).unwrap();
        let msgs = messages(3);
        let sig = sign(&config(), &sk, &params, &msgs, &mut OsRng).unwrap();
        let proof_msgs = [
            ProofMessage::Hidden(msgs[0]),
            ProofMessage::Revealed(msgs[1]),
            ProofMessage::Revealed(msgs[2]),
        ];
        let (challenge, proof) = prove(&params, &sig, &proof_msgs);
        let forged: BTreeMap<usize, Fr> = [(1, msgs[1]), (2, Fr::from(99u64))].into_iter().collect();
        let okm = verify_proof(&config(), &params, &forged, b"nonce", &challenge, &proof).unwrap();
        assert_ne!(combine_okm(&[okm.as_slice()]), challenge);
    }

    #[test]
    fn test_wrong_nonce_changes_okm() {
        let (sk, params) = generate_keypair::<Bls12_381, _>(&config(), 2, &mut OsRng).unwrap();
        let msgs = messages(2);
        let sig = sign(&config(), &sk, &params, &msgs, &mut OsRng).unwrap();
        let (challenge, proof) = prove(
            &params,
            &sig,
            &[ProofMessage::Hidden(msgs[0]), ProofMessage::Hidden(msgs[1])],
        );
        let okm = verify_proof(&config(), &params, &BTreeMap::new(), b"other", &challenge, &proof).unwrap();
        assert_ne!(combine_okm(&[okm.as_slice()]), challenge);
    }

    #[test]
    fn test_shared_blinding_response() {
        let (sk, params) = generate_keypair::<Bls12_381, _>(&config(), 2, &mut OsRng).unwrap();
        let msgs = messages(2);
        let sig = sign(&config(), &sk, &params, &msgs, &mut OsRng).unwrap();
        let blinding = Fr::from(12345u64);
        let (challenge, proof) = prove(
            &params,
            &sig,
            &[
                ProofMessage::SharedBlinding { message: msgs[0], blinding },
                ProofMessage::Revealed(msgs[1]),
            ],
        );
        let revealed: BTreeMap<usize, Fr> = [(1, msgs[1])].into_iter().collect();
        let c: Fr = challenge_scalar(&challenge);
        assert_eq!(
            proof.hidden_response(2, &revealed, 0),
            Some(blinding + c * msgs[0])
        );
        assert_eq!(proof.hidden_response(2, &revealed, 1), None);
    }

    #[test]
    fn test_revealed_index_out_of_range() {
        let (sk, params) = generate_keypair::<Bls12_381, _>(&config(), 1, &mut OsRng).unwrap();
        let msgs = messages(1);
        let sig = sign(&config(), &sk, &params, &msgs, &mut OsRng).unwrap();
        let (challenge, proof) = prove(&params, &sig, &[ProofMessage::Hidden(msgs[0])]);
        let revealed: BTreeMap<usize, Fr> = [(5, msgs[0])].into_iter().collect();
        assert!(matches!(
            verify_proof(&config(), &params, &revealed, b"nonce", &challenge, &proof),
            Err(AnonCredError::MessageIndex { index: 5, len: 1 })
        ));
    }
}
