//! # Positive Revocation Accumulator
//!
//! A pairing-based accumulator over scalar elements with an append-only state
//! history, batch updates, and a zero-knowledge membership proof that can
//! share its element blinding with a BBS+ proof.
//!
//! ## Scheme
//!
//! - Secret key `α`, public key `Q = g2·α`.
//! - Value `V = g1·Π(y + α)` over the member set.
//! - Witness for `y`: `C = V·1/(y + α)`, verified by
//!   `e(C, g2·y + Q) == e(V, g2)`.
//!
//! ## Updates
//!
//! [`update_state()`] applies additions first, then deletions, and publishes
//! one coefficient per element: for an addition the value before it is
//! folded in, for a deletion the value after it is removed. A holder
//! advances a witness with [`update_witness()`] by replaying every published
//! delta between two state indices; no secret is needed.
//!
//! ## Security Invariant
//!
//! The published history is append-only. Each appended state's `update` is
//! the delta from the previous state, so replaying states `from+1..=to`
//! moves a witness from `states[from]` to `states[to]`.

use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_ff::{Field, One, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use ssi_core::AnonCredConfig;

use crate::curve::{ensure_curve, from_bytes, random_nonzero, to_bytes, SchemeCurve};
use crate::error::AnonCredError;
use crate::transcript::{challenge_scalar, Transcript};

type Scalar<E> = <E as Pairing>::ScalarField;

/// Bytes of fresh entropy behind each proof's generators.
pub const PROOF_ENTROPY_LEN: usize = 32;

/// Accumulator secret key. Never serialized.
pub struct AccumulatorSecretKey<E: Pairing> {
    alpha: E::ScalarField,
}

impl<E: Pairing> std::fmt::Debug for AccumulatorSecretKey<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccumulatorSecretKey(<private>)")
    }
}

/// Accumulator public key `Q = g2·α`.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct AccumulatorPublicKey<E: Pairing> {
    q: E::G2Affine,
}

/// Published accumulator parameters: public key and state history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccumulatorParams {
    /// Compressed public key.
    #[serde(with = "hex::serde")]
    pub public_key: Vec<u8>,
    /// Append-only state history. Never empty once set up.
    pub states: Vec<AccumulatorState>,
}

/// One published accumulator value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccumulatorState {
    /// Compressed accumulator value.
    #[serde(with = "hex::serde")]
    pub acc_value: Vec<u8>,
    /// Delta from the previous state. Absent on the initial state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<StateUpdate>,
}

/// Delta between two consecutive states.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdate {
    /// Added elements, in application order.
    #[serde(with = "hex_list")]
    pub additions: Vec<Vec<u8>>,
    /// Deleted elements, in application order.
    #[serde(with = "hex_list")]
    pub deletions: Vec<Vec<u8>>,
    /// One G1 coefficient per addition, then one per deletion.
    #[serde(with = "hex_list")]
    pub coefficients: Vec<Vec<u8>>,
}

mod hex_list {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(items.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|item| hex::decode(item).map_err(serde::de::Error::custom))
            .collect()
    }
}

struct DecodedUpdate<E: Pairing> {
    additions: Vec<E::ScalarField>,
    deletions: Vec<E::ScalarField>,
    coefficients: Vec<E::G1Affine>,
}

impl StateUpdate {
    fn decode<E: SchemeCurve>(&self) -> Result<DecodedUpdate<E>, AnonCredError> {
        let decoded = DecodedUpdate::<E> {
            additions: self.additions.iter().map(|b| from_bytes(b)).collect::<Result<_, _>>()?,
            deletions: self.deletions.iter().map(|b| from_bytes(b)).collect::<Result<_, _>>()?,
            coefficients: self
                .coefficients
                .iter()
                .map(|b| from_bytes(b))
                .collect::<Result<_, _>>()?,
        };
        if decoded.coefficients.len() != decoded.additions.len() + decoded.deletions.len() {
            return Err(AnonCredError::InvalidParameters(format!(
                "{} coefficients for {} additions and {} deletions",
                decoded.coefficients.len(),
                decoded.additions.len(),
                decoded.deletions.len()
            )));
        }
        Ok(decoded)
    }
}

impl AccumulatorParams {
    /// Decode the public key.
    pub fn public_key<E: SchemeCurve>(&self) -> Result<AccumulatorPublicKey<E>, AnonCredError> {
        from_bytes(&self.public_key)
    }

    /// Index of the latest state.
    pub fn latest_index(&self) -> Result<usize, AnonCredError> {
        self.states
            .len()
            .checked_sub(1)
            .ok_or_else(|| AnonCredError::InvalidParameters("accumulator has no states".to_string()))
    }

    /// Accumulator value at `index`.
    pub fn value_at<E: SchemeCurve>(&self, index: usize) -> Result<E::G1Affine, AnonCredError> {
        let state = self.states.get(index).ok_or(AnonCredError::StateIndex {
            index,
            len: self.states.len(),
        })?;
        from_bytes(&state.acc_value)
    }
}

fn check_key<E: SchemeCurve>(
    secret_key: &AccumulatorSecretKey<E>,
    params: &AccumulatorParams,
) -> Result<(), AnonCredError> {
    let public_key = params.public_key::<E>()?;
    if (E::G2::generator() * secret_key.alpha).into_affine() != public_key.q {
        return Err(AnonCredError::InvalidParameters(
            "secret key does not match public key".to_string(),
        ));
    }
    Ok(())
}

/// Generate a key pair and publish the initial state over `members`.
pub fn setup<E: SchemeCurve, R: RngCore + CryptoRng>(
    config: &AnonCredConfig,
    members: &[Scalar<E>],
    rng: &mut R,
) -> Result<(AccumulatorSecretKey<E>, AccumulatorParams), AnonCredError> {
    ensure_curve::<E>(config)?;
    let alpha: Scalar<E> = random_nonzero(rng);
    let public_key = AccumulatorPublicKey::<E> {
        q: (E::G2::generator() * alpha).into_affine(),
    };
    let product = members
        .iter()
        .fold(Scalar::<E>::one(), |acc, y| acc * (*y + alpha));
    if product.is_zero() {
        return Err(AnonCredError::Degenerate("member + α"));
    }
    let value = (E::G1::generator() * product).into_affine();
    let params = AccumulatorParams {
        public_key: to_bytes(&public_key)?,
        states: vec![AccumulatorState {
            acc_value: to_bytes(&value)?,
            update: None,
        }],
    };
    Ok((AccumulatorSecretKey { alpha }, params))
}

/// Append a state that adds then deletes the given elements. Returns the
/// appended state.
pub fn update_state<E: SchemeCurve>(
    config: &AnonCredConfig,
    secret_key: &AccumulatorSecretKey<E>,
    params: &mut AccumulatorParams,
    additions: &[Scalar<E>],
    deletions: &[Scalar<E>],
) -> Result<AccumulatorState, AnonCredError> {
    ensure_curve::<E>(config)?;
    if additions.is_empty() && deletions.is_empty() {
        return Err(AnonCredError::EmptyUpdate);
    }
    check_key(secret_key, params)?;
    let latest = params.latest_index()?;
    let mut value = params.value_at::<E>(latest)?.into_group();
    let mut coefficients = Vec::with_capacity(additions.len() + deletions.len());

    for a in additions {
        coefficients.push(to_bytes(&value.into_affine())?);
        value *= *a + secret_key.alpha;
    }
    for d in deletions {
        let inverse = (*d + secret_key.alpha)
            .inverse()
            .ok_or(AnonCredError::Degenerate("deletion + α"))?;
        value *= inverse;
        coefficients.push(to_bytes(&value.into_affine())?);
    }
    if value.is_zero() {
        return Err(AnonCredError::Degenerate("addition + α"));
    }

    let state = AccumulatorState {
        acc_value: to_bytes(&value.into_affine())?,
        update: Some(StateUpdate {
            additions: additions.iter().map(to_bytes).collect::<Result<_, _>>()?,
            deletions: deletions.iter().map(to_bytes).collect::<Result<_, _>>()?,
            coefficients,
        }),
    };
    params.states.push(state.clone());
    tracing::debug!(
        index = params.states.len() - 1,
        additions = additions.len(),
        deletions = deletions.len(),
        "accumulator state appended"
    );
    Ok(state)
}

// ---------------------------------------------------------------------------
// Witnesses
// ---------------------------------------------------------------------------

/// Membership witness `(y, C)`.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct MembershipWitness<E: Pairing> {
    element: E::ScalarField,
    c: E::G1Affine,
}

impl<E: SchemeCurve> MembershipWitness<E> {
    /// The accumulated element.
    pub fn element(&self) -> Scalar<E> {
        self.element
    }

    /// Compressed encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, AnonCredError> {
        to_bytes(self)
    }

    /// Decode a compressed encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AnonCredError> {
        from_bytes(bytes)
    }

    fn verify(&self, public_key: &AccumulatorPublicKey<E>, value: E::G1Affine) -> bool {
        let lhs = E::pairing(
            self.c,
            E::G2::generator() * self.element + public_key.q.into_group(),
        );
        lhs == E::pairing(value, E::G2Affine::generator())
    }

    fn apply(&mut self, update: &DecodedUpdate<E>) -> Result<(), AnonCredError> {
        let y = self.element;
        let mut c = self.c.into_group();
        let (add_coeffs, del_coeffs) = update.coefficients.split_at(update.additions.len());
        for (a, k) in update.additions.iter().zip(add_coeffs) {
            c = c * (*a - y) + *k;
        }
        for (d, k) in update.deletions.iter().zip(del_coeffs) {
            let inverse = (*d - y).inverse().ok_or(AnonCredError::MemberRevoked)?;
            c = (c - *k) * inverse;
        }
        self.c = c.into_affine();
        Ok(())
    }
}

/// Compute a witness for `element` against the latest state. The caller is
/// responsible for `element` being a member.
pub fn create_witness<E: SchemeCurve>(
    config: &AnonCredConfig,
    secret_key: &AccumulatorSecretKey<E>,
    params: &AccumulatorParams,
    element: Scalar<E>,
) -> Result<MembershipWitness<E>, AnonCredError> {
    ensure_curve::<E>(config)?;
    check_key(secret_key, params)?;
    let value = params.value_at::<E>(params.latest_index()?)?;
    let inverse = (element + secret_key.alpha)
        .inverse()
        .ok_or(AnonCredError::Degenerate("element + α"))?;
    Ok(MembershipWitness {
        element,
        c: (value * inverse).into_affine(),
    })
}

/// Verify a witness against state `index`.
pub fn verify_witness<E: SchemeCurve>(
    config: &AnonCredConfig,
    params: &AccumulatorParams,
    witness: &MembershipWitness<E>,
    index: usize,
) -> Result<(), AnonCredError> {
    ensure_curve::<E>(config)?;
    let value = params.value_at::<E>(index)?;
    if !witness.verify(&params.public_key::<E>()?, value) {
        return Err(AnonCredError::InvalidWitness(index));
    }
    Ok(())
}

/// Advance a witness valid at state `from` to state `to` by replaying the
/// published deltas, then verify it against `states[to]`.
pub fn update_witness<E: SchemeCurve>(
    config: &AnonCredConfig,
    params: &AccumulatorParams,
    witness: &MembershipWitness<E>,
    from: usize,
    to: usize,
) -> Result<MembershipWitness<E>, AnonCredError> {
    ensure_curve::<E>(config)?;
    let len = params.states.len();
    if to >= len {
        return Err(AnonCredError::StateIndex { index: to, len });
    }
    if from >= to {
        return Err(AnonCredError::InvalidParameters(format!(
            "no accumulator states between {from} and {to}"
        )));
    }

    let mut advanced = witness.clone();
    for (index, state) in params.states.iter().enumerate().take(to + 1).skip(from + 1) {
        let update = state.update.as_ref().ok_or_else(|| {
            AnonCredError::InvalidParameters(format!("state {index} carries no update"))
        })?;
        advanced.apply(&update.decode::<E>()?)?;
    }
    verify_witness(config, params, &advanced, to)?;
    Ok(advanced)
}

// ---------------------------------------------------------------------------
// Membership proof
// ---------------------------------------------------------------------------

/// Per-proof generators `X, Y, Z`, derived from the public key and fresh
/// entropy so they are unrelated to `g1`.
struct ProofGenerators<E: Pairing> {
    x: E::G1Affine,
    y: E::G1Affine,
    z: E::G1Affine,
}

impl<E: SchemeCurve> ProofGenerators<E> {
    fn derive(config: &AnonCredConfig, public_key: &[u8], entropy: &[u8]) -> Self {
        let domain = config.generator_domain.as_bytes();
        let point = |tag: &[u8]| {
            let mut seed = Vec::with_capacity(public_key.len() + entropy.len() + tag.len());
            seed.extend_from_slice(public_key);
            seed.extend_from_slice(entropy);
            seed.extend_from_slice(tag);
            E::hash_to_g1(domain, &seed)
        };
        Self {
            x: point(b"X"),
            y: point(b"Y"),
            z: point(b"Z"),
        }
    }
}

struct ProofCommitments<E: Pairing> {
    e_c: E::G1Affine,
    t_sigma: E::G1Affine,
    t_rho: E::G1Affine,
    r_e: PairingOutput<E>,
    r_sigma: E::G1Affine,
    r_rho: E::G1Affine,
    r_delta_sigma: E::G1Affine,
    r_delta_rho: E::G1Affine,
}

fn proof_okm<E: SchemeCurve>(
    params: &AccumulatorParams,
    value: &E::G1Affine,
    entropy: &[u8],
    commitments: &ProofCommitments<E>,
) -> Result<Vec<u8>, AnonCredError> {
    let mut transcript = Transcript::new(b"accumulator membership proof");
    transcript.append_message(b"public-key", &params.public_key);
    transcript.append_serializable(b"accumulator", value)?;
    transcript.append_message(b"entropy", entropy);
    transcript.append_serializable(b"e-c", &commitments.e_c)?;
    transcript.append_serializable(b"t-sigma", &commitments.t_sigma)?;
    transcript.append_serializable(b"t-rho", &commitments.t_rho)?;
    transcript.append_serializable(b"r-e", &commitments.r_e)?;
    transcript.append_serializable(b"r-sigma", &commitments.r_sigma)?;
    transcript.append_serializable(b"r-rho", &commitments.r_rho)?;
    transcript.append_serializable(b"r-delta-sigma", &commitments.r_delta_sigma)?;
    transcript.append_serializable(b"r-delta-rho", &commitments.r_delta_rho)?;
    Ok(transcript.okm(b"okm"))
}

/// Prover state between commitment and response.
pub struct MembershipProofCommitting<E: Pairing> {
    e_c: E::G1Affine,
    t_sigma: E::G1Affine,
    t_rho: E::G1Affine,
    /// `[y, σ, ρ, yσ, yρ]`
    secrets: [E::ScalarField; 5],
    blindings: [E::ScalarField; 5],
    entropy: Vec<u8>,
    okm: Vec<u8>,
}

impl<E: Pairing> std::fmt::Debug for MembershipProofCommitting<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MembershipProofCommitting(<secret>)")
    }
}

impl<E: SchemeCurve> MembershipProofCommitting<E> {
    /// Output key material of the commitment phase.
    pub fn okm(&self) -> &[u8] {
        &self.okm
    }

    /// Entropy the verifier needs to rederive the proof generators.
    pub fn entropy(&self) -> &[u8] {
        &self.entropy
    }

    /// Compute responses `blinding + c·secret`.
    pub fn generate_proof(self, challenge: Scalar<E>) -> MembershipProof<E> {
        let s: Vec<Scalar<E>> = self
            .blindings
            .iter()
            .zip(&self.secrets)
            .map(|(r, x)| *r + challenge * x)
            .collect();
        MembershipProof {
            e_c: self.e_c,
            t_sigma: self.t_sigma,
            t_rho: self.t_rho,
            s_y: s[0],
            s_sigma: s[1],
            s_rho: s[2],
            s_delta_sigma: s[3],
            s_delta_rho: s[4],
        }
    }
}

/// A finished membership proof.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct MembershipProof<E: Pairing> {
    e_c: E::G1Affine,
    t_sigma: E::G1Affine,
    t_rho: E::G1Affine,
    s_y: E::ScalarField,
    s_sigma: E::ScalarField,
    s_rho: E::ScalarField,
    s_delta_sigma: E::ScalarField,
    s_delta_rho: E::ScalarField,
}

impl<E: SchemeCurve> MembershipProof<E> {
    /// Response for the element: `blinding + c·y`.
    pub fn public_blinding(&self) -> Scalar<E> {
        self.s_y
    }

    /// Compressed encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, AnonCredError> {
        to_bytes(self)
    }

    /// Decode a compressed encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AnonCredError> {
        from_bytes(bytes)
    }
}

/// Commit phase of a membership proof against the latest state. With
/// `blinding` set, the element is blinded by it instead of a fresh scalar.
pub fn create_membership_proof_pre<E: SchemeCurve, R: RngCore + CryptoRng>(
    config: &AnonCredConfig,
    params: &AccumulatorParams,
    witness: &MembershipWitness<E>,
    blinding: Option<Scalar<E>>,
    rng: &mut R,
) -> Result<MembershipProofCommitting<E>, AnonCredError> {
    let latest = params.latest_index()?;
    verify_witness(config, params, witness, latest)?;
    let public_key = params.public_key::<E>()?;
    let value = params.value_at::<E>(latest)?;

    let mut entropy = vec![0u8; PROOF_ENTROPY_LEN];
    rng.fill_bytes(&mut entropy);
    let generators = ProofGenerators::<E>::derive(config, &params.public_key, &entropy);

    let y = witness.element;
    let sigma = Scalar::<E>::rand(rng);
    let rho = Scalar::<E>::rand(rng);
    let secrets = [y, sigma, rho, y * sigma, y * rho];
    let blindings = [
        blinding.unwrap_or_else(|| Scalar::<E>::rand(rng)),
        Scalar::<E>::rand(rng),
        Scalar::<E>::rand(rng),
        Scalar::<E>::rand(rng),
        Scalar::<E>::rand(rng),
    ];
    let [r_y, r_sigma, r_rho, r_delta_sigma, r_delta_rho] = blindings;

    let e_c = (witness.c.into_group() + generators.z * (sigma + rho)).into_affine();
    let t_sigma = (generators.x * sigma).into_affine();
    let t_rho = (generators.y * rho).into_affine();
    let g2 = E::G2Affine::generator();
    let r_e = E::pairing(e_c, g2) * r_y
        + E::pairing(generators.z, public_key.q) * (-r_sigma - r_rho)
        + E::pairing(generators.z, g2) * (-r_delta_sigma - r_delta_rho);

    let commitments = ProofCommitments::<E> {
        e_c,
        t_sigma,
        t_rho,
        r_e,
        r_sigma: (generators.x * r_sigma).into_affine(),
        r_rho: (generators.y * r_rho).into_affine(),
        r_delta_sigma: (t_sigma * r_y - generators.x * r_delta_sigma).into_affine(),
        r_delta_rho: (t_rho * r_y - generators.y * r_delta_rho).into_affine(),
    };
    let okm = proof_okm(params, &value, &entropy, &commitments)?;
    Ok(MembershipProofCommitting {
        e_c,
        t_sigma,
        t_rho,
        secrets,
        blindings,
        entropy,
        okm,
    })
}

/// Response phase: derive the challenge from the combined challenge bytes.
pub fn create_membership_proof_post<E: SchemeCurve>(
    committing: MembershipProofCommitting<E>,
    challenge_okm: &[u8],
) -> MembershipProof<E> {
    committing.generate_proof(challenge_scalar(challenge_okm))
}

/// Verify a membership proof against the latest state and return the
/// recomputed `okm`.
pub fn verify_membership_proof<E: SchemeCurve>(
    config: &AnonCredConfig,
    params: &AccumulatorParams,
    entropy: &[u8],
    challenge_okm: &[u8],
    proof: &MembershipProof<E>,
) -> Result<Vec<u8>, AnonCredError> {
    ensure_curve::<E>(config)?;
    if entropy.len() != PROOF_ENTROPY_LEN {
        return Err(AnonCredError::InvalidProof(format!(
            "expected {PROOF_ENTROPY_LEN} bytes of entropy, got {}",
            entropy.len()
        )));
    }
    let public_key = params.public_key::<E>()?;
    let value = params.value_at::<E>(params.latest_index()?)?;
    let generators = ProofGenerators::<E>::derive(config, &params.public_key, entropy);
    let c: Scalar<E> = challenge_scalar(challenge_okm);
    let g2 = E::G2Affine::generator();

    let target = E::pairing(value, g2) - E::pairing(proof.e_c, public_key.q);
    let r_e = E::pairing(proof.e_c, g2) * proof.s_y
        + E::pairing(generators.z, public_key.q) * (-proof.s_sigma - proof.s_rho)
        + E::pairing(generators.z, g2) * (-proof.s_delta_sigma - proof.s_delta_rho)
        - target * c;

    let commitments = ProofCommitments::<E> {
        e_c: proof.e_c,
        t_sigma: proof.t_sigma,
        t_rho: proof.t_rho,
        r_e,
        r_sigma: (generators.x * proof.s_sigma - proof.t_sigma * c).into_affine(),
        r_rho: (generators.y * proof.s_rho - proof.t_rho * c).into_affine(),
        r_delta_sigma: (proof.t_sigma * proof.s_y - generators.x * proof.s_delta_sigma)
            .into_affine(),
        r_delta_rho: (proof.t_rho * proof.s_y - generators.y * proof.s_delta_rho).into_affine(),
    };
    proof_okm(params, &value, entropy, &commitments)
}
