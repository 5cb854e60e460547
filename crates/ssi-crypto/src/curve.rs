//! # Curve Selection
//!
//! Both anonymous credential primitives run over one pairing-friendly curve.
//! The curve is a type parameter `E: SchemeCurve` on every protocol function
//! and, at runtime, a [`CurveId`] carried by [`AnonCredConfig`] and recorded
//! in published parameters. Every entry point checks that the two agree, so
//! a verifier configured for BN254 rejects BLS12-381 parameters instead of
//! misparsing them.
//!
//! Generators are derived by try-and-increment hashing into G1 followed by
//! cofactor clearing. Scalars are derived by reducing a SHA-512 digest.

use ark_ec::pairing::Pairing;
use ark_ec::short_weierstrass::{Affine, SWCurveConfig};
use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};
use ssi_core::{AnonCredConfig, CurveId};

use crate::error::AnonCredError;

/// A pairing engine usable by the anonymous credential protocol.
pub trait SchemeCurve: Pairing {
    /// Runtime tag for this curve.
    const ID: CurveId;

    /// Deterministically hash `msg` under `domain` to a prime-order G1 point.
    fn hash_to_g1(domain: &[u8], msg: &[u8]) -> Self::G1Affine;
}

impl SchemeCurve for ark_bls12_381::Bls12_381 {
    const ID: CurveId = CurveId::Bls12_381;

    fn hash_to_g1(domain: &[u8], msg: &[u8]) -> Self::G1Affine {
        try_and_increment::<ark_bls12_381::g1::Config>(domain, msg)
    }
}

impl SchemeCurve for ark_bn254::Bn254 {
    const ID: CurveId = CurveId::Bn254;

    fn hash_to_g1(domain: &[u8], msg: &[u8]) -> Self::G1Affine {
        try_and_increment::<ark_bn254::g1::Config>(domain, msg)
    }
}

fn try_and_increment<P: SWCurveConfig>(domain: &[u8], msg: &[u8]) -> Affine<P>
where
    P::BaseField: PrimeField,
{
    let mut counter: u32 = 0;
    loop {
        let digest = Sha512::new()
            .chain_update((domain.len() as u64).to_le_bytes())
            .chain_update(domain)
            .chain_update(msg)
            .chain_update(counter.to_le_bytes())
            .finalize();
        let x = P::BaseField::from_be_bytes_mod_order(&digest);
        if let Some(point) = Affine::<P>::get_point_from_x_unchecked(x, counter % 2 == 0) {
            let point = point.clear_cofactor();
            if !point.is_zero() {
                return point;
            }
        }
        counter = counter.wrapping_add(1);
    }
}

/// Hash byte strings to a scalar: SHA-512 over the length-prefixed parts,
/// reduced modulo the field order.
pub fn hash_to_scalar<F: PrimeField>(parts: &[&[u8]]) -> F {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    F::from_le_bytes_mod_order(&hasher.finalize())
}

/// Uniform non-zero scalar.
pub fn random_nonzero<F: PrimeField, R: RngCore + CryptoRng>(rng: &mut R) -> F {
    loop {
        let x = F::rand(rng);
        if !x.is_zero() {
            return x;
        }
    }
}

/// Map an attribute value to a signable message scalar.
pub fn message_from_bytes<F: PrimeField>(bytes: &[u8]) -> F {
    hash_to_scalar(&[b"ssi-anoncred-message".as_slice(), bytes])
}

/// Fail unless the configured curve is the one `E` implements.
pub fn ensure_curve<E: SchemeCurve>(config: &AnonCredConfig) -> Result<(), AnonCredError> {
    ensure_curve_id::<E>(config.curve)
}

/// Fail unless `actual` is the curve `E` implements.
pub fn ensure_curve_id<E: SchemeCurve>(actual: CurveId) -> Result<(), AnonCredError> {
    if actual != E::ID {
        return Err(AnonCredError::CurveMismatch {
            expected: E::ID,
            actual,
        });
    }
    Ok(())
}

/// Compressed encoding of a point, scalar or derived struct.
pub fn to_bytes<T: CanonicalSerialize>(value: &T) -> Result<Vec<u8>, AnonCredError> {
    let mut bytes = Vec::with_capacity(value.compressed_size());
    value.serialize_compressed(&mut bytes)?;
    Ok(bytes)
}

/// Decode a compressed encoding, validating points and rejecting trailing
/// bytes.
pub fn from_bytes<T: CanonicalDeserialize>(bytes: &[u8]) -> Result<T, AnonCredError> {
    let mut reader = bytes;
    let value = T::deserialize_compressed(&mut reader)?;
    if !reader.is_empty() {
        return Err(AnonCredError::Serialization(format!(
            "{} trailing bytes",
            reader.len()
        )));
    }
    Ok(value)
}
