//! # secp256k1 Account Keys
//!
//! ECDSA over secp256k1 with SHA-256 message digests, the scheme most ledger
//! accounts use. Public keys are SEC1-compressed (33 bytes); signatures are
//! fixed-size `r ‖ s` (64 bytes).

use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssi_core::CanonicalBytes;

use crate::error::CryptoError;

/// Length of a compressed secp256k1 public key.
pub const PUBLIC_KEY_LEN: usize = 33;

/// A compressed secp256k1 public key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Secp256k1PublicKey([u8; PUBLIC_KEY_LEN]);

/// A secp256k1 key pair.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1PublicKey {
    /// From SEC1 bytes. Uncompressed input is accepted and compressed.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let vk = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| CryptoError::KeyError(format!("invalid secp256k1 public key: {e}")))?;
        Ok(Self::from_verifying_key(&vk))
    }

    fn from_verifying_key(vk: &VerifyingKey) -> Self {
        let point = vk.to_encoded_point(true);
        let mut arr = [0u8; PUBLIC_KEY_LEN];
        arr.copy_from_slice(point.as_bytes());
        Self(arr)
    }

    /// Compressed key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s.trim()).map_err(|e| CryptoError::KeyError(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Verify a 64-byte `r ‖ s` signature over canonical bytes.
    pub fn verify(&self, data: &CanonicalBytes, signature: &[u8]) -> Result<(), CryptoError> {
        let vk = VerifyingKey::from_sec1_bytes(&self.0)
            .map_err(|e| CryptoError::KeyError(format!("invalid secp256k1 public key: {e}")))?;
        let sig = Signature::from_slice(signature).map_err(|e| {
            CryptoError::VerificationFailed(format!("malformed secp256k1 signature: {e}"))
        })?;
        vk.verify(data.as_bytes(), &sig)
            .map_err(|e| CryptoError::VerificationFailed(format!("secp256k1: {e}")))
    }
}

impl Serialize for Secp256k1PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Secp256k1PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secp256k1PublicKey({}...)", hex::encode(&self.0[..4]))
    }
}

impl Secp256k1KeyPair {
    /// Generate a key pair from the caller's RNG.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self {
            signing_key: SigningKey::random(rng),
        }
    }

    /// The public half.
    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }

    /// Sign canonical bytes, returning `r ‖ s`.
    pub fn sign(&self, data: &CanonicalBytes) -> [u8; 64] {
        let sig: Signature = self.signing_key.sign(data.as_bytes());
        let mut out = [0u8; 64];
        out.copy_from_slice(&sig.to_bytes());
        out
    }
}

impl std::fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secp256k1KeyPair(<private>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_sign_and_verify() {
        let kp = Secp256k1KeyPair::generate(&mut OsRng);
        let data = CanonicalBytes::new(&serde_json::json!({"id": "vc-1"})).unwrap();
        let sig = kp.sign(&data);
        kp.public_key().verify(&data, &sig).expect("should verify");
    }

    #[test]
    fn test_wrong_key_fails() {
        let kp1 = Secp256k1KeyPair::generate(&mut OsRng);
        let kp2 = Secp256k1KeyPair::generate(&mut OsRng);
        let data = CanonicalBytes::new(&serde_json::json!({"id": "vc-1"})).unwrap();
        assert!(kp2.public_key().verify(&data, &kp1.sign(&data)).is_err());
    }

    #[test]
    fn test_public_key_is_compressed() {
        let pk = Secp256k1KeyPair::generate(&mut OsRng).public_key();
        assert!(matches!(pk.as_bytes()[0], 0x02 | 0x03));
        assert_eq!(Secp256k1PublicKey::from_hex(&pk.to_hex()).unwrap(), pk);
    }

    #[test]
    fn test_garbage_key_rejected() {
        assert!(Secp256k1PublicKey::from_slice(&[0u8; 33]).is_err());
    }
}
