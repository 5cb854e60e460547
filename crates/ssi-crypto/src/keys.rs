//! # Account Keys and Addresses
//!
//! A closed sum over the account-key schemes the ledger supports, plus
//! address derivation. An account address is the first 20 bytes of
//! SHA-256 over the public key bytes, rendered as lowercase hex.
//!
//! Raw key bytes are classified by length: 32 bytes is Ed25519, 33 bytes is
//! compressed secp256k1 (65-byte uncompressed secp256k1 is accepted and
//! compressed). Anything else is `UnsupportedKeyFormat`.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use ssi_core::did::ADDRESS_LEN;
use ssi_core::{AccountAddress, CanonicalBytes};

use crate::ed25519::{Ed25519KeyPair, Ed25519PublicKey};
use crate::error::CryptoError;
use crate::secp256k1::{Secp256k1KeyPair, Secp256k1PublicKey};

/// Account key scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// Ed25519 (EdDSA).
    Ed25519,
    /// ECDSA over secp256k1.
    Secp256k1,
}

impl KeyType {
    /// Scheme name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ed25519 => "ed25519",
            Self::Secp256k1 => "secp256k1",
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "key", rename_all = "lowercase")]
pub enum PublicKey {
    /// Ed25519 public key.
    Ed25519(Ed25519PublicKey),
    /// Compressed secp256k1 public key.
    Secp256k1(Secp256k1PublicKey),
}

impl PublicKey {
    /// Classify and parse raw key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            crate::ed25519::PUBLIC_KEY_LEN => Ok(Self::Ed25519(Ed25519PublicKey::from_slice(bytes)?)),
            crate::secp256k1::PUBLIC_KEY_LEN | 65 => {
                Ok(Self::Secp256k1(Secp256k1PublicKey::from_slice(bytes)?))
            }
            n => Err(CryptoError::UnsupportedKeyFormat(format!(
                "{n}-byte public key"
            ))),
        }
    }

    /// Raw key bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(pk) => pk.as_bytes().to_vec(),
            Self::Secp256k1(pk) => pk.as_bytes().to_vec(),
        }
    }

    /// Lowercase hex of the raw key bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Key scheme.
    pub fn key_type(&self) -> KeyType {
        match self {
            Self::Ed25519(_) => KeyType::Ed25519,
            Self::Secp256k1(_) => KeyType::Secp256k1,
        }
    }

    /// Account address of this key.
    pub fn address(&self) -> AccountAddress {
        address_from_key_bytes(&self.to_bytes())
    }

    /// Verify `signature` over canonical bytes with the key's native scheme.
    pub fn verify(&self, data: &CanonicalBytes, signature: &[u8]) -> Result<(), CryptoError> {
        match self {
            Self::Ed25519(pk) => pk.verify(data, signature),
            Self::Secp256k1(pk) => pk.verify(data, signature),
        }
    }
}

/// Derive an account address from raw public key bytes.
fn address_from_key_bytes(bytes: &[u8]) -> AccountAddress {
    let hash = Sha256::digest(bytes);
    let mut addr = [0u8; ADDRESS_LEN];
    addr.copy_from_slice(&hash[..ADDRESS_LEN]);
    AccountAddress::from_bytes(&addr)
}

/// An account signing key.
#[derive(Debug)]
pub enum AccountKeyPair {
    /// Ed25519 key pair.
    Ed25519(Ed25519KeyPair),
    /// secp256k1 key pair.
    Secp256k1(Secp256k1KeyPair),
}

impl AccountKeyPair {
    /// Generate a key pair of the given scheme.
    pub fn generate<R: RngCore + CryptoRng>(key_type: KeyType, rng: &mut R) -> Self {
        match key_type {
            KeyType::Ed25519 => Self::Ed25519(Ed25519KeyPair::generate(rng)),
            KeyType::Secp256k1 => Self::Secp256k1(Secp256k1KeyPair::generate(rng)),
        }
    }

    /// The public half.
    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::Ed25519(kp) => PublicKey::Ed25519(kp.public_key()),
            Self::Secp256k1(kp) => PublicKey::Secp256k1(kp.public_key()),
        }
    }

    /// Account address of the public half.
    pub fn address(&self) -> AccountAddress {
        self.public_key().address()
    }

    /// Sign canonical bytes with the key's native scheme.
    pub fn sign(&self, data: &CanonicalBytes) -> Vec<u8> {
        match self {
            Self::Ed25519(kp) => kp.sign(data).as_bytes().to_vec(),
            Self::Secp256k1(kp) => kp.sign(data).to_vec(),
        }
    }
}
