//! # Verification Material
//!
//! What a verification method proves control of: a ledger account
//! (`blockchainAccountID`, CAIP-10) or a public key (`publicKeyMultibase`
//! in base16 multibase, or `publicKeyHex`). The enum is flattened into the
//! verification method, so exactly one of the three JSON keys appears.
//!
//! ## Address matching
//!
//! Authorization compares account addresses. A `blockchainAccountID`
//! contributes the trailing segment after its final colon. Key material
//! contributes the address derived from the key bytes.

use serde::{Deserialize, Serialize};
use ssi_core::AccountAddress;
use ssi_crypto::{KeyType, PublicKey};

use crate::error::DidError;

/// Verification method type for CAIP-10 account material.
pub const COSMOS_ACCOUNT_ADDRESS: &str = "CosmosAccountAddress";
/// Verification method type for Ed25519 key material.
pub const ED25519_VERIFICATION_KEY_2018: &str = "Ed25519VerificationKey2018";
/// Verification method type for secp256k1 key material.
pub const ECDSA_SECP256K1_VERIFICATION_KEY_2019: &str = "EcdsaSecp256k1VerificationKey2019";

/// Verification method type naming `key`'s scheme.
pub fn key_verification_type(key: &PublicKey) -> &'static str {
    match key.key_type() {
        KeyType::Ed25519 => ED25519_VERIFICATION_KEY_2018,
        KeyType::Secp256k1 => ECDSA_SECP256K1_VERIFICATION_KEY_2019,
    }
}

/// Key or account material of a verification method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationMaterial {
    /// CAIP-10 account id, `<namespace>:<chain-id>:<address>`.
    #[serde(rename = "blockchainAccountID")]
    BlockchainAccountId(String),
    /// Base16 multibase public key: `F` or `f` followed by hex.
    #[serde(rename = "publicKeyMultibase")]
    PublicKeyMultibase(String),
    /// Plain hex public key.
    #[serde(rename = "publicKeyHex")]
    PublicKeyHex(String),
}

impl VerificationMaterial {
    /// `<namespace>:<chain-id>:<address>`
    pub fn blockchain_account_id(namespace: &str, chain_id: &str, address: &AccountAddress) -> Self {
        Self::BlockchainAccountId(format!("{namespace}:{chain_id}:{address}"))
    }

    /// Upper-case `F` multibase rendering of `key`.
    pub fn multibase(key: &PublicKey) -> Self {
        Self::PublicKeyMultibase(format!("F{}", key.to_hex()))
    }

    /// Hex rendering of `key`.
    pub fn hex(key: &PublicKey) -> Self {
        Self::PublicKeyHex(key.to_hex())
    }

    /// The raw material string.
    pub fn value(&self) -> &str {
        match self {
            Self::BlockchainAccountId(s) | Self::PublicKeyMultibase(s) | Self::PublicKeyHex(s) => s,
        }
    }

    /// Check the encoding and, for key material, that the bytes are a
    /// supported key.
    pub fn validate(&self) -> Result<(), DidError> {
        if self.value().is_empty() {
            return Err(DidError::InvalidInput("empty verification material".into()));
        }
        match self {
            Self::BlockchainAccountId(s) => parse_account_id(s).map(|_| ()),
            Self::PublicKeyMultibase(_) | Self::PublicKeyHex(_) => self.decode_key().map(|_| ()),
        }
    }

    /// Account address this material authorizes.
    pub fn address(&self) -> Result<AccountAddress, DidError> {
        match self {
            Self::BlockchainAccountId(s) => parse_account_id(s),
            Self::PublicKeyMultibase(_) | Self::PublicKeyHex(_) => Ok(self.decode_key()?.address()),
        }
    }

    /// The public key, if this is key material.
    pub fn public_key(&self) -> Result<Option<PublicKey>, DidError> {
        match self {
            Self::BlockchainAccountId(_) => Ok(None),
            Self::PublicKeyMultibase(_) | Self::PublicKeyHex(_) => self.decode_key().map(Some),
        }
    }

    /// Returns true if this material is `key`, or names the account `key`
    /// controls.
    pub fn has_public_key(&self, key: &PublicKey) -> bool {
        match self.public_key() {
            Ok(Some(own)) => own == *key,
            Ok(None) => self.address().is_ok_and(|a| a == key.address()),
            Err(_) => false,
        }
    }

    fn decode_key(&self) -> Result<PublicKey, DidError> {
        let hex_str = match self {
            Self::PublicKeyMultibase(s) => s
                .strip_prefix('F')
                .or_else(|| s.strip_prefix('f'))
                .ok_or_else(|| {
                    DidError::InvalidInput(format!("multibase {s:?} is not base16 (F/f prefix)"))
                })?,
            Self::PublicKeyHex(s) => s.as_str(),
            Self::BlockchainAccountId(s) => {
                return Err(DidError::UnsupportedKeyFormat(format!(
                    "{s:?} is account material, not a key"
                )))
            }
        };
        let bytes = hex::decode(hex_str)
            .map_err(|e| DidError::InvalidInput(format!("key material {hex_str:?}: {e}")))?;
        PublicKey::from_bytes(&bytes).map_err(|e| DidError::UnsupportedKeyFormat(e.to_string()))
    }
}

/// The address is whatever follows the last `:`; chain ids may carry colons.
fn parse_account_id(s: &str) -> Result<AccountAddress, DidError> {
    match s.rsplit_once(':') {
        Some((prefix, address)) if !prefix.is_empty() => Ok(AccountAddress::new(address)?),
        _ => Err(DidError::InvalidInput(format!(
            "blockchain account id {s:?} is not <namespace>:<chain-id>:<address>"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use ssi_crypto::AccountKeyPair;

    const ADDR: &str = "00112233445566778899aabbccddeeff00112233";

    #[test]
    fn test_account_id_address_is_trailing_segment() {
        let addr = AccountAddress::new(ADDR).unwrap();
        let m = VerificationMaterial::blockchain_account_id("cosmos", "cosmoshub", &addr);
        assert_eq!(m.value(), format!("cosmos:cosmoshub:{ADDR}"));
        assert_eq!(m.address().unwrap(), addr);
        assert_eq!(m.public_key().unwrap(), None);
        m.validate().unwrap();
    }

    #[test]
    fn test_malformed_account_ids() {
        let missing_prefix = format!(":{ADDR}");
        for bad in ["cosmos:hub", ":cosmoshub:x", "cosmos:cosmoshub:nothex", "a:b:c:d", ADDR, missing_prefix.as_str()] {
            let m = VerificationMaterial::BlockchainAccountId(bad.into());
            assert!(matches!(m.validate(), Err(DidError::InvalidInput(_))), "{bad}");
        }
    }

    #[test]
    fn test_account_id_chain_with_colons() {
        let addr = AccountAddress::new(ADDR).unwrap();
        let m = VerificationMaterial::BlockchainAccountId(format!("cosmos:hub:testnet:{ADDR}"));
        m.validate().unwrap();
        assert_eq!(m.address().unwrap(), addr);
    }

    #[test]
    fn test_key_material_derives_address() {
        for key_type in [KeyType::Ed25519, KeyType::Secp256k1] {
            let kp = AccountKeyPair::generate(key_type, &mut OsRng);
            let pk = kp.public_key();
            for m in [VerificationMaterial::multibase(&pk), VerificationMaterial::hex(&pk)] {
                m.validate().unwrap();
                assert_eq!(m.address().unwrap(), kp.address());
                assert_eq!(m.public_key().unwrap(), Some(pk.clone()));
                assert!(m.has_public_key(&pk));
            }
            let lower = VerificationMaterial::PublicKeyMultibase(format!("f{}", pk.to_hex()));
            assert_eq!(lower.address().unwrap(), kp.address());
        }
    }

    #[test]
    fn test_account_material_has_public_key_by_address() {
        let kp = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let m = VerificationMaterial::blockchain_account_id("cosmos", "cosmoshub", &kp.address());
        assert!(m.has_public_key(&kp.public_key()));
        let other = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        assert!(!m.has_public_key(&other.public_key()));
    }

    #[test]
    fn test_bad_key_material() {
        let wrong_prefix = VerificationMaterial::PublicKeyMultibase("z6Mk".into());
        assert!(matches!(wrong_prefix.validate(), Err(DidError::InvalidInput(_))));

        let not_hex = VerificationMaterial::PublicKeyHex("xyz".into());
        assert!(matches!(not_hex.validate(), Err(DidError::InvalidInput(_))));

        let short = VerificationMaterial::PublicKeyHex("0011".into());
        assert!(matches!(short.validate(), Err(DidError::UnsupportedKeyFormat(_))));

        let empty = VerificationMaterial::PublicKeyHex(String::new());
        assert!(matches!(empty.validate(), Err(DidError::InvalidInput(_))));
    }

    #[test]
    fn test_key_type_names() {
        let ed = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng).public_key();
        let k1 = AccountKeyPair::generate(KeyType::Secp256k1, &mut OsRng).public_key();
        assert_eq!(key_verification_type(&ed), ED25519_VERIFICATION_KEY_2018);
        assert_eq!(key_verification_type(&k1), ECDSA_SECP256K1_VERIFICATION_KEY_2019);
    }
}
