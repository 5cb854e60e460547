//! # Collaborator Traits
//!
//! The credential registry depends on two things it does not own: DID
//! resolution and authorization (the DID registry), and the ledger's
//! account service, which maps an account address to its published public
//! key.

use std::collections::BTreeMap;

use ssi_core::{AccountAddress, Did, KvStore};
use ssi_crypto::PublicKey;
use ssi_did::{DidDocument, DidError, DidMetadata, DidRegistry, VerificationRelationship};

use crate::error::AccountError;

/// DID resolution and signer authorization.
pub trait DidResolver {
    /// Resolve a DID to its document and metadata.
    fn resolve(&self, did: &Did) -> Result<(DidDocument, DidMetadata), DidError>;

    /// Resolve `did` and require `signer` to hold one of `relationships`
    /// (or to control the document).
    fn verify_did_with_relationships(
        &self,
        relationships: &[VerificationRelationship],
        did: &Did,
        signer: &AccountAddress,
    ) -> Result<DidDocument, DidError>;
}

impl<S: KvStore> DidResolver for DidRegistry<S> {
    fn resolve(&self, did: &Did) -> Result<(DidDocument, DidMetadata), DidError> {
        DidRegistry::resolve(self, did)
    }

    fn verify_did_with_relationships(
        &self,
        relationships: &[VerificationRelationship],
        did: &Did,
        signer: &AccountAddress,
    ) -> Result<DidDocument, DidError> {
        DidRegistry::verify_did_with_relationships(self, relationships, did, signer)
    }
}

impl<T: DidResolver + ?Sized> DidResolver for &T {
    fn resolve(&self, did: &Did) -> Result<(DidDocument, DidMetadata), DidError> {
        (**self).resolve(did)
    }

    fn verify_did_with_relationships(
        &self,
        relationships: &[VerificationRelationship],
        did: &Did,
        signer: &AccountAddress,
    ) -> Result<DidDocument, DidError> {
        (**self).verify_did_with_relationships(relationships, did, signer)
    }
}

/// The ledger's account service.
pub trait AccountService {
    /// Published public key of `address`.
    fn public_key(&self, address: &AccountAddress) -> Result<PublicKey, AccountError>;
}

impl<T: AccountService + ?Sized> AccountService for &T {
    fn public_key(&self, address: &AccountAddress) -> Result<PublicKey, AccountError> {
        (**self).public_key(address)
    }
}

/// Account service backed by a map, for tests and embedded use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccounts {
    keys: BTreeMap<AccountAddress, PublicKey>,
}

impl InMemoryAccounts {
    /// Empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `key` under its derived address.
    pub fn insert(&mut self, key: PublicKey) -> AccountAddress {
        let address = key.address();
        self.keys.insert(address.clone(), key);
        address
    }
}

impl AccountService for InMemoryAccounts {
    fn public_key(&self, address: &AccountAddress) -> Result<PublicKey, AccountError> {
        self.keys
            .get(address)
            .cloned()
            .ok_or_else(|| AccountError::NotFound(address.clone()))
    }
}
