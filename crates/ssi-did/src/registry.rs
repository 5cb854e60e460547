//! # DID Registry
//!
//! Owns DID document state in the host store and answers the question the
//! credential layer asks: is signer X authorized for relationship R on
//! DID D?
//!
//! ## Resolution
//!
//! Two branches, decided from the DID alone before any store access:
//! key-scoped DIDs are synthesized by [`resolve_key_did()`], everything else
//! is a store lookup.
//!
//! ## Mutations
//!
//! Every mutation resolves the stored document, authorizes the signer for
//! `{authentication}` (controller bypass applies), applies the change to a
//! copy, re-validates the whole document, and stages document plus
//! metadata in a [`CacheStore`]. The cache is committed once at the end, so
//! a failed call leaves no trace in the store. Key-scoped DIDs are
//! immutable.

use ssi_core::store::{load, load_prefix, save};
use ssi_core::{
    AccountAddress, CacheStore, ChainConfig, Did, DidKind, Event, KvStore, StorePrefix, TxContext,
};
use ssi_crypto::PublicKey;

use crate::document::{resolve_key_did, DidDocument, DidMetadata, Service, Verification};
use crate::error::DidError;
use crate::relationship::VerificationRelationship;

/// DID document registry over a host-owned store.
#[derive(Debug)]
pub struct DidRegistry<S: KvStore> {
    store: S,
    chain: ChainConfig,
}

impl<S: KvStore> DidRegistry<S> {
    /// Open a registry over `store`.
    pub fn new(store: S, chain: ChainConfig) -> Self {
        Self { store, chain }
    }

    /// Chain settings used for DID construction and key-DID synthesis.
    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Resolve a DID to its document and metadata.
    pub fn resolve(&self, did: &Did) -> Result<(DidDocument, DidMetadata), DidError> {
        if let DidKind::Key(address) = did.kind(&self.chain.did_method) {
            tracing::debug!(did = %did, "resolving key DID");
            return Ok(resolve_key_did(&self.chain, did, &address));
        }
        tracing::debug!(did = %did, "resolving stored DID");
        let doc = self.load_document(did)?;
        let metadata = self.load_metadata(did)?;
        Ok((doc, metadata))
    }

    /// Signer authorization on an already resolved document.
    pub fn authorize(
        &self,
        doc: &DidDocument,
        signer: &AccountAddress,
        relationships: &[VerificationRelationship],
    ) -> bool {
        doc.authorizes(signer, relationships, &self.chain.did_method)
    }

    /// Resolve `did` and require `signer` to be authorized for one of
    /// `relationships`.
    pub fn verify_did_with_relationships(
        &self,
        relationships: &[VerificationRelationship],
        did: &Did,
        signer: &AccountAddress,
    ) -> Result<DidDocument, DidError> {
        let (doc, _) = self.resolve(did)?;
        if !self.authorize(&doc, signer, relationships) {
            return Err(DidError::Unauthorized {
                signer: signer.clone(),
                did: did.clone(),
            });
        }
        Ok(doc)
    }

    /// Every stored document, in key order.
    pub fn did_documents(&self) -> Result<Vec<DidDocument>, DidError> {
        Ok(load_prefix(&self.store, StorePrefix::DidDocument)?)
    }

    /// Stored documents listing `key` (or its account), followed by the
    /// synthesized key-DID document of that key.
    pub fn did_documents_by_public_key(&self, key: &PublicKey) -> Result<Vec<DidDocument>, DidError> {
        let mut docs: Vec<DidDocument> = self
            .did_documents()?
            .into_iter()
            .filter(|doc| doc.has_public_key(key))
            .collect();
        let address = key.address();
        let key_did = Did::key(&self.chain.did_method, &address)?;
        docs.push(resolve_key_did(&self.chain, &key_did, &address).0);
        Ok(docs)
    }

    fn load_document(&self, did: &Did) -> Result<DidDocument, DidError> {
        load(&self.store, &StorePrefix::DidDocument.key(did.as_str()))?
            .ok_or_else(|| DidError::NotFound(did.to_string()))
    }

    fn load_metadata(&self, did: &Did) -> Result<DidMetadata, DidError> {
        load(&self.store, &StorePrefix::DidMetadata.key(did.as_str()))?
            .ok_or_else(|| DidError::InvalidState(format!("{did} has a document but no metadata")))
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Create and persist a new document.
    pub fn create_did_document(
        &mut self,
        ctx: &mut TxContext,
        signer: &AccountAddress,
        id: &str,
        controllers: Vec<Did>,
        verifications: Vec<Verification>,
        services: Vec<Service>,
    ) -> Result<DidDocument, DidError> {
        tracing::info!(did = id, signer = %signer, "DID document creation requested");
        let result = self.try_create(ctx, signer, id, controllers, verifications, services);
        match &result {
            Ok(doc) => {
                metrics::counter!("ssi_did_documents_created_total").increment(1);
                tracing::info!(did = %doc.id, "DID document created");
            }
            Err(e) => reject("create", id, e),
        }
        result
    }

    fn try_create(
        &mut self,
        ctx: &mut TxContext,
        signer: &AccountAddress,
        id: &str,
        controllers: Vec<Did>,
        verifications: Vec<Verification>,
        services: Vec<Service>,
    ) -> Result<DidDocument, DidError> {
        let did = Did::new(id)?;
        if matches!(did.kind(&self.chain.did_method), DidKind::Key(_)) {
            return Err(DidError::DidAlreadyExists(format!("{did} is a key DID")));
        }
        let doc_key = StorePrefix::DidDocument.key(did.as_str());
        if self.store.has(&doc_key)? {
            return Err(DidError::DidAlreadyExists(did.to_string()));
        }
        let doc = DidDocument::new(
            did.clone(),
            controllers,
            verifications,
            services,
            &self.chain.did_method,
        )?;
        let metadata = DidMetadata::new(ctx.version_id(), ctx.block_time());

        let mut cache = CacheStore::new(&mut self.store);
        save(&mut cache, &doc_key, &doc)?;
        save(&mut cache, &StorePrefix::DidMetadata.key(did.as_str()), &metadata)?;
        cache.commit()?;

        ctx.emit(Event::DidDocumentCreated {
            did,
            signer: signer.clone(),
        });
        Ok(doc)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Add a verification method.
    pub fn add_verification(
        &mut self,
        ctx: &mut TxContext,
        signer: &AccountAddress,
        did: &Did,
        verification: Verification,
    ) -> Result<DidDocument, DidError> {
        self.mutate(ctx, signer, did, "add_verification", |doc, _| {
            doc.add_verifications(vec![verification])
        })
    }

    /// Remove a verification method and its relationships.
    pub fn revoke_verification(
        &mut self,
        ctx: &mut TxContext,
        signer: &AccountAddress,
        did: &Did,
        method_id: &str,
    ) -> Result<DidDocument, DidError> {
        self.mutate(ctx, signer, did, "revoke_verification", |doc, _| {
            doc.revoke_verification(method_id)
        })
    }

    /// Replace the relationship set of a verification method.
    pub fn set_verification_relationships(
        &mut self,
        ctx: &mut TxContext,
        signer: &AccountAddress,
        did: &Did,
        method_id: &str,
        relationships: &[VerificationRelationship],
    ) -> Result<DidDocument, DidError> {
        self.mutate(ctx, signer, did, "set_verification_relationships", |doc, _| {
            doc.set_verification_relationships(method_id, relationships)
        })
    }

    /// Add a key-DID controller.
    pub fn add_controller(
        &mut self,
        ctx: &mut TxContext,
        signer: &AccountAddress,
        did: &Did,
        controller: Did,
    ) -> Result<DidDocument, DidError> {
        self.mutate(ctx, signer, did, "add_controller", |doc, chain| {
            doc.add_controllers(vec![controller], &chain.did_method)
        })
    }

    /// Remove a controller.
    pub fn delete_controller(
        &mut self,
        ctx: &mut TxContext,
        signer: &AccountAddress,
        did: &Did,
        controller: &Did,
    ) -> Result<DidDocument, DidError> {
        self.mutate(ctx, signer, did, "delete_controller", |doc, chain| {
            doc.delete_controllers(std::slice::from_ref(controller), &chain.did_method);
            Ok(())
        })
    }

    /// Add a service.
    pub fn add_service(
        &mut self,
        ctx: &mut TxContext,
        signer: &AccountAddress,
        did: &Did,
        service: Service,
    ) -> Result<DidDocument, DidError> {
        self.mutate(ctx, signer, did, "add_service", |doc, _| {
            doc.add_services(vec![service])
        })
    }

    /// Remove a service.
    pub fn delete_service(
        &mut self,
        ctx: &mut TxContext,
        signer: &AccountAddress,
        did: &Did,
        service_id: &str,
    ) -> Result<DidDocument, DidError> {
        self.mutate(ctx, signer, did, "delete_service", |doc, _| {
            doc.delete_service(service_id)
        })
    }

    /// Replace a stored document wholesale. The signer is authorized
    /// against the stored version; the replacement must validate on its own.
    pub fn update_did_document(
        &mut self,
        ctx: &mut TxContext,
        signer: &AccountAddress,
        document: DidDocument,
    ) -> Result<DidDocument, DidError> {
        let did = document.id.clone();
        let mut document = document;
        self.mutate(ctx, signer, &did, "update_did_document", |doc, chain| {
            document.normalize_controllers(&chain.did_method)?;
            *doc = document;
            Ok(())
        })
    }

    fn mutate<F>(
        &mut self,
        ctx: &mut TxContext,
        signer: &AccountAddress,
        did: &Did,
        op: &'static str,
        apply: F,
    ) -> Result<DidDocument, DidError>
    where
        F: FnOnce(&mut DidDocument, &ChainConfig) -> Result<(), DidError>,
    {
        tracing::info!(did = %did, signer = %signer, op, "DID document update requested");
        let result = self.try_mutate(ctx, signer, did, apply);
        match &result {
            Ok(_) => {
                metrics::counter!("ssi_did_documents_updated_total", "op" => op).increment(1);
                tracing::info!(did = %did, op, "DID document updated");
            }
            Err(e) => reject(op, did.as_str(), e),
        }
        result
    }

    fn try_mutate<F>(
        &mut self,
        ctx: &mut TxContext,
        signer: &AccountAddress,
        did: &Did,
        apply: F,
    ) -> Result<DidDocument, DidError>
    where
        F: FnOnce(&mut DidDocument, &ChainConfig) -> Result<(), DidError>,
    {
        if matches!(did.kind(&self.chain.did_method), DidKind::Key(_)) {
            return Err(DidError::InvalidState(format!("{did} is a key DID and cannot be modified")));
        }
        let mut doc = self.load_document(did)?;
        let mut metadata = self.load_metadata(did)?;
        if !self.authorize(&doc, signer, &[VerificationRelationship::Authentication]) {
            return Err(DidError::Unauthorized {
                signer: signer.clone(),
                did: did.clone(),
            });
        }

        apply(&mut doc, &self.chain)?;
        doc.validate(&self.chain.did_method)?;
        metadata.touch(ctx.version_id(), ctx.block_time());

        let mut cache = CacheStore::new(&mut self.store);
        save(&mut cache, &StorePrefix::DidDocument.key(did.as_str()), &doc)?;
        save(&mut cache, &StorePrefix::DidMetadata.key(did.as_str()), &metadata)?;
        cache.commit()?;

        ctx.emit(Event::DidDocumentUpdated {
            did: did.clone(),
            signer: signer.clone(),
        });
        Ok(doc)
    }
}

fn reject(op: &'static str, did: &str, e: &DidError) {
    metrics::counter!("ssi_did_requests_rejected_total", "op" => op, "reason" => e.kind()).increment(1);
    tracing::warn!(did, op, error = %e, "DID request rejected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{new_account_verification, new_key_did};
    use crate::material::VerificationMaterial;
    use rand::rngs::OsRng;
    use ssi_core::{MemoryStore, Timestamp};
    use ssi_crypto::{AccountKeyPair, KeyType};

    use VerificationRelationship::*;

    const ISSUER: &str = "did:cosmos:net:cosmoshub:issuer";

    fn ctx(tx: &[u8]) -> TxContext {
        TxContext::new(
            "cosmoshub",
            Timestamp::parse("2026-01-15T12:00:00Z").unwrap(),
            tx.to_vec(),
        )
    }

    fn registry() -> DidRegistry<MemoryStore> {
        DidRegistry::new(MemoryStore::new(), ChainConfig::default())
    }

    fn did() -> Did {
        Did::new(ISSUER).unwrap()
    }

    /// Registry holding one document whose authentication method is
    /// `owner`'s account.
    fn with_document(owner: &AccountKeyPair) -> DidRegistry<MemoryStore> {
        let mut reg = registry();
        let v = new_account_verification(reg.chain(), &did(), &owner.address(), vec![Authentication]);
        reg.create_did_document(&mut ctx(b"create"), &owner.address(), ISSUER, vec![], vec![v], vec![])
            .unwrap();
        reg
    }

    #[test]
    fn test_create_then_resolve() {
        let owner = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let mut reg = registry();
        let v = new_account_verification(reg.chain(), &did(), &owner.address(), vec![Authentication]);
        let mut tx = ctx(b"create");
        let created = reg
            .create_did_document(&mut tx, &owner.address(), ISSUER, vec![], vec![v], vec![])
            .unwrap();

        let (doc, meta) = reg.resolve(&did()).unwrap();
        assert_eq!(doc, created);
        assert_eq!(meta.version_id, ssi_core::version_id(b"create"));
        assert_eq!(meta.created, meta.updated);
        assert!(!meta.deactivated);
        assert_eq!(
            tx.events(),
            &[Event::DidDocumentCreated {
                did: did(),
                signer: owner.address()
            }]
        );
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let owner = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let mut reg = with_document(&owner);
        let before = reg.store().len();

        let err = reg
            .create_did_document(&mut ctx(b"x"), &owner.address(), ISSUER, vec![], vec![], vec![])
            .unwrap_err();
        assert!(matches!(err, DidError::DidAlreadyExists(_)));

        let err = reg
            .create_did_document(&mut ctx(b"x"), &owner.address(), "not:a did", vec![], vec![], vec![])
            .unwrap_err();
        assert!(matches!(err, DidError::InvalidDidFormat(_)));

        let key_did = new_key_did(reg.chain(), &owner.address()).unwrap();
        let err = reg
            .create_did_document(&mut ctx(b"x"), &owner.address(), key_did.as_str(), vec![], vec![], vec![])
            .unwrap_err();
        assert!(matches!(err, DidError::DidAlreadyExists(_)));

        assert_eq!(reg.store().len(), before);
    }

    #[test]
    fn test_resolve_missing() {
        let reg = registry();
        assert!(matches!(reg.resolve(&did()), Err(DidError::NotFound(_))));
    }

    #[test]
    fn test_key_did_resolves_without_store() {
        let reg = registry();
        let owner = AccountKeyPair::generate(KeyType::Secp256k1, &mut OsRng);
        let key_did = new_key_did(reg.chain(), &owner.address()).unwrap();
        let (doc, meta) = reg.resolve(&key_did).unwrap();
        assert_eq!(doc.id, key_did);
        assert!(reg.authorize(&doc, &owner.address(), &[CapabilityDelegation]));
        assert!(reg.store().is_empty());
        assert_eq!(reg.resolve(&key_did).unwrap(), (doc, meta));
    }

    #[test]
    fn test_key_did_is_immutable() {
        let mut reg = registry();
        let owner = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let key_did = new_key_did(reg.chain(), &owner.address()).unwrap();
        let err = reg
            .delete_service(&mut ctx(b"x"), &owner.address(), &key_did, "svc")
            .unwrap_err();
        assert!(matches!(err, DidError::InvalidState(_)));
    }

    #[test]
    fn test_mutation_requires_authentication() {
        let owner = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let stranger = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let mut reg = with_document(&owner);

        let svc = Service::new("agent:1", "DIDCommMessaging", "https://agent.example.com");
        let mut tx = ctx(b"add");
        let err = reg
            .add_service(&mut tx, &stranger.address(), &did(), svc.clone())
            .unwrap_err();
        assert!(matches!(err, DidError::Unauthorized { .. }));
        assert!(tx.events().is_empty());

        let doc = reg.add_service(&mut tx, &owner.address(), &did(), svc).unwrap();
        assert_eq!(doc.service.len(), 1);
        let (_, meta) = reg.resolve(&did()).unwrap();
        assert_eq!(meta.version_id, ssi_core::version_id(b"add"));
        assert_eq!(tx.events().len(), 1);
    }

    #[test]
    fn test_assertion_only_method_cannot_mutate() {
        let owner = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let asserter = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let mut reg = with_document(&owner);
        let v = new_account_verification(reg.chain(), &did(), &asserter.address(), vec![AssertionMethod]);
        reg.add_verification(&mut ctx(b"1"), &owner.address(), &did(), v).unwrap();

        let err = reg
            .add_service(
                &mut ctx(b"2"),
                &asserter.address(),
                &did(),
                Service::new("agent:1", "T", "https://agent.example.com"),
            )
            .unwrap_err();
        assert!(matches!(err, DidError::Unauthorized { .. }));
        assert!(reg
            .verify_did_with_relationships(&[AssertionMethod], &did(), &asserter.address())
            .is_ok());
    }

    #[test]
    fn test_controller_bypass() {
        let owner = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let delegate = AccountKeyPair::generate(KeyType::Secp256k1, &mut OsRng);
        let mut reg = with_document(&owner);
        let delegate_did = new_key_did(reg.chain(), &delegate.address()).unwrap();

        reg.add_controller(&mut ctx(b"1"), &owner.address(), &did(), delegate_did.clone())
            .unwrap();
        let v = new_account_verification(reg.chain(), &did(), &delegate.address(), vec![KeyAgreement]);
        reg.add_verification(&mut ctx(b"2"), &delegate.address(), &did(), v)
            .unwrap();

        reg.delete_controller(&mut ctx(b"3"), &owner.address(), &did(), &delegate_did)
            .unwrap();
        let err = reg
            .delete_service(&mut ctx(b"4"), &delegate.address(), &did(), "svc")
            .unwrap_err();
        assert!(matches!(err, DidError::Unauthorized { .. }));

        let err = reg
            .add_controller(&mut ctx(b"5"), &owner.address(), &did(), did())
            .unwrap_err();
        assert!(matches!(err, DidError::InvalidInput(_)));
    }

    #[test]
    fn test_uppercase_controller_in_document_update_grants_bypass() {
        let owner = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let delegate = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let mut reg = with_document(&owner);
        let upper = Did::new(format!(
            "did:{}:key:{}",
            reg.chain().did_method,
            delegate.address().as_str().to_ascii_uppercase()
        ))
        .unwrap();

        let (mut doc, _) = reg.resolve(&did()).unwrap();
        doc.controller = vec![upper.clone(), new_key_did(reg.chain(), &delegate.address()).unwrap()];
        let stored = reg
            .update_did_document(&mut ctx(b"1"), &owner.address(), doc)
            .unwrap();
        assert_eq!(stored.controller, vec![new_key_did(reg.chain(), &delegate.address()).unwrap()]);

        // The delegate now passes the controller bypass.
        let svc = Service::new("agent:svc", "DIDCommMessaging", "https://agent.example.com");
        reg.add_service(&mut ctx(b"2"), &delegate.address(), &did(), svc)
            .unwrap();

        // Deleting by the raw form removes the canonical entry.
        reg.delete_controller(&mut ctx(b"3"), &owner.address(), &did(), &upper)
            .unwrap();
        let err = reg
            .delete_service(&mut ctx(b"4"), &delegate.address(), &did(), "agent:svc")
            .unwrap_err();
        assert!(matches!(err, DidError::Unauthorized { .. }));
    }

    #[test]
    fn test_revoke_then_set_relationships_fails() {
        let owner = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let other = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let mut reg = with_document(&owner);
        let v = new_account_verification(reg.chain(), &did(), &other.address(), vec![Authentication]);
        let method_id = v.method.id.clone();
        reg.add_verification(&mut ctx(b"1"), &owner.address(), &did(), v).unwrap();

        let doc = reg
            .revoke_verification(&mut ctx(b"2"), &owner.address(), &did(), &method_id)
            .unwrap();
        assert!(doc.verification_method(&method_id).is_none());
        assert!(doc.relationships_of(&method_id).is_empty());

        let err = reg
            .set_verification_relationships(&mut ctx(b"3"), &owner.address(), &did(), &method_id, &[Authentication])
            .unwrap_err();
        assert!(matches!(err, DidError::VerificationMethodNotFound(_)));
    }

    #[test]
    fn test_failed_mutation_leaves_store_untouched() {
        let owner = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let mut reg = with_document(&owner);
        let owner_method = format!("{ISSUER}#{}", owner.address());
        let (before, before_meta) = reg.resolve(&did()).unwrap();

        let err = reg
            .set_verification_relationships(&mut ctx(b"1"), &owner.address(), &did(), &owner_method, &[])
            .unwrap_err();
        assert!(matches!(err, DidError::EmptyRelationships(_)));

        let (after, after_meta) = reg.resolve(&did()).unwrap();
        assert_eq!(before, after);
        assert_eq!(before_meta, after_meta);
    }

    #[test]
    fn test_update_replaces_document() {
        let owner = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let mut reg = with_document(&owner);
        let (mut doc, _) = reg.resolve(&did()).unwrap();

        doc.service.push(Service::new("agent:1", "T", "https://agent.example.com"));
        let updated = reg
            .update_did_document(&mut ctx(b"1"), &owner.address(), doc.clone())
            .unwrap();
        assert_eq!(updated, doc);

        let mut dangling = doc.clone();
        dangling.assertion_method.push(format!("{ISSUER}#ghost"));
        let err = reg
            .update_did_document(&mut ctx(b"2"), &owner.address(), dangling)
            .unwrap_err();
        assert!(matches!(err, DidError::VerificationMethodNotFound(_)));

        let mut missing = doc;
        missing.id = Did::new("did:cosmos:net:cosmoshub:nobody").unwrap();
        let err = reg
            .update_did_document(&mut ctx(b"3"), &owner.address(), missing)
            .unwrap_err();
        assert!(matches!(err, DidError::NotFound(_)));
    }

    #[test]
    fn test_documents_by_public_key() {
        let owner = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let mut reg = with_document(&owner);

        let key_holder = AccountKeyPair::generate(KeyType::Secp256k1, &mut OsRng);
        let pk = key_holder.public_key();
        let bob = Did::new("did:cosmos:net:cosmoshub:bob").unwrap();
        let v = new_account_verification(reg.chain(), &bob, &owner.address(), vec![Authentication]);
        let key_vm = crate::document::VerificationMethod::new(
            bob.with_fragment("key-1"),
            bob.clone(),
            crate::material::key_verification_type(&pk),
            VerificationMaterial::multibase(&pk),
        );
        let key_v = Verification::new(key_vm, vec![AssertionMethod], vec![]);
        reg.create_did_document(&mut ctx(b"bob"), &owner.address(), bob.as_str(), vec![], vec![v, key_v], vec![])
            .unwrap();

        assert_eq!(reg.did_documents().unwrap().len(), 2);

        let by_owner = reg.did_documents_by_public_key(&owner.public_key()).unwrap();
        let ids: Vec<_> = by_owner.iter().map(|d| d.id.to_string()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&ISSUER.to_string()));
        assert!(ids.contains(&bob.to_string()));

        let by_key = reg.did_documents_by_public_key(&pk).unwrap();
        assert_eq!(by_key.len(), 2);
        assert_eq!(by_key[0].id, bob);
        assert_eq!(by_key[1].id, new_key_did(reg.chain(), &pk.address()).unwrap());
    }
}
