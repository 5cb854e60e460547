//! # Credential Registry
//!
//! Owns credential state in the host store. Every write runs the same
//! validation pipeline before touching the store:
//!
//! 1. the subject DID resolves;
//! 2. the issuer DID resolves;
//! 3. the credential carries a proof;
//! 4. the proof's verification method is listed under one of the accepted
//!    relationships of the issuer document;
//! 5. the method's account has a published public key, and the proof
//!    signature verifies under it.
//!
//! Independently, the transaction signer must be authorized for
//! `{authentication}` on the issuer DID.
//!
//! Writes are staged in a [`CacheStore`] and committed once, after the
//! pipeline has passed. Revocation is logical: metadata is marked
//! deactivated and the credential value is kept.

use ssi_core::store::{load, load_prefix, save};
use ssi_core::{AccountAddress, CacheStore, Did, Event, KvStore, StorePrefix, Timestamp, TxContext};
use ssi_crypto::AccumulatorState;
use ssi_did::VerificationRelationship;

use crate::credential::{
    VcMetadata, VerifiableCredential, ANONYMOUS_CREDENTIAL_SCHEMA, REGISTRATION_CREDENTIAL,
    USER_CREDENTIAL,
};
use crate::error::VcError;
use crate::proof::Proof;
use crate::traits::{AccountService, DidResolver};

/// Relationships a proof's method may hold for issuance and update.
const ISSUE_RELATIONSHIPS: [VerificationRelationship; 2] = [
    VerificationRelationship::Authentication,
    VerificationRelationship::AssertionMethod,
];

/// Relationships the transaction signer must hold on the issuer DID.
const SIGNER_RELATIONSHIPS: [VerificationRelationship; 1] =
    [VerificationRelationship::Authentication];

/// Verifiable credential registry.
#[derive(Debug)]
pub struct CredentialRegistry<S: KvStore, D: DidResolver, A: AccountService> {
    store: S,
    dids: D,
    accounts: A,
}

impl<S: KvStore, D: DidResolver, A: AccountService> CredentialRegistry<S, D, A> {
    /// Open a registry over `store`, resolving DIDs through `dids` and keys
    /// through `accounts`.
    pub fn new(store: S, dids: D, accounts: A) -> Self {
        Self {
            store,
            dids,
            accounts,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// A credential and its metadata.
    pub fn verifiable_credential(&self, id: &str) -> Result<(VerifiableCredential, VcMetadata), VcError> {
        let vc = self.load_credential(id)?;
        let metadata = self.load_metadata(id)?;
        Ok((vc, metadata))
    }

    /// Every stored credential, in id order.
    pub fn verifiable_credentials(&self) -> Result<Vec<VerifiableCredential>, VcError> {
        Ok(load_prefix(&self.store, StorePrefix::Credential)?)
    }

    /// Credentials issued by `issuer`.
    pub fn verifiable_credentials_by_issuer(&self, issuer: &Did) -> Result<Vec<VerifiableCredential>, VcError> {
        self.select(|vc| vc.issuer == *issuer)
    }

    /// Credentials held by `subject` that list `vc_type`.
    pub fn verifiable_credentials_with_type(
        &self,
        subject: &Did,
        vc_type: &str,
    ) -> Result<Vec<VerifiableCredential>, VcError> {
        self.select(|vc| vc.subject_did() == subject && vc.has_type(vc_type))
    }

    fn select(
        &self,
        predicate: impl Fn(&VerifiableCredential) -> bool,
    ) -> Result<Vec<VerifiableCredential>, VcError> {
        Ok(self
            .verifiable_credentials()?
            .into_iter()
            .filter(|vc| predicate(vc))
            .collect())
    }

    fn load_credential(&self, id: &str) -> Result<VerifiableCredential, VcError> {
        load(&self.store, &StorePrefix::Credential.key(id))?
            .ok_or_else(|| VcError::NotFound(id.to_string()))
    }

    fn load_metadata(&self, id: &str) -> Result<VcMetadata, VcError> {
        load(&self.store, &StorePrefix::CredentialMetadata.key(id))?
            .ok_or_else(|| VcError::NotFound(format!("metadata of {id}")))
    }

    // -----------------------------------------------------------------------
    // Validation pipeline
    // -----------------------------------------------------------------------

    /// Run the five-step pipeline on `vc`, accepting proof methods listed
    /// under any of `relationships`.
    pub fn validate_proof(
        &self,
        vc: &VerifiableCredential,
        relationships: &[VerificationRelationship],
    ) -> Result<(), VcError> {
        let subject = vc.subject_did();
        self.dids
            .resolve(subject)
            .map_err(|source| VcError::SubjectUnresolvable {
                did: subject.clone(),
                source,
            })?;
        let (issuer_doc, _) =
            self.dids
                .resolve(&vc.issuer)
                .map_err(|source| VcError::IssuerUnresolvable {
                    did: vc.issuer.clone(),
                    source,
                })?;

        let proof = vc
            .proof
            .as_ref()
            .ok_or_else(|| VcError::MissingProof(vc.id.clone()))?;

        let method_id = &proof.verification_method;
        let granted = issuer_doc.relationships_of(method_id);
        let method = match issuer_doc.verification_method(method_id) {
            Some(m) if granted.iter().any(|r| relationships.contains(r)) => m,
            _ => {
                return Err(VcError::ProofNotAuthorized {
                    method: method_id.clone(),
                    issuer: vc.issuer.clone(),
                    required: relationships.to_vec(),
                })
            }
        };

        let address = method.material.address()?;
        let public_key = self.accounts.public_key(&address)?;
        vc.validate(&public_key)
    }

    // -----------------------------------------------------------------------
    // Issuance
    // -----------------------------------------------------------------------

    /// Issue a credential with a [`UserSubject`](crate::UserSubject).
    pub fn issue_user_credential(
        &mut self,
        ctx: &mut TxContext,
        owner: &AccountAddress,
        vc: VerifiableCredential,
    ) -> Result<(), VcError> {
        self.issue(ctx, owner, vc, USER_CREDENTIAL)
    }

    /// Issue a credential with a
    /// [`RegistrationSubject`](crate::RegistrationSubject).
    pub fn issue_registration_credential(
        &mut self,
        ctx: &mut TxContext,
        owner: &AccountAddress,
        vc: VerifiableCredential,
    ) -> Result<(), VcError> {
        self.issue(ctx, owner, vc, REGISTRATION_CREDENTIAL)
    }

    /// Publish an anonymous credential schema.
    pub fn issue_anonymous_credential_schema(
        &mut self,
        ctx: &mut TxContext,
        owner: &AccountAddress,
        vc: VerifiableCredential,
    ) -> Result<(), VcError> {
        self.issue(ctx, owner, vc, ANONYMOUS_CREDENTIAL_SCHEMA)
    }

    fn issue(
        &mut self,
        ctx: &mut TxContext,
        owner: &AccountAddress,
        vc: VerifiableCredential,
        expected: &'static str,
    ) -> Result<(), VcError> {
        tracing::info!(credential = %vc.id, owner = %owner, subtype = expected, "credential issuance requested");
        let id = vc.id.clone();
        let result = self.try_issue(ctx, owner, vc, expected);
        match &result {
            Ok(()) => {
                metrics::counter!("ssi_vc_credentials_issued_total", "subtype" => expected).increment(1);
                tracing::info!(credential = %id, owner = %owner, "credential issued");
            }
            Err(e) => reject("issue", &id, e),
        }
        result
    }

    fn try_issue(
        &mut self,
        ctx: &mut TxContext,
        owner: &AccountAddress,
        vc: VerifiableCredential,
        expected: &'static str,
    ) -> Result<(), VcError> {
        let key = StorePrefix::Credential.key(&vc.id);
        if self.store.has(&key)? {
            return Err(VcError::AlreadyExists(vc.id.clone()));
        }
        if vc.credential_subject.credential_type() != expected {
            return Err(VcError::WrongSubtype {
                id: vc.id.clone(),
                expected,
            });
        }
        self.dids
            .verify_did_with_relationships(&SIGNER_RELATIONSHIPS, &vc.issuer, owner)?;
        self.validate_proof(&vc, &ISSUE_RELATIONSHIPS)?;

        let metadata = VcMetadata::new(ctx.version_id(), ctx.block_time());
        let mut cache = CacheStore::new(&mut self.store);
        save(&mut cache, &key, &vc)?;
        save(&mut cache, &StorePrefix::CredentialMetadata.key(&vc.id), &metadata)?;
        cache.commit()?;

        ctx.emit(Event::CredentialCreated {
            owner: owner.clone(),
            credential_id: vc.id,
        });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Updates
    // -----------------------------------------------------------------------

    /// Replace a stored credential. The signer must be authorized on both
    /// the stored and the new issuer, so issuer rotation needs both. The
    /// subject variant is fixed, and a schema's accumulator history may only
    /// be extended.
    pub fn update_verifiable_credential(
        &mut self,
        ctx: &mut TxContext,
        owner: &AccountAddress,
        vc: VerifiableCredential,
    ) -> Result<(), VcError> {
        let id = vc.id.clone();
        self.update(ctx, owner, &id, "update_verifiable_credential", |stored| {
            stored.check_successor(&vc)?;
            Ok(vc)
        })
    }

    /// Append one accumulator state to a stored anonymous credential
    /// schema, with the issuance date and proof covering the result.
    pub fn update_accumulator_state(
        &mut self,
        ctx: &mut TxContext,
        owner: &AccountAddress,
        credential_id: &str,
        issuance_date: Timestamp,
        state: AccumulatorState,
        proof: Proof,
    ) -> Result<(), VcError> {
        self.update(ctx, owner, credential_id, "update_accumulator_state", |stored| {
            let mut vc = stored.clone();
            vc.push_accumulator_state(state)?;
            vc.issuance_date = issuance_date;
            vc.proof = Some(proof);
            Ok(vc)
        })
    }

    fn update<F>(
        &mut self,
        ctx: &mut TxContext,
        owner: &AccountAddress,
        id: &str,
        op: &'static str,
        build: F,
    ) -> Result<(), VcError>
    where
        F: FnOnce(&VerifiableCredential) -> Result<VerifiableCredential, VcError>,
    {
        tracing::info!(credential = id, owner = %owner, op, "credential update requested");
        let result = self.try_update(ctx, owner, id, build);
        match &result {
            Ok(()) => {
                metrics::counter!("ssi_vc_credentials_updated_total", "op" => op).increment(1);
                tracing::info!(credential = id, op, "credential updated");
            }
            Err(e) => reject(op, id, e),
        }
        result
    }

    fn try_update<F>(
        &mut self,
        ctx: &mut TxContext,
        owner: &AccountAddress,
        id: &str,
        build: F,
    ) -> Result<(), VcError>
    where
        F: FnOnce(&VerifiableCredential) -> Result<VerifiableCredential, VcError>,
    {
        let stored = self.load_credential(id)?;
        let mut metadata = self.load_metadata(id)?;
        if metadata.deactivated {
            return Err(VcError::InvalidState(format!("credential {id} is revoked")));
        }

        let vc = build(&stored)?;
        if vc.id != stored.id {
            return Err(VcError::NotFound(vc.id));
        }
        self.dids
            .verify_did_with_relationships(&SIGNER_RELATIONSHIPS, &vc.issuer, owner)?;
        if stored.issuer != vc.issuer {
            self.dids
                .verify_did_with_relationships(&SIGNER_RELATIONSHIPS, &stored.issuer, owner)?;
        }
        self.validate_proof(&vc, &ISSUE_RELATIONSHIPS)?;

        metadata.update(ctx.version_id(), ctx.block_time(), false);
        let mut cache = CacheStore::new(&mut self.store);
        save(&mut cache, &StorePrefix::Credential.key(id), &vc)?;
        save(&mut cache, &StorePrefix::CredentialMetadata.key(id), &metadata)?;
        cache.commit()?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Revocation
    // -----------------------------------------------------------------------

    /// Deactivate a credential. Only `{authentication}` on the stored
    /// issuer is accepted; the credential value is untouched.
    pub fn revoke_credential(
        &mut self,
        ctx: &mut TxContext,
        owner: &AccountAddress,
        id: &str,
    ) -> Result<(), VcError> {
        tracing::info!(credential = id, owner = %owner, "credential revocation requested");
        let result = self.try_revoke(ctx, owner, id);
        match &result {
            Ok(()) => {
                metrics::counter!("ssi_vc_credentials_revoked_total").increment(1);
                tracing::info!(credential = id, owner = %owner, "credential revoked");
            }
            Err(e) => reject("revoke", id, e),
        }
        result
    }

    fn try_revoke(&mut self, ctx: &mut TxContext, owner: &AccountAddress, id: &str) -> Result<(), VcError> {
        let stored = self.load_credential(id)?;
        let mut metadata = self.load_metadata(id)?;
        if metadata.deactivated {
            return Err(VcError::InvalidState(format!("credential {id} is already revoked")));
        }

        let subject = stored.subject_did();
        self.dids
            .resolve(subject)
            .map_err(|source| VcError::SubjectUnresolvable {
                did: subject.clone(),
                source,
            })?;
        self.dids
            .resolve(&stored.issuer)
            .map_err(|source| VcError::IssuerUnresolvable {
                did: stored.issuer.clone(),
                source,
            })?;
        self.dids
            .verify_did_with_relationships(&SIGNER_RELATIONSHIPS, &stored.issuer, owner)?;

        metadata.update(ctx.version_id(), ctx.block_time(), true);
        let mut cache = CacheStore::new(&mut self.store);
        save(&mut cache, &StorePrefix::CredentialMetadata.key(id), &metadata)?;
        cache.commit()?;

        ctx.emit(Event::CredentialDeleted {
            owner: owner.clone(),
            credential_id: id.to_string(),
        });
        Ok(())
    }
}

fn reject(op: &'static str, credential: &str, e: &VcError) {
    metrics::counter!("ssi_vc_requests_rejected_total", "op" => op, "reason" => e.kind()).increment(1);
    tracing::warn!(credential, op, error = %e, "credential request rejected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{CredentialSubject, RegistrationSubject, UserSubject};
    use crate::traits::InMemoryAccounts;
    use rand::rngs::OsRng;
    use ssi_core::{ChainConfig, MemoryStore};
    use ssi_crypto::{AccountKeyPair, KeyType};
    use ssi_did::{new_account_verification, new_key_did, DidError, DidRegistry};

    use VerificationRelationship::*;

    const ISSUER: &str = "did:cosmos:net:cosmoshub:issuer";

    fn time() -> Timestamp {
        Timestamp::parse("2026-01-15T12:00:00Z").unwrap()
    }

    fn ctx(tx: &[u8]) -> TxContext {
        TxContext::new("cosmoshub", time(), tx.to_vec())
    }

    struct Fixture {
        dids: DidRegistry<MemoryStore>,
        accounts: InMemoryAccounts,
        issuer_key: AccountKeyPair,
        owner: AccountAddress,
        method: String,
        subject: Did,
    }

    /// An issuer document whose single method is the owner's account,
    /// granted authentication and assertion, plus a key-DID subject.
    fn fixture() -> Fixture {
        let chain = ChainConfig::default();
        let issuer_key = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let mut accounts = InMemoryAccounts::new();
        let owner = accounts.insert(issuer_key.public_key());

        let issuer = Did::new(ISSUER).unwrap();
        let v = new_account_verification(&chain, &issuer, &owner, vec![Authentication, AssertionMethod]);
        let method = v.method.id.clone();
        let mut dids = DidRegistry::new(MemoryStore::new(), chain.clone());
        dids.create_did_document(&mut ctx(b"did"), &owner, ISSUER, vec![], vec![v], vec![])
            .unwrap();

        let holder = AccountKeyPair::generate(KeyType::Secp256k1, &mut OsRng);
        let subject = new_key_did(&chain, &holder.address()).unwrap();
        Fixture {
            dids,
            accounts,
            issuer_key,
            owner,
            method,
            subject,
        }
    }

    fn unsigned_user_vc(f: &Fixture, id: &str, root: &str) -> VerifiableCredential {
        VerifiableCredential::new(
            id,
            Did::new(ISSUER).unwrap(),
            time(),
            CredentialSubject::UserCred(UserSubject {
                id: f.subject.clone(),
                root: root.into(),
                is_verified: true,
            }),
        )
    }

    fn user_vc(f: &Fixture, id: &str) -> VerifiableCredential {
        let mut vc = unsigned_user_vc(f, id, "ab12");
        vc.sign(&f.issuer_key, f.method.clone(), time()).unwrap();
        vc
    }

    type Registry<'a> = CredentialRegistry<MemoryStore, &'a DidRegistry<MemoryStore>, &'a InMemoryAccounts>;

    fn registry(f: &Fixture) -> Registry<'_> {
        CredentialRegistry::new(MemoryStore::new(), &f.dids, &f.accounts)
    }

    #[test]
    fn test_issue_then_query() {
        let f = fixture();
        let mut reg = registry(&f);
        let mut c = ctx(b"issue");
        reg.issue_user_credential(&mut c, &f.owner, user_vc(&f, "vc-1")).unwrap();

        let (vc, meta) = reg.verifiable_credential("vc-1").unwrap();
        assert_eq!(vc.proof.as_ref().unwrap().verification_method, f.method);
        assert_eq!(meta.created, time());
        assert_eq!(meta.version_id, c.version_id());
        assert!(!meta.deactivated);
        assert_eq!(
            c.events(),
            &[Event::CredentialCreated {
                owner: f.owner.clone(),
                credential_id: "vc-1".into(),
            }]
        );
    }

    #[test]
    fn test_duplicate_issue_rejected() {
        let f = fixture();
        let mut reg = registry(&f);
        reg.issue_user_credential(&mut ctx(b"1"), &f.owner, user_vc(&f, "vc-1")).unwrap();
        let err = reg
            .issue_user_credential(&mut ctx(b"2"), &f.owner, user_vc(&f, "vc-1"))
            .unwrap_err();
        assert!(matches!(err, VcError::AlreadyExists(_)));
    }

    #[test]
    fn test_subtype_must_match_operation() {
        let f = fixture();
        let mut reg = registry(&f);
        let err = reg
            .issue_registration_credential(&mut ctx(b"1"), &f.owner, user_vc(&f, "vc-1"))
            .unwrap_err();
        assert!(matches!(err, VcError::WrongSubtype { .. }));

        let mut vc = VerifiableCredential::new(
            "reg-1",
            Did::new(ISSUER).unwrap(),
            time(),
            CredentialSubject::RegistrationCred(RegistrationSubject::new(
                f.subject.clone(),
                "DE",
                "ACME",
                "ACME GmbH",
                vec![],
            )),
        );
        vc.sign(&f.issuer_key, f.method.clone(), time()).unwrap();
        reg.issue_registration_credential(&mut ctx(b"2"), &f.owner, vc).unwrap();
    }

    #[test]
    fn test_owner_must_be_authorized_on_issuer() {
        let f = fixture();
        let mut reg = registry(&f);
        let stranger = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng).address();
        let err = reg
            .issue_user_credential(&mut ctx(b"1"), &stranger, user_vc(&f, "vc-1"))
            .unwrap_err();
        assert!(matches!(err, VcError::Did(DidError::Unauthorized { .. })));
        assert!(reg.store().is_empty());
    }

    #[test]
    fn test_missing_proof_rejected() {
        let f = fixture();
        let mut reg = registry(&f);
        let vc = unsigned_user_vc(&f, "vc-1", "ab12");
        let err = reg.issue_user_credential(&mut ctx(b"1"), &f.owner, vc).unwrap_err();
        assert!(matches!(err, VcError::MissingProof(_)));
    }

    #[test]
    fn test_unknown_proof_method_rejected() {
        let f = fixture();
        let mut reg = registry(&f);
        let mut vc = unsigned_user_vc(&f, "vc-1", "ab12");
        vc.sign(&f.issuer_key, format!("{ISSUER}#missing"), time()).unwrap();
        let err = reg.issue_user_credential(&mut ctx(b"1"), &f.owner, vc).unwrap_err();
        assert!(matches!(err, VcError::ProofNotAuthorized { .. }));
    }

    #[test]
    fn test_signature_by_other_key_rejected() {
        let f = fixture();
        let mut reg = registry(&f);
        let other = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
        let mut vc = unsigned_user_vc(&f, "vc-1", "ab12");
        vc.sign(&other, f.method.clone(), time()).unwrap();
        let err = reg.issue_user_credential(&mut ctx(b"1"), &f.owner, vc).unwrap_err();
        assert!(matches!(err, VcError::VerificationFailed(_)));
    }

    #[test]
    fn test_unresolvable_subject_rejected() {
        let f = fixture();
        let mut reg = registry(&f);
        let mut vc = unsigned_user_vc(&f, "vc-1", "ab12");
        if let CredentialSubject::UserCred(s) = &mut vc.credential_subject {
            s.id = Did::new("did:cosmos:net:cosmoshub:nobody").unwrap();
        }
        vc.sign(&f.issuer_key, f.method.clone(), time()).unwrap();
        let err = reg.issue_user_credential(&mut ctx(b"1"), &f.owner, vc).unwrap_err();
        assert!(matches!(err, VcError::SubjectUnresolvable { .. }));
    }

    #[test]
    fn test_unpublished_account_key_rejected() {
        let f = fixture();
        let empty = InMemoryAccounts::new();
        let mut reg = CredentialRegistry::new(MemoryStore::new(), &f.dids, &empty);
        let err = reg
            .issue_user_credential(&mut ctx(b"1"), &f.owner, user_vc(&f, "vc-1"))
            .unwrap_err();
        assert!(matches!(err, VcError::Account(_)));
    }

    #[test]
    fn test_update_replaces_value_and_metadata() {
        let f = fixture();
        let mut reg = registry(&f);
        reg.issue_user_credential(&mut ctx(b"issue"), &f.owner, user_vc(&f, "vc-1")).unwrap();

        let mut vc = unsigned_user_vc(&f, "vc-1", "cd34");
        vc.sign(&f.issuer_key, f.method.clone(), time()).unwrap();
        let mut c = ctx(b"update");
        reg.update_verifiable_credential(&mut c, &f.owner, vc.clone()).unwrap();

        let (stored, meta) = reg.verifiable_credential("vc-1").unwrap();
        assert_eq!(stored, vc);
        assert_eq!(meta.version_id, c.version_id());
        assert!(c.events().is_empty());
    }

    #[test]
    fn test_update_unknown_credential() {
        let f = fixture();
        let mut reg = registry(&f);
        let err = reg
            .update_verifiable_credential(&mut ctx(b"1"), &f.owner, user_vc(&f, "vc-1"))
            .unwrap_err();
        assert!(matches!(err, VcError::NotFound(_)));
    }

    #[test]
    fn test_accumulator_update_requires_schema() {
        let f = fixture();
        let mut reg = registry(&f);
        reg.issue_user_credential(&mut ctx(b"issue"), &f.owner, user_vc(&f, "vc-1")).unwrap();
        let proof = user_vc(&f, "vc-1").proof.unwrap();
        let state = AccumulatorState {
            acc_value: vec![7; 48],
            update: None,
        };
        let err = reg
            .update_accumulator_state(&mut ctx(b"acc"), &f.owner, "vc-1", time(), state, proof)
            .unwrap_err();
        assert!(matches!(err, VcError::WrongSubtype { .. }));
    }

    #[test]
    fn test_revoke_is_logical_and_final() {
        let f = fixture();
        let mut reg = registry(&f);
        reg.issue_user_credential(&mut ctx(b"issue"), &f.owner, user_vc(&f, "vc-1")).unwrap();

        let mut c = ctx(b"revoke");
        reg.revoke_credential(&mut c, &f.owner, "vc-1").unwrap();
        assert_eq!(
            c.take_events(),
            vec![Event::CredentialDeleted {
                owner: f.owner.clone(),
                credential_id: "vc-1".into(),
            }]
        );

        let (vc, meta) = reg.verifiable_credential("vc-1").unwrap();
        assert!(meta.deactivated);
        assert_eq!(vc, user_vc(&f, "vc-1"));

        assert!(matches!(
            reg.revoke_credential(&mut ctx(b"again"), &f.owner, "vc-1"),
            Err(VcError::InvalidState(_))
        ));
        assert!(matches!(
            reg.update_verifiable_credential(&mut ctx(b"upd"), &f.owner, user_vc(&f, "vc-1")),
            Err(VcError::InvalidState(_))
        ));
    }

    #[test]
    fn test_revoke_requires_authorized_owner() {
        let f = fixture();
        let mut reg = registry(&f);
        reg.issue_user_credential(&mut ctx(b"issue"), &f.owner, user_vc(&f, "vc-1")).unwrap();
        let stranger = AccountKeyPair::generate(KeyType::Secp256k1, &mut OsRng).address();
        let err = reg.revoke_credential(&mut ctx(b"revoke"), &stranger, "vc-1").unwrap_err();
        assert!(matches!(err, VcError::Did(DidError::Unauthorized { .. })));
        assert!(!reg.verifiable_credential("vc-1").unwrap().1.deactivated);
    }

    #[test]
    fn test_queries_filter_by_issuer_and_type() {
        let f = fixture();
        let mut reg = registry(&f);
        reg.issue_user_credential(&mut ctx(b"1"), &f.owner, user_vc(&f, "vc-1")).unwrap();
        reg.issue_user_credential(&mut ctx(b"2"), &f.owner, user_vc(&f, "vc-2")).unwrap();

        assert_eq!(reg.verifiable_credentials().unwrap().len(), 2);
        let issuer = Did::new(ISSUER).unwrap();
        assert_eq!(reg.verifiable_credentials_by_issuer(&issuer).unwrap().len(), 2);
        let other = Did::new("did:cosmos:net:cosmoshub:other").unwrap();
        assert!(reg.verifiable_credentials_by_issuer(&other).unwrap().is_empty());

        assert_eq!(
            reg.verifiable_credentials_with_type(&f.subject, USER_CREDENTIAL)
                .unwrap()
                .len(),
            2
        );
        assert!(reg
            .verifiable_credentials_with_type(&f.subject, REGISTRATION_CREDENTIAL)
            .unwrap()
            .is_empty());
    }
}
