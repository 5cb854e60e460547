//! Issue, query, validate, update and revoke a user credential against a
//! live DID registry.

use rand::rngs::OsRng;
use ssi_core::{ChainConfig, Did, Event, MemoryStore, Timestamp, TxContext};
use ssi_crypto::{AccountKeyPair, KeyType};
use ssi_did::{new_account_verification, DidRegistry, VerificationRelationship};
use ssi_vc::{
    CredentialRegistry, CredentialSubject, InMemoryAccounts, UserSubject, VcError,
    VerifiableCredential, USER_CREDENTIAL,
};

use VerificationRelationship::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn tx(bytes: &[u8], secs: i64) -> anyhow::Result<TxContext> {
    Ok(TxContext::new("cosmoshub", Timestamp::from_epoch_secs(secs)?, bytes.to_vec()))
}

#[test]
fn test_user_credential_lifecycle() -> anyhow::Result<()> {
    init_tracing();
    let chain = ChainConfig::default();

    let issuer_key = AccountKeyPair::generate(KeyType::Secp256k1, &mut OsRng);
    let alice_key = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
    let mut accounts = InMemoryAccounts::new();
    let issuer_account = accounts.insert(issuer_key.public_key());
    let alice_account = accounts.insert(alice_key.public_key());

    // Issuer and subject documents.
    let mut dids = DidRegistry::new(MemoryStore::new(), chain.clone());
    let issuer = Did::new("did:example:issuer")?;
    let alice = Did::new("did:example:alice")?;
    let issuer_v =
        new_account_verification(&chain, &issuer, &issuer_account, vec![Authentication, AssertionMethod]);
    let method = issuer_v.method.id.clone();
    dids.create_did_document(
        &mut tx(b"did-1", 1_768_478_400)?,
        &issuer_account,
        issuer.as_str(),
        vec![],
        vec![issuer_v],
        vec![],
    )?;
    let alice_v = new_account_verification(&chain, &alice, &alice_account, vec![Authentication]);
    dids.create_did_document(
        &mut tx(b"did-2", 1_768_478_400)?,
        &alice_account,
        alice.as_str(),
        vec![],
        vec![alice_v],
        vec![],
    )?;

    let mut registry = CredentialRegistry::new(MemoryStore::new(), &dids, &accounts);

    // Issue.
    let issued_at = Timestamp::from_epoch_secs(1_768_478_460)?;
    let mut vc = VerifiableCredential::new(
        "vc:example:alice-kyc",
        issuer.clone(),
        issued_at,
        CredentialSubject::UserCred(UserSubject {
            id: alice.clone(),
            root: "6d1f0c".into(),
            is_verified: true,
        }),
    );
    vc.sign(&issuer_key, method.clone(), issued_at)?;
    let mut issue = tx(b"issue", 1_768_478_460)?;
    registry.issue_user_credential(&mut issue, &issuer_account, vc.clone())?;
    assert_eq!(
        issue.events(),
        &[Event::CredentialCreated {
            owner: issuer_account.clone(),
            credential_id: "vc:example:alice-kyc".into(),
        }]
    );

    // Query and validate offline.
    let (stored, metadata) = registry.verifiable_credential("vc:example:alice-kyc")?;
    assert_eq!(stored, vc);
    assert_eq!(
        stored.proof.as_ref().map(|p| p.verification_method.as_str()),
        Some(method.as_str())
    );
    assert_eq!(metadata.version_id, issue.version_id());
    stored.validate(&issuer_key.public_key())?;
    assert!(matches!(
        stored.validate(&alice_key.public_key()),
        Err(VcError::VerificationFailed(_))
    ));

    let held = registry.verifiable_credentials_with_type(&alice, USER_CREDENTIAL)?;
    assert_eq!(held.len(), 1);
    assert_eq!(registry.verifiable_credentials_by_issuer(&issuer)?.len(), 1);

    // Alice cannot issue in the issuer's name.
    let mut forged = vc.clone();
    forged.id = "vc:example:forged".into();
    forged.sign(&alice_key, method.clone(), issued_at)?;
    assert!(registry
        .issue_user_credential(&mut tx(b"forge", 1_768_478_500)?, &alice_account, forged)
        .is_err());

    // Update.
    let mut updated = vc.clone();
    if let CredentialSubject::UserCred(subject) = &mut updated.credential_subject {
        subject.root = "a7c3e9".into();
    }
    updated.sign(&issuer_key, method.clone(), Timestamp::from_epoch_secs(1_768_479_000)?)?;
    let mut update = tx(b"update", 1_768_479_000)?;
    registry.update_verifiable_credential(&mut update, &issuer_account, updated.clone())?;
    let (stored, metadata) = registry.verifiable_credential("vc:example:alice-kyc")?;
    assert_eq!(stored, updated);
    assert_eq!(metadata.created, Timestamp::from_epoch_secs(1_768_478_460)?);
    assert_eq!(metadata.updated, Timestamp::from_epoch_secs(1_768_479_000)?);
    assert_eq!(metadata.version_id, update.version_id());

    // Revoke.
    let mut revoke = tx(b"revoke", 1_768_480_000)?;
    registry.revoke_credential(&mut revoke, &issuer_account, "vc:example:alice-kyc")?;
    assert_eq!(revoke.events().len(), 1);
    let (stored, metadata) = registry.verifiable_credential("vc:example:alice-kyc")?;
    assert!(metadata.deactivated);
    assert_eq!(stored, updated);
    Ok(())
}

#[test]
fn test_assertion_method_key_can_sign_for_authenticated_owner() -> anyhow::Result<()> {
    init_tracing();
    let chain = ChainConfig::default();
    let owner_key = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
    let signer_key = AccountKeyPair::generate(KeyType::Ed25519, &mut OsRng);
    let mut accounts = InMemoryAccounts::new();
    let owner = accounts.insert(owner_key.public_key());
    let signer = accounts.insert(signer_key.public_key());

    let mut dids = DidRegistry::new(MemoryStore::new(), chain.clone());
    let issuer = Did::new("did:example:university")?;
    let auth = new_account_verification(&chain, &issuer, &owner, vec![Authentication]);
    let assertion = new_account_verification(&chain, &issuer, &signer, vec![AssertionMethod]);
    let assertion_method = assertion.method.id.clone();
    let agreement_key = AccountKeyPair::generate(KeyType::Secp256k1, &mut OsRng);
    let agreement_account = accounts.insert(agreement_key.public_key());
    let agreement = new_account_verification(&chain, &issuer, &agreement_account, vec![KeyAgreement]);
    let agreement_method = agreement.method.id.clone();
    dids.create_did_document(
        &mut tx(b"did", 1_768_478_400)?,
        &owner,
        issuer.as_str(),
        vec![],
        vec![auth, assertion, agreement],
        vec![],
    )?;

    let mut registry = CredentialRegistry::new(MemoryStore::new(), &dids, &accounts);
    let at = Timestamp::from_epoch_secs(1_768_478_460)?;
    let subject = CredentialSubject::UserCred(UserSubject {
        id: issuer.clone(),
        root: "00".into(),
        is_verified: false,
    });

    let mut vc = VerifiableCredential::new("vc:example:diploma", issuer.clone(), at, subject.clone());
    vc.sign(&signer_key, assertion_method, at)?;
    registry.issue_user_credential(&mut tx(b"issue", 1_768_478_460)?, &owner, vc)?;

    // A method listed only under keyAgreement may not sign credentials.
    let mut vc = VerifiableCredential::new("vc:example:other", issuer, at, subject);
    vc.sign(&signer_key, agreement_method, at)?;
    let err = registry
        .issue_user_credential(&mut tx(b"issue-2", 1_768_478_470)?, &owner, vc)
        .unwrap_err();
    assert!(matches!(err, VcError::ProofNotAuthorized { .. }));
    Ok(())
}
