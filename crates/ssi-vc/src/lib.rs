//! # ssi-vc — Verifiable Credential Registry
//!
//! W3C verifiable credentials issued by DID-identified issuers and stored
//! in the host ledger, with three subject kinds: business registration,
//! user identity, and anonymous credential schema (public parameters plus
//! the accumulator state history).
//!
//! ## Module Map
//!
//! - [`credential`]: the credential model, canonical signing input, proof
//!   attachment and signature verification.
//! - [`proof`]: the proof envelope.
//! - [`registry`]: issuance, update, accumulator publication, revocation
//!   and queries, all behind one validation pipeline.
//! - [`traits`]: the DID resolver and account service collaborators.
//! - [`error`]: [`VcError`].
//!
//! ## Crate Policy
//!
//! - A credential is accepted only if its proof verifies under the public
//!   key the ledger publishes for the proof method's account.
//! - Revocation never deletes the credential value.
//! - No `unwrap()` outside tests.

pub mod credential;
pub mod error;
pub mod proof;
pub mod registry;
pub mod traits;

pub use credential::{
    Address, AnonymousCredentialSchemaSubject, CredentialSubject, LegalPerson, Name, RegistrationId, RegistrationSubject, UserSubject, VcMetadata, VerifiableCredential,
    ANONYMOUS_CREDENTIAL_SCHEMA, REGISTRATION_CREDENTIAL, USER_CREDENTIAL, VC_CONTEXT,
    VERIFIABLE_CREDENTIAL,
};
pub use error::{AccountError, VcError};
pub use proof::{Proof, ProofPurpose};
pub use registry::CredentialRegistry;
pub use traits::{AccountService, DidResolver, InMemoryAccounts};
