//! # ssi-did — DID Document Registry
//!
//! Owns W3C DID documents in the host ledger's store and decides whether a
//! transaction signer may act on a DID.
//!
//! ## Module Map
//!
//! - [`relationship`]: the five verification relationships.
//! - [`material`]: CAIP-10 account ids and multibase/hex public keys.
//! - [`document`]: documents, verification methods, services, metadata,
//!   key-DID synthesis, and the in-place mutations.
//! - [`registry`]: resolution, authorization and the persisted operations.
//! - [`error`]: [`DidError`].
//!
//! ## Authorization
//!
//! A signer is authorized for a relationship set on a document when a
//! verification method whose material resolves to the signer's account is
//! listed under one of the relationships, or when the signer's key DID is
//! one of the document's controllers.
//!
//! ## Crate Policy
//!
//! - No partial writes: every mutation commits once, after validation.
//! - No `unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod material;
pub mod registry;
pub mod relationship;

pub use document::{
    new_account_verification, new_chain_did, new_key_did, new_verification_method_id,
    resolve_key_did, DidDocument, DidMetadata, Service, Verification, VerificationMethod,
    DEFAULT_CONTEXT,
};
pub use error::DidError;
pub use material::VerificationMaterial;
pub use registry::DidRegistry;
pub use relationship::VerificationRelationship;
