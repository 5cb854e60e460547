//! # ssi-crypto — Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for the identity layer:
//!
//! - **Account keys**: Ed25519 and ECDSA/secp256k1 signing and verification
//!   over `CanonicalBytes`, and account address derivation.
//! - **BBS+** multi-message signatures with selective-disclosure proofs of
//!   knowledge.
//! - **Accumulator**: a positive revocation accumulator with batch updates,
//!   public witness advancement, and membership proofs.
//! - **Anonymous credentials**: the two composed under one Fiat-Shamir
//!   challenge and a shared blinding for the linking secret.
//!
//! The pairing-based primitives are generic over [`SchemeCurve`]
//! (BLS12-381 or BN254) and take an explicit `AnonCredConfig` on every call.
//!
//! ## Crate Policy
//!
//! - Depends only on `ssi-core` internally.
//! - Secret keys never implement `Serialize`; their `Debug` output is
//!   redacted.
//! - Randomness is injected by the caller as `RngCore + CryptoRng`.
//! - No mocking of cryptographic operations in tests.

pub mod accumulator;
pub mod anoncred;
pub mod bbs;
pub mod curve;
pub mod ed25519;
pub mod error;
pub mod keys;
pub mod secp256k1;
pub mod transcript;

pub use accumulator::{AccumulatorParams, AccumulatorState, MembershipWitness, StateUpdate};
pub use anoncred::{AnonCredSecretKey, AnonymousCredentialProof, IssuedCredential, PublicParameters};
pub use bbs::{BbsPlusParams, BbsSignature};
pub use curve::{message_from_bytes, SchemeCurve};
pub use ed25519::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use error::{AnonCredError, CryptoError};
pub use keys::{AccountKeyPair, KeyType, PublicKey};
pub use secp256k1::{Secp256k1KeyPair, Secp256k1PublicKey};
