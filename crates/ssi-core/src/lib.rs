//! # ssi-core — Foundational Types for the Ledger Identity Layer
//!
//! Every other crate in the workspace depends on `ssi-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Validated identifier newtypes.** `Did` and `AccountAddress` can only
//!    be built through constructors that apply the W3C DID grammar or the
//!    address format. No bare strings cross crate boundaries as identifiers.
//!
//! 2. **`CanonicalBytes` newtype.** Signing input and version digests flow
//!    through `CanonicalBytes::new()` (RFC 8785 JCS).
//!
//! 3. **Store as a collaborator.** Persistence is the host ledger's job. This
//!    crate only defines the `KvStore` contract, an in-memory implementation,
//!    and a write-buffering `CacheStore` whose `commit()` is the visibility
//!    boundary.
//!
//! 4. **UTC-only timestamps** with seconds precision.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ssi-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod config;
pub mod context;
pub mod did;
pub mod digest;
pub mod error;
pub mod store;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use config::{AnonCredConfig, ChainConfig, ConfigError, CurveId, SsiConfig};
pub use context::{Event, TxContext};
pub use did::{AccountAddress, Did, DidKind};
pub use digest::{sha256_digest, sha256_hex, version_id, ContentDigest};
pub use error::{CanonicalizationError, CoreError};
pub use store::{CacheStore, KvStore, MemoryStore, StoreError, StorePrefix};
pub use temporal::Timestamp;
