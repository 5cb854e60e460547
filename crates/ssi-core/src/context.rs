//! # Transaction Context
//!
//! `TxContext` carries what the host ledger knows about the transaction that
//! is executing: chain id, block time and the raw transaction bytes (hashed
//! into `VersionId`). Registries record emitted events on it; the host
//! forwards them after commit.

use serde::{Deserialize, Serialize};

use crate::digest::version_id;
use crate::did::{AccountAddress, Did};
use crate::temporal::Timestamp;

/// Events emitted by successful mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A DID document was created.
    DidDocumentCreated {
        /// The new document's id.
        did: Did,
        /// Transaction signer.
        signer: AccountAddress,
    },
    /// A DID document was mutated.
    DidDocumentUpdated {
        /// The document's id.
        did: Did,
        /// Transaction signer.
        signer: AccountAddress,
    },
    /// A credential was issued.
    CredentialCreated {
        /// Transaction signer.
        owner: AccountAddress,
        /// Credential id.
        credential_id: String,
    },
    /// A credential was revoked.
    CredentialDeleted {
        /// Transaction signer.
        owner: AccountAddress,
        /// Credential id.
        credential_id: String,
    },
}

/// Per-transaction execution context supplied by the host.
#[derive(Debug, Clone)]
pub struct TxContext {
    chain_id: String,
    block_time: Timestamp,
    tx_bytes: Vec<u8>,
    events: Vec<Event>,
}

impl TxContext {
    /// New context for one transaction.
    pub fn new(chain_id: impl Into<String>, block_time: Timestamp, tx_bytes: Vec<u8>) -> Self {
        Self {
            chain_id: chain_id.into(),
            block_time,
            tx_bytes,
            events: Vec::new(),
        }
    }

    /// Chain identifier.
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Block time of the executing transaction.
    pub fn block_time(&self) -> Timestamp {
        self.block_time
    }

    /// Raw transaction bytes.
    pub fn tx_bytes(&self) -> &[u8] {
        &self.tx_bytes
    }

    /// `VersionId` for anything this transaction mutates.
    pub fn version_id(&self) -> String {
        version_id(&self.tx_bytes)
    }

    /// Record an event.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drain recorded events.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_and_take() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let mut ctx = TxContext::new("cosmoshub", ts, b"tx".to_vec());
        assert_eq!(ctx.chain_id(), "cosmoshub");
        assert_eq!(ctx.version_id(), version_id(b"tx"));

        let owner = AccountAddress::new("00112233445566778899aabbccddeeff00112233").unwrap();
        ctx.emit(Event::CredentialCreated {
            owner,
            credential_id: "vc-1".into(),
        });
        assert_eq!(ctx.events().len(), 1);
        assert_eq!(ctx.take_events().len(), 1);
        assert!(ctx.events().is_empty());
    }

    #[test]
    fn test_event_serde_tag() {
        let event = Event::DidDocumentCreated {
            did: Did::new("did:example:issuer").unwrap(),
            signer: AccountAddress::new("00112233445566778899aabbccddeeff00112233").unwrap(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "did_document_created");
        assert_eq!(json["did"], "did:example:issuer");
    }
}
