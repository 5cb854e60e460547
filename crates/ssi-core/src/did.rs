//! # Identifiers — DIDs and Account Addresses
//!
//! Grammar validation for decentralized identifiers, DID URLs and RFC 3986
//! URIs, plus the two identifier newtypes the rest of the workspace passes
//! around.
//!
//! ## DID forms
//!
//! - **network-scoped**: `did:<method>:net:<chain-id>:<id>`, stored on chain.
//! - **key-scoped**: `did:<method>:key:<account-address>`, self-certifying.
//!   Its document is synthesized from the address and never stored.
//! - any other DID passing the W3C grammar (e.g. `did:example:issuer`) is a
//!   stored DID as well.
//!
//! The grammar regexes are derived from the W3C DID Core ABNF.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

static DID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^did\:[a-z0-9]+\:(([A-Z.a-z0-9]|\-|_|%[0-9A-Fa-f][0-9A-Fa-f])*\:)*([A-Z.a-z0-9]|\-|_|%[0-9A-Fa-f][0-9A-Fa-f])+$"#,
    )
    .expect("should compile")
});

static DID_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^did\:[a-z0-9]+\:(([A-Z.a-z0-9]|\-|_|%[0-9A-Fa-f][0-9A-Fa-f])*\:)*([A-Z.a-z0-9]|\-|_|%[0-9A-Fa-f][0-9A-Fa-f])+(/(([-A-Z._a-z0-9]|~)|%[0-9A-Fa-f][0-9A-Fa-f]|(\!|\$|&|'|\(|\)|\*|\+|,|;|\=)|\:|@)*)*(\?(((([-A-Z._a-z0-9]|~)|%[0-9A-Fa-f][0-9A-Fa-f]|(\!|\$|&|'|\(|\)|\*|\+|,|;|\=)|\:|@)|/|\?)*))?(#(((([-A-Z._a-z0-9]|~)|%[0-9A-Fa-f][0-9A-Fa-f]|(\!|\$|&|'|\(|\)|\*|\+|,|;|\=)|\:|@)|/|\?)*))?$"#,
    )
    .expect("should compile")
});

static RFC3986_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(([^:/?#]+):)?(//([^/?#]*))?([^?#]*)(\?([^#]*))?(#(.*))?$"#)
        .expect("should compile")
});

/// Segment that marks a network-scoped DID.
pub const NETWORK_SEGMENT: &str = "net";
/// Segment that marks a key-scoped DID.
pub const KEY_SEGMENT: &str = "key";

/// Returns true if `input` satisfies the DID grammar.
pub fn is_valid_did(input: &str) -> bool {
    DID_REGEX.is_match(input)
}

/// Returns true if `input` satisfies the DID URL grammar (path, query and
/// fragment allowed).
pub fn is_valid_did_url(input: &str) -> bool {
    DID_URL_REGEX.is_match(input)
}

/// Returns true if `input` is a non-empty RFC 3986 URI reference.
pub fn is_valid_rfc3986_uri(input: &str) -> bool {
    !input.is_empty() && RFC3986_REGEX.is_match(input)
}

// ---------------------------------------------------------------------------
// Did
// ---------------------------------------------------------------------------

/// A grammar-validated decentralized identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did(String);

/// Which resolution branch a DID takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DidKind {
    /// Self-certifying DID; the document is a pure function of the address.
    Key(AccountAddress),
    /// DID whose document lives in the store.
    Stored,
}

impl Did {
    /// Validate and wrap a DID string.
    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if !is_valid_did(&s) {
            return Err(CoreError::InvalidDid(s));
        }
        Ok(Self(s))
    }

    /// `did:<method>:net:<chain-id>:<id>`
    pub fn network(method: &str, chain_id: &str, id: &str) -> Result<Self, CoreError> {
        Self::new(format!("did:{method}:{NETWORK_SEGMENT}:{chain_id}:{id}"))
    }

    /// `did:<method>:key:<address>`
    pub fn key(method: &str, address: &AccountAddress) -> Result<Self, CoreError> {
        Self::new(format!("did:{method}:{KEY_SEGMENT}:{address}"))
    }

    /// The method name (second colon-separated segment).
    pub fn method(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or_default()
    }

    /// Decide the resolution branch for this DID under `method`.
    ///
    /// A DID is key-scoped iff it reads `did:<method>:key:<address>` and the
    /// trailing segment is a valid account address.
    pub fn kind(&self, method: &str) -> DidKind {
        let prefix = format!("did:{method}:{KEY_SEGMENT}:");
        match self.0.strip_prefix(&prefix) {
            Some(rest) => match AccountAddress::new(rest) {
                Ok(address) => DidKind::Key(address),
                Err(_) => DidKind::Stored,
            },
            None => DidKind::Stored,
        }
    }

    /// Build a DID URL `<did>#<fragment>` naming a verification method or
    /// service of this DID.
    pub fn with_fragment(&self, fragment: &str) -> String {
        format!("{}#{fragment}", self.0)
    }

    /// Access the DID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Did {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.0
    }
}

impl std::str::FromStr for Did {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// AccountAddress
// ---------------------------------------------------------------------------

/// Length in bytes of an account address.
pub const ADDRESS_LEN: usize = 20;

/// A ledger account address: 20 bytes rendered as 40 lowercase hex chars.
///
/// Addresses are derived from public keys by `ssi-crypto`; this type only
/// enforces the format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Validate and wrap an address string. Upper-case hex is normalized.
    pub fn new(s: impl AsRef<str>) -> Result<Self, CoreError> {
        let s = s.as_ref();
        if s.len() != ADDRESS_LEN * 2 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidAddress(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// From the raw 20 address bytes.
    pub fn from_bytes(bytes: &[u8; ADDRESS_LEN]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Access the address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AccountAddress> for String {
    fn from(address: AccountAddress) -> Self {
        address.0
    }
}

impl std::str::FromStr for AccountAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ADDR: &str = "00112233445566778899aabbccddeeff00112233";

    #[test]
    fn test_valid_dids() {
        for did in [
            "did:example:issuer",
            "did:cosmos:net:cosmoshub:alice",
            "did:cosmos:key:00112233445566778899aabbccddeeff00112233",
            "did:web:example.com%3A8080",
            "did:a:b:c:d",
        ] {
            assert!(is_valid_did(did), "{did} should be valid");
        }
    }

    #[test]
    fn test_invalid_dids() {
        for did in [
            "",
            "did",
            "did:",
            "did:example",
            "did:example:",
            "did:EXAMPLE:issuer",
            "dxd:example:issuer",
            "did:example:issuer#key-1",
            "did:example:iss uer",
            "did:example:%zz",
        ] {
            assert!(!is_valid_did(did), "{did} should be invalid");
        }
    }

    #[test]
    fn test_did_urls() {
        assert!(is_valid_did_url("did:example:issuer#key-1"));
        assert!(is_valid_did_url("did:example:issuer/path?query=1#frag"));
        assert!(is_valid_did_url("did:example:issuer"));
        assert!(!is_valid_did_url("did:example:issuer#key 1"));
        assert!(!is_valid_did_url("key-1"));
    }

    #[test]
    fn test_rfc3986() {
        assert!(is_valid_rfc3986_uri("https://agent.example.com/8377464"));
        assert!(is_valid_rfc3986_uri("did:example:issuer#agent"));
        assert!(!is_valid_rfc3986_uri(""));
    }

    #[test]
    fn test_did_constructors() {
        let net = Did::network("cosmos", "cosmoshub", "alice").unwrap();
        assert_eq!(net.as_str(), "did:cosmos:net:cosmoshub:alice");
        assert_eq!(net.method(), "cosmos");
        assert_eq!(net.kind("cosmos"), DidKind::Stored);

        let addr = AccountAddress::new(ADDR).unwrap();
        let key = Did::key("cosmos", &addr).unwrap();
        assert_eq!(key.as_str(), format!("did:cosmos:key:{ADDR}"));
        assert_eq!(key.kind("cosmos"), DidKind::Key(addr));
        assert_eq!(key.with_fragment(ADDR), format!("did:cosmos:key:{ADDR}#{ADDR}"));
    }

    #[test]
    fn test_key_segment_with_bad_address_is_stored() {
        let did = Did::new("did:cosmos:key:not-an-address").unwrap();
        assert_eq!(did.kind("cosmos"), DidKind::Stored);
        let other_method = Did::new(format!("did:other:key:{ADDR}")).unwrap();
        assert_eq!(other_method.kind("cosmos"), DidKind::Stored);
    }

    #[test]
    fn test_did_serde_validates() {
        let ok: Did = serde_json::from_str("\"did:example:alice\"").unwrap();
        assert_eq!(ok.as_str(), "did:example:alice");
        assert!(serde_json::from_str::<Did>("\"not a did\"").is_err());
    }

    #[test]
    fn test_address_normalizes_case() {
        let upper = AccountAddress::new(ADDR.to_uppercase()).unwrap();
        assert_eq!(upper.as_str(), ADDR);
        assert!(AccountAddress::new("0011").is_err());
        assert!(AccountAddress::new("zz112233445566778899aabbccddeeff00112233").is_err());
    }

    proptest! {
        #[test]
        fn prop_method_and_id_segments_are_valid(
            method in "[a-z0-9]{1,10}",
            id in "[A-Za-z0-9._-]{1,32}",
        ) {
            let did = format!("did:{method}:{id}");
            prop_assert!(is_valid_did(&did));
            let url = format!("{did}#key-1");
            prop_assert!(is_valid_did_url(&url));
        }

        #[test]
        fn prop_whitespace_never_valid(
            id in "[a-z]{1,8}",
            ws in prop::sample::select(vec![' ', '\t', '\n']),
        ) {
            let did = format!("did:example:{id}{ws}{id}");
            prop_assert!(!is_valid_did(&did));
        }

        #[test]
        fn prop_every_valid_did_is_a_valid_did_url(s in "did:[a-z]{1,5}(:[a-z0-9]{1,5}){1,3}") {
            if is_valid_did(&s) {
                prop_assert!(is_valid_did_url(&s));
            }
        }
    }
}
