//! # Verification Relationships
//!
//! The five W3C DID Core verification relationships as a closed enum. The
//! string forms appear only at the serde boundary.

use serde::{Deserialize, Serialize};

use crate::error::DidError;

/// A verification relationship between a DID subject and a verification
/// method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerificationRelationship {
    /// `authentication`
    Authentication,
    /// `assertionMethod`
    AssertionMethod,
    /// `keyAgreement`
    KeyAgreement,
    /// `capabilityInvocation`
    CapabilityInvocation,
    /// `capabilityDelegation`
    CapabilityDelegation,
}

impl VerificationRelationship {
    /// Every relationship, in document field order.
    pub const ALL: [Self; 5] = [
        Self::Authentication,
        Self::AssertionMethod,
        Self::KeyAgreement,
        Self::CapabilityInvocation,
        Self::CapabilityDelegation,
    ];

    /// The document field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::AssertionMethod => "assertionMethod",
            Self::KeyAgreement => "keyAgreement",
            Self::CapabilityInvocation => "capabilityInvocation",
            Self::CapabilityDelegation => "capabilityDelegation",
        }
    }
}

impl std::fmt::Display for VerificationRelationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VerificationRelationship {
    type Err = DidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| DidError::InvalidInput(format!("unknown verification relationship {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names_match_field_names() {
        for rel in VerificationRelationship::ALL {
            let json = serde_json::to_value(rel).unwrap();
            assert_eq!(json, serde_json::Value::String(rel.as_str().to_string()));
            assert_eq!(rel.as_str().parse::<VerificationRelationship>().unwrap(), rel);
        }
    }

    #[test]
    fn test_unknown_relationship_rejected() {
        assert!(matches!(
            "publicKey".parse::<VerificationRelationship>(),
            Err(DidError::InvalidInput(_))
        ));
        assert!(serde_json::from_str::<VerificationRelationship>("\"Authentication\"").is_err());
    }
}
