//! # Verifiable Credential structure, signing, and verification
//!
//! Defines [`VerifiableCredential`] following the W3C VC data model with a
//! closed set of credential subjects: registration, user, and anonymous
//! credential schema.
//!
//! ## Security Invariants
//!
//! - **Signing** canonicalizes the credential body (with `proof` removed)
//!   via [`CanonicalBytes::new()`], signs it with the account key's native
//!   scheme, and attaches a [`Proof`].
//!
//! - **Verification** recomputes the same canonical bytes and verifies the
//!   proof signature against a caller-supplied public key. Which key is the
//!   right one is the registry's decision, not this module's.

use serde::{Deserialize, Serialize};
use ssi_core::{CanonicalBytes, Did, Timestamp};
use ssi_crypto::{AccountKeyPair, AccumulatorState, PublicKey, PublicParameters};

use crate::error::VcError;
use crate::proof::Proof;

/// Base credential type every credential carries.
pub const VERIFIABLE_CREDENTIAL: &str = "VerifiableCredential";
/// Type of credentials with a [`UserSubject`].
pub const USER_CREDENTIAL: &str = "UserCredential";
/// Type of credentials with a [`RegistrationSubject`].
pub const REGISTRATION_CREDENTIAL: &str = "RegistrationCredential";
/// Type of credentials with an [`AnonymousCredentialSchemaSubject`].
pub const ANONYMOUS_CREDENTIAL_SCHEMA: &str = "AnonymousCredentialSchema";
/// Context of newly built credentials.
pub const VC_CONTEXT: &str = "https://www.w3.org/TR/vc-data-model/";

// ---------------------------------------------------------------------------
// Subjects
// ---------------------------------------------------------------------------

/// A user's verified identity root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSubject {
    /// Holder DID.
    pub id: Did,
    /// Identity root, e.g. a commitment over the user's attributes.
    pub root: String,
    /// Whether the issuer verified the user.
    pub is_verified: bool,
}

/// Postal address of a registered legal entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Country code.
    pub country: String,
}

/// A name of a legal person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    /// Name kind, e.g. `SN` (short) or `LN` (legal).
    #[serde(rename = "type")]
    pub name_type: String,
    /// The name.
    pub name: String,
}

/// A legal person and its names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalPerson {
    /// Names.
    pub names: Vec<Name>,
}

/// An external registry identifier, e.g. an LEI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationId {
    /// Identifier value.
    pub id: String,
    /// Identifier scheme, e.g. `LEIX`.
    #[serde(rename = "type")]
    pub id_type: String,
}

/// A business registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSubject {
    /// Holder DID.
    pub id: Did,
    /// Registered address.
    pub address: Address,
    /// Legal persons.
    pub legal_persons: Vec<LegalPerson>,
    /// External identifiers.
    pub ids: Vec<RegistrationId>,
}

impl RegistrationSubject {
    /// A registration with a short and a legal name.
    pub fn new(id: Did, country: &str, short_name: &str, legal_name: &str, ids: Vec<RegistrationId>) -> Self {
        Self {
            id,
            address: Address {
                country: country.to_string(),
            },
            legal_persons: vec![LegalPerson {
                names: vec![
                    Name {
                        name_type: "SN".to_string(),
                        name: short_name.to_string(),
                    },
                    Name {
                        name_type: "LN".to_string(),
                        name: legal_name.to_string(),
                    },
                ],
            }],
            ids,
        }
    }
}

/// Published parameters of an anonymous credential scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousCredentialSchemaSubject {
    /// Schema DID.
    pub id: Did,
    /// Schema types.
    #[serde(rename = "type")]
    pub schema_type: Vec<String>,
    /// Schema contexts.
    pub context: Vec<String>,
    /// Curve, signature parameters and accumulator state history.
    pub public_params: PublicParameters,
}

/// The closed set of credential subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CredentialSubject {
    /// Business registration.
    RegistrationCred(RegistrationSubject),
    /// User identity.
    UserCred(UserSubject),
    /// Anonymous credential schema.
    AnonCredSchema(AnonymousCredentialSchemaSubject),
}

impl CredentialSubject {
    /// The holder DID.
    pub fn id(&self) -> &Did {
        match self {
            Self::RegistrationCred(s) => &s.id,
            Self::UserCred(s) => &s.id,
            Self::AnonCredSchema(s) => &s.id,
        }
    }

    /// Credential type this subject belongs to.
    pub fn credential_type(&self) -> &'static str {
        match self {
            Self::RegistrationCred(_) => REGISTRATION_CREDENTIAL,
            Self::UserCred(_) => USER_CREDENTIAL,
            Self::AnonCredSchema(_) => ANONYMOUS_CREDENTIAL_SCHEMA,
        }
    }
}

// ---------------------------------------------------------------------------
// VerifiableCredential
// ---------------------------------------------------------------------------

/// A W3C verifiable credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    /// JSON-LD contexts.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Credential id; the store key.
    pub id: String,

    /// Credential types.
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,

    /// Issuer DID.
    pub issuer: Did,

    /// Issuance time.
    pub issuance_date: Timestamp,

    /// The credential subject.
    pub credential_subject: CredentialSubject,

    /// Issuer proof.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl VerifiableCredential {
    /// Unsigned credential for `subject`, typed after the subject variant.
    pub fn new(
        id: impl Into<String>,
        issuer: Did,
        issuance_date: Timestamp,
        subject: CredentialSubject,
    ) -> Self {
        Self {
            context: vec![VC_CONTEXT.to_string()],
            id: id.into(),
            credential_type: vec![
                VERIFIABLE_CREDENTIAL.to_string(),
                subject.credential_type().to_string(),
            ],
            issuer,
            issuance_date,
            credential_subject: subject,
            proof: None,
        }
    }

    /// The holder DID.
    pub fn subject_did(&self) -> &Did {
        self.credential_subject.id()
    }

    /// Returns true if `credential_type` lists `vc_type`.
    pub fn has_type(&self, vc_type: &str) -> bool {
        self.credential_type.iter().any(|t| t == vc_type)
    }

    /// Compute the canonical signing input: the credential with `proof`
    /// removed, JCS-canonicalized.
    pub fn signing_input(&self) -> Result<CanonicalBytes, VcError> {
        let mut val = serde_json::to_value(self)?;
        if let Some(obj) = val.as_object_mut() {
            obj.remove("proof");
        }
        Ok(CanonicalBytes::new(&val)?)
    }

    /// Sign with `key_pair` as `verification_method` and attach the proof,
    /// replacing any previous one.
    pub fn sign(
        &mut self,
        key_pair: &AccountKeyPair,
        verification_method: impl Into<String>,
        created: Timestamp,
    ) -> Result<(), VcError> {
        let canonical = self.signing_input()?;
        let signature = key_pair.sign(&canonical);
        self.proof = Some(Proof::new(
            key_pair.public_key().key_type(),
            created,
            verification_method,
            &signature,
        ));
        Ok(())
    }

    /// Verify the proof signature against `public_key`.
    pub fn validate(&self, public_key: &PublicKey) -> Result<(), VcError> {
        let proof = self
            .proof
            .as_ref()
            .ok_or_else(|| VcError::MissingProof(self.id.clone()))?;
        let signature = hex::decode(&proof.signature)
            .map_err(|e| VcError::InvalidProofValue(format!("signature is not hex: {e}")))?;
        let canonical = self.signing_input()?;
        public_key
            .verify(&canonical, &signature)
            .map_err(|e| VcError::VerificationFailed(e.to_string()))
    }

    /// Check that `next` may replace this credential: the subject variant is
    /// kept and, for a schema, the keys are unchanged and the accumulator
    /// history only grows.
    pub fn check_successor(&self, next: &VerifiableCredential) -> Result<(), VcError> {
        let expected = self.credential_subject.credential_type();
        if next.credential_subject.credential_type() != expected {
            return Err(VcError::WrongSubtype {
                id: next.id.clone(),
                expected,
            });
        }
        if let (CredentialSubject::AnonCredSchema(old), CredentialSubject::AnonCredSchema(new)) =
            (&self.credential_subject, &next.credential_subject)
        {
            let (old, new) = (&old.public_params, &new.public_params);
            if old.curve != new.curve
                || old.bbs_plus_params != new.bbs_plus_params
                || old.accumulator_params.public_key != new.accumulator_params.public_key
            {
                return Err(VcError::InvalidState(format!(
                    "schema {} cannot change its public keys",
                    self.id
                )));
            }
            if !new.accumulator_params.states.starts_with(&old.accumulator_params.states) {
                return Err(VcError::InvalidState(format!(
                    "schema {} cannot rewrite its accumulator history",
                    self.id
                )));
            }
        }
        Ok(())
    }

    /// Append an accumulator state to an anonymous credential schema.
    pub fn push_accumulator_state(&mut self, state: AccumulatorState) -> Result<(), VcError> {
        match &mut self.credential_subject {
            CredentialSubject::AnonCredSchema(schema) => {
                schema.public_params.accumulator_params.states.push(state);
                Ok(())
            }
            _ => Err(VcError::WrongSubtype {
                id: self.id.clone(),
                expected: ANONYMOUS_CREDENTIAL_SCHEMA,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Metadata stored next to each credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcMetadata {
    /// Hex SHA-256 of the transaction that produced this version.
    pub version_id: String,
    /// Issuance transaction time.
    pub created: Timestamp,
    /// Last update time.
    pub updated: Timestamp,
    /// Set by revocation. The credential value is kept.
    #[serde(default)]
    pub deactivated: bool,
}

impl VcMetadata {
    /// Metadata for a freshly issued credential.
    pub fn new(version_id: String, created: Timestamp) -> Self {
        Self {
            version_id,
            created,
            updated: created,
            deactivated: false,
        }
    }

    /// Record a new version.
    pub fn update(&mut self, version_id: String, updated: Timestamp, deactivated: bool) {
        self.version_id = version_id;
        self.updated = updated;
        self.deactivated = deactivated;
    }
}
