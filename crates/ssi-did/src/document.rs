//! # DID Documents
//!
//! The W3C DID document, its verification methods and services, and the
//! in-place mutations the registry applies to it.
//!
//! ## Invariants
//!
//! Every mutation below preserves:
//!
//! - verification method ids are unique within the document;
//! - every id in a relationship array names an existing verification
//!   method, and appears at most once per array;
//! - service ids are unique;
//! - controllers are key-scoped DIDs.
//!
//! [`DidDocument::validate()`] re-checks all of them on a whole document,
//! which is how a full-replace update is admitted.
//!
//! ## Array order
//!
//! Removal swaps the last element into the removed slot. Callers must treat
//! relationship arrays as sets.

use serde::{Deserialize, Serialize};
use ssi_core::did::{is_valid_did_url, is_valid_rfc3986_uri};
use ssi_core::{version_id, AccountAddress, ChainConfig, Did, DidKind, Timestamp};
use ssi_crypto::PublicKey;

use crate::error::DidError;
use crate::material::{VerificationMaterial, COSMOS_ACCOUNT_ADDRESS};
use crate::relationship::VerificationRelationship;

/// Context every document carries.
pub const DEFAULT_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

// ---------------------------------------------------------------------------
// Document parts
// ---------------------------------------------------------------------------

/// A verification method: key or account material controlled by a DID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationMethod {
    /// DID URL identifying the method, usually `<did>#<fragment>`.
    pub id: String,
    /// The DID that controls the material.
    pub controller: Did,
    /// Method type, e.g. `Ed25519VerificationKey2018`.
    #[serde(rename = "type")]
    pub method_type: String,
    /// Key or account material.
    #[serde(flatten)]
    pub material: VerificationMaterial,
}

impl VerificationMethod {
    /// Build a verification method.
    pub fn new(
        id: impl Into<String>,
        controller: Did,
        method_type: impl Into<String>,
        material: VerificationMaterial,
    ) -> Self {
        Self {
            id: id.into(),
            controller,
            method_type: method_type.into(),
            material,
        }
    }

    /// Field-level validation: DID URL id, non-empty type, well-formed
    /// material.
    pub fn validate(&self) -> Result<(), DidError> {
        if !is_valid_did_url(&self.id) {
            return Err(DidError::InvalidDidUrlFormat(self.id.clone()));
        }
        if self.method_type.is_empty() {
            return Err(DidError::InvalidInput(format!(
                "verification method {} has an empty type",
                self.id
            )));
        }
        self.material.validate()
    }
}

/// A service endpoint published by a DID subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// RFC 3986 URI identifying the service.
    pub id: String,
    /// Service type.
    #[serde(rename = "type")]
    pub service_type: String,
    /// RFC 3986 URI of the endpoint.
    pub service_endpoint: String,
}

impl Service {
    /// Build a service.
    pub fn new(
        id: impl Into<String>,
        service_type: impl Into<String>,
        service_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            service_type: service_type.into(),
            service_endpoint: service_endpoint.into(),
        }
    }

    fn validate(&self) -> Result<(), DidError> {
        if !is_valid_rfc3986_uri(&self.id) {
            return Err(DidError::InvalidRfc3986UriFormat(self.id.clone()));
        }
        if !is_valid_rfc3986_uri(&self.service_endpoint) {
            return Err(DidError::InvalidRfc3986UriFormat(
                self.service_endpoint.clone(),
            ));
        }
        if self.service_type.is_empty() {
            return Err(DidError::InvalidInput(format!(
                "service {} has an empty type",
                self.id
            )));
        }
        Ok(())
    }
}

/// Input envelope: a verification method, the relationships to attach it
/// under, and extra JSON-LD contexts it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    /// The method to add.
    pub method: VerificationMethod,
    /// Relationships to grant. Must not be empty.
    pub relationships: Vec<VerificationRelationship>,
    /// Contexts merged into the document's `@context`.
    #[serde(default)]
    pub context: Vec<String>,
}

impl Verification {
    /// Build a verification envelope.
    pub fn new(
        method: VerificationMethod,
        relationships: Vec<VerificationRelationship>,
        context: Vec<String>,
    ) -> Self {
        Self {
            method,
            relationships,
            context,
        }
    }

    fn validate(&self) -> Result<(), DidError> {
        self.method.validate()?;
        if self.relationships.is_empty() {
            return Err(DidError::EmptyRelationships(self.method.id.clone()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DidDocument
// ---------------------------------------------------------------------------

/// A W3C DID document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    /// JSON-LD contexts, sorted and deduplicated.
    #[serde(rename = "@context", default)]
    pub context: Vec<String>,
    /// The DID subject.
    pub id: Did,
    /// Key-scoped DIDs allowed to act on this document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controller: Vec<Did>,
    /// Verification methods.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verification_method: Vec<VerificationMethod>,
    /// Services.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<Service>,
    /// Method ids usable for authentication.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<String>,
    /// Method ids usable for issuing assertions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertion_method: Vec<String>,
    /// Method ids usable for key agreement.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_agreement: Vec<String>,
    /// Method ids usable for capability invocation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capability_invocation: Vec<String>,
    /// Method ids usable for capability delegation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capability_delegation: Vec<String>,
}

impl DidDocument {
    /// An empty document for `id` carrying only the default context.
    pub fn empty(id: Did) -> Self {
        Self {
            context: vec![DEFAULT_CONTEXT.to_string()],
            id,
            controller: Vec::new(),
            verification_method: Vec::new(),
            service: Vec::new(),
            authentication: Vec::new(),
            assertion_method: Vec::new(),
            key_agreement: Vec::new(),
            capability_invocation: Vec::new(),
            capability_delegation: Vec::new(),
        }
    }

    /// Build a document from its parts, validating each as it is added.
    pub fn new(
        id: Did,
        controllers: Vec<Did>,
        verifications: Vec<Verification>,
        services: Vec<Service>,
        method: &str,
    ) -> Result<Self, DidError> {
        let mut doc = Self::empty(id);
        doc.add_controllers(controllers, method)?;
        doc.add_verifications(verifications)?;
        doc.add_services(services)?;
        Ok(doc)
    }

    /// The method with `id`, if present.
    pub fn verification_method(&self, id: &str) -> Option<&VerificationMethod> {
        self.verification_method.iter().find(|vm| vm.id == id)
    }

    /// Method ids listed under `relationship`.
    pub fn relationship_ids(&self, relationship: VerificationRelationship) -> &[String] {
        match relationship {
            VerificationRelationship::Authentication => &self.authentication,
            VerificationRelationship::AssertionMethod => &self.assertion_method,
            VerificationRelationship::KeyAgreement => &self.key_agreement,
            VerificationRelationship::CapabilityInvocation => &self.capability_invocation,
            VerificationRelationship::CapabilityDelegation => &self.capability_delegation,
        }
    }

    fn relationship_ids_mut(&mut self, relationship: VerificationRelationship) -> &mut Vec<String> {
        match relationship {
            VerificationRelationship::Authentication => &mut self.authentication,
            VerificationRelationship::AssertionMethod => &mut self.assertion_method,
            VerificationRelationship::KeyAgreement => &mut self.key_agreement,
            VerificationRelationship::CapabilityInvocation => &mut self.capability_invocation,
            VerificationRelationship::CapabilityDelegation => &mut self.capability_delegation,
        }
    }

    /// Relationships under which `method_id` is listed.
    pub fn relationships_of(&self, method_id: &str) -> Vec<VerificationRelationship> {
        VerificationRelationship::ALL
            .into_iter()
            .filter(|r| self.relationship_ids(*r).iter().any(|id| id == method_id))
            .collect()
    }

    // -- verification methods ------------------------------------------------

    /// Add verification methods with their relationships and contexts.
    ///
    /// Fails on the first invalid envelope or on a method id that already
    /// exists (in the document or earlier in the batch); in that case the
    /// document may be partially modified and must be discarded.
    pub fn add_verifications(&mut self, verifications: Vec<Verification>) -> Result<(), DidError> {
        for v in verifications {
            v.validate()?;
            if self.verification_method(&v.method.id).is_some() {
                return Err(DidError::InvalidInput(format!(
                    "duplicated verification method id {}",
                    v.method.id
                )));
            }
            for rel in &v.relationships {
                let ids = self.relationship_ids_mut(*rel);
                if !ids.contains(&v.method.id) {
                    ids.push(v.method.id.clone());
                }
            }
            self.merge_context(v.context);
            self.verification_method.push(v.method);
        }
        Ok(())
    }

    /// Remove a method and every relationship referencing it.
    pub fn revoke_verification(&mut self, method_id: &str) -> Result<(), DidError> {
        let index = self
            .verification_method
            .iter()
            .position(|vm| vm.id == method_id)
            .ok_or_else(|| DidError::VerificationMethodNotFound(method_id.to_string()))?;
        self.remove_from_relationships(method_id);
        self.verification_method.swap_remove(index);
        Ok(())
    }

    /// Replace the relationship set of an existing method.
    pub fn set_verification_relationships(
        &mut self,
        method_id: &str,
        relationships: &[VerificationRelationship],
    ) -> Result<(), DidError> {
        if !is_valid_did_url(method_id) {
            return Err(DidError::InvalidDidUrlFormat(method_id.to_string()));
        }
        if self.verification_method(method_id).is_none() {
            return Err(DidError::VerificationMethodNotFound(method_id.to_string()));
        }
        if relationships.is_empty() {
            return Err(DidError::EmptyRelationships(method_id.to_string()));
        }
        self.remove_from_relationships(method_id);
        for rel in relationships {
            let ids = self.relationship_ids_mut(*rel);
            if !ids.iter().any(|id| id == method_id) {
                ids.push(method_id.to_string());
            }
        }
        Ok(())
    }

    fn remove_from_relationships(&mut self, method_id: &str) {
        for rel in VerificationRelationship::ALL {
            let ids = self.relationship_ids_mut(rel);
            while let Some(i) = ids.iter().position(|id| id == method_id) {
                ids.swap_remove(i);
            }
        }
    }

    fn merge_context(&mut self, contexts: Vec<String>) {
        self.context.extend(contexts);
        self.context.sort();
        self.context.dedup();
    }

    // -- services ------------------------------------------------------------

    /// Add services. Ids must be unique.
    pub fn add_services(&mut self, services: Vec<Service>) -> Result<(), DidError> {
        for s in services {
            s.validate()?;
            if self.service.iter().any(|existing| existing.id == s.id) {
                return Err(DidError::InvalidInput(format!(
                    "duplicated service id {}",
                    s.id
                )));
            }
            self.service.push(s);
        }
        Ok(())
    }

    /// Remove the service with `service_id`. A document without services
    /// is in the wrong state for this; an unknown id is a no-op.
    pub fn delete_service(&mut self, service_id: &str) -> Result<(), DidError> {
        if self.service.is_empty() {
            return Err(DidError::InvalidState(format!(
                "{} has no services",
                self.id
            )));
        }
        if let Some(i) = self.service.iter().position(|s| s.id == service_id) {
            self.service.swap_remove(i);
        }
        Ok(())
    }

    // -- controllers ---------------------------------------------------------

    /// Add controllers, skipping ones already present. Each must be a
    /// key-scoped DID of `method`; it is stored with a lowercase address.
    pub fn add_controllers(&mut self, controllers: Vec<Did>, method: &str) -> Result<(), DidError> {
        for c in controllers {
            let c = canonical_controller(&c, method)?;
            if !self.controller.contains(&c) {
                self.controller.push(c);
            }
        }
        Ok(())
    }

    /// Remove the listed controllers, matching key DIDs by address.
    pub fn delete_controllers(&mut self, controllers: &[Did], method: &str) {
        let targets: Vec<Did> = controllers
            .iter()
            .map(|c| canonical_controller(c, method).unwrap_or_else(|_| c.clone()))
            .collect();
        self.controller.retain(|c| !targets.contains(c));
    }

    /// Rebuild the controller list in canonical form, dropping duplicates.
    pub fn normalize_controllers(&mut self, method: &str) -> Result<(), DidError> {
        let controllers = std::mem::take(&mut self.controller);
        self.add_controllers(controllers, method)
    }

    // -- queries -------------------------------------------------------------

    /// Returns true if `did` is listed as a controller.
    pub fn has_controller(&self, did: &Did) -> bool {
        self.controller.contains(did)
    }

    /// Returns true if some method whose material resolves to `address` is
    /// listed under at least one of `relationships`.
    pub fn has_relationship(
        &self,
        address: &AccountAddress,
        relationships: &[VerificationRelationship],
    ) -> bool {
        self.verification_method.iter().any(|vm| {
            vm.material.address().is_ok_and(|a| a == *address)
                && relationships
                    .iter()
                    .any(|r| self.relationship_ids(*r).contains(&vm.id))
        })
    }

    /// Signer authorization: a method of the signer's account holds one of
    /// `relationships`, or the signer's key DID controls the document.
    pub fn authorizes(
        &self,
        signer: &AccountAddress,
        relationships: &[VerificationRelationship],
        method: &str,
    ) -> bool {
        if self.has_relationship(signer, relationships) {
            return true;
        }
        Did::key(method, signer).is_ok_and(|key_did| self.has_controller(&key_did))
    }

    /// Returns true if some method's material is `key` or names its account.
    pub fn has_public_key(&self, key: &PublicKey) -> bool {
        self.verification_method
            .iter()
            .any(|vm| vm.material.has_public_key(key))
    }

    /// Whole-document validation.
    pub fn validate(&self, method: &str) -> Result<(), DidError> {
        if !self.context.iter().any(|c| c == DEFAULT_CONTEXT) {
            return Err(DidError::InvalidInput(format!(
                "{} is missing the default context",
                self.id
            )));
        }
        for (i, c) in self.controller.iter().enumerate() {
            if canonical_controller(c, method)? != *c {
                return Err(DidError::InvalidInput(format!(
                    "controller {c} is not in canonical form"
                )));
            }
            if self.controller[..i].contains(c) {
                return Err(DidError::InvalidInput(format!("duplicated controller {c}")));
            }
        }
        for (i, vm) in self.verification_method.iter().enumerate() {
            vm.validate()?;
            if self.verification_method[..i].iter().any(|o| o.id == vm.id) {
                return Err(DidError::InvalidInput(format!(
                    "duplicated verification method id {}",
                    vm.id
                )));
            }
        }
        for rel in VerificationRelationship::ALL {
            let ids = self.relationship_ids(rel);
            for (i, id) in ids.iter().enumerate() {
                if self.verification_method(id).is_none() {
                    return Err(DidError::VerificationMethodNotFound(format!(
                        "{id} listed under {rel}"
                    )));
                }
                if ids[..i].contains(id) {
                    return Err(DidError::InvalidInput(format!(
                        "{id} listed twice under {rel}"
                    )));
                }
            }
        }
        for (i, s) in self.service.iter().enumerate() {
            s.validate()?;
            if self.service[..i].iter().any(|o| o.id == s.id) {
                return Err(DidError::InvalidInput(format!(
                    "duplicated service id {}",
                    s.id
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Resolution metadata stored next to each document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidMetadata {
    /// Hex SHA-256 of the transaction that produced this version.
    pub version_id: String,
    /// Creation time.
    pub created: Timestamp,
    /// Last update time.
    pub updated: Timestamp,
    /// Whether the document is deactivated.
    #[serde(default)]
    pub deactivated: bool,
}

impl DidMetadata {
    /// Fresh metadata for a newly created document.
    pub fn new(version_id: String, created: Timestamp) -> Self {
        Self {
            version_id,
            created,
            updated: created,
            deactivated: false,
        }
    }

    /// Record a new version.
    pub fn touch(&mut self, version_id: String, updated: Timestamp) {
        self.version_id = version_id;
        self.updated = updated;
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

/// `did:<method>:key:<address>` with the address in its lowercase form.
fn canonical_controller(did: &Did, method: &str) -> Result<Did, DidError> {
    match did.kind(method) {
        DidKind::Key(address) => Ok(Did::key(method, &address)?),
        DidKind::Stored => Err(DidError::InvalidInput(format!(
            "controller {did} is not a key DID of method {method:?}"
        ))),
    }
}

/// `did:<method>:net:<chain-id>:<id>` under `chain`.
pub fn new_chain_did(chain: &ChainConfig, id: &str) -> Result<Did, DidError> {
    Ok(Did::network(&chain.did_method, &chain.chain_id, id)?)
}

/// `did:<method>:key:<address>` under `chain`.
pub fn new_key_did(chain: &ChainConfig, address: &AccountAddress) -> Result<Did, DidError> {
    Ok(Did::key(&chain.did_method, address)?)
}

/// `<did>#<fragment>`
pub fn new_verification_method_id(did: &Did, fragment: &str) -> String {
    did.with_fragment(fragment)
}

/// A verification granting `relationships` to the ledger account
/// `address`, identified as `<did>#<address>`.
pub fn new_account_verification(
    chain: &ChainConfig,
    did: &Did,
    address: &AccountAddress,
    relationships: Vec<VerificationRelationship>,
) -> Verification {
    let method = VerificationMethod::new(
        new_verification_method_id(did, address.as_str()),
        did.clone(),
        COSMOS_ACCOUNT_ADDRESS,
        VerificationMaterial::blockchain_account_id(&chain.caip_namespace, &chain.chain_id, address),
    );
    Verification::new(method, relationships, Vec::new())
}

/// Synthesize the document of a key-scoped DID.
///
/// Pure function of its inputs: one account verification method granted
/// every relationship, controlled by the DID itself. The version id hashes
/// the address and both metadata dates are the Unix epoch, so every node
/// resolves the same bytes.
pub fn resolve_key_did(
    chain: &ChainConfig,
    did: &Did,
    address: &AccountAddress,
) -> (DidDocument, DidMetadata) {
    let mut doc = DidDocument::empty(did.clone());
    let verification = new_account_verification(
        chain,
        did,
        address,
        VerificationRelationship::ALL.to_vec(),
    );
    for rel in VerificationRelationship::ALL {
        doc.relationship_ids_mut(rel).push(verification.method.id.clone());
    }
    doc.verification_method.push(verification.method);
    let metadata = DidMetadata::new(version_id(address.as_str().as_bytes()), Timestamp::unix_epoch());
    (doc, metadata)
}
