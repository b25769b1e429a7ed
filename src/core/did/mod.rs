//! DID Document lookups and the resolution seam used to find verification keys.

pub mod universal;

use std::{collections::HashMap, fmt::Debug};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use ssi::{
    dids::{
        document::{verification_method::ValueOrReference, DIDVerificationMethod},
        Document,
    },
    JWK,
};
use tokio::sync::RwLock;

use super::{error::PresentationError, keys::PublicKey};

const PUBLIC_KEY_JWK: &str = "publicKeyJwk";

/// Resolves a DID to its current DID Document.
///
/// A failure to resolve is an error, never an empty document.
#[async_trait]
pub trait DidResolver: Debug {
    async fn resolve_did(&self, did: &str) -> Result<Document>;
}

/// The verification relationships of a DID Document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoreProperty {
    Authentication,
    AssertionMethod,
    KeyAgreement,
    CapabilityInvocation,
    CapabilityDelegation,
}

/// Methods bound to `property`, with references resolved against `verificationMethod`.
///
/// References that point nowhere are dropped.
pub fn core_property(document: &Document, property: CoreProperty) -> Vec<&DIDVerificationMethod> {
    let relationships = &document.verification_relationships;
    let entries = match property {
        CoreProperty::Authentication => &relationships.authentication,
        CoreProperty::AssertionMethod => &relationships.assertion_method,
        CoreProperty::KeyAgreement => &relationships.key_agreement,
        CoreProperty::CapabilityInvocation => &relationships.capability_invocation,
        CoreProperty::CapabilityDelegation => &relationships.capability_delegation,
    };

    entries
        .iter()
        .filter_map(|entry| match entry {
            ValueOrReference::Value(method) => Some(method),
            ValueOrReference::Reference(reference) => {
                let id = reference.resolve(&document.id);
                document
                    .verification_method
                    .iter()
                    .find(|method| method.id.as_str() == id.as_str())
            }
        })
        .collect()
}

/// Public keys of the given methods, read from their `publicKeyJwk`.
///
/// Methods without a JWK are skipped.
pub fn public_keys_from_core_property(
    methods: &[&DIDVerificationMethod],
) -> Result<Vec<PublicKey>, PresentationError> {
    methods
        .iter()
        .filter_map(|method| Some((method, method.properties.get(PUBLIC_KEY_JWK)?)))
        .map(|(method, jwk)| {
            let jwk: JWK = serde_json::from_value(jwk.clone())
                .with_context(|| format!("{} has an invalid publicKeyJwk", method.id))?;
            Ok::<_, PresentationError>(PublicKey::from(jwk))
        })
        .collect()
}

/// Resolves DIDs from documents registered in memory.
#[derive(Debug, Default)]
pub struct MemoryResolver {
    documents: RwLock<HashMap<String, Document>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `document` under its own id, replacing any previous version.
    pub async fn insert(&self, document: Document) {
        self.documents
            .write()
            .await
            .insert(document.id.as_str().to_owned(), document);
    }
}

#[async_trait]
impl DidResolver for MemoryResolver {
    async fn resolve_did(&self, did: &str) -> Result<Document> {
        match self.documents.read().await.get(did) {
            Some(document) => Ok(document.clone()),
            None => bail!("DID {did} is not resolvable"),
        }
    }
}
