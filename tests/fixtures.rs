use std::sync::Arc;

use serde_json::{json, Value as Json};
use wallet_pex::{
    core::{
        credential::{Credential, JwtCredential},
        did::MemoryResolver,
        jwt::encode_signed,
        keys::Secp256k1PrivateKey,
    },
    verifier::{submission::VerificationMode, Verifier},
};
use ssi::{dids::Document, JWK};

pub const ISSUER_DID: &str = "did:example:issuer";
pub const HOLDER_DID: &str = "did:example:holder";
pub const DOMAIN: &str = "verifier.example.com";
pub const CHALLENGE: &str = "n-0S6_WzA2Mj";

pub struct TestIssuer {
    pub did: String,
    pub key: Secp256k1PrivateKey,
}

impl TestIssuer {
    pub fn new() -> Self {
        Self {
            did: ISSUER_DID.into(),
            key: Secp256k1PrivateKey::random(),
        }
    }

    /// A DID document authenticating with the issuer key and any `extra` keys.
    pub fn document(&self, extra: &[JWK]) -> Document {
        let keys = extra
            .iter()
            .cloned()
            .chain(std::iter::once(self.key.public_jwk()));
        let methods: Vec<Json> = keys
            .enumerate()
            .map(|(i, jwk)| {
                json!({
                    "id": format!("{}#key-{i}", self.did),
                    "type": "JsonWebKey2020",
                    "controller": self.did,
                    "publicKeyJwk": jwk
                })
            })
            .collect();
        let authentication: Vec<Json> = methods.iter().map(|m| m["id"].clone()).collect();

        serde_json::from_value(json!({
            "@context": ["https://www.w3.org/ns/did/v1"],
            "id": self.did,
            "verificationMethod": methods,
            "authentication": authentication
        }))
        .unwrap()
    }

    /// Issue a JWT credential to the holder with the given subject claims.
    pub fn issue(&self, subject: Json) -> Credential {
        self.issue_with(json!({
            "iss": self.did,
            "sub": HOLDER_DID,
            "vc": {
                "@context": ["https://www.w3.org/2018/credentials/v1"],
                "type": ["VerifiableCredential"],
                "credentialSubject": subject
            }
        }))
    }

    pub fn issue_with(&self, claims: Json) -> Credential {
        let Json::Object(claims) = claims else {
            panic!("credential claims must be an object")
        };
        let jwt = encode_signed(&claims, &self.key).unwrap();
        JwtCredential::parse(jwt).unwrap().into()
    }
}

pub async fn resolver(documents: Vec<Document>) -> Arc<MemoryResolver> {
    let resolver = MemoryResolver::new();
    for document in documents {
        resolver.insert(document).await;
    }
    Arc::new(resolver)
}

pub async fn verifier(issuer: &TestIssuer, mode: VerificationMode) -> Verifier {
    Verifier::builder()
        .with_resolver(resolver(vec![issuer.document(&[])]).await)
        .with_verification_mode(mode)
        .build()
        .unwrap()
}
