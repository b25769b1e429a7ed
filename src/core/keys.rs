use std::{borrow::Cow, fmt};

use anyhow::{Context, Result};
use ssi::{
    claims::jws,
    jwk::{Algorithm, Base64urlUInt, ECParams, Params},
    JWK,
};

use super::error::PresentationError;

const CURVE_SECP256K1: &str = "secp256k1";
const CURVE_ED25519: &str = "Ed25519";
const CURVE_X25519: &str = "X25519";

/// Elliptic curve of a key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Curve {
    Secp256k1,
    Ed25519,
    X25519,
    /// Any curve this crate does not model, e.g. `P-256`.
    Other(String),
}

impl Curve {
    pub fn from_name(name: Cow<str>) -> Self {
        match name.as_ref() {
            CURVE_SECP256K1 => Self::Secp256k1,
            CURVE_ED25519 => Self::Ed25519,
            CURVE_X25519 => Self::X25519,
            _ => Self::Other(name.into_owned()),
        }
    }

    /// The curve named by the `crv` parameter of `jwk`.
    pub fn of(jwk: &JWK) -> Self {
        match &jwk.params {
            Params::EC(ec) => Self::from_name(Cow::Borrowed(ec.curve.as_deref().unwrap_or_default())),
            Params::OKP(okp) => Self::from_name(Cow::Borrowed(&okp.curve)),
            _ => Self::Other(String::new()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Secp256k1 => CURVE_SECP256K1,
            Self::Ed25519 => CURVE_ED25519,
            Self::X25519 => CURVE_X25519,
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

/// Capability of a private key to produce signatures.
pub trait SignableKey {
    /// The JWS algorithm the signatures are produced with.
    fn alg(&self) -> Algorithm;

    /// The key, including its private part.
    fn jwk(&self) -> &JWK;

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, PresentationError> {
        Ok(jws::sign_bytes(self.alg(), payload, self.jwk()).context("failed to sign payload")?)
    }
}

#[derive(Clone)]
pub struct Secp256k1PrivateKey {
    jwk: JWK,
}

impl fmt::Debug for Secp256k1PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1PrivateKey").finish_non_exhaustive()
    }
}

impl Secp256k1PrivateKey {
    /// Generate a fresh key from the thread-local CSPRNG.
    pub fn random() -> Self {
        Self::from_secret(&k256::SecretKey::random(&mut rand::thread_rng()))
    }

    /// Parse a raw 32-byte scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        k256::SecretKey::from_slice(bytes)
            .map(|secret| Self::from_secret(&secret))
            .context("invalid secp256k1 private key")
    }

    fn from_secret(secret: &k256::SecretKey) -> Self {
        let mut params = ECParams::from(&secret.public_key());
        params.ecc_private_key = Some(Base64urlUInt(secret.to_bytes().to_vec()));

        Self {
            jwk: JWK::from(Params::EC(params)),
        }
    }

    /// The public half, as published in a DID Document.
    pub fn public_jwk(&self) -> JWK {
        self.jwk.to_public()
    }
}

impl SignableKey for Secp256k1PrivateKey {
    fn alg(&self) -> Algorithm {
        Algorithm::ES256K
    }

    fn jwk(&self) -> &JWK {
        &self.jwk
    }
}

/// A private key as held by the wallet.
#[derive(Clone, Debug)]
pub enum PrivateKey {
    Secp256k1(Secp256k1PrivateKey),
    /// Raw Ed25519 seed. Stored, but not used for presentations.
    Ed25519(Vec<u8>),
    /// Raw X25519 key, used for key agreement only.
    X25519(Vec<u8>),
}

impl PrivateKey {
    pub fn curve(&self) -> Curve {
        match self {
            Self::Secp256k1(_) => Curve::Secp256k1,
            Self::Ed25519(_) => Curve::Ed25519,
            Self::X25519(_) => Curve::X25519,
        }
    }

    /// Returns the signing capability of the key.
    pub fn as_signable(&self) -> Result<&dyn SignableKey, PresentationError> {
        match self {
            Self::Secp256k1(key) => Ok(key),
            Self::Ed25519(_) => Err(PresentationError::PrivateKeyTypeNotSupported(self.curve())),
            Self::X25519(_) => Err(PresentationError::WrongKeyProvided {
                expected: "SignableKey".into(),
                actual: format!("{} private key", self.curve()),
            }),
        }
    }
}

impl From<Secp256k1PrivateKey> for PrivateKey {
    fn from(key: Secp256k1PrivateKey) -> Self {
        Self::Secp256k1(key)
    }
}

/// A public key as found in a DID Document.
#[derive(Clone, Debug, PartialEq)]
pub struct PublicKey(JWK);

impl PublicKey {
    pub fn curve(&self) -> Curve {
        Curve::of(&self.0)
    }

    pub fn jwk(&self) -> &JWK {
        &self.0
    }

    /// Returns the key if it can check ES256K signatures.
    pub fn as_verifiable(&self) -> Result<&JWK, PresentationError> {
        match self.curve() {
            Curve::Secp256k1 => Ok(&self.0),
            other => Err(PresentationError::UnsupportedCurve(other)),
        }
    }
}

impl From<JWK> for PublicKey {
    fn from(jwk: JWK) -> Self {
        Self(jwk)
    }
}
