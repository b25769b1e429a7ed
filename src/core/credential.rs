use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use ssi::claims::jws::Header;

use super::{error::PresentationError, jwt::decode_unverified};

/// Credential formats known to the wallet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialType {
    #[serde(rename = "JWT")]
    Jwt,
    #[serde(rename = "W3C")]
    W3c,
    #[serde(rename = "AnonCreds")]
    AnonCreds,
    #[serde(rename = "SD-JWT")]
    SdJwt,
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt => "JWT",
            Self::W3c => "W3C",
            Self::AnonCreds => "AnonCreds",
            Self::SdJwt => "SD-JWT",
        }
        .fmt(f)
    }
}

/// A credential held by the wallet, tagged by format.
#[derive(Clone, Debug, PartialEq)]
pub enum Credential {
    Jwt(JwtCredential),
    W3c(Json),
    AnonCreds(Json),
    SdJwt(String),
}

impl Credential {
    pub fn credential_type(&self) -> CredentialType {
        match self {
            Self::Jwt(_) => CredentialType::Jwt,
            Self::W3c(_) => CredentialType::W3c,
            Self::AnonCreds(_) => CredentialType::AnonCreds,
            Self::SdJwt(_) => CredentialType::SdJwt,
        }
    }
}

impl From<JwtCredential> for Credential {
    fn from(credential: JwtCredential) -> Self {
        Self::Jwt(credential)
    }
}

/// A JWT credential or presentation, decoded but not verified.
///
/// The encoded token is kept as the credential id, which is what gets embedded in
/// presentations.
#[derive(Clone, Debug)]
pub struct JwtCredential {
    id: String,
    header: Header,
    claims: Map<String, Json>,
}

impl JwtCredential {
    pub fn parse(jwt: impl Into<String>) -> Result<Self, PresentationError> {
        let id = jwt.into();
        let (header, claims) = decode_unverified(&id)?;
        Ok(Self { id, header, claims })
    }

    /// The encoded JWT.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn claims(&self) -> &Map<String, Json> {
        &self.claims
    }

    /// The claim set as a JSON object, for path evaluation.
    pub fn to_json(&self) -> Json {
        Json::Object(self.claims.clone())
    }

    /// `iss`, falling back to the embedded `vc.issuer` (string or `{ "id": .. }`).
    pub fn issuer(&self) -> Option<&str> {
        self.claim_str("iss").or_else(|| {
            let issuer = self.claims.get("vc")?.get("issuer")?;
            issuer
                .as_str()
                .or_else(|| issuer.get("id").and_then(Json::as_str))
        })
    }

    /// `sub`, falling back to `vc.credentialSubject.id`.
    pub fn subject(&self) -> Option<&str> {
        self.claim_str("sub").or_else(|| {
            self.claims
                .get("vc")?
                .get("credentialSubject")?
                .get("id")?
                .as_str()
        })
    }

    pub fn nonce(&self) -> Option<&str> {
        self.claim_str("nonce")
    }

    /// `aud` as a list, whether encoded as a string or an array.
    pub fn audience(&self) -> Vec<&str> {
        match self.claims.get("aud") {
            Some(Json::String(aud)) => vec![aud.as_str()],
            Some(Json::Array(auds)) => auds.iter().filter_map(Json::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// `exp` in seconds since the Unix epoch.
    pub fn expiration(&self) -> Option<i64> {
        self.claims.get("exp").and_then(Json::as_i64)
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expiration().is_some_and(|exp| exp < now)
    }

    fn claim_str(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Json::as_str)
    }
}

/// Two credentials are equal when their encoded tokens are.
impl PartialEq for JwtCredential {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl FromStr for JwtCredential {
    type Err = PresentationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{jwt::encode_signed, keys::Secp256k1PrivateKey};
    use serde_json::json;

    fn jwt(claims: Json) -> String {
        let Json::Object(claims) = claims else {
            panic!("claims must be an object")
        };
        encode_signed(&claims, &Secp256k1PrivateKey::random()).unwrap()
    }

    #[test]
    fn registered_claims_take_precedence() {
        let credential = JwtCredential::parse(jwt(json!({
            "iss": "did:example:issuer",
            "sub": "did:example:holder",
            "nonce": "abc",
            "aud": ["did:example:verifier", "https://verifier.example.com"],
            "exp": 100,
            "vc": {
                "issuer": "did:example:other",
                "credentialSubject": { "id": "did:example:other" }
            }
        })))
        .unwrap();

        assert_eq!(credential.issuer(), Some("did:example:issuer"));
        assert_eq!(credential.subject(), Some("did:example:holder"));
        assert_eq!(credential.nonce(), Some("abc"));
        assert_eq!(
            credential.audience(),
            vec!["did:example:verifier", "https://verifier.example.com"]
        );
        assert!(credential.is_expired_at(101));
        assert!(!credential.is_expired_at(100));
    }

    #[test]
    fn identity_falls_back_to_embedded_credential() {
        let credential = JwtCredential::parse(jwt(json!({
            "vc": {
                "issuer": { "id": "did:example:issuer" },
                "credentialSubject": { "id": "did:example:holder", "email": "a@b.com" }
            }
        })))
        .unwrap();

        assert_eq!(credential.issuer(), Some("did:example:issuer"));
        assert_eq!(credential.subject(), Some("did:example:holder"));
        assert!(credential.audience().is_empty());
        assert!(!credential.is_expired_at(i64::MAX));
    }

    #[test]
    fn credential_type_names() {
        assert_eq!(Credential::SdJwt("a~b".into()).credential_type(), CredentialType::SdJwt);
        assert_eq!(CredentialType::Jwt.to_string(), "JWT");
        assert_eq!(serde_json::to_value(CredentialType::AnonCreds).unwrap(), "AnonCreds");
    }
}
