use std::{borrow::Cow, collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

const FORMAT_JWT: &str = "jwt";
const FORMAT_JWT_VC: &str = "jwt_vc";
const FORMAT_JWT_VP: &str = "jwt_vp";
const FORMAT_JWT_VC_JSON: &str = "jwt_vc_json";
const FORMAT_JWT_VP_JSON: &str = "jwt_vp_json";
const FORMAT_AC_VC: &str = "ac_vc";
const FORMAT_AC_VP: &str = "ac_vp";
const FORMAT_SD_JWT: &str = "vc+sd-jwt";

/// Map of claim format designation to the algorithms accepted for it.
pub type ClaimFormatMap = HashMap<ClaimFormatDesignation, ClaimFormatPayload>;

/// Algorithms or proof types accepted for a claim format.
///
/// Serializes as `{"alg": [..]}` or `{"proof_type": [..]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClaimFormatPayload {
    #[serde(rename = "alg")]
    Alg(Vec<String>),
    #[serde(rename = "proof_type")]
    ProofType(Vec<String>),
    #[serde(untagged)]
    Other(serde_json::Value),
}

impl ClaimFormatPayload {
    /// Returns the declared algorithms, if this payload declares any.
    pub fn algs(&self) -> Option<&[String]> {
        match self {
            Self::Alg(algs) => Some(algs),
            _ => None,
        }
    }
}

/// Claim format designations, from the DIF claim format registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClaimFormatDesignation {
    /// A JWT-encoded claim.
    Jwt,
    /// A JWT-encoded W3C verifiable credential.
    JwtVc,
    /// A JWT-encoded W3C verifiable presentation.
    JwtVp,
    JwtVcJson,
    JwtVpJson,
    /// AnonCreds credential.
    AcVc,
    /// AnonCreds presentation.
    AcVp,
    /// SD-JWT verifiable credential.
    SdJwt,
    Other(String),
}

impl ClaimFormatDesignation {
    pub fn from_name(name: Cow<str>) -> Self {
        match name.as_ref() {
            FORMAT_JWT => Self::Jwt,
            FORMAT_JWT_VC => Self::JwtVc,
            FORMAT_JWT_VP => Self::JwtVp,
            FORMAT_JWT_VC_JSON => Self::JwtVcJson,
            FORMAT_JWT_VP_JSON => Self::JwtVpJson,
            FORMAT_AC_VC => Self::AcVc,
            FORMAT_AC_VP => Self::AcVp,
            FORMAT_SD_JWT => Self::SdJwt,
            _ => Self::Other(name.into_owned()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Jwt => FORMAT_JWT,
            Self::JwtVc => FORMAT_JWT_VC,
            Self::JwtVp => FORMAT_JWT_VP,
            Self::JwtVcJson => FORMAT_JWT_VC_JSON,
            Self::JwtVpJson => FORMAT_JWT_VP_JSON,
            Self::AcVc => FORMAT_AC_VC,
            Self::AcVp => FORMAT_AC_VP,
            Self::SdJwt => FORMAT_SD_JWT,
            Self::Other(other) => other,
        }
    }
}

impl From<&str> for ClaimFormatDesignation {
    fn from(s: &str) -> Self {
        Self::from_name(Cow::Borrowed(s))
    }
}

impl From<String> for ClaimFormatDesignation {
    fn from(value: String) -> Self {
        Self::from_name(Cow::Owned(value))
    }
}

impl FromStr for ClaimFormatDesignation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl fmt::Display for ClaimFormatDesignation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

impl Serialize for ClaimFormatDesignation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.name().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ClaimFormatDesignation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Into::into)
    }
}

/// A format map that only accepts JWTs signed with one of `algs`.
pub fn jwt_format(algs: Vec<String>) -> ClaimFormatMap {
    ClaimFormatMap::from([(ClaimFormatDesignation::Jwt, ClaimFormatPayload::Alg(algs))])
}
