//! Compact JWS handling for ES256K-signed presentations and credentials.

use anyhow::Context;
use base64::prelude::*;
use serde_json::{Map, Value as Json};
use ssi::{
    claims::{
        jws::{self, Header},
        jwt,
    },
    JWK,
};

use super::{error::PresentationError, keys::SignableKey};

/// Decode the header and claims of a JWT without checking its signature.
pub fn decode_unverified(token: &str) -> Result<(Header, Map<String, Json>), PresentationError> {
    let (header_b64, _, _) =
        jws::split_jws(token).map_err(|e| PresentationError::InvalidJwtString(e.to_string()))?;

    let header_json = BASE64_URL_SAFE_NO_PAD
        .decode(header_b64)
        .map_err(|e| PresentationError::InvalidJwtString(format!("header was not base64url: {e}")))?;
    let header: Header = serde_json::from_slice(&header_json)
        .map_err(|e| PresentationError::InvalidJwtString(format!("header was not valid JSON: {e}")))?;

    let claims = jwt::decode_unverified::<Map<String, Json>>(token)
        .map_err(|e| PresentationError::InvalidJwtString(format!("claims could not be decoded: {e}")))?;

    Ok((header, claims))
}

/// Sign `claims` into a compact JWS with the algorithm of `key`.
///
/// The header carries the `kid` of the key when it has one.
pub fn encode_signed(
    claims: &Map<String, Json>,
    key: &dyn SignableKey,
) -> Result<String, PresentationError> {
    Ok(jwt::encode_sign(key.alg(), claims, key.jwk()).context("failed to sign jwt")?)
}

/// Check the signature of a compact JWS against `key`.
///
/// Malformed tokens never verify.
pub fn verify_signature(token: &str, key: &JWK) -> bool {
    jwt::decode_verify::<Json>(token, key).is_ok()
}
