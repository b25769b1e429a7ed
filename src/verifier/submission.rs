//! Verification of presentation submissions against the request that asked for them.

use std::{borrow::Cow, sync::LazyLock};

use anyhow::Context;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tracing::{debug, warn};

use crate::{
    core::{
        credential::JwtCredential,
        credential_format::ClaimFormatDesignation,
        descriptor_path::DescriptorPath,
        did::{core_property, public_keys_from_core_property, CoreProperty, DidResolver},
        error::PresentationError,
        jwt::verify_signature,
        presentation_definition::PresentationDefinitionRequest,
        presentation_submission::{DescriptorMap, PresentationSubmission},
    },
    utils::unix_timestamp,
};

static PRESENTATION_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\.[^\[]+").expect("should compile"));

const PRESENTATION_FIELD: &str = "verifiablePresentation";

/// What a submission is verified against.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionVerificationOptions {
    /// The definition request the submission answers.
    Jwt(PresentationDefinitionRequest),
    /// AnonCreds proof requests are accepted but never verified here.
    AnonCreds(Json),
}

/// How many descriptor map entries must verify.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMode {
    /// Every entry must verify.
    #[default]
    All,
    /// Stop with success once one entry verifies.
    First,
}

/// Verify `submission` end to end.
///
/// For each descriptor map entry the presentation is located and its nonce, audience and
/// lifetime checked, the nested credential is bound to the presenter, its signature is checked
/// against the authentication keys of the issuer DID, and the claims are matched against the
/// input descriptor with the same id.
///
/// A submission answering another definition than the requested one is rejected up front.
/// Returns `Ok(false)` for AnonCreds options and for submissions with nothing to verify. Any
/// failed check is a [PresentationError::VerificationUnsuccessful]; resolver failures are
/// returned as they are.
pub async fn verify_presentation_submission<R>(
    submission: &PresentationSubmission,
    options: &SubmissionVerificationOptions,
    resolver: &R,
    mode: VerificationMode,
) -> Result<bool, PresentationError>
where
    R: DidResolver + ?Sized,
{
    let request = match options {
        SubmissionVerificationOptions::Jwt(request) => request,
        SubmissionVerificationOptions::AnonCreds(_) => {
            warn!("AnonCreds presentation verification is not supported");
            return Ok(false);
        }
    };

    let definition_id = request.presentation_definition.id();
    if submission.definition_id() != definition_id {
        return Err(PresentationError::verification(format!(
            "Submission answers definition {} instead of {definition_id}",
            submission.definition_id()
        )));
    }

    if submission.descriptor_map().is_empty() {
        warn!("presentation submission has an empty descriptor map");
        return Ok(false);
    }

    let submission_json =
        serde_json::to_value(submission).context("failed to serialize presentation submission")?;
    let now = unix_timestamp();

    for item in submission.descriptor_map() {
        verify_descriptor(item, &submission_json, request, resolver, now).await?;
        debug!("descriptor {} verified", item.id);

        if mode == VerificationMode::First {
            return Ok(true);
        }
    }

    Ok(true)
}

async fn verify_descriptor<R>(
    item: &DescriptorMap,
    submission: &Json,
    request: &PresentationDefinitionRequest,
    resolver: &R,
    now: i64,
) -> Result<(), PresentationError>
where
    R: DidResolver + ?Sized,
{
    if item.format != ClaimFormatDesignation::JwtVp {
        return Err(PresentationError::verification(format!(
            "Invalid submission, {} found instead of {} at {}",
            item.format,
            ClaimFormatDesignation::JwtVp,
            item.path
        )));
    }

    let path = presentation_path(&item.path);
    let presentation = DescriptorPath::new(submission)
        .get_value(&path)
        .and_then(|value| value.as_str().map(ToOwned::to_owned))
        .ok_or_else(|| {
            PresentationError::verification(format!("No verifiable presentation found at {path}"))
        })?;
    let presentation = decode(presentation, &path)?;

    let options = &request.options;

    if !options.challenge.trim().is_empty() && presentation.nonce() != Some(options.challenge.as_str()) {
        return Err(PresentationError::verification(format!(
            "Presentation nonce does not match challenge {}",
            options.challenge
        )));
    }

    if !options.domain.trim().is_empty() && !presentation.audience().contains(&options.domain.as_str()) {
        return Err(PresentationError::verification(format!(
            "Presentation is not addressed to domain {}",
            options.domain
        )));
    }

    if presentation.is_expired_at(now) {
        return Err(PresentationError::verification(format!(
            "Presentation at {path} has expired"
        )));
    }

    let Some(nested) = item.path_nested.as_deref() else {
        return Err(PresentationError::verification(format!(
            "Descriptor {} does not point to a nested credential",
            item.id
        )));
    };

    let presentation_json = presentation.to_json();
    let credential = DescriptorPath::new(&presentation_json)
        .get_value(&nested.path)
        .and_then(|value| value.as_str().map(ToOwned::to_owned))
        .ok_or_else(|| {
            PresentationError::verification(format!(
                "No verifiable credential found at {}",
                nested.path
            ))
        })?;
    let credential = decode(credential, &nested.path)?;

    if credential.subject().is_none() || credential.subject() != presentation.issuer() {
        return Err(PresentationError::verification(
            "Credential subject does not match presentation issuer",
        ));
    }

    if credential.is_expired_at(now) {
        return Err(PresentationError::verification("Credential has expired"));
    }

    verify_issuer_signature(&credential, resolver).await?;

    let descriptor = request
        .presentation_definition
        .input_descriptor(&item.id)
        .ok_or_else(|| {
            PresentationError::verification(format!(
                "Input descriptor {} is not part of the presentation definition",
                item.id
            ))
        })?;

    descriptor
        .evaluate(&credential.to_json())
        .map_err(PresentationError::verification)
}

/// Paths written against another field name still address the submitted presentations.
fn presentation_path(path: &str) -> Cow<'_, str> {
    if path.contains(PRESENTATION_FIELD) {
        Cow::Borrowed(path)
    } else {
        PRESENTATION_ROOT.replace(path, NoExpand("$.verifiablePresentation"))
    }
}

fn decode(jwt: String, path: &str) -> Result<JwtCredential, PresentationError> {
    JwtCredential::parse(jwt).map_err(|e| {
        PresentationError::verification(format!("Invalid JWT at {path}: {}", e.message()))
    })
}

/// Succeeds when any authentication key of the issuer verifies the credential signature.
async fn verify_issuer_signature<R>(
    credential: &JwtCredential,
    resolver: &R,
) -> Result<(), PresentationError>
where
    R: DidResolver + ?Sized,
{
    let issuer = credential
        .issuer()
        .ok_or_else(|| PresentationError::verification("Credential has no issuer"))?;

    let document = resolver.resolve_did(issuer).await?;

    let methods = core_property(&document, CoreProperty::Authentication);
    if methods.is_empty() {
        return Err(PresentationError::verification(format!(
            "Issuer {issuer} has no authentication methods"
        )));
    }

    let keys = public_keys_from_core_property(&methods)?;
    let keys = keys
        .iter()
        .map(|key| key.as_verifiable())
        .collect::<Result<Vec<_>, _>>()?;

    if keys.iter().any(|jwk| verify_signature(credential.id(), jwk)) {
        Ok(())
    } else {
        Err(PresentationError::verification(format!(
            "Credential signature does not verify with any authentication key of {issuer}"
        )))
    }
}
