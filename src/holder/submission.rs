use tracing::debug;

use super::verifiable_presentation_builder::{
    VerifiablePresentationBuilder, VerifiablePresentationBuilderOptions,
};
use crate::core::{
    credential::Credential,
    credential_format::ClaimFormatDesignation,
    error::PresentationError,
    jwt::encode_signed,
    keys::PrivateKey,
    presentation_definition::PresentationDefinitionRequest,
    presentation_submission::{DescriptorMap, PresentationSubmission, SubmissionDescriptor},
};

pub const PRESENTATION_PATH: &str = "$.verifiablePresentation[0]";
pub const NESTED_CREDENTIAL_PATH: &str = "$.vp.verifiableCredential[0]";

/// Answer `request` with a presentation of `credential`, signed by `private_key`.
///
/// Each input descriptor gets one `jwt_vp` entry pointing at the single submitted
/// presentation, with a nested `jwt_vc` entry pointing at the credential inside it.
/// The presentation expires `expiration_secs` after it is issued.
pub fn create_presentation_submission(
    request: &PresentationDefinitionRequest,
    credential: &Credential,
    private_key: &PrivateKey,
    expiration_secs: u64,
) -> Result<PresentationSubmission, PresentationError> {
    let definition = &request.presentation_definition;

    let Credential::Jwt(credential) = credential else {
        return Err(PresentationError::CredentialTypeNotSupported(
            credential.credential_type(),
        ));
    };

    if request.options.domain.trim().is_empty() && request.options.challenge.trim().is_empty() {
        return Err(PresentationError::NoDomainOrChallengeFound);
    }

    let descriptor_map = definition
        .input_descriptors()
        .iter()
        .map(|descriptor| {
            if let Some(payload) = descriptor.format().get(&ClaimFormatDesignation::Jwt) {
                if payload.algs().is_none_or(<[String]>::is_empty) {
                    return Err(PresentationError::InvalidJwtPresentationDefinition(format!(
                        "input descriptor {} declares a jwt format without algorithms",
                        descriptor.id()
                    )));
                }
            }

            Ok(
                DescriptorMap::new(descriptor.id(), ClaimFormatDesignation::JwtVp, PRESENTATION_PATH)
                    .set_path_nested(DescriptorMap::new(
                        descriptor.id(),
                        ClaimFormatDesignation::JwtVc,
                        NESTED_CREDENTIAL_PATH,
                    )),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let subject = credential
        .subject()
        .ok_or_else(|| PresentationError::NullField("CredentialSubject".into()))?;

    let signer = private_key.as_signable()?;

    // Possession of the key is proven over the challenge before anything is presented.
    let proof = signer.sign(request.options.challenge.as_bytes())?;
    debug!("signed challenge for {subject} ({} byte signature)", proof.len());

    let claims = VerifiablePresentationBuilder::from_options(VerifiablePresentationBuilderOptions {
        issuer: subject.to_owned(),
        audience: request.options.domain.clone(),
        nonce: request.options.challenge.clone(),
        expiration_secs,
        credentials: vec![credential.id().to_owned()],
    });

    let presentation = encode_signed(&claims, signer)?;

    Ok(PresentationSubmission::new(
        SubmissionDescriptor::new(definition.id().to_owned(), descriptor_map),
        vec![presentation],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        credential::{CredentialType, JwtCredential},
        jwt::{decode_unverified, verify_signature},
        keys::{Curve, Secp256k1PrivateKey},
        presentation_definition::{PresentationDefinition, PresentationDefinitionOptions},
    };
    use serde_json::{json, Value as Json};
    use ssi::jwk::Algorithm;

    fn request(format: Json) -> PresentationDefinitionRequest {
        serde_json::from_value(json!({
            "presentation_definition": {
                "id": "definition-1",
                "input_descriptors": [{
                    "id": "descriptor-1",
                    "constraints": {},
                    "format": format
                }]
            },
            "options": { "domain": "verifier.example.com", "challenge": "n-0S6_WzA2Mj" }
        }))
        .unwrap()
    }

    fn credential(claims: Json) -> Credential {
        let Json::Object(claims) = claims else {
            unreachable!()
        };
        let jwt = encode_signed(&claims, &Secp256k1PrivateKey::random()).unwrap();
        JwtCredential::parse(jwt).unwrap().into()
    }

    fn holder_credential() -> Credential {
        credential(json!({
            "iss": "did:example:issuer",
            "sub": "did:example:holder",
            "vc": { "credentialSubject": { "email": "a@b.com" } }
        }))
    }

    #[test]
    fn builds_signed_submission() {
        let key = Secp256k1PrivateKey::random();
        let credential = holder_credential();

        let submission = create_presentation_submission(
            &request(json!({ "jwt": { "alg": ["ES256K"] } })),
            &credential,
            &key.clone().into(),
            3600,
        )
        .unwrap();

        assert_eq!(submission.definition_id(), "definition-1");
        let entry = &submission.descriptor_map()[0];
        assert_eq!(entry.id, "descriptor-1");
        assert_eq!(entry.format, ClaimFormatDesignation::JwtVp);
        assert_eq!(entry.path, PRESENTATION_PATH);
        assert_eq!(entry.path_nested.as_ref().unwrap().path, NESTED_CREDENTIAL_PATH);

        let presentation = &submission.verifiable_presentation[0];
        assert!(verify_signature(presentation, &key.public_jwk()));

        let (header, claims) = decode_unverified(presentation).unwrap();
        assert_eq!(header.algorithm, Algorithm::ES256K);
        assert_eq!(claims["iss"], "did:example:holder");
        assert_eq!(claims["aud"], "verifier.example.com");
        assert_eq!(claims["nonce"], "n-0S6_WzA2Mj");
        let Credential::Jwt(jwt) = &credential else {
            unreachable!()
        };
        assert_eq!(claims["vp"]["verifiableCredential"][0], jwt.id());
    }

    #[test]
    fn rejects_jwt_format_without_algorithms() {
        for format in [json!({ "jwt": { "alg": [] } }), json!({ "jwt": null })] {
            let result = create_presentation_submission(
                &request(format),
                &holder_credential(),
                &Secp256k1PrivateKey::random().into(),
                3600,
            );
            assert!(matches!(
                result,
                Err(PresentationError::InvalidJwtPresentationDefinition(_))
            ));
        }
    }

    #[test]
    fn rejects_other_credential_formats() {
        let result = create_presentation_submission(
            &request(json!({})),
            &Credential::AnonCreds(json!({ "schema_id": "1" })),
            &Secp256k1PrivateKey::random().into(),
            3600,
        );
        assert!(matches!(
            result,
            Err(PresentationError::CredentialTypeNotSupported(CredentialType::AnonCreds))
        ));
    }

    #[test]
    fn credential_type_is_checked_before_the_request() {
        let mut request = request(json!({ "jwt": { "alg": [] } }));
        request.options = PresentationDefinitionOptions::default();

        let result = create_presentation_submission(
            &request,
            &Credential::AnonCreds(json!({ "schema_id": "1" })),
            &Secp256k1PrivateKey::random().into(),
            3600,
        );
        assert!(matches!(
            result,
            Err(PresentationError::CredentialTypeNotSupported(CredentialType::AnonCreds))
        ));
    }

    #[test]
    fn requires_credential_subject() {
        let result = create_presentation_submission(
            &request(json!({})),
            &credential(json!({ "iss": "did:example:issuer" })),
            &Secp256k1PrivateKey::random().into(),
            3600,
        );
        assert!(matches!(result, Err(PresentationError::NullField(field)) if field == "CredentialSubject"));
    }

    #[test]
    fn rejects_keys_that_cannot_sign_es256k() {
        let result = create_presentation_submission(
            &request(json!({})),
            &holder_credential(),
            &PrivateKey::Ed25519(vec![7; 32]),
            3600,
        );
        assert!(matches!(
            result,
            Err(PresentationError::PrivateKeyTypeNotSupported(Curve::Ed25519))
        ));

        let result = create_presentation_submission(
            &request(json!({})),
            &holder_credential(),
            &PrivateKey::X25519(vec![7; 32]),
            3600,
        );
        assert!(matches!(result, Err(PresentationError::WrongKeyProvided { .. })));
    }

    #[test]
    fn requires_domain_or_challenge() {
        let mut request = request(json!({}));
        request.options = PresentationDefinitionOptions::default();

        let result = create_presentation_submission(
            &request,
            &holder_credential(),
            &Secp256k1PrivateKey::random().into(),
            3600,
        );
        assert!(matches!(result, Err(PresentationError::NoDomainOrChallengeFound)));
    }

    #[test]
    fn definition_built_in_code_is_accepted() {
        let definition = PresentationDefinition::with_random_id(
            crate::core::input_descriptor::InputDescriptor::with_random_id(Default::default()),
        );
        let request = PresentationDefinitionRequest::new(
            definition,
            PresentationDefinitionOptions::new("", "challenge"),
        );

        let submission = create_presentation_submission(
            &request,
            &holder_credential(),
            &Secp256k1PrivateKey::random().into(),
            60,
        )
        .unwrap();

        let (_, claims) = decode_unverified(&submission.verifiable_presentation[0]).unwrap();
        assert!(!claims.contains_key("aud"));
    }
}
