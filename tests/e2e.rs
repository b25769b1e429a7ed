use serde_json::json;
use wallet_pex::{
    core::{
        credential_format::ClaimFormatDesignation, input_descriptor::InputFieldFilter,
        keys::Secp256k1PrivateKey, presentation_definition::PresentationDefinitionRequest,
        presentation_submission::PresentationSubmission,
    },
    holder::Holder,
    verifier::submission::{SubmissionVerificationOptions, VerificationMode},
};

mod fixtures;

use fixtures::{TestIssuer, CHALLENGE, DOMAIN, ISSUER_DID};

#[tokio::test]
async fn email_credential_is_presented_and_verified() {
    let issuer = TestIssuer::new();
    let verifier = fixtures::verifier(&issuer, VerificationMode::All).await;

    let request = verifier
        .build_definition_request()
        .with_claim("email", InputFieldFilter::pattern("^a@b.com$"))
        .with_issuer(ISSUER_DID)
        .with_name("Email")
        .with_purpose("Prove control of your email address")
        .with_jwt_alg("ES256K")
        .with_domain(DOMAIN)
        .with_challenge(CHALLENGE)
        .build()
        .unwrap();

    // The request travels to the holder as JSON.
    let request: PresentationDefinitionRequest =
        serde_json::from_str(&serde_json::to_string(&request).unwrap()).unwrap();

    let credential = issuer.issue(json!({ "email": "a@b.com" }));
    let holder_key = Secp256k1PrivateKey::random();

    let submission = Holder::new()
        .create_presentation_submission(&request, &credential, &holder_key.into())
        .unwrap();

    assert_eq!(
        submission.definition_id(),
        request.presentation_definition.id()
    );
    assert_eq!(submission.descriptor_map().len(), 1);
    assert_eq!(
        submission.descriptor_map()[0].format,
        ClaimFormatDesignation::JwtVp
    );

    // And the submission travels back the same way.
    let submission: PresentationSubmission =
        serde_json::from_value(serde_json::to_value(&submission).unwrap()).unwrap();

    let verified = verifier
        .verify_presentation_submission(
            &submission,
            &SubmissionVerificationOptions::Jwt(request),
        )
        .await
        .unwrap();

    assert!(verified);
}

#[tokio::test]
async fn email_from_another_domain_is_rejected() {
    let issuer = TestIssuer::new();
    let verifier = fixtures::verifier(&issuer, VerificationMode::All).await;

    let request = verifier
        .build_definition_request()
        .with_claim("email", InputFieldFilter::pattern("^.+@example\\.com$"))
        .with_jwt_alg("ES256K")
        .with_challenge(CHALLENGE)
        .build()
        .unwrap();

    let submission = Holder::new()
        .create_presentation_submission(
            &request,
            &issuer.issue(json!({ "email": "a@b.com" })),
            &Secp256k1PrivateKey::random().into(),
        )
        .unwrap();

    let err = verifier
        .verify_presentation_submission(
            &submission,
            &SubmissionVerificationOptions::Jwt(request),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code(), 59);
    assert!(err.message().contains("a@b.com"));
}
