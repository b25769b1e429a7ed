use std::collections::BTreeMap;

use uuid::Uuid;

use crate::{
    core::{
        credential::CredentialType,
        credential_format::jwt_format,
        error::PresentationError,
        input_descriptor::{
            Constraints, ConstraintsField, ConstraintsLimitDisclosure, InputDescriptor,
            InputFieldFilter,
        },
        presentation_definition::{
            PresentationDefinition, PresentationDefinitionOptions, PresentationDefinitionRequest,
        },
    },
    utils::NonEmptyVec,
};

/// Candidate locations of the issuer in a decoded credential.
pub const ISSUER_PATHS: [&str; 4] = ["$.issuer", "$.iss", "$.vc.iss", "$.vc.issuer"];

/// The claims a verifier asks for, keyed by claim name, and an optional required issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationClaims {
    pub claims: BTreeMap<String, InputFieldFilter>,
    pub issuer: Option<String>,
}

/// Presentation metadata and the JWT algorithms the verifier accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationOptions {
    pub name: Option<String>,
    pub purpose: Option<String>,
    pub jwt: Vec<String>,
    pub domain: String,
    pub challenge: String,
}

/// Describe `claims` as a single input descriptor in a new presentation definition.
///
/// Every claim is required and looked up under `vc.credentialSubject` or directly under
/// `credentialSubject`. Disclosure is always limited to the requested fields.
pub fn create_presentation_definition_request(
    credential_type: CredentialType,
    claims: &PresentationClaims,
    options: &PresentationOptions,
) -> Result<PresentationDefinitionRequest, PresentationError> {
    if credential_type != CredentialType::Jwt {
        return Err(PresentationError::CredentialTypeNotSupported(credential_type));
    }

    if options.jwt.is_empty() {
        return Err(PresentationError::InvalidJwtPresentationDefinition(
            "at least one jwt algorithm is required".into(),
        ));
    }

    let mut constraints = Constraints::new();

    for (name, filter) in &claims.claims {
        let field = ConstraintsField::new(format!("$.vc.credentialSubject.{name}"))
            .add_path(format!("$.credentialSubject.{name}"))
            .set_id(Uuid::new_v4().to_string())
            .set_name(name.clone())
            .set_filter(filter.clone())
            .set_optional(false);
        constraints = constraints.add_constraint(field);
    }

    if let Some(issuer) = &claims.issuer {
        let mut path = NonEmptyVec::new(ISSUER_PATHS[0].to_owned());
        for candidate in &ISSUER_PATHS[1..] {
            path.push((*candidate).to_owned());
        }

        let field = ConstraintsField::from(path)
            .set_id(Uuid::new_v4().to_string())
            .set_name("issuer".into())
            .set_filter(InputFieldFilter::pattern(issuer.clone()).set_type("String"))
            .set_optional(false);
        constraints = constraints.add_constraint(field);
    }

    let constraints = constraints.set_limit_disclosure(ConstraintsLimitDisclosure::Required);

    let mut descriptor =
        InputDescriptor::with_random_id(constraints).set_format(jwt_format(options.jwt.clone()));
    if let Some(name) = &options.name {
        descriptor = descriptor.set_name(name.clone());
    }
    if let Some(purpose) = &options.purpose {
        descriptor = descriptor.set_purpose(purpose.clone());
    }

    let definition =
        PresentationDefinition::with_random_id(descriptor).set_format(jwt_format(options.jwt.clone()));

    Ok(PresentationDefinitionRequest::new(
        definition,
        PresentationDefinitionOptions::new(options.domain.clone(), options.challenge.clone()),
    ))
}

/// Fluent construction of a definition request.
///
/// ```ignore
/// let request = RequestBuilder::new()
///     .with_claim("email", InputFieldFilter::pattern("^.+@example\\.com$"))
///     .with_issuer("did:example:issuer")
///     .with_jwt_alg("ES256K")
///     .with_challenge(nonce)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct RequestBuilder {
    claims: PresentationClaims,
    options: PresentationOptions,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_claim(mut self, name: impl Into<String>, filter: InputFieldFilter) -> Self {
        self.claims.claims.insert(name.into(), filter);
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.claims.issuer = Some(issuer.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.options.purpose = Some(purpose.into());
        self
    }

    pub fn with_jwt_alg(mut self, alg: impl Into<String>) -> Self {
        self.options.jwt.push(alg.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.options.domain = domain.into();
        self
    }

    pub fn with_challenge(mut self, challenge: impl Into<String>) -> Self {
        self.options.challenge = challenge.into();
        self
    }

    pub fn build(self) -> Result<PresentationDefinitionRequest, PresentationError> {
        create_presentation_definition_request(CredentialType::Jwt, &self.claims, &self.options)
    }
}
