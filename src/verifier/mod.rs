use std::sync::Arc;

use anyhow::{bail, Result};
use request_builder::RequestBuilder;
use submission::{SubmissionVerificationOptions, VerificationMode};

use crate::{
    config::Config,
    core::{
        did::{universal::UniversalResolver, DidResolver},
        error::PresentationError,
        presentation_submission::PresentationSubmission,
        util::AsyncHttpClient,
    },
};

pub mod request_builder;
pub mod submission;

/// A presentation exchange verifier: asks holders for claims and checks what they send back.
#[derive(Debug, Clone)]
pub struct Verifier {
    resolver: Arc<dyn DidResolver + Send + Sync>,
    verification_mode: VerificationMode,
}

impl Verifier {
    /// Build a new verifier.
    pub fn builder() -> VerifierBuilder {
        VerifierBuilder::default()
    }

    /// Build a verifier resolving DIDs through the universal resolver named in `config`.
    pub fn from_config<C>(config: &Config, http_client: C) -> Result<Self>
    where
        C: AsyncHttpClient + std::fmt::Debug + Send + Sync + 'static,
    {
        let Some(base) = config.resolver.clone() else {
            bail!("a resolver endpoint is required to build a verifier from configuration")
        };

        Self::builder()
            .with_resolver(Arc::new(UniversalResolver::new(base, http_client)))
            .with_verification_mode(config.verification_mode)
            .build()
    }

    /// Begin building a new presentation definition request.
    pub fn build_definition_request(&self) -> RequestBuilder {
        RequestBuilder::new()
    }

    pub fn verification_mode(&self) -> VerificationMode {
        self.verification_mode
    }

    /// Verify a submission received from a holder.
    ///
    /// See [submission::verify_presentation_submission].
    pub async fn verify_presentation_submission(
        &self,
        presentation_submission: &PresentationSubmission,
        options: &SubmissionVerificationOptions,
    ) -> Result<bool, PresentationError> {
        submission::verify_presentation_submission(
            presentation_submission,
            options,
            self.resolver.as_ref(),
            self.verification_mode,
        )
        .await
    }
}

/// Builder struct for [Verifier].
#[derive(Debug, Clone, Default)]
pub struct VerifierBuilder {
    resolver: Option<Arc<dyn DidResolver + Send + Sync>>,
    verification_mode: VerificationMode,
}

impl VerifierBuilder {
    /// Build the verifier.
    pub fn build(self) -> Result<Verifier> {
        let Self {
            resolver,
            verification_mode,
        } = self;

        let Some(resolver) = resolver else {
            bail!("resolver is required, see `with_resolver`")
        };

        Ok(Verifier {
            resolver,
            verification_mode,
        })
    }

    /// Set the [DidResolver] used to look up issuer keys.
    pub fn with_resolver(mut self, resolver: Arc<dyn DidResolver + Send + Sync>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Choose whether every descriptor map entry must verify, or only the first.
    pub fn with_verification_mode(mut self, verification_mode: VerificationMode) -> Self {
        self.verification_mode = verification_mode;
        self
    }
}
