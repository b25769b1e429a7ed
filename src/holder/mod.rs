//! Holder side: answering presentation definition requests.

pub mod submission;
pub mod verifiable_presentation_builder;

use crate::{
    config::{Config, DEFAULT_PRESENTATION_EXPIRATION_SECS},
    core::{
        credential::Credential, error::PresentationError, keys::PrivateKey,
        presentation_definition::PresentationDefinitionRequest,
        presentation_submission::PresentationSubmission,
    },
};

/// A wallet holder producing presentation submissions.
#[derive(Debug, Clone)]
pub struct Holder {
    presentation_expiration_secs: u64,
}

impl Default for Holder {
    fn default() -> Self {
        Self {
            presentation_expiration_secs: DEFAULT_PRESENTATION_EXPIRATION_SECS,
        }
    }
}

impl Holder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            presentation_expiration_secs: config.presentation_expiration_secs,
        }
    }

    /// How long issued presentations stay valid, in seconds.
    pub fn with_presentation_expiration(mut self, secs: u64) -> Self {
        self.presentation_expiration_secs = secs;
        self
    }

    /// See [submission::create_presentation_submission].
    pub fn create_presentation_submission(
        &self,
        request: &PresentationDefinitionRequest,
        credential: &Credential,
        private_key: &PrivateKey,
    ) -> Result<PresentationSubmission, PresentationError> {
        submission::create_presentation_submission(
            request,
            credential,
            private_key,
            self.presentation_expiration_secs,
        )
    }
}
