use crate::core::credential::CredentialType;
use crate::core::keys::Curve;

/// Errors raised while building or verifying presentation exchange objects.
///
/// Every variant except [PresentationError::Unknown] is a known domain error with a stable
/// numeric [code](PresentationError::code). Failures coming from collaborators (DID resolution,
/// HTTP transport) are carried unchanged in [PresentationError::Unknown].
#[derive(Debug, thiserror::Error)]
pub enum PresentationError {
    /// The credential type is not supported by the requested operation.
    #[error("credential type not supported: {0}")]
    CredentialTypeNotSupported(CredentialType),

    /// The private key curve is not supported by the requested operation.
    #[error("private key type not supported: {0}")]
    PrivateKeyTypeNotSupported(Curve),

    /// The provided key lacks a required capability.
    #[error("wrong key provided: expected {expected}, found {actual}")]
    WrongKeyProvided { expected: String, actual: String },

    /// A required field was missing.
    #[error("field `{0}` must not be null")]
    NullField(String),

    /// A JWT could not be split, decoded or parsed.
    #[error("invalid JWT string: {0}")]
    InvalidJwtString(String),

    /// The presentation definition cannot be used for a JWT presentation.
    #[error("invalid JWT presentation definition: {0}")]
    InvalidJwtPresentationDefinition(String),

    /// The presentation definition request carries no domain or challenge.
    #[error("no domain or challenge found in presentation definition request")]
    NoDomainOrChallengeFound,

    /// A public key uses a curve that cannot verify JWT signatures.
    #[error("unsupported curve: {0}")]
    UnsupportedCurve(Curve),

    /// Verification of a presentation submission failed.
    #[error("verification unsuccessful: {0}")]
    VerificationUnsuccessful(String),

    /// Any other failure, including DID resolution and transport errors.
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl PresentationError {
    /// Returns the numeric error code. Unknown errors share code `-1`.
    pub fn code(&self) -> i32 {
        match self {
            Self::CredentialTypeNotSupported(_) => 51,
            Self::PrivateKeyTypeNotSupported(_) => 52,
            Self::WrongKeyProvided { .. } => 53,
            Self::NullField(_) => 54,
            Self::InvalidJwtString(_) => 55,
            Self::InvalidJwtPresentationDefinition(_) => 56,
            Self::NoDomainOrChallengeFound => 57,
            Self::UnsupportedCurve(_) => 58,
            Self::VerificationUnsuccessful(_) => 59,
            Self::Unknown(_) => -1,
        }
    }

    /// Returns the human-readable message of the error.
    pub fn message(&self) -> String {
        match self {
            Self::VerificationUnsuccessful(reason)
            | Self::InvalidJwtString(reason)
            | Self::InvalidJwtPresentationDefinition(reason) => reason.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the error belongs to the closed set of known domain errors.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    pub(crate) fn verification(reason: impl Into<String>) -> Self {
        Self::VerificationUnsuccessful(reason.into())
    }
}
