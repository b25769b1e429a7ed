use serde::Deserialize;
use url::Url;

use crate::verifier::submission::VerificationMode;

/// Default presentation lifetime: one hour.
pub const DEFAULT_PRESENTATION_EXPIRATION_SECS: u64 = 3600;

/// Settings shared by [Holder](crate::holder::Holder) and [Verifier](crate::verifier::Verifier).
///
/// ```json
/// {
///   "resolver": "https://dev.uniresolver.io",
///   "verification_mode": "all",
///   "presentation_expiration_secs": 600
/// }
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Universal resolver endpoint used to resolve issuer DIDs.
    #[serde(default)]
    pub resolver: Option<BaseUrl>,
    #[serde(default)]
    pub verification_mode: VerificationMode,
    #[serde(default = "default_presentation_expiration_secs")]
    pub presentation_expiration_secs: u64,
}

fn default_presentation_expiration_secs() -> u64 {
    DEFAULT_PRESENTATION_EXPIRATION_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolver: None,
            verification_mode: VerificationMode::default(),
            presentation_expiration_secs: DEFAULT_PRESENTATION_EXPIRATION_SECS,
        }
    }
}

/// A url that is always a base (can be safely join()'ed with further path elements without
/// mangling).
#[derive(Deserialize, Debug, Clone, Hash, PartialEq, Eq)]
#[serde(try_from = "String")]
pub struct BaseUrl(Url);

impl std::ops::Deref for BaseUrl {
    type Target = Url;

    fn deref(&self) -> &Url {
        &self.0
    }
}

impl TryFrom<String> for BaseUrl {
    type Error = url::ParseError;

    fn try_from(mut url: String) -> Result<Self, Self::Error> {
        if !url.ends_with('/') {
            url.push('/');
        }
        url.parse().map(Self)
    }
}
