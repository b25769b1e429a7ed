use serde_json::{json, Map, Value as Json};

use crate::utils::unix_timestamp;

pub const CREDENTIALS_V1_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";
pub const VERIFIABLE_PRESENTATION_TYPE: &str = "VerifiablePresentation";

#[derive(Debug, Clone)]
pub struct VerifiablePresentationBuilderOptions {
    /// The holder, i.e. the subject of the presented credentials.
    pub issuer: String,
    /// The verifier domain. Left out of the claims when blank.
    pub audience: String,
    pub nonce: String,
    /// Lifetime in seconds from `now`, e.g. 3600 for one hour.
    pub expiration_secs: u64,
    /// Encoded credential JWTs.
    pub credentials: Vec<String>,
}

/// Claim set of a JWT verifiable presentation.
#[derive(Debug, Clone, Default)]
pub struct VerifiablePresentationBuilder(Map<String, Json>);

impl From<VerifiablePresentationBuilder> for Map<String, Json> {
    fn from(builder: VerifiablePresentationBuilder) -> Self {
        builder.0
    }
}

impl VerifiablePresentationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the presentation claims for `options`.
    ///
    /// `iat` is the current time and `exp` lies `expiration_secs` after it.
    pub fn from_options(options: VerifiablePresentationBuilderOptions) -> Map<String, Json> {
        let now = unix_timestamp();
        let expiration = now.saturating_add(i64::try_from(options.expiration_secs).unwrap_or(i64::MAX));

        let mut builder = Self::new()
            .add_issuer(options.issuer)
            .set_issuance_date(now)
            .set_expiration_date(expiration)
            .set_nonce(options.nonce)
            .set_credentials(options.credentials);

        if !options.audience.trim().is_empty() {
            builder = builder.add_audience(options.audience);
        }

        builder.build()
    }

    /// The issuer of a presentation is the holder of the credentials in it.
    pub fn add_issuer(mut self, issuer: String) -> Self {
        self.0.insert("iss".into(), Json::String(issuer));
        self
    }

    /// The audience is the verifier the presentation is addressed to.
    pub fn add_audience(mut self, audience: String) -> Self {
        self.0.insert("aud".into(), Json::String(audience));
        self
    }

    pub fn set_issuance_date(mut self, issuance_date: i64) -> Self {
        self.0.insert("iat".into(), Json::Number(issuance_date.into()));
        self
    }

    pub fn set_expiration_date(mut self, expiration_date: i64) -> Self {
        self.0.insert("exp".into(), Json::Number(expiration_date.into()));
        self
    }

    pub fn set_nonce(mut self, nonce: String) -> Self {
        self.0.insert("nonce".into(), Json::String(nonce));
        self
    }

    pub fn set_credentials(mut self, credentials: Vec<String>) -> Self {
        self.0.insert(
            "vp".into(),
            json!({
                "@context": [CREDENTIALS_V1_CONTEXT],
                "type": [VERIFIABLE_PRESENTATION_TYPE],
                "verifiableCredential": credentials,
            }),
        );
        self
    }

    pub fn build(self) -> Map<String, Json> {
        self.0
    }
}
