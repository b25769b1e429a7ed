use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use http::header::ACCEPT;
use regex::Regex;
use serde_json::Value as Json;
use ssi::dids::Document;
use tracing::debug;

use super::DidResolver;
use crate::{
    config::BaseUrl,
    core::util::{base_request, AsyncHttpClient},
};

static DID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^did:[a-z0-9]+:[a-zA-Z0-9._:%-]+$").expect("should compile")
});

const DID_RESOLUTION_CONTENT_TYPE: &str = "application/did+ld+json";

/// Resolves DIDs through a DIF universal resolver, e.g. `https://dev.uniresolver.io/`.
#[derive(Debug)]
pub struct UniversalResolver<C> {
    base: BaseUrl,
    client: C,
}

impl<C: AsyncHttpClient> UniversalResolver<C> {
    pub fn new(base: BaseUrl, client: C) -> Self {
        Self { base, client }
    }

    fn identifier_url(&self, did: &str) -> Result<url::Url> {
        format!("{}1.0/identifiers/{did}", self.base.as_str())
            .parse()
            .context("unable to build resolution url")
    }
}

#[async_trait]
impl<C: AsyncHttpClient + std::fmt::Debug + Send + Sync> DidResolver for UniversalResolver<C> {
    async fn resolve_did(&self, did: &str) -> Result<Document> {
        if !DID_REGEX.is_match(did) {
            bail!("DID {did} is not resolvable: malformed identifier")
        }

        let url = self.identifier_url(did)?;
        debug!("resolving {did} at {url}");

        let request = base_request()
            .method("GET")
            .uri(url.as_str())
            .header(ACCEPT, DID_RESOLUTION_CONTENT_TYPE)
            .body(vec![])
            .context("unable to build resolution request")?;

        let response = self.client.execute(request).await?;

        if !response.status().is_success() {
            bail!("DID {did} is not resolvable: resolver answered {}", response.status())
        }

        let body: Json = serde_json::from_slice(response.body())
            .context("resolver response was not valid JSON")?;

        // Resolution results wrap the document; some resolvers return it bare.
        let document = match body {
            Json::Object(mut result) if result.contains_key("didDocument") => {
                result.remove("didDocument").unwrap_or_default()
            }
            other => other,
        };

        serde_json::from_value(document).context("resolver returned an invalid DID document")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Request, Response, StatusCode};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct MockClient {
        status: StatusCode,
        body: Json,
        seen: Mutex<Vec<String>>,
    }

    impl MockClient {
        fn new(status: StatusCode, body: Json) -> Self {
            Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AsyncHttpClient for MockClient {
        async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
            assert_eq!(request.headers()[ACCEPT], DID_RESOLUTION_CONTENT_TYPE);
            self.seen.lock().unwrap().push(request.uri().to_string());

            Ok(Response::builder()
                .status(self.status)
                .body(serde_json::to_vec(&self.body)?)?)
        }
    }

    fn base() -> BaseUrl {
        BaseUrl::try_from("https://resolver.example.com".to_string()).unwrap()
    }

    #[tokio::test]
    async fn unwraps_resolution_result() {
        let client = MockClient::new(
            StatusCode::OK,
            json!({
                "didResolutionMetadata": { "contentType": DID_RESOLUTION_CONTENT_TYPE },
                "didDocument": { "id": "did:example:123" }
            }),
        );
        let resolver = UniversalResolver::new(base(), client);

        let document = resolver.resolve_did("did:example:123").await.unwrap();

        assert_eq!(document.id.as_str(), "did:example:123");
        assert_eq!(
            resolver.client.seen.lock().unwrap().as_slice(),
            ["https://resolver.example.com/1.0/identifiers/did:example:123"]
        );
    }

    #[tokio::test]
    async fn accepts_bare_documents() {
        let client = MockClient::new(StatusCode::OK, json!({ "id": "did:example:123" }));
        let resolver = UniversalResolver::new(base(), client);

        assert_eq!(
            resolver.resolve_did("did:example:123").await.unwrap().id.as_str(),
            "did:example:123"
        );
    }

    #[tokio::test]
    async fn failures_are_errors() {
        let resolver = UniversalResolver::new(
            base(),
            MockClient::new(StatusCode::NOT_FOUND, json!({ "error": "notFound" })),
        );

        assert!(resolver.resolve_did("did:example:404").await.is_err());
        assert!(resolver.resolve_did("not a did").await.is_err());
        assert_eq!(resolver.client.seen.lock().unwrap().len(), 1);
    }
}
