use anyhow::{Context, Result};
use async_trait::async_trait;
use http::{Request, Response};

/// Generic HTTP client used by network-backed collaborators such as DID resolvers.
///
/// Kept as a trait so mobile hosts can bring their own native HTTP/TLS stack.
#[async_trait]
pub trait AsyncHttpClient {
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>>;
}

pub(crate) fn base_request() -> http::request::Builder {
    Request::builder().header(http::header::USER_AGENT, concat!("wallet-pex/", env!("CARGO_PKG_VERSION")))
}

#[derive(Debug)]
pub struct ReqwestClient(reqwest::Client);

impl AsRef<reqwest::Client> for ReqwestClient {
    fn as_ref(&self) -> &reqwest::Client {
        &self.0
    }
}

impl ReqwestClient {
    pub fn new() -> Result<Self> {
        reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .context("unable to build http_client")
            .map(Self)
    }
}

#[async_trait]
impl AsyncHttpClient for ReqwestClient {
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let response = self
            .0
            .execute(request.try_into().context("unable to convert request")?)
            .await
            .context("http request failed")?;

        let mut builder = Response::builder()
            .status(response.status())
            .version(response.version());

        builder
            .headers_mut()
            .context("unable to set headers")?
            .extend(response.headers().clone());

        let body = response
            .bytes()
            .await
            .context("failed to extract response body")?;

        builder
            .body(body.to_vec())
            .context("unable to construct response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_request_identifies_the_crate() {
        let request = base_request().body(Vec::<u8>::new()).unwrap();
        let agent = request.headers()[http::header::USER_AGENT].to_str().unwrap();
        assert!(agent.starts_with("wallet-pex/"));
    }
}
