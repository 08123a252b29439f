use super::types::LinkConfig;
use crate::error::FetchError;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use url::Url;

/// Upper bound on redirects followed for either request.
const MAX_REDIRECTS: usize = 10;

pub type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'a>>;

/// What the type probe learns about a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadResponse {
    pub status: u16,
    pub content_type: Option<String>,
}

impl HeadResponse {
    /// Loose `text/html` containment check on the raw header value.
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("text/html"))
    }
}

/// HTTP capability used by the title resolver.
pub trait HttpFetch: Send + Sync {
    /// Probe a URL with `HEAD`, following redirects.
    fn head<'a>(&'a self, url: &'a Url) -> FetchFuture<'a, HeadResponse>;

    /// Fetch a URL with `GET` and decode the body using the declared charset.
    fn get_text<'a>(&'a self, url: &'a Url) -> FetchFuture<'a, String>;
}

/// `HttpFetch` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(config: &LinkConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self { client })
    }
}

impl HttpFetch for ReqwestFetcher {
    fn head<'a>(&'a self, url: &'a Url) -> FetchFuture<'a, HeadResponse> {
        Box::pin(async move {
            let response = self
                .client
                .head(url.as_str())
                .send()
                .await?
                .error_for_status()?;

            tracing::debug!(url = %url, headers = ?response.headers(), "HEAD response");

            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            Ok(HeadResponse {
                status: response.status().as_u16(),
                content_type,
            })
        })
    }

    fn get_text<'a>(&'a self, url: &'a Url) -> FetchFuture<'a, String> {
        Box::pin(async move {
            let response = self
                .client
                .get(url.as_str())
                .send()
                .await?
                .error_for_status()?;
            Ok(response.text().await?)
        })
    }
}
