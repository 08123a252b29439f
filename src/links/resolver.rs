use super::detector::parse_http_url;
use super::extractor::extract_title;
use super::http::HttpFetch;
use crate::error::ResolveError;
use std::sync::Arc;

/// Turns a single URL token into a displayable page title.
///
/// Flow: scheme gate, `HEAD` type probe, `GET` only for HTML, then Open
/// Graph / `<title>` extraction. Nothing is cached between calls.
#[derive(Clone)]
pub struct TitleResolver {
    http: Arc<dyn HttpFetch>,
}

impl TitleResolver {
    pub fn new(http: Arc<dyn HttpFetch>) -> Self {
        Self { http }
    }

    /// Resolve a token to its title, or `None` when it yields nothing
    /// displayable. Never fails: every error is logged and absorbed here.
    pub async fn resolve(&self, token: &str) -> Option<String> {
        match self.try_resolve(token).await {
            Ok(title) => Some(title),
            Err(e) if e.is_noisy() => {
                tracing::error!(url = token, error = %e, "link title lookup failed");
                None
            }
            Err(e) => {
                tracing::debug!(url = token, reason = %e, "no title for token");
                None
            }
        }
    }

    /// Same pipeline as [`resolve`](Self::resolve), with the reason for a
    /// missing title kept.
    pub async fn try_resolve(&self, token: &str) -> Result<String, ResolveError> {
        let url = parse_http_url(token)?;
        tracing::debug!(url = %url, host = ?url.host_str(), "URL parsed");

        let head = self.http.head(&url).await?;
        tracing::debug!(
            url = %url,
            status = head.status,
            content_type = ?head.content_type,
            "HEAD probed"
        );
        if !head.is_html() {
            return Err(ResolveError::UnsupportedContentType(head.content_type));
        }

        let html = self.http.get_text(&url).await?;
        tracing::debug!(url = %url, bytes = html.len(), "HTML fetched");

        extract_title(&html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::links::http::{FetchFuture, HeadResponse};
    use std::sync::Mutex;
    use url::Url;

    /// Scripted `HttpFetch` that records every request it sees.
    #[derive(Default)]
    struct FakeHttp {
        content_type: Option<String>,
        body: String,
        fail_head: bool,
        fail_get: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeHttp {
        fn html(body: &str) -> Self {
            Self {
                content_type: Some("text/html; charset=utf-8".into()),
                body: body.into(),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl HttpFetch for FakeHttp {
        fn head<'a>(&'a self, url: &'a Url) -> FetchFuture<'a, HeadResponse> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(format!("HEAD {url}"));
                if self.fail_head {
                    return Err(FetchError::Timeout);
                }
                Ok(HeadResponse {
                    status: 200,
                    content_type: self.content_type.clone(),
                })
            })
        }

        fn get_text<'a>(&'a self, url: &'a Url) -> FetchFuture<'a, String> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(format!("GET {url}"));
                if self.fail_get {
                    return Err(FetchError::Request("connection reset".into()));
                }
                Ok(self.body.clone())
            })
        }
    }

    fn resolver(http: &Arc<FakeHttp>) -> TitleResolver {
        TitleResolver::new(Arc::clone(http) as Arc<dyn HttpFetch>)
    }

    #[tokio::test]
    async fn non_urls_never_touch_the_network() {
        let http = Arc::new(FakeHttp::html("<title>x</title>"));
        let r = resolver(&http);

        for token in [
            "hello",
            "www.example.com",
            "ftp://files.example.com/a",
            "mailto:user@example.com",
            "http://[::1",
            "",
        ] {
            assert_eq!(r.resolve(token).await, None, "token {token:?}");
        }
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn non_html_skips_get() {
        let http = Arc::new(FakeHttp {
            content_type: Some("image/png".into()),
            ..FakeHttp::default()
        });
        let r = resolver(&http);

        assert_eq!(r.resolve("https://example.com/cat.png").await, None);
        assert_eq!(http.calls(), vec!["HEAD https://example.com/cat.png"]);
    }

    #[tokio::test]
    async fn missing_content_type_skips_get() {
        let http = Arc::new(FakeHttp::default());
        let r = resolver(&http);

        let err = r.try_resolve("https://example.com/").await.unwrap_err();
        assert!(matches!(err, ResolveError::UnsupportedContentType(None)));
        assert_eq!(http.calls().len(), 1);
    }

    #[tokio::test]
    async fn opengraph_title_and_description_compose() {
        let http = Arc::new(FakeHttp::html(
            r#"<meta property="og:title" content="A"><meta property="og:description" content="B">"#,
        ));
        let r = resolver(&http);

        assert_eq!(
            r.resolve("https://example.com/a").await.as_deref(),
            Some("A | B")
        );
        assert_eq!(
            http.calls(),
            vec!["HEAD https://example.com/a", "GET https://example.com/a"]
        );
    }

    #[tokio::test]
    async fn plain_title_is_trimmed() {
        let http = Arc::new(FakeHttp::html("<html><head><title> Hello </title></head></html>"));
        assert_eq!(
            resolver(&http).resolve("http://example.com").await.as_deref(),
            Some("Hello")
        );
    }

    #[tokio::test]
    async fn page_without_title_is_absent() {
        let http = Arc::new(FakeHttp::html("<html><body>nothing</body></html>"));
        let r = resolver(&http);

        assert!(matches!(
            r.try_resolve("http://example.com").await,
            Err(ResolveError::NoTitle)
        ));
        assert_eq!(r.resolve("http://example.com").await, None);
    }

    #[tokio::test]
    async fn head_failure_is_absent() {
        let http = Arc::new(FakeHttp {
            fail_head: true,
            ..FakeHttp::html("<title>x</title>")
        });
        let r = resolver(&http);

        assert!(matches!(
            r.try_resolve("http://example.com").await,
            Err(ResolveError::Fetch(FetchError::Timeout))
        ));
        assert_eq!(http.calls().len(), 1);
    }

    #[tokio::test]
    async fn get_failure_is_absent() {
        let http = Arc::new(FakeHttp {
            fail_get: true,
            ..FakeHttp::html("<title>x</title>")
        });
        assert_eq!(resolver(&http).resolve("http://example.com").await, None);
        assert_eq!(http.calls().len(), 2);
    }
}
