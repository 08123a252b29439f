//! In-process `HttpFetch` double shared by the link and channel tests.

use crate::error::FetchError;
use crate::links::http::{FetchFuture, HeadResponse, HttpFetch};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// Serves `<title>` pages for known URLs and 404s everything else.
#[derive(Default)]
pub(crate) struct TitleTable {
    titles: HashMap<String, String>,
    requests: AtomicUsize,
}

impl TitleTable {
    pub(crate) fn with(pages: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            titles: pages
                .iter()
                .map(|(u, t)| ((*u).to_string(), (*t).to_string()))
                .collect(),
            requests: AtomicUsize::new(0),
        })
    }

    pub(crate) fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn lookup(&self, url: &Url) -> Result<&String, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.titles.get(url.as_str()).ok_or(FetchError::Status(404))
    }
}

impl HttpFetch for TitleTable {
    fn head<'a>(&'a self, url: &'a Url) -> FetchFuture<'a, HeadResponse> {
        Box::pin(async move {
            self.lookup(url)?;
            Ok(HeadResponse {
                status: 200,
                content_type: Some("text/html".into()),
            })
        })
    }

    fn get_text<'a>(&'a self, url: &'a Url) -> FetchFuture<'a, String> {
        Box::pin(async move {
            let title = self.lookup(url)?;
            Ok(format!("<html><head><title>{title}</title></head></html>"))
        })
    }
}

