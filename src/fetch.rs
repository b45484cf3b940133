//! HTTP fetching behind a small object-safe trait.
//!
//! Every network access in the crawler (feeds, article pages, images) goes
//! through [`Fetch`], so the whole pipeline can run against canned responses
//! in tests. [`HttpFetcher`] is the production implementation: one GET with a
//! fixed `User-Agent` and timeout, no retries.

use crate::config::CrawlerConfig;
use crate::error::FetchError;
use futures::future::BoxFuture;
use reqwest::Client;
use tracing::debug;

/// Capability to download the body of a URL.
pub trait Fetch: Send + Sync {
    /// Download the raw body of `url`. Non-success statuses are errors.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>>;

    /// Download `url` and decode it as text (lossy UTF-8 by default).
    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, FetchError>> {
        Box::pin(async move {
            let bytes = self.fetch(url).await?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        })
    }
}

/// [`Fetch`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        debug!(%url, %status, "Fetched");
        Ok(response)
    }
}

impl Fetch for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
        Box::pin(async move {
            let response = self.get(url).await?;
            Ok(response.bytes().await?.to_vec())
        })
    }

    // reqwest honours the charset from Content-Type
    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, FetchError>> {
        Box::pin(async move {
            let response = self.get(url).await?;
            Ok(response.text().await?)
        })
    }
}

#[cfg(test)]
pub mod testing {
    //! Canned-response fetcher used by the pipeline tests.

    use super::*;
    use reqwest::StatusCode;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves fixed bodies keyed by URL; unknown URLs answer 404.
    #[derive(Debug, Default)]
    pub struct StaticFetcher {
        responses: HashMap<String, Result<Vec<u8>, StatusCode>>,
        calls: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.responses.insert(url.to_string(), Ok(body.into()));
            self
        }

        pub fn with_status(mut self, url: &str, status: StatusCode) -> Self {
            self.responses.insert(url.to_string(), Err(status));
            self
        }

        /// URLs requested so far, in order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self, url: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
        }
    }

    impl Fetch for StaticFetcher {
        fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
            self.calls.lock().unwrap().push(url.to_string());
            let result = match self.responses.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(FetchError::Status(*status)),
                None => Err(FetchError::Status(StatusCode::NOT_FOUND)),
            };
            Box::pin(async move { result })
        }
    }

    #[tokio::test]
    async fn test_static_fetcher_serves_and_counts() {
        let fetcher = StaticFetcher::new()
            .with_body("https://example.com/a", "hello")
            .with_status("https://example.com/b", StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(fetcher.fetch_text("https://example.com/a").await.unwrap(), "hello");
        assert!(matches!(
            fetcher.fetch("https://example.com/b").await,
            Err(FetchError::Status(s)) if s == StatusCode::INTERNAL_SERVER_ERROR
        ));
        assert!(matches!(
            fetcher.fetch("https://example.com/missing").await,
            Err(FetchError::Status(s)) if s == StatusCode::NOT_FOUND
        ));
        assert_eq!(fetcher.call_count("https://example.com/a"), 1);
        assert_eq!(fetcher.calls().len(), 3);
    }
}
