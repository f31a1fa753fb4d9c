//! Byte-size probing for image URLs.

use crate::controls::ScanControls;
use futures_util::future::join_all;
use reqwest::header::{HeaderMap, CONTENT_LENGTH};
use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Resolved size per URL; `None` when neither request produced a length.
pub type SizeMap = HashMap<String, Option<u64>>;

/// Determines image sizes with a HEAD request, falling back to a full GET.
#[derive(Clone, Debug)]
pub struct SizeResolver {
    client: Client,
}

impl SizeResolver {
    /// Builds a resolver whose HTTP client honours `controls`.
    pub fn new(controls: &ScanControls) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .user_agent(controls.user_agent())
            .redirect(reqwest::redirect::Policy::limited(controls.max_redirects()));
        if let Some(timeout) = controls.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?))
    }

    /// Wraps a preconfigured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Returns the size of `url` in bytes, or `None` when it cannot be determined.
    ///
    /// The declared `content-length` of a HEAD response is preferred. A missing
    /// or malformed header, or a HEAD that fails outright, falls through to a
    /// GET whose body length is used instead. Status codes are not inspected.
    pub async fn resolve(&self, url: &str) -> Option<u64> {
        match self.client.head(url).send().await {
            Ok(response) => {
                if let Some(length) = parse_content_length(response.headers()) {
                    debug!(url, length, "size from content-length");
                    return Some(length);
                }
            }
            Err(err) => debug!(url, error = %err, "head request failed"),
        }

        match self.fetch_body_len(url).await {
            Ok(length) => {
                debug!(url, length, "size from response body");
                Some(length)
            }
            Err(err) => {
                warn!(url, error = %err, "size unknown");
                None
            }
        }
    }

    /// Sizes every URL concurrently and waits for all of them.
    ///
    /// Results are keyed by URL; each lookup owns only its own URL.
    pub async fn resolve_all<I>(&self, urls: I) -> SizeMap
    where
        I: IntoIterator<Item = String>,
    {
        let lookups = urls.into_iter().map(|url| async move {
            let size = self.resolve(&url).await;
            (url, size)
        });
        join_all(lookups).await.into_iter().collect()
    }

    async fn fetch_body_len(&self, url: &str) -> Result<u64, reqwest::Error> {
        let body = self.client.get(url).send().await?.bytes().await?;
        Ok(body.len() as u64)
    }
}

/// Parses a `content-length` header into a byte count.
pub fn parse_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
