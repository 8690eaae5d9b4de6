//! HTTP layer for the live checks.
//!
//! One [`HttpFetcher`] serves a whole run: responses are cached by exact
//! URL (capability documents get requested once per server, not once per
//! source), and a per-host semaphore keeps the checker from hammering any
//! single operator. Checkers depend on the [`Fetch`] trait so tests can
//! substitute canned responses.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, instrument, warn};

/// Identifies the checker to server operators. Kept stable so existing
/// allowlists keep working.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (compatible; MSIE 6.0; OpenStreetMap Editor Layer Index CI check)";

const MAX_ATTEMPTS: usize = 3;
const RETRY_BACKOFF: Duration = Duration::from_secs(5);
const OVERLOAD_BACKOFF: Duration = Duration::from_secs(15);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const IN_FLIGHT_PER_HOST: usize = 2;

#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("request to {url} failed after {attempts} attempts: {reason}")]
    Exhausted {
        url: String,
        attempts: usize,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Bytes,
}

impl FetchResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body honoring an `encoding="..."` declaration in the
    /// XML prolog. Anything not Latin-1-ish decodes as UTF-8, lossily.
    pub fn text(&self) -> String {
        decode_sniffed(&self.body)
    }
}

fn decode_sniffed(body: &Bytes) -> String {
    let head = &body[..body.len().min(200)];
    let head_text = String::from_utf8_lossy(head);
    let declared = head_text.find("encoding=").and_then(|idx| {
        let rest = &head_text[idx + "encoding=".len()..];
        let quote = rest.chars().next()?;
        if quote != '"' && quote != '\'' {
            return None;
        }
        rest[1..]
            .split(quote)
            .next()
            .map(|enc| enc.trim().to_ascii_lowercase())
    });
    match declared.as_deref() {
        // Latin-1 bytes map 1:1 onto the first 256 code points.
        Some("iso-8859-1") | Some("latin1") | Some("windows-1252") => {
            body.iter().map(|&b| b as char).collect()
        }
        _ => String::from_utf8_lossy(body).into_owned(),
    }
}

/// The seam every network-backed check goes through.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<FetchResponse, FetchError>;
}

/// The production fetcher: shared client, append-only response cache,
/// per-host concurrency caps, bounded retries.
pub struct HttpFetcher {
    client: reqwest::Client,
    cache: Mutex<HashMap<String, FetchResponse>>,
    host_locks: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<HttpFetcher, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()?;
        Ok(HttpFetcher {
            client,
            cache: Mutex::new(HashMap::new()),
            host_locks: Mutex::new(HashMap::new()),
        })
    }

    async fn host_semaphore(&self, url: &url::Url) -> Arc<Semaphore> {
        let host = url.host_str().unwrap_or("").to_string();
        let mut locks = self.host_locks.lock().await;
        locks
            .entry(host)
            .or_insert_with(|| Arc::new(Semaphore::new(IN_FLIGHT_PER_HOST)))
            .clone()
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    #[instrument(skip(self, headers))]
    async fn fetch(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<FetchResponse, FetchError> {
        if let Some(cached) = self.cache.lock().await.get(url) {
            return Ok(cached.clone());
        }
        let parsed =
            url::Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        let semaphore = self.host_semaphore(&parsed).await;
        // The semaphore is never closed, so acquisition only fails if the
        // fetcher itself is torn down mid-request.
        let _permit = semaphore.acquire().await.ok();

        let mut last_reason = String::new();
        for attempt in 1..=MAX_ATTEMPTS {
            let mut request = self.client.get(parsed.clone());
            for (name, value) in headers {
                request = request.header(name, value);
            }
            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if status == 503 && attempt < MAX_ATTEMPTS {
                        warn!(url, attempt, "server overloaded, backing off");
                        last_reason = "HTTP 503".to_string();
                        tokio::time::sleep(OVERLOAD_BACKOFF).await;
                        continue;
                    }
                    match response.bytes().await {
                        Ok(body) => {
                            let fetched = FetchResponse { status, body };
                            self.cache
                                .lock()
                                .await
                                .insert(url.to_string(), fetched.clone());
                            return Ok(fetched);
                        }
                        Err(e) => last_reason = e.to_string(),
                    }
                }
                Err(e) => last_reason = e.to_string(),
            }
            if attempt < MAX_ATTEMPTS {
                debug!(url, attempt, reason = %last_reason, "retrying");
                tokio::time::sleep(RETRY_BACKOFF).await;
            }
        }
        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: MAX_ATTEMPTS,
            reason: last_reason,
        })
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use std::sync::Mutex as StdMutex;

    /// Map-backed fetcher for tests. Unmatched URLs get the fallback
    /// status when one is set and an error otherwise.
    #[derive(Default)]
    pub struct StubFetch {
        responses: StdMutex<HashMap<String, FetchResponse>>,
        fallback_status: Option<u16>,
        pub requests: StdMutex<Vec<String>>,
    }

    impl StubFetch {
        pub fn new() -> StubFetch {
            StubFetch::default()
        }

        pub fn with_fallback(status: u16) -> StubFetch {
            StubFetch {
                fallback_status: Some(status),
                ..StubFetch::default()
            }
        }

        pub fn insert(&self, url: &str, status: u16, body: &str) {
            self.responses.lock().unwrap().insert(
                url.to_string(),
                FetchResponse {
                    status,
                    body: Bytes::from(body.to_string()),
                },
            );
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Fetch for StubFetch {
        async fn fetch(
            &self,
            url: &str,
            _headers: &HashMap<String, String>,
        ) -> Result<FetchResponse, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            if let Some(response) = self.responses.lock().unwrap().get(url) {
                return Ok(response.clone());
            }
            match self.fallback_status {
                Some(status) => Ok(FetchResponse {
                    status,
                    body: Bytes::new(),
                }),
                None => Err(FetchError::Exhausted {
                    url: url.to_string(),
                    attempts: 1,
                    reason: "no stubbed response".to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_sniffing_latin1() {
        let body = Bytes::from(
            [
                br#"<?xml version="1.0" encoding="ISO-8859-1"?><a>caf"#.as_ref(),
                &[0xE9u8],
                b"</a>",
            ]
            .concat(),
        );
        let text = decode_sniffed(&body);
        assert!(text.contains("caf\u{e9}"), "{text}");
    }

    #[test]
    fn test_encoding_sniffing_defaults_to_utf8() {
        let body = Bytes::from(r#"<?xml version="1.0"?><a>café</a>"#.to_string());
        assert!(decode_sniffed(&body).contains("café"));
    }

    #[test]
    fn test_single_quoted_encoding_declaration() {
        let body = Bytes::from(
            [
                b"<?xml version='1.0' encoding='iso-8859-1'?><a>".as_ref(),
                &[0xFCu8],
                b"</a>",
            ]
            .concat(),
        );
        assert!(decode_sniffed(&body).contains('\u{fc}'));
    }

    #[tokio::test]
    async fn test_stub_fallback_and_recording() {
        use stub::StubFetch;

        let fetch = StubFetch::with_fallback(200);
        fetch.insert("https://example.com/bad", 404, "");
        let headers = HashMap::new();

        let ok = fetch.fetch("https://example.com/x", &headers).await.unwrap();
        assert!(ok.ok());
        let bad = fetch
            .fetch("https://example.com/bad", &headers)
            .await
            .unwrap();
        assert_eq!(bad.status, 404);
        assert_eq!(fetch.request_count(), 2);
    }
}
