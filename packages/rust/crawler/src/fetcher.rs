//! Best-effort, single-hop page fetcher.
//!
//! Every failure (bad URL, unsupported scheme, connect error, timeout,
//! non-2xx status, broken body stream) is logged and turned into an empty
//! document. Callers never see a transport error.

use encoding_rs::{Encoding, UTF_8};
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use tracing::{debug, instrument};
use url::Url;

use toolcatalog_shared::{CatalogError, FetchConfig, Result};

/// Fetches tool pages over HTTP(S).
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl PageFetcher {
    /// Create a fetcher with the given timeout, body cap, and client identity.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .timeout(config.timeout)
            .build()
            .map_err(|e| CatalogError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Fetch `url` and return its decoded text, or `""` on any failure.
    ///
    /// An empty URL is not fetched at all.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> String {
        let url = url.trim();
        if url.is_empty() {
            return String::new();
        }

        match self.try_fetch(url).await {
            Ok(body) => {
                debug!(bytes = body.len(), "page fetched");
                body
            }
            Err(e) => {
                debug!(error = %e, "fetch failed, using empty document");
                String::new()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url)
            .map_err(|e| CatalogError::Network(format!("{url}: invalid URL: {e}")))?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(CatalogError::Network(format!(
                    "{url}: unsupported scheme {scheme}"
                )));
            }
        }

        let mut response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| CatalogError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Network(format!("{url}: HTTP {status}")));
        }

        let charset = declared_charset(response.headers());

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| CatalogError::Network(format!("{url}: body read failed: {e}")))?
        {
            let remaining = self.max_body_bytes - body.len();
            if chunk.len() >= remaining {
                body.extend_from_slice(&chunk[..remaining]);
                debug!(limit = self.max_body_bytes, "body truncated");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(decode_body(&body, charset.as_deref()))
    }
}

/// Pull the `charset` parameter out of the `Content-Type` header.
fn declared_charset(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

/// Decode bytes with the declared charset, falling back to UTF-8 for unknown
/// or missing labels. Invalid sequences become U+FFFD.
fn decode_body(bytes: &[u8], charset: Option<&str>) -> String {
    let encoding = charset
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(5),
            max_body_bytes: 1024 * 1024,
            user_agent: "toolcatalog-test/1.0".into(),
            max_redirects: 5,
        }
    }

    #[test]
    fn test_declared_charset() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/html; Charset=\"ISO-8859-1\""),
        );
        assert_eq!(declared_charset(&headers).as_deref(), Some("ISO-8859-1"));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        assert_eq!(declared_charset(&headers), None);
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b"caf\xe9", Some("iso-8859-1")), "café");
        assert_eq!(decode_body("café".as_bytes(), None), "café");
        assert_eq!(decode_body("café".as_bytes(), Some("no-such-charset")), "café");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", "toolcatalog-test/1.0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><title>Acme</title></html>", "text/html"),
            )
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(&test_config()).unwrap();
        let body = fetcher.fetch(&format!("{}/", server.uri())).await;
        assert_eq!(body, "<html><title>Acme</title></html>");
    }

    #[tokio::test]
    async fn test_fetch_decodes_declared_charset() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latin"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(b"<h1>Caf\xe9</h1>".to_vec(), "text/html; charset=iso-8859-1"),
            )
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(&test_config()).unwrap();
        let body = fetcher.fetch(&format!("{}/latin", server.uri())).await;
        assert_eq!(body, "<h1>Café</h1>");
    }

    #[tokio::test]
    async fn test_fetch_truncates_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/big"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("x".repeat(5000), "text/html"))
            .mount(&server)
            .await;

        let config = FetchConfig {
            max_body_bytes: 1000,
            ..test_config()
        };
        let fetcher = PageFetcher::new(&config).unwrap();
        let body = fetcher.fetch(&format!("{}/big", server.uri())).await;
        assert_eq!(body.len(), 1000);
    }

    #[tokio::test]
    async fn test_fetch_http_error_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(&test_config()).unwrap();
        assert_eq!(fetcher.fetch(&format!("{}/missing", server.uri())).await, "");
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_millis(1500)),
            )
            .mount(&server)
            .await;

        let config = FetchConfig {
            timeout: Duration::from_millis(200),
            ..test_config()
        };
        let fetcher = PageFetcher::new(&config).unwrap();
        assert_eq!(fetcher.fetch(&format!("{}/slow", server.uri())).await, "");
    }

    #[tokio::test]
    async fn test_fetch_bad_urls_are_empty() {
        let fetcher = PageFetcher::new(&test_config()).unwrap();
        assert_eq!(fetcher.fetch("").await, "");
        assert_eq!(fetcher.fetch("   ").await, "");
        assert_eq!(fetcher.fetch("not a url").await, "");
        assert_eq!(fetcher.fetch("ftp://files.example.com/a").await, "");
        // Nothing listens on port 9 locally.
        assert_eq!(fetcher.fetch("http://127.0.0.1:9/").await, "");
    }
}
