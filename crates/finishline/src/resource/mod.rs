// ABOUTME: HTTP retrieval of result pages: URL validation, timeout mapping, charset decoding.
// ABOUTME: The only suspending operation in the system; everything downstream is pure.

use std::collections::HashMap;

use bytes::Bytes;

use crate::error::ScrapeError;

/// Options for fetching a result page.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
}

/// A successfully retrieved page, body still undecoded.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decodes the body using the content-type charset when present,
    /// falling back to encoding detection. Old result pages are frequently
    /// served as latin-1 without saying so.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Fetch one result page. Timeouts come from the `reqwest::Client`
/// configuration and map to `ErrorCode::Timeout`; a non-success status is
/// a fetch error, not a page to parse.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, ScrapeError> {
    if url.is_empty() {
        return Err(ScrapeError::invalid_url(url, "fetch", None));
    }

    let parsed = url::Url::parse(url).map_err(|e| {
        ScrapeError::invalid_url(url, "fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ScrapeError::invalid_url(
            url,
            "fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    let mut request = client.get(url);
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ScrapeError::timeout(url, "fetch", Some(e.into()))
        } else {
            ScrapeError::fetch(url, "fetch", Some(e.into()))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::fetch(
            url,
            "fetch",
            Some(anyhow::anyhow!("unexpected status {}", status)),
        ));
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            ScrapeError::timeout(url, "fetch", Some(e.into()))
        } else {
            ScrapeError::fetch(url, "fetch", Some(e.into()))
        }
    })?;

    Ok(FetchResult {
        status: status.as_u16(),
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}

/// Decode body bytes to a String using the declared charset or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = charset_of(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract the charset parameter from a Content-Type header value.
fn charset_of(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        if let Some(charset) = part.trim().strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}
