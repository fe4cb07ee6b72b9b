//! Small JSON-over-HTTP client used by the search backend and account store.
//!
//! - Request options: headers, [`Auth`], query params, timeout, retries
//! - Secret query params are redacted and auth values are never logged
//! - Retries network failures, 429 and 5xx with exponential backoff and
//!   `Retry-After` support; callers opt out with `retries: Some(0)`
//!
//! ```no_run
//! # async fn demo() -> Result<(), lookout_http::HttpError> {
//! let client = lookout_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", lookout_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;

pub use reqwest::StatusCode;

const SNIPPET_MAX: usize = 500;
const BACKOFF_BASE_MS: u64 = 200;
const TOO_MANY_REQUESTS_FLOOR: Duration = Duration::from_millis(1100);
const SECRET_PARAMS: [&str; 9] = [
    "access_token",
    "authorization",
    "auth",
    "key",
    "api_key",
    "token",
    "secret",
    "client_secret",
    "bearer",
];

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    /// HTTP status of an API error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for showing to an end user.
    ///
    /// API errors expose the server's own message; everything else uses the
    /// `Display` text.
    pub fn user_message(&self) -> String {
        match self {
            HttpError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Authentication strategies.
///
/// ```
/// use lookout_http::Auth;
///
/// let bearer = Auth::Bearer("token");
/// assert_eq!(bearer.kind(), "bearer");
/// assert_eq!(Auth::None.kind(), "none");
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// `Authorization: Bearer <token>`
    Bearer(&'a str),
    /// Custom header such as `X-Api-Key`.
    Header {
        name: HeaderName,
        value: HeaderValue,
    },
    /// Auth via query param.
    Query {
        name: &'a str,
        value: Cow<'a, str>,
    },
    None,
}

impl Auth<'_> {
    /// Label used in logs instead of the secret.
    pub fn kind(&self) -> &'static str {
        match self {
            Auth::Bearer(_) => "bearer",
            Auth::Header { .. } => "header",
            Auth::Query { .. } => "query",
            Auth::None => "none",
        }
    }
}

/// Per-request knobs.
///
/// ```
/// use lookout_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     retries: Some(0),
///     ..Default::default()
/// };
/// assert_eq!(opts.retries, Some(0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// A missing trailing slash is added so relative paths join below the
    /// base instead of replacing its last segment.
    ///
    /// ```no_run
    /// use lookout_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com/v1")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 2);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&normalized).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 2,
        })
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// GET JSON with per-request options.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json::<(), T>(Method::GET, path, None, opts)
            .await
    }

    /// POST a JSON body with per-request options.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request_json(Method::POST, path, Some(body), opts)
            .await
    }

    async fn request_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| HttpError::Url(e.to_string()))?;
        let body_bytes = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        let mut query = opts.query.clone().unwrap_or_default();
        if let Some(Auth::Query { name, value }) = &opts.auth {
            query.push((*name, value.clone()));
        }
        let bearer = match &opts.auth {
            Some(Auth::Bearer(tok)) => Some(sanitize_token(tok)?),
            _ => None,
        };

        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let auth_kind = opts.auth.as_ref().map(Auth::kind).unwrap_or("none");
        let req_id = format!("r{}", REQUEST_SEQ.fetch_add(1, Ordering::Relaxed));
        let mut attempt = 0usize;

        loop {
            let mut rb = self
                .inner
                .request(method.clone(), url.clone())
                .timeout(timeout);
            if !query.is_empty() {
                let pairs: Vec<(&str, &str)> =
                    query.iter().map(|(k, v)| (*k, v.as_ref())).collect();
                rb = rb.query(&pairs);
            }
            if let Some(bytes) = &body_bytes {
                rb = rb
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(bytes.clone());
            }
            if let Some(hdrs) = &opts.headers {
                rb = rb.headers(hdrs.clone());
            }
            match (&opts.auth, &bearer) {
                (_, Some(tok)) => rb = rb.bearer_auth(tok),
                (Some(Auth::Header { name, value }), None) => rb = rb.header(name, value),
                _ => {}
            }

            tracing::debug!(
                req_id = %req_id,
                attempt = attempt + 1,
                max_retries,
                method = %method,
                host_path = %format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
                query = ?redact_query(&query),
                timeout_ms = timeout.as_millis() as u64,
                auth_kind,
                has_body = body_bytes.is_some(),
                "http.request.start"
            );

            let started = Instant::now();
            let sent = match rb.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let headers = resp.headers().clone();
                    resp.bytes().await.map(|bytes| (status, headers, bytes))
                }
                Err(err) => Err(err),
            };

            let (status, headers, bytes) = match sent {
                Ok(parts) => parts,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            req_id = %req_id,
                            attempt,
                            max_retries,
                            backoff_ms = delay.as_millis() as u64,
                            message = %message,
                            "http.retrying.network"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(req_id = %req_id, attempt, message = %message, "http.network_error");
                    return Err(HttpError::Network(message));
                }
            };

            let request_id = headers
                .get("x-request-id")
                .or_else(|| headers.get("x-correlation-id"))
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string();
            let snippet = snip_body(&bytes);
            tracing::debug!(
                req_id = %req_id,
                %status,
                duration_ms = started.elapsed().as_millis() as u64,
                body_len = bytes.len(),
                x_request_id = %request_id,
                "http.response"
            );
            tracing::trace!(req_id = %req_id, body_snippet = %snippet, "http.response.body_snippet");

            if status.is_success() {
                return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                    tracing::warn!(
                        req_id = %req_id,
                        serde_err = %e,
                        body_snippet = %snippet,
                        "http.response.decode_error"
                    );
                    HttpError::Decode(e.to_string(), snippet)
                });
            }

            let message = extract_error_message(&bytes);
            let is_429 = status == StatusCode::TOO_MANY_REQUESTS;
            if (is_429 || status.is_server_error()) && attempt < max_retries {
                attempt += 1;
                let delay = match retry_after_secs(&headers) {
                    Some(secs) => Duration::from_secs(secs),
                    None if is_429 => backoff(attempt).max(TOO_MANY_REQUESTS_FLOOR),
                    None => backoff(attempt),
                };
                tracing::warn!(
                    req_id = %req_id,
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms = delay.as_millis() as u64,
                    message = %message,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            tracing::warn!(
                req_id = %req_id,
                %status,
                message = %message,
                x_request_id = %request_id,
                "http.error"
            );
            return Err(HttpError::Api {
                status,
                message,
                request_id,
            });
        }
    }
}

fn backoff(attempt: usize) -> Duration {
    let shift = attempt.saturating_sub(1).min(10) as u32;
    Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(1u64 << shift))
}

fn redact_query(query: &[(&str, Cow<'_, str>)]) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(k, v)| {
            let secret = SECRET_PARAMS.contains(&k.to_ascii_lowercase().as_str());
            let shown = if secret {
                "<redacted>".to_string()
            } else {
                v.to_string()
            };
            ((*k).to_string(), shown)
        })
        .collect()
}

fn extract_error_message(body: &[u8]) -> String {
    // {"error":{"message":"..."}}
    #[derive(Deserialize)]
    struct Nested {
        error: NestedDetail,
    }
    #[derive(Deserialize)]
    struct NestedDetail {
        message: String,
    }

    // {"message":"..."} / {"detail":"..."} / {"error":"..."} / {"Error code":"..."}
    #[derive(Deserialize)]
    struct Flat {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        error: String,
        #[serde(default, rename = "Error code")]
        error_code: String,
    }

    if let Ok(env) = serde_json::from_slice::<Nested>(body) {
        return env.error.message;
    }
    if let Ok(m) = serde_json::from_slice::<Flat>(body) {
        for candidate in [m.message, m.detail, m.error, m.error_code] {
            if !candidate.is_empty() {
                return candidate;
            }
        }
    }
    snip_body(body)
}

fn retry_after_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .trim()
        .parse()
        .ok()
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

fn sanitize_token(raw: &str) -> Result<String, HttpError> {
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    s.retain(|ch| !ch.is_ascii_whitespace());

    if !s.is_ascii() {
        return Err(HttpError::Build("token contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build("token contains control characters".into()));
    }
    HeaderValue::from_str(&format!("Bearer {s}"))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}
