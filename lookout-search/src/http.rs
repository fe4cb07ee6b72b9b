//! JSON search API client.
//!
//! The request body is `{ "token", "request", "limit", "lang" }`. Responses
//! may wrap the per-source map in a top-level `List` object next to response
//! metadata; the map is unwrapped so the renderer sees the sources directly.
//! The call is made exactly once: there is no retry for searches.

use async_trait::async_trait;
use lookout_http::{HttpClient, HttpError, RequestOpts};
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::assess::has_results;
use crate::{SearchBackend, SearchError, SearchOutcome};

const QUERY_LOG_MAX: usize = 160;
const ERROR_KEYS: [&str; 2] = ["Error code", "error"];

#[derive(Clone)]
pub struct HttpSearchBackend {
    http: HttpClient,
    path: String,
    token: String,
    limit: u32,
    lang: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    token: &'a str,
    request: &'a str,
    limit: u32,
    lang: &'a str,
}

impl HttpSearchBackend {
    pub fn new(endpoint: &str, token: impl Into<String>) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(endpoint)?.with_retries(0),
            path: String::new(),
            token: token.into(),
            limit: 100,
            lang: "en".to_string(),
        })
    }

    /// Path below the endpoint the query is POSTed to.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let query = query.trim();
        let started = Instant::now();
        tracing::info!(target: "search.http", query = %query_snippet(query), "search.http.start");

        let request = SearchRequest {
            token: &self.token,
            request: query,
            limit: self.limit,
            lang: &self.lang,
        };
        let body: Value = self
            .http
            .post_json(
                &self.path,
                &request,
                RequestOpts {
                    retries: Some(0),
                    ..Default::default()
                },
            )
            .await?;

        if let Some(message) = backend_error(&body) {
            tracing::warn!(target: "search.http", message = %message, "search.http.rejected");
            return Err(SearchError::Rejected(message));
        }

        let outcome = interpret(body);
        tracing::info!(
            target: "search.http",
            has_results = outcome.has_results,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search.http.done"
        );
        Ok(outcome)
    }
}

/// Split a response into the renderable result and the credit flag.
pub fn interpret(body: Value) -> SearchOutcome {
    let total = body.get("NumOfResults").and_then(Value::as_f64);
    tracing::debug!(
        target: "search.http",
        total = ?total,
        databases = ?body.get("NumOfDatabase").or_else(|| body.get("NumOfDatabases")),
        price = ?body.get("price"),
        search_time = ?body.get("search time").or_else(|| body.get("search_time")),
        "search.http.meta"
    );

    let data = match body {
        Value::Object(mut map) if map.get("List").is_some_and(Value::is_object) => {
            map.remove("List").unwrap_or_default()
        }
        other => other,
    };
    let has_results = match total {
        Some(total) => total > 0.0,
        None => has_results(&data),
    };
    SearchOutcome { data, has_results }
}

fn backend_error(body: &Value) -> Option<String> {
    ERROR_KEYS.iter().find_map(|key| match body.get(*key)? {
        Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
        Value::Number(code) => Some(format!("search failed with code {code}")),
        _ => None,
    })
}

fn query_snippet(query: &str) -> String {
    match query.char_indices().nth(QUERY_LOG_MAX) {
        Some((cut, _)) => format!("{}…", &query[..cut]),
        None => query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_wrapper_is_unwrapped() {
        let outcome = interpret(json!({
            "List": {"Breach": {"Data": [{"email": "a@x.io"}]}},
            "NumOfResults": 1,
            "price": 0,
        }));
        assert_eq!(outcome.data, json!({"Breach": {"Data": [{"email": "a@x.io"}]}}));
        assert!(outcome.has_results);
    }

    #[test]
    fn total_of_zero_means_no_results() {
        let outcome = interpret(json!({
            "List": {"No results found": {"InfoLeak": "Nothing"}},
            "NumOfResults": 0,
        }));
        assert!(!outcome.has_results);
        assert_eq!(outcome.data, json!({"No results found": {"InfoLeak": "Nothing"}}));
    }

    #[test]
    fn other_shapes_pass_through() {
        let outcome = interpret(json!([{"a": 1}]));
        assert_eq!(outcome.data, json!([{"a": 1}]));
        assert!(outcome.has_results);

        let outcome = interpret(json!({"List": "flat", "x": 1}));
        assert_eq!(outcome.data, json!({"List": "flat", "x": 1}));
    }

    #[test]
    fn error_fields_are_detected() {
        assert_eq!(
            backend_error(&json!({"Error code": "bad token"})).as_deref(),
            Some("bad token")
        );
        assert_eq!(
            backend_error(&json!({"error": 7})).as_deref(),
            Some("search failed with code 7")
        );
        assert_eq!(backend_error(&json!({"error": ""})), None);
        assert_eq!(backend_error(&json!([1])), None);
    }

    #[test]
    fn long_queries_are_shortened_for_logs() {
        let long = "é".repeat(200);
        let snip = query_snippet(&long);
        assert_eq!(snip.chars().count(), QUERY_LOG_MAX + 1);
        assert_eq!(query_snippet("short"), "short");
    }
}
