//! HTTP client wrapper - builds requests from the parsed model and executes them

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::constants::REQUEST_TIMEOUT_SECS;
use crate::httpfile::headers::decode_headers;
use crate::messages::NetworkResponse;
use crate::models::{method_has_body, RequestEntry, Response};
use crate::vars::substitute;

/// Reasons a request never leaves the machine
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("Incorrect headers: {0}")]
    Headers(#[from] serde_json::Error),

    #[error("Invalid HTTP method: {0:?}")]
    Method(String),

    #[error("Missing URL")]
    MissingUrl,
}

/// A request with variables substituted, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: reqwest::Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl PreparedRequest {
    /// Substitute variables and decode headers.
    ///
    /// The body is only attached for POST, PUT and PATCH.
    pub fn from_entry(
        request: &RequestEntry,
        variables: &BTreeMap<String, String>,
    ) -> Result<Self, PrepareError> {
        let method_name = request.method.trim().to_ascii_uppercase();
        let method = reqwest::Method::from_bytes(method_name.as_bytes())
            .map_err(|_| PrepareError::Method(request.method.clone()))?;

        let url = substitute(request.url.trim(), variables);
        if url.is_empty() {
            return Err(PrepareError::MissingUrl);
        }

        let headers_json = substitute(request.headers.trim(), variables);
        let headers = if headers_json.is_empty() {
            Vec::new()
        } else {
            decode_headers(&headers_json)?
        };

        let body = (method_has_body(&method_name) && !request.body.is_empty())
            .then(|| substitute(&request.body, variables));

        Ok(PreparedRequest {
            method,
            url,
            headers,
            body,
        })
    }

    fn into_builder(self, client: &reqwest::Client) -> reqwest::RequestBuilder {
        let mut builder = client.request(self.method, &self.url);
        for (key, value) in &self.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = self.body {
            builder = builder.body(body);
        }
        builder
    }
}

/// Pretty print JSON bodies, pass anything else through
pub fn format_body(body: String) -> String {
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or(body),
        Err(_) => body,
    }
}

/// Send a prepared request and collect the full response
pub async fn send(
    client: &reqwest::Client,
    request: PreparedRequest,
) -> Result<Response, reqwest::Error> {
    let start = Instant::now();
    let resp = request.into_builder(client).send().await?;
    // Latency is measured up to the response head, like the status line shows it
    let time_ms = start.elapsed().as_millis() as u64;

    let status = resp.status();
    let version = format!("{:?}", resp.version());
    let content_length = resp.content_length();
    let headers = resp
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect();
    let body = resp.text().await?;

    Ok(Response {
        status_code: Some(status.as_u16()),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        version,
        content_length,
        headers,
        body: format_body(body),
        time_ms,
    })
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("Request timed out ({}s)", REQUEST_TIMEOUT_SECS)
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_builder() {
        format!("Failed to make request: {}", e)
    } else {
        format!("Request failed: {}", e)
    }
}

/// Execute a request from the collection and wrap the outcome for the App layer
pub async fn execute_request(
    client: &reqwest::Client,
    request: RequestEntry,
    variables: BTreeMap<String, String>,
    request_id: u64,
) -> NetworkResponse {
    let start = Instant::now();
    let prepared = match PreparedRequest::from_entry(&request, &variables) {
        Ok(prepared) => prepared,
        Err(e) => {
            return NetworkResponse::Error {
                id: request_id,
                message: e.to_string(),
                time_ms: 0,
            }
        }
    };

    match send(client, prepared).await {
        Ok(response) => NetworkResponse::Success {
            id: request_id,
            response,
        },
        Err(e) => NetworkResponse::Error {
            id: request_id,
            message: describe_error(&e),
            time_ms: start.elapsed().as_millis() as u64,
        },
    }
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
