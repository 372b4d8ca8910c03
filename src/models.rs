use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{DEFAULT_HEADERS, METHODS, NEW_REQUEST_NAME};
use crate::httpfile::headers::encode_pairs;
use crate::params::query_fragment;
use crate::vars::unresolved;

/// Returns true for methods that carry a request body
pub fn method_has_body(method: &str) -> bool {
    matches!(
        method.trim().to_ascii_uppercase().as_str(),
        "POST" | "PUT" | "PATCH"
    )
}

/// Next method in the selector cycle. Unknown methods restart at GET.
pub fn next_method(method: &str) -> &'static str {
    let current = method.trim().to_ascii_uppercase();
    match METHODS.iter().position(|m| *m == current) {
        Some(i) => METHODS[(i + 1) % METHODS.len()],
        None => METHODS[0],
    }
}

/// A single HTTP request definition from the request file
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEntry {
    pub name: String,
    pub method: String,
    pub url: String,
    /// Pretty-printed JSON object, or empty when the request has no headers
    pub headers: String,
    pub body: String,
    /// Query fragment derived from `url`; never persisted
    #[serde(skip)]
    pub params: String,
}

impl RequestEntry {
    pub fn new(
        name: impl Into<String>,
        method: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let mut entry = RequestEntry {
            name: name.into(),
            method: method.into(),
            url: url.into(),
            ..Default::default()
        };
        entry.sync_params();
        entry
    }

    /// Blank request as created by the "new request" action
    pub fn blank() -> Self {
        let headers: Vec<(String, String)> = DEFAULT_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RequestEntry {
            name: NEW_REQUEST_NAME.to_string(),
            method: METHODS[0].to_string(),
            headers: encode_pairs(&headers),
            ..Default::default()
        }
    }

    /// Refresh `params` from the query part of `url`
    pub fn sync_params(&mut self) {
        self.params = query_fragment(&self.url).to_string();
    }

    /// Placeholders in URL, headers or body with no value in `vars`,
    /// sorted and without repeats
    pub fn unresolved_vars(&self, vars: &BTreeMap<String, String>) -> Vec<String> {
        let mut names: Vec<String> = [&self.url, &self.headers, &self.body]
            .into_iter()
            .flat_map(|text| unresolved(text, vars))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Whether the method line was seen while parsing
    pub fn is_defined(&self) -> bool {
        !self.method.is_empty() || !self.url.is_empty()
    }
}

/// Everything stored in one request file
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCollection {
    pub global_vars: BTreeMap<String, String>,
    pub requests: Vec<RequestEntry>,
}

impl RequestCollection {
    /// First request with the given name
    pub fn find(&self, name: &str) -> Option<&RequestEntry> {
        self.requests.iter().find(|r| r.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.global_vars.is_empty() && self.requests.is_empty()
    }
}

/// Response from HTTP request
#[derive(Clone, Debug, Default)]
pub struct Response {
    pub status_code: Option<u16>,
    pub status_text: String,
    pub version: String,
    pub content_length: Option<u64>,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub time_ms: u64,
}

impl Response {
    /// Placeholder shown before the first request is sent
    pub fn welcome() -> Self {
        Response {
            body: String::from(
                r#"Quick Reference:
────────────────────────────
  ↑/↓   Select request
  s     Send request
  e     Edit field
  n     New request
  Ctrl+S Save file
  v     Global variables
  ?     Full help
  q     Quit
────────────────────────────
Press 's' to send the selected request!"#,
            ),
            ..Default::default()
        }
    }
}
