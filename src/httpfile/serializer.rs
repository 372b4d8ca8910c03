//! Canonical text form of a request collection.

use std::fmt::Write;

use thiserror::Error;

use crate::constants::{FILE_MARKER, GLOBALS_HEADER, GLOBAL_VAR_DELIMITER, SECTION_PREFIX};
use crate::httpfile::headers::{decode_headers, to_header_lines};
use crate::models::{RequestCollection, RequestEntry};

/// Serialize a collection. Total: header JSON that fails to decode is
/// logged and omitted, nothing else can go wrong.
pub fn serialize(collection: &RequestCollection) -> String {
    let mut out = String::new();
    out.push_str(FILE_MARKER);
    out.push('\n');

    if !collection.global_vars.is_empty() {
        out.push_str(GLOBALS_HEADER);
        out.push('\n');
        for (name, value) in &collection.global_vars {
            let _ = writeln!(out, "@{}{}{}", name, GLOBAL_VAR_DELIMITER, value);
        }
        out.push('\n');
    }

    for request in &collection.requests {
        write_request(&mut out, request);
    }

    out
}

/// A request whose text form would not read back as the same request
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnsavableRequest {
    #[error("'{0}' has no URL")]
    MissingUrl(String),

    #[error("'{0}' has no valid method")]
    InvalidMethod(String),

    #[error("'{0}' is a reserved section name")]
    ReservedName(String),
}

/// Check that `request` survives a serialize/parse cycle as itself
pub fn check_request(request: &RequestEntry) -> Result<(), UnsavableRequest> {
    let section = format!("{}{}", SECTION_PREFIX, request.name);
    let section = section.trim();
    if section == FILE_MARKER || section.starts_with(GLOBALS_HEADER) {
        return Err(UnsavableRequest::ReservedName(request.name.clone()));
    }

    let method = request.method.trim();
    if method.is_empty() || method.contains(char::is_whitespace) {
        return Err(UnsavableRequest::InvalidMethod(request.name.clone()));
    }

    if request.url.trim().is_empty() {
        return Err(UnsavableRequest::MissingUrl(request.name.clone()));
    }
    Ok(())
}

fn write_request(out: &mut String, request: &RequestEntry) {
    let _ = writeln!(out, "{}{}", SECTION_PREFIX, request.name);
    let _ = writeln!(out, "{} {}", request.method, request.url);

    if !request.headers.is_empty() {
        match decode_headers(&request.headers) {
            Ok(pairs) => {
                for line in to_header_lines(&pairs) {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
            Err(e) => {
                tracing::warn!(name = %request.name, error = %e, "Skipping undecodable headers");
            }
        }
    }

    if !request.body.is_empty() {
        out.push('\n');
        out.push_str(&request.body);
        out.push('\n');
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::httpfile::headers::encode_headers;
    use crate::httpfile::parse;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn sample() -> RequestCollection {
        let mut collection = RequestCollection::default();
        collection
            .global_vars
            .insert("host".to_string(), "https://api.test".to_string());
        collection
            .global_vars
            .insert("token".to_string(), "s3cr3t".to_string());

        let mut create = RequestEntry::new("Create user", "POST", "{{host}}/users");
        create.headers = encode_headers(["Content-Type: application/json", "Authorization: Bearer {{token}}"]);
        create.body = "{\n  \"name\": \"Ada\",\n  \"roles\": [\"admin\"]\n}".to_string();

        let list = RequestEntry::new("List users", "GET", "{{host}}/users?page=1");

        let mut bulk = RequestEntry::new("Bulk", "PUT", "{{host}}/bulk");
        bulk.body = "[{\"id\": 1}, {\"id\": 2}]".to_string();

        collection.requests = vec![create, list, bulk];
        collection
    }

    #[test]
    fn test_serialize_layout() {
        let mut collection = RequestCollection::default();
        collection.global_vars.insert("host".to_string(), "api.test".to_string());
        let mut req = RequestEntry::new("R1", "GET", "/x");
        req.headers = encode_headers(["Accept: */*"]);
        req.body = "{\"a\":1}".to_string();
        collection.requests.push(req);
        collection.requests.push(RequestEntry::new("R2", "DELETE", "/y"));

        let expected = "### ||| POSTBEAR |||\n\
                        ### Global Variables\n\
                        @host = api.test\n\
                        \n\
                        ### R1\n\
                        GET /x\n\
                        Accept: */*\n\
                        \n\
                        {\"a\":1}\n\
                        \n\
                        ### R2\n\
                        DELETE /y\n\
                        \n";
        assert_eq!(serialize(&collection), expected);
    }

    #[test]
    fn test_serialize_empty_collection() {
        assert_eq!(serialize(&RequestCollection::default()), "### ||| POSTBEAR |||\n");
    }

    #[test]
    fn test_malformed_headers_are_omitted() {
        let mut collection = RequestCollection::default();
        let mut req = RequestEntry::new("Bad", "GET", "/bad");
        req.headers = "not json".to_string();
        collection.requests.push(req);
        assert_eq!(serialize(&collection), "### ||| POSTBEAR |||\n### Bad\nGET /bad\n\n");
    }

    #[test]
    fn test_scalar_header_values_are_written_as_text() {
        let mut collection = RequestCollection::default();
        let mut req = RequestEntry::new("R", "GET", "/");
        req.headers = r#"{"X-Count": 3, "X-Debug": false}"#.to_string();
        collection.requests.push(req);
        let text = serialize(&collection);
        assert!(text.contains("X-Count: 3\n"));
        assert!(text.contains("X-Debug: false\n"));
    }

    #[test]
    fn test_round_trip() {
        let original = sample();
        let parsed = parse(&serialize(&original));

        assert_eq!(parsed.global_vars, original.global_vars);
        assert_eq!(parsed.requests.len(), original.requests.len());
        for (got, want) in parsed.requests.iter().zip(&original.requests) {
            assert_eq!(got.name, want.name);
            assert_eq!(got.method, want.method);
            assert_eq!(got.url, want.url);
            assert_eq!(got.body, want.body);
            let got_headers: BTreeMap<_, _> = decode_headers(&got.headers)
                .unwrap_or_default()
                .into_iter()
                .collect();
            let want_headers: BTreeMap<_, _> = decode_headers(&want.headers)
                .unwrap_or_default()
                .into_iter()
                .collect();
            assert_eq!(got_headers, want_headers);
        }
        assert_eq!(parsed.requests[1].params, "?page=1");
    }

    #[test]
    fn test_unnamed_request_round_trips_on_its_own() {
        let mut first = RequestEntry::new("A", "POST", "/a");
        first.body = "{\"a\":1}".to_string();
        let collection = RequestCollection {
            requests: vec![first, RequestEntry::new("", "GET", "http://x.test/b")],
            ..Default::default()
        };

        let parsed = parse(&serialize(&collection));
        assert_eq!(parsed.requests.len(), 2);
        assert_eq!(parsed.requests[0].body, "{\"a\":1}");
        assert_eq!(parsed.requests[1].name, "");
        assert_eq!(parsed.requests[1].url, "http://x.test/b");
        assert!(check_request(&collection.requests[1]).is_ok());
    }

    #[test]
    fn test_blank_request_is_not_savable() {
        let blank = RequestEntry::blank();
        assert_eq!(
            check_request(&blank),
            Err(UnsavableRequest::MissingUrl("New Request".to_string()))
        );
    }

    #[test]
    fn test_reserved_and_invalid_requests() {
        let marker = RequestEntry::new("||| POSTBEAR |||", "GET", "/m");
        assert!(matches!(check_request(&marker), Err(UnsavableRequest::ReservedName(_))));
        let globals = RequestEntry::new("Global Variables", "GET", "/g");
        assert!(matches!(check_request(&globals), Err(UnsavableRequest::ReservedName(_))));
        let method = RequestEntry::new("M", "GE T", "/m");
        assert!(matches!(check_request(&method), Err(UnsavableRequest::InvalidMethod(_))));
        assert!(check_request(&RequestEntry::new("Ok", "GET", "/ok")).is_ok());
    }

    #[test]
    fn test_serialize_parse_serialize_is_stable() {
        let text = "### Global Variables\n\
                    @b = 2\n\
                    @a = 1\n\
                    ### Messy\n\
                    \n\
                    POST   /m\n\
                    Zeta: z\n\
                    alpha :  a \n\
                    [\n\
                    1,\n\
                    2\n\
                    ]\n\
                    \n\
                    \n\
                    ### Other\n\
                    GET /o";
        let first = serialize(&parse(text));
        let second = serialize(&parse(&first));
        assert_eq!(first, second);
    }

    #[test]
    fn test_changing_globals_leaves_requests_untouched() {
        let original = sample();
        let before = serialize(&original);

        let mut updated = parse(&before);
        updated.global_vars.clear();
        updated
            .global_vars
            .insert("other".to_string(), "value".to_string());
        let after = serialize(&updated);

        let requests_part = |text: &str| -> String {
            let start = text.find("### Create user").unwrap_or(text.len());
            text[start..].to_string()
        };
        assert_eq!(requests_part(&before), requests_part(&after));
        assert!(after.contains("@other = value\n"));
        assert!(!after.contains("@host"));
    }
}
