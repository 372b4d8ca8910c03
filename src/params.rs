//! Query string helpers backing the params view of a request

/// The `?…` suffix of a URL, or an empty string when there is none
pub fn query_fragment(url: &str) -> &str {
    url.find('?').map(|i| &url[i..]).unwrap_or("")
}

/// The URL without its query part
pub fn base_url(url: &str) -> &str {
    url.find('?').map(|i| &url[..i]).unwrap_or(url)
}

/// Split a query fragment into key/value pairs.
///
/// A leading `?` is optional. Empty pairs are skipped and a pair without `=`
/// gets an empty value.
pub fn parse_query(fragment: &str) -> Vec<(String, String)> {
    let query = fragment.strip_prefix('?').unwrap_or(fragment);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// Build `?k=v&…` from pairs, trimming both sides and skipping empty keys
pub fn to_query_string(pairs: &[(String, String)]) -> String {
    let parts: Vec<String> = pairs
        .iter()
        .filter_map(|(k, v)| {
            let k = k.trim();
            (!k.is_empty()).then(|| format!("{}={}", k, v.trim()))
        })
        .collect();

    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}

/// Params as editable rows, one `key=value` per line
pub fn to_lines(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read `key=value` rows back. Blank rows are skipped.
pub fn parse_lines(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (line.to_string(), String::new()),
        })
        .collect()
}

/// Replace the query part of `url` with `pairs`
pub fn with_query(url: &str, pairs: &[(String, String)]) -> String {
    format!("{}{}", base_url(url), to_query_string(pairs))
}
