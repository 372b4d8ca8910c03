//! Header codec: `Key: Value` lines on disk, a JSON object in memory.

use std::collections::BTreeMap;

use serde_json::Value;

/// Split a header line on its first colon, trimming both halves.
///
/// Returns `None` for lines without a colon.
pub fn parse_header_line(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim().to_string(), value.trim().to_string()))
}

/// Encode already-split header pairs as a pretty JSON object.
///
/// Later duplicates overwrite earlier ones. Keys come out sorted.
pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    let map: BTreeMap<&str, &str> = pairs
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    // A map of strings always serializes
    serde_json::to_string_pretty(&map).unwrap_or_else(|_| String::from("{}"))
}

/// Encode raw `Key: Value` lines. Lines without a colon are skipped.
pub fn encode_headers<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let pairs: Vec<(String, String)> = lines.into_iter().filter_map(parse_header_line).collect();
    encode_pairs(&pairs)
}

/// Decode a JSON object into header pairs, coercing every value to text.
pub fn decode_headers(json: &str) -> Result<Vec<(String, String)>, serde_json::Error> {
    let map: serde_json::Map<String, Value> = serde_json::from_str(json)?;
    Ok(map
        .into_iter()
        .map(|(key, value)| (key, value_to_text(&value)))
        .collect())
}

/// Render decoded headers back into on-disk lines
pub fn to_header_lines(pairs: &[(String, String)]) -> Vec<String> {
    pairs.iter().map(|(k, v)| format!("{}: {}", k, v)).collect()
}

/// Plain textual form of any JSON value.
///
/// Strings lose their quotes, scalars keep their literal form and nested
/// values are written as compact JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::from("null"),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
