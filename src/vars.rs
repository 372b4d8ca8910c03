//! `{{name}}` placeholder substitution using the file's global variables

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        // Literal pattern, cannot fail to compile
        Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").unwrap()
    })
}

/// Replace every `{{name}}` whose name is a known variable.
///
/// Unknown placeholders are left as written.
pub fn substitute(text: &str, vars: &BTreeMap<String, String>) -> String {
    if vars.is_empty() || !text.contains("{{") {
        return text.to_string();
    }
    placeholder()
        .replace_all(text, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names referenced by placeholders in `text` that have no value in `vars`
pub fn unresolved(text: &str, vars: &BTreeMap<String, String>) -> Vec<String> {
    placeholder()
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .filter(|name| !vars.contains_key(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("host".to_string(), "https://api.test".to_string()),
            ("token".to_string(), "abc".to_string()),
        ])
    }

    #[test]
    fn test_substitute_known() {
        assert_eq!(
            substitute("{{host}}/users?t={{ token }}", &vars()),
            "https://api.test/users?t=abc"
        );
    }

    #[test]
    fn test_unknown_placeholder_kept() {
        assert_eq!(substitute("{{host}}/{{missing}}", &vars()), "https://api.test/{{missing}}");
        assert_eq!(unresolved("{{host}}/{{missing}}", &vars()), vec!["missing".to_string()]);
    }

    #[test]
    fn test_substitute_in_json() {
        let body = r#"{"auth": "{{token}}", "nested": {"a": 1}}"#;
        assert_eq!(
            substitute(body, &vars()),
            r#"{"auth": "abc", "nested": {"a": 1}}"#
        );
    }

    #[test]
    fn test_no_vars_is_identity() {
        assert_eq!(substitute("{{host}}", &BTreeMap::new()), "{{host}}");
    }
}
