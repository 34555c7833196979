//! Placeholder extraction and substitution for template bodies

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{(\w+)\}").unwrap();
}

/// Distinct `{identifier}` names in order of first appearance
pub fn extract_placeholders(body: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(body) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Replace every `{identifier}` in `body` with its value from `values`.
///
/// Substitution is a single pass over the input body: a replacement value
/// that itself looks like a placeholder is emitted verbatim. Unknown names
/// become empty strings and braces that do not form a placeholder are left
/// untouched, so this never fails.
pub fn substitute_placeholders(body: &str, values: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(body, |caps: &Captures<'_>| {
            values.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extract_in_order_without_duplicates() {
        let names = extract_placeholders("{b} and {a} then {b} {not valid} {c_1}");
        assert_eq!(names, vec!["b", "a", "c_1"]);
    }

    #[test]
    fn test_substitute_simple() {
        let result = substitute_placeholders("Hello, {name}!", &values(&[("name", "World")]));
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_substitute_missing_is_empty() {
        let result = substitute_placeholders("Tip: {tip}|", &HashMap::new());
        assert_eq!(result, "Tip: |");
    }

    #[test]
    fn test_substitute_is_not_recursive() {
        let result = substitute_placeholders(
            "{a} {b}",
            &values(&[("a", "{b}"), ("b", "second")]),
        );
        assert_eq!(result, "{b} second");
    }

    #[test]
    fn test_stray_braces_are_kept() {
        let result = substitute_placeholders("{ {} {x y} }{x}", &values(&[("x", "1")]));
        assert_eq!(result, "{ {} {x y} }1");
    }
}
