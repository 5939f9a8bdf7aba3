//! Snippet data model and normalization.
//!
//! Raw entries arrive in the editor snippet-file shape: `prefix` and `body`
//! may each be a single string or an array of strings, and `scope` is a
//! free-text language list. Normalization turns them into the canonical
//! in-memory form the aggregation engine works with: an order-preserving
//! prefix set, pre-split body lines, and a lower-cased language list that is
//! never empty (`"*"` stands in for "every language").

use serde::Deserialize;

/// Language key under which globally-scoped snippets are bucketed.
pub const GLOBAL_LANGUAGE: &str = "*";

/// A field that may be a single string or an array of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    fn into_vec(self) -> Vec<String> {
        match self {
            StringOrList::One(s) => vec![s],
            StringOrList::Many(list) => list,
        }
    }
}

/// One entry as found in a snippet file, keyed by its display name.
///
/// Unknown fields are tolerated; only the structural shape of the required
/// fields is validated.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSnippetEntry {
    pub prefix: StringOrList,
    pub body: StringOrList,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Canonical in-memory snippet form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSnippet {
    /// Display name (the entry's key in its source file).
    pub name: String,
    /// Completion prefixes, order-preserving and deduplicated. Never empty.
    pub prefixes: Vec<String>,
    /// Body lines, already split on line boundaries.
    pub body_lines: Vec<String>,
    pub description: Option<String>,
    /// Lower-cased language tags; [`GLOBAL_LANGUAGE`] means global. Never empty.
    pub target_languages: Vec<String>,
}

impl NormalizedSnippet {
    /// Normalize a raw entry.
    ///
    /// Returns a human-readable message when the entry violates the
    /// structural shape (currently: an empty prefix set). Callers attach the
    /// file path and report it as a file-level parse error.
    pub fn from_raw(name: &str, raw: RawSnippetEntry) -> std::result::Result<Self, String> {
        let prefixes = dedup_preserving(raw.prefix.into_vec());
        if prefixes.is_empty() {
            return Err("prefix must contain at least one string".to_string());
        }

        let body_lines = match raw.body {
            StringOrList::One(s) => split_body_lines(&s),
            StringOrList::Many(lines) => lines,
        };

        let target_languages = match raw.scope.as_deref() {
            Some(scope) => split_scope(scope),
            None => vec![GLOBAL_LANGUAGE.to_string()],
        };

        Ok(Self {
            name: name.to_string(),
            prefixes,
            body_lines,
            description: raw.description,
            target_languages,
        })
    }

    /// Whether this snippet applies to every language.
    pub fn is_global(&self) -> bool {
        self.target_languages.iter().any(|l| l == GLOBAL_LANGUAGE)
    }
}

/// Split a single-string body on `\n` or `\r\n` boundaries.
fn split_body_lines(body: &str) -> Vec<String> {
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Split a scope string on runs of commas and whitespace into lower-cased
/// tokens. A blank scope yields the global sentinel.
fn split_scope(scope: &str) -> Vec<String> {
    let tokens: Vec<String> = scope
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect();

    if tokens.is_empty() {
        vec![GLOBAL_LANGUAGE.to_string()]
    } else {
        tokens
    }
}

/// Deduplicate while keeping first-occurrence order.
fn dedup_preserving(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(json: &str) -> RawSnippetEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_single_prefix_becomes_one_element_set() {
        let raw = entry(r#"{"prefix": "logv", "body": "console.log($1);"}"#);
        let snippet = NormalizedSnippet::from_raw("Log", raw).unwrap();
        assert_eq!(snippet.prefixes, vec!["logv"]);
    }

    #[test]
    fn test_prefix_array_deduplicates_preserving_order() {
        let raw = entry(r#"{"prefix": ["fnx", "func", "fnx"], "body": []}"#);
        let snippet = NormalizedSnippet::from_raw("Function", raw).unwrap();
        assert_eq!(snippet.prefixes, vec!["fnx", "func"]);
    }

    #[test]
    fn test_empty_prefix_array_is_invalid() {
        let raw = entry(r#"{"prefix": [], "body": "x"}"#);
        let result = NormalizedSnippet::from_raw("Broken", raw);
        assert!(result.is_err());
    }

    #[test]
    fn test_body_string_splits_on_lf() {
        let raw = entry(r#"{"prefix": "p", "body": "one\ntwo\nthree"}"#);
        let snippet = NormalizedSnippet::from_raw("Multi", raw).unwrap();
        assert_eq!(snippet.body_lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_body_string_splits_on_crlf() {
        let raw = entry(r#"{"prefix": "p", "body": "one\r\ntwo"}"#);
        let snippet = NormalizedSnippet::from_raw("Crlf", raw).unwrap();
        assert_eq!(snippet.body_lines, vec!["one", "two"]);
    }

    #[test]
    fn test_body_trailing_newline_keeps_natural_split() {
        let raw = entry(r#"{"prefix": "p", "body": "one\n"}"#);
        let snippet = NormalizedSnippet::from_raw("Trailing", raw).unwrap();
        assert_eq!(snippet.body_lines, vec!["one", ""]);
    }

    #[test]
    fn test_body_array_used_as_is() {
        let raw = entry(r#"{"prefix": "p", "body": ["a", "b"]}"#);
        let snippet = NormalizedSnippet::from_raw("Array", raw).unwrap();
        assert_eq!(snippet.body_lines, vec!["a", "b"]);
    }

    #[test]
    fn test_absent_scope_defaults_to_global() {
        let raw = entry(r#"{"prefix": "p", "body": "x"}"#);
        let snippet = NormalizedSnippet::from_raw("Global", raw).unwrap();
        assert_eq!(snippet.target_languages, vec![GLOBAL_LANGUAGE]);
        assert!(snippet.is_global());
    }

    #[test]
    fn test_blank_scope_defaults_to_global() {
        let raw = entry(r#"{"prefix": "p", "body": "x", "scope": "   "}"#);
        let snippet = NormalizedSnippet::from_raw("Blank", raw).unwrap();
        assert_eq!(snippet.target_languages, vec![GLOBAL_LANGUAGE]);
    }

    #[test]
    fn test_scope_splits_on_commas_and_whitespace() {
        let raw = entry(r#"{"prefix": "p", "body": "x", "scope": "JavaScript, TypeScript  vue"}"#);
        let snippet = NormalizedSnippet::from_raw("Scoped", raw).unwrap();
        assert_eq!(
            snippet.target_languages,
            vec!["javascript", "typescript", "vue"]
        );
        assert!(!snippet.is_global());
    }

    #[test]
    fn test_unknown_fields_are_tolerated() {
        let raw = entry(r#"{"prefix": "p", "body": "x", "isFileTemplate": true}"#);
        assert!(NormalizedSnippet::from_raw("Extra", raw).is_ok());
    }

    #[test]
    fn test_description_is_carried_through() {
        let raw = entry(r#"{"prefix": "p", "body": "x", "description": "says hi"}"#);
        let snippet = NormalizedSnippet::from_raw("Desc", raw).unwrap();
        assert_eq!(snippet.description.as_deref(), Some("says hi"));
    }
}
