#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Identifier quoting and escaping for generated source, type names for
//! schema components, and complex path detection.

use regex::Regex;
use std::sync::OnceLock;

const RESERVED_WORDS: &[&str] = &[
    "abstract", "annotation", "any", "anydata", "as", "base16", "base64", "boolean", "break",
    "by", "byte", "check", "checkpanic", "class", "client", "configurable", "const",
    "continue", "decimal", "default", "distinct", "do", "else", "enum", "equals", "error",
    "external", "fail", "false", "field", "final", "float", "foreach", "fork", "from",
    "function", "future", "handle", "if", "import", "in", "int", "is", "isolated", "join",
    "json", "key", "let", "limit", "listener", "lock", "map", "match", "never", "new", "null",
    "object", "on", "order", "outer", "panic", "private", "public", "readonly", "record",
    "remote", "resource", "retry", "return", "returns", "rollback", "select", "service",
    "source", "start", "stream", "string", "table", "transaction", "trap", "true", "type",
    "typedesc", "typeof", "var", "version", "where", "while", "worker", "xml", "xmlns",
];

fn template_segment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\{[A-Za-z_][A-Za-z0-9_.\-]*\}$").expect("Invalid regex"))
}

/// True for words that must be quoted when used as identifiers.
pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// Quotes reserved words with `'` and escapes non-identifier characters with `\`.
///
/// e.g. `type` -> `'type`, `x-rate` -> `x\-rate`, `1st` -> `'1st`
pub fn escape_identifier(name: &str) -> String {
    if name.is_empty() {
        return "_".to_string();
    }

    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            escaped.push(c);
        } else {
            escaped.push('\\');
            escaped.push(c);
        }
    }

    let leading_digit = name.chars().next().is_some_and(|c| c.is_ascii_digit());
    if is_reserved(name) || leading_digit {
        format!("'{}", escaped)
    } else {
        escaped
    }
}

/// Converts a header or property name into a lower camelCase identifier.
///
/// e.g. `X-Rate-Limit` -> `xRateLimit`, `api_key` -> `apiKey`
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    for part in s.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = part.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        if result.is_empty() {
            result.push(first.to_ascii_lowercase());
        } else {
            result.push(first.to_ascii_uppercase());
        }
        result.push_str(&lower_if_shouting(chars.as_str()));
    }
    if result.is_empty() {
        "param".to_string()
    } else {
        escape_identifier(&result)
    }
}

/// `RATE` -> `rate`, `Limit` stays `Limit`.
fn lower_if_shouting(s: &str) -> String {
    if s.len() > 1 && s.chars().all(|c| !c.is_ascii_lowercase()) {
        s.to_ascii_lowercase()
    } else {
        s.to_string()
    }
}

/// Converts a component name into a type name.
///
/// e.g. `pet` -> `Pet`, `pet-store` -> `PetStore`, `Pet` stays `Pet`
pub fn type_name(name: &str) -> String {
    let mut result = String::new();
    for part in name.split(|c: char| !c.is_ascii_alphanumeric() && c != '_') {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            result.push(first.to_ascii_uppercase());
            result.push_str(chars.as_str());
        }
    }
    if result.is_empty() {
        return "Anonymous".to_string();
    }
    escape_identifier(&result)
}

/// True when a path cannot be expressed as resource path segments.
///
/// Templated segments must consist of exactly one `{name}` expression;
/// `/{a}-{b}`, `/files/{name}.json` and operator expressions like `{+path}`
/// are complex.
pub fn is_complex_path(path: &str) -> bool {
    path.split('/')
        .filter(|segment| segment.contains('{') || segment.contains('}'))
        .any(|segment| !template_segment_regex().is_match(segment))
}
