//! File loading and diagnostic reporting shared by the commands.

use std::fs;
use std::path::Path;

use oas_bridge_core::{Diagnostic, ServiceBundle, Severity};
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};

/// Reads a file, failing with a readable message when it is missing.
pub fn read_file(path: &Path) -> CliResult<String> {
    if !path.exists() {
        return Err(CliError::General(format!("Input file not found: {:?}", path)));
    }
    debug!(path = %path.display(), "Reading input");
    Ok(fs::read_to_string(path)?)
}

/// Loads a service bundle. `.yaml`/`.yml` files are read as YAML, anything
/// else as JSON.
pub fn read_service_bundle(path: &Path) -> CliResult<ServiceBundle> {
    let source = read_file(path)?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    if is_yaml {
        Ok(serde_yaml::from_str(&source)?)
    } else {
        Ok(serde_json::from_str(&source)?)
    }
}

/// Reads the optional license header file.
pub fn read_license(path: Option<&Path>) -> CliResult<Option<String>> {
    path.map(read_file).transpose()
}

/// Base name used for rendered files: the input file stem with characters
/// outside `[A-Za-z0-9_]` replaced by `_`.
pub fn file_stem(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Prints diagnostics to stderr; returns the number of errors among them.
pub fn report<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> usize {
    let mut errors = 0;
    for diagnostic in diagnostics {
        if diagnostic.severity == Severity::Error {
            errors += 1;
        } else {
            warn!(code = %diagnostic.code, "{}", diagnostic.message);
        }
        eprintln!("{}", diagnostic);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BUNDLE_JSON: &str = r#"{
        "service": {
            "base_path": "/hello",
            "resources": [
                {
                    "method": "get",
                    "path": [{ "kind": "literal", "value": "greeting" }],
                    "return_type": { "kind": "primitive", "name": "string" }
                }
            ]
        }
    }"#;

    #[test]
    fn test_bundle_format_follows_extension() {
        let dir = tempdir().unwrap();
        let json_path = dir.path().join("hello.json");
        fs::write(&json_path, BUNDLE_JSON).unwrap();
        let bundle = read_service_bundle(&json_path).unwrap();
        assert_eq!(bundle.service.base_path, "/hello");

        let yaml_path = dir.path().join("hello.yml");
        fs::write(&yaml_path, BUNDLE_JSON).unwrap();
        let bundle = read_service_bundle(&yaml_path).unwrap();
        assert_eq!(bundle.service.resources.len(), 1);
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let err = read_service_bundle(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }

    #[test]
    fn test_file_stem_is_sanitized() {
        assert_eq!(
            file_stem(Path::new("specs/pet-store.v2.yaml")),
            Some("pet_store_v2".to_string())
        );
    }
}
