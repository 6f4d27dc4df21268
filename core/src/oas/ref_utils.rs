#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Contracts may only reference their own `#/components/...` sections; no
//! external document is ever fetched.

use crate::error::{AppError, AppResult};
use percent_encoding::percent_decode_str;

/// Extracts the component name of a `#/components/{section}/{name}` reference.
///
/// Anything else (external documents, other sections, other pointers) is an
/// [`AppError::InvalidReference`].
pub(crate) fn local_component_name(ref_str: &str, section: &str) -> AppResult<String> {
    let invalid = || AppError::InvalidReference(ref_str.to_string());

    let pointer = ref_str.strip_prefix("#/").ok_or_else(invalid)?;
    let segments: Vec<&str> = pointer.split('/').collect();
    match segments.as_slice() {
        ["components", found, name] if *found == section => {
            let decoded = decode_pointer_segment(name);
            if decoded.is_empty() {
                Err(invalid())
            } else {
                Ok(decoded)
            }
        }
        _ => Err(invalid()),
    }
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent escapes).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_component_reference() {
        let name = local_component_name("#/components/schemas/Pet", "schemas").unwrap();
        assert_eq!(name, "Pet");
    }

    #[test]
    fn test_wrong_section_is_rejected() {
        let err = local_component_name("#/components/responses/Pet", "schemas").unwrap_err();
        assert!(matches!(err, AppError::InvalidReference(_)));
    }

    #[test]
    fn test_external_reference_is_rejected() {
        let err = local_component_name("pets.yaml#/components/schemas/Pet", "schemas").unwrap_err();
        assert!(matches!(err, AppError::InvalidReference(r) if r.starts_with("pets.yaml")));
    }

    #[test]
    fn test_decode_pointer_segment_percent_encoding() {
        assert_eq!(decode_pointer_segment("User%20Profile~1details"), "User Profile/details");
    }
}
