//! # Diagnostics
//!
//! Non-fatal findings collected while mapping. Every recorded diagnostic is
//! also emitted through `tracing` so CLI users see it with `RUST_LOG=warn`.

use derive_more::Display;
use serde::Serialize;

/// Classification of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum DiagnosticCode {
    /// A tuple with a variadic rest type.
    #[display("unsupported-tuple-rest")]
    UnsupportedTupleRest,
    /// A singleton union containing non-string literals.
    #[display("non-string-singleton")]
    NonStringSingleton,
    /// A type shape with no OpenAPI representation.
    #[display("unsupported-type")]
    UnsupportedType,
    /// An intersection that is not `readonly & T`.
    #[display("invalid-intersection")]
    InvalidIntersection,
    /// A type reference the semantic model cannot resolve.
    #[display("unresolved-reference")]
    UnresolvedReference,
    /// A well-known library type is not available to the project.
    #[display("missing-well-known-type")]
    MissingWellKnownType,
    /// A parameter shape that cannot be expressed.
    #[display("unsupported-parameter")]
    UnsupportedParameter,
    /// A URL path that cannot be expressed as identifier segments.
    #[display("complex-path")]
    ComplexPath,
    /// A single operation failed and was skipped.
    #[display("operation-failed")]
    OperationFailed,
    /// A resource exists in the service but not in the contract.
    #[display("undocumented-resource")]
    UndocumentedResource,
    /// An operation exists in the contract but not in the service.
    #[display("unimplemented-operation")]
    UnimplementedOperation,
    /// A contract parameter is missing from the resource signature.
    #[display("missing-parameter")]
    MissingParameter,
}

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum Severity {
    /// The output was degraded but is still usable.
    #[display("warning")]
    Warning,
    /// A part of the output was dropped.
    #[display("error")]
    Error,
}

/// A single diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize)]
#[display("{severity}[{code}]: {message}")]
pub struct Diagnostic {
    /// Diagnostic classification.
    pub code: DiagnosticCode,
    /// Severity.
    pub severity: Severity,
    /// Human readable description.
    pub message: String,
}

/// Ordered collection of diagnostics for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning.
    pub fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.push(code, Severity::Warning, message.into());
    }

    /// Records an error.
    pub fn error(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.push(code, Severity::Error, message.into());
    }

    fn push(&mut self, code: DiagnosticCode, severity: Severity, message: String) {
        tracing::warn!(%code, %severity, "{}", message);
        self.entries.push(Diagnostic {
            code,
            severity,
            message,
        });
    }

    /// Appends every diagnostic from `other`.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Returns true when a diagnostic with the given code was recorded.
    pub fn has(&self, code: DiagnosticCode) -> bool {
        self.entries.iter().any(|d| d.code == code)
    }

    /// Iterates over the recorded diagnostics in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the collection, returning the entries.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
