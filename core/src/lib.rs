#![deny(missing_docs)]

//! # OAS Bridge Core
//!
//! Maps service definitions to OpenAPI documents and back.
//!
//! - Forward: [`map_service`] turns a [`ServiceDeclaration`] into an
//!   [`OpenApiDocument`], synthesizing schemas for every type it meets.
//! - Reverse: [`generate_service`] turns an OpenAPI contract into a listener,
//!   resource skeletons and type definitions.
//! - Validation: [`validate_service`] checks a service against a contract.

/// Type kind classification.
pub mod classify;

/// Non-fatal findings.
pub mod diagnostics;

/// Shared error types.
pub mod error;

/// OpenAPI to service skeleton generation.
pub mod generator;

/// Source type and service model.
pub mod model;

/// OpenAPI model, schema synthesis and response mapping.
pub mod oas;

/// Service against contract validation.
pub mod validator;

pub use classify::{classify, TypeKind};
pub use diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Severity};
pub use error::{AppError, AppResult};
pub use generator::{
    generate_service, render_service, Filter, GeneratedService, GeneratorOptions,
    ServiceMetadata,
};
pub use model::{
    SemanticModel, ServiceBundle, ServiceDeclaration, TypeCatalog, TypeDefinition,
    TypeDescriptor, TypeRef, WellKnownType,
};
pub use oas::{
    map_service, parse_contract, ComponentRegistry, MappingOptions, OpenApiDocument,
    SchemaContext, SchemaMode, ServiceMapping,
};
pub use validator::{validate_service, ValidationContext};
