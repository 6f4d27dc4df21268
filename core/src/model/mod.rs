#![deny(missing_docs)]

//! # Source Model
//!
//! Type descriptors, the semantic model interface and service declarations.

pub mod catalog;
pub mod http;
pub mod service;
pub mod types;

pub use catalog::{SemanticModel, TypeCatalog, WellKnownType};
pub use service::{
    CacheConfig, Interceptor, InterceptorPipeline, ParameterKind, PathSegment, ResourceFunction,
    ResourceParameter, ServiceBundle, ServiceDeclaration,
};
pub use types::{FieldDescriptor, PrimitiveType, RecordType, TypeDefinition, TypeDescriptor, TypeRef};
