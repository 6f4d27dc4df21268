#![deny(missing_docs)]

//! # OpenAPI Module
//!
//! - **schema / document**: the OpenAPI 3.0 output model.
//! - **synthesis / registry**: type descriptor to schema conversion.
//! - **responses / interceptors**: return types to operation responses.
//! - **mapper**: whole-service conversion.
//! - **shims / normalization / ref_utils**: contract input for validation
//!   and reverse generation.

pub mod document;
pub mod interceptors;
pub mod mapper;
pub(crate) mod normalization;
pub(crate) mod ref_utils;
pub mod registry;
pub mod responses;
pub mod schema;
pub mod shims;
pub mod synthesis;

pub use document::OpenApiDocument;
pub use mapper::{map_service, MappingOptions, ServiceMapping};
pub use registry::{ComponentRegistry, ComponentSlot};
pub use schema::Schema;
pub use shims::{parse_contract, ContractDocument};
pub use synthesis::{synthesize, SchemaContext, SchemaMode};
