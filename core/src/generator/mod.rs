#![deny(missing_docs)]

//! # Service Generator
//!
//! Turns an OpenAPI contract into service skeletons:
//! - **listener**: host, port and base path from the first server.
//! - **types**: one type definition per component schema.
//! - **parameters / payload**: resource function parameters.
//! - **returns**: return type unions and auxiliary status records.
//! - **render**: source text for the generated nodes.
//!
//! Paths that cannot be written as resource paths are reported in
//! [`GeneratedService::unsupported_paths`]. An operation that fails (for
//! example on a non-local `$ref`) is reported as
//! [`DiagnosticCode::OperationFailed`] and skipped.

use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::error::AppResult;
use crate::oas::shims::{parse_contract, ContractDocument, ContractOperation, ContractPathItem};
use tracing::{debug, info};

pub mod listener;
pub mod naming;
pub mod nodes;
pub mod parameters;
pub mod payload;
pub mod render;
pub mod returns;
pub mod types;

use listener::derive_listener;
use naming::{escape_identifier, is_complex_path};
use nodes::{
    ListenerNode, PathNode, ResourceNode, ServiceNode, ServiceTypeNode, TypeDefinitionNode,
    TypeNode,
};
use parameters::{parameter_node, path_parameter_type};
use payload::payload_node;
use returns::return_type;
use types::TypeResolver;

pub use render::{render_service, render_service_type, RenderedFile};

/// Name of the generated service object type.
pub const SERVICE_TYPE_NAME: &str = "OASServiceType";

/// Selects the operations that produce resource functions.
///
/// Include lists must match when non-empty; exclude lists always apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Operations must carry one of these tags.
    pub tags: Vec<String>,
    /// Operations carrying one of these tags are dropped.
    pub exclude_tags: Vec<String>,
    /// Operation ids to keep.
    pub operations: Vec<String>,
    /// Operation ids to drop.
    pub exclude_operations: Vec<String>,
}

impl Filter {
    /// True when an operation with these tags and id passes.
    pub fn accepts(&self, tags: &[String], operation_id: Option<&str>) -> bool {
        if !self.tags.is_empty() && !tags.iter().any(|t| self.tags.contains(t)) {
            return false;
        }
        if !self.operations.is_empty()
            && !operation_id.is_some_and(|id| self.operations.iter().any(|o| o == id))
        {
            return false;
        }
        if tags.iter().any(|t| self.exclude_tags.contains(t)) {
            return false;
        }
        !operation_id.is_some_and(|id| self.exclude_operations.iter().any(|o| o == id))
    }
}

/// Switches that shape the generated service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceMetadata {
    /// Make every field and parameter type nilable.
    pub nullable: bool,
    /// Emit a service object type and implement it.
    pub generate_service_type: bool,
    /// Take request bodies as `http:Request` instead of bound payloads.
    pub generate_without_data_binding: bool,
}

/// Options of one generation run.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Operation selection.
    pub filter: Filter,
    /// Service shape switches.
    pub metadata: ServiceMetadata,
    /// Text placed at the top of every rendered file.
    pub license: Option<String>,
    /// Render everything into one file.
    pub single_file: bool,
    /// Prefix of the rendered service file name.
    pub file_stem: Option<String>,
}

/// Output of a generation run.
#[derive(Debug, Clone)]
pub struct GeneratedService {
    /// Listener declaration.
    pub listener: ListenerNode,
    /// Service declaration with resource skeletons.
    pub service: ServiceNode,
    /// Service object type, when requested.
    pub service_type: Option<ServiceTypeNode>,
    /// Component and auxiliary type definitions.
    pub types: Vec<TypeDefinitionNode>,
    /// Paths skipped because they cannot be written as resource paths.
    pub unsupported_paths: Vec<String>,
    /// Findings recorded along the way.
    pub diagnostics: Diagnostics,
}

impl GeneratedService {
    /// Resource lookup by accessor and path template (`/pets/{id}`).
    pub fn resource(&self, method: &str, path: &str) -> Option<&ResourceNode> {
        self.service
            .resources
            .iter()
            .find(|r| r.method == method && r.path_template() == path)
    }

    /// Type definition lookup by name.
    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinitionNode> {
        self.types.iter().find(|t| t.name == name)
    }
}

/// Parses a YAML or JSON contract and generates the service skeleton.
pub fn generate_service(source: &str, options: &GeneratorOptions) -> AppResult<GeneratedService> {
    let contract = parse_contract(source)?;
    generate_from_contract(&contract, options)
}

/// Generates the service skeleton of a parsed contract.
pub fn generate_from_contract(
    contract: &ContractDocument,
    options: &GeneratorOptions,
) -> AppResult<GeneratedService> {
    let listener = derive_listener(&contract.servers)?;
    let resolver = TypeResolver::new(contract, options.metadata.nullable);
    let mut diagnostics = Diagnostics::new();
    let mut types = resolver.component_definitions(&mut diagnostics);
    let mut auxiliary = Vec::new();
    let mut resources = Vec::new();
    let mut unsupported_paths = Vec::new();

    for (path, item) in &contract.paths.items {
        if is_complex_path(path) {
            diagnostics.warn(
                DiagnosticCode::ComplexPath,
                format!("path '{}' cannot be expressed as a resource path", path),
            );
            unsupported_paths.push(path.clone());
            continue;
        }

        for (method, operation) in item.operations() {
            if !options
                .filter
                .accepts(&operation.tags, operation.operation_id.as_deref())
            {
                debug!(method, path = %path, "Operation filtered out");
                continue;
            }

            let mark = auxiliary.len();
            match generate_resource(
                &resolver,
                path,
                item,
                method,
                operation,
                &options.metadata,
                &mut auxiliary,
                &mut diagnostics,
            ) {
                Ok(resource) => resources.push(resource),
                Err(e) => {
                    auxiliary.truncate(mark);
                    diagnostics.error(
                        DiagnosticCode::OperationFailed,
                        format!("{} {}: {}", method, path, e),
                    );
                }
            }
        }
    }

    types.extend(auxiliary);

    let service_type = options
        .metadata
        .generate_service_type
        .then(|| ServiceTypeNode {
            name: SERVICE_TYPE_NAME.to_string(),
            resources: resources.clone(),
        });

    let service = ServiceNode {
        base_path: listener
            .base_path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(escape_identifier)
            .collect(),
        listener: listener.name.clone(),
        service_type: service_type.as_ref().map(|t| t.name.clone()),
        resources,
    };

    info!(
        resources = service.resources.len(),
        types = types.len(),
        unsupported = unsupported_paths.len(),
        "Generated service skeleton"
    );

    Ok(GeneratedService {
        listener,
        service,
        service_type,
        types,
        unsupported_paths,
        diagnostics,
    })
}

#[allow(clippy::too_many_arguments)]
fn generate_resource(
    resolver: &TypeResolver<'_>,
    path: &str,
    item: &ContractPathItem,
    method: &str,
    operation: &ContractOperation,
    metadata: &ServiceMetadata,
    auxiliary: &mut Vec<TypeDefinitionNode>,
    diagnostics: &mut Diagnostics,
) -> AppResult<ResourceNode> {
    debug!(method, path, "Generating resource");
    let contract = resolver.contract();
    let params = contract.effective_parameters(item, operation)?;

    let mut segments = Vec::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        match segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
        {
            Some(name) => {
                let ty = match params
                    .iter()
                    .find(|p| p.location == "path" && p.name == name)
                {
                    Some(param) => path_parameter_type(resolver, param)?,
                    None => TypeNode::named("string"),
                };
                segments.push(PathNode::Param {
                    ty,
                    name: escape_identifier(name),
                });
            }
            None => segments.push(PathNode::Literal(escape_identifier(segment))),
        }
    }

    let mut parameters = Vec::new();
    for param in params.iter().filter(|p| p.location != "path") {
        if let Some(node) = parameter_node(resolver, param, diagnostics)? {
            parameters.push(node);
        }
    }

    if let Some(body) = &operation.request_body {
        let body = contract.resolve_request_body(body)?;
        parameters.push(payload_node(
            resolver,
            body,
            metadata.generate_without_data_binding,
        )?);
    }

    let return_type = return_type(resolver, method, operation, auxiliary)?;

    Ok(ResourceNode {
        method: method.to_string(),
        path: segments,
        parameters,
        return_type: Some(return_type),
        operation_id: operation.operation_id.clone(),
        doc: operation
            .summary
            .clone()
            .or_else(|| operation.description.clone()),
    })
}
