#![deny(missing_docs)]

//! # Service Mapper
//!
//! Converts a whole service declaration into an OpenAPI document. One schema
//! context (and therefore one component registry) is shared by all
//! operations; a failing operation is reported and skipped.

use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::error::{AppError, AppResult};
use crate::model::catalog::SemanticModel;
use crate::model::service::{ParameterKind, PathSegment, ResourceFunction, ServiceDeclaration};
use crate::oas::document::{
    Components, Info, MediaType, OpenApiDocument, Operation, Parameter, RequestBody, Server,
    ServerVariable, OPENAPI_VERSION,
};
use crate::oas::interceptors::effective_return_type;
use crate::oas::responses::{assemble, classify_responses, media_type_of};
use crate::oas::schema::Schema;
use crate::oas::synthesis::{synthesize, SchemaContext, SchemaMode};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, info};

const DEFAULT_VERSION: &str = "0.1.0";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 9090;
pub(crate) const ACCESSORS: &[&str] = &[
    "get", "put", "post", "delete", "patch", "head", "options", "trace",
];

/// Knobs of the forward conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingOptions {
    /// Component emission mode.
    pub mode: SchemaMode,
    /// Tag components with the module they came from.
    pub source_extensions: bool,
}

/// Result of mapping a service.
#[derive(Debug)]
pub struct ServiceMapping {
    /// The generated document.
    pub document: OpenApiDocument,
    /// Findings collected along the way.
    pub diagnostics: Diagnostics,
}

/// Maps a service declaration to an OpenAPI document.
pub fn map_service(
    service: &ServiceDeclaration,
    model: &dyn SemanticModel,
    options: MappingOptions,
) -> AppResult<ServiceMapping> {
    info!(base_path = %service.base_path, resources = service.resources.len(), "Mapping service");

    let mut ctx = SchemaContext::new(model)
        .with_mode(options.mode)
        .with_source_extensions(options.source_extensions);
    let mut paths: IndexMap<String, IndexMap<String, Operation>> = IndexMap::new();
    let mut operation_ids = HashSet::new();

    for resource in &service.resources {
        let path = resource_path(resource);
        match map_resource(service, resource, &mut ctx, &mut operation_ids) {
            Ok(operation) => {
                debug!(method = %resource.method, path = %path, "Mapped operation");
                paths
                    .entry(path)
                    .or_default()
                    .insert(resource.method.to_ascii_lowercase(), operation);
            }
            Err(e) => ctx.diagnostics.error(
                DiagnosticCode::OperationFailed,
                format!("{} {}: {}", resource.method, path, e),
            ),
        }
    }

    let (registry, diagnostics) = ctx.into_parts();
    let schemas = registry.schemas();
    let document = OpenApiDocument {
        openapi: OPENAPI_VERSION.to_string(),
        info: Info {
            title: service
                .title
                .clone()
                .unwrap_or_else(|| service.base_path.clone()),
            version: service
                .version
                .clone()
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            description: service.description.clone(),
        },
        servers: vec![server_of(service)],
        paths,
        components: (!schemas.is_empty()).then_some(Components { schemas }),
    };

    Ok(ServiceMapping {
        document,
        diagnostics,
    })
}

fn map_resource(
    service: &ServiceDeclaration,
    resource: &ResourceFunction,
    ctx: &mut SchemaContext<'_>,
    operation_ids: &mut HashSet<String>,
) -> AppResult<Operation> {
    let method = resource.method.to_ascii_lowercase();
    if !ACCESSORS.contains(&method.as_str()) {
        return Err(AppError::General(format!(
            "accessor '{}' has no OpenAPI operation",
            resource.method
        )));
    }

    let mut parameters = Vec::new();
    for segment in &resource.path {
        match segment {
            PathSegment::Param { name, ty } => {
                let schema = synthesize(ty, ctx)?.unwrap_or_else(Schema::string);
                parameters.push(Parameter {
                    name: unescape(name),
                    location: "path".to_string(),
                    description: None,
                    required: true,
                    schema,
                });
            }
            PathSegment::Rest { name, .. } => ctx.diagnostics.warn(
                DiagnosticCode::UnsupportedParameter,
                format!("rest path parameter '{}' is not described", name),
            ),
            PathSegment::Literal { .. } => {}
        }
    }

    let mut request_body = None;
    for param in &resource.parameters {
        match param.kind {
            ParameterKind::Query | ParameterKind::Header => {
                let Some(schema) = synthesize(&param.ty, ctx)? else {
                    ctx.diagnostics.warn(
                        DiagnosticCode::UnsupportedParameter,
                        format!("parameter '{}' has no schema", param.name),
                    );
                    continue;
                };
                let (name, location, required) = if param.kind == ParameterKind::Query {
                    (
                        unescape(&param.name),
                        "query",
                        !(param.ty.is_nilable() || param.has_default),
                    )
                } else {
                    (
                        param
                            .header_name
                            .clone()
                            .unwrap_or_else(|| unescape(&param.name)),
                        "header",
                        !param.ty.is_nilable(),
                    )
                };
                parameters.push(Parameter {
                    name,
                    location: location.to_string(),
                    description: param.description.clone(),
                    required,
                    schema,
                });
            }
            ParameterKind::Payload => {
                let media = param
                    .media_type
                    .clone()
                    .unwrap_or_else(|| media_type_of(&param.ty, ctx.model).to_string());
                let schema = if param.ty.is_anydata() {
                    None
                } else {
                    synthesize(&param.ty, ctx)?
                };
                let mut content = IndexMap::new();
                content.insert(media, MediaType { schema });
                request_body = Some(RequestBody {
                    content,
                    required: true,
                });
            }
            ParameterKind::Request | ParameterKind::Caller => {}
        }
    }

    let return_type = effective_return_type(
        &service.interceptors,
        resource.return_type.as_ref(),
        ctx.model,
    );
    let code_map = classify_responses(return_type.as_ref(), &method, ctx.model, &mut ctx.diagnostics);
    let responses = assemble(
        &code_map,
        resource.cache.as_ref(),
        resource.payload().is_some(),
        ctx,
    )?;

    let operation_id = unique_operation_id(
        resource
            .operation_id
            .clone()
            .unwrap_or_else(|| operation_id_for(&method, resource)),
        operation_ids,
    );

    Ok(Operation {
        operation_id,
        description: resource.description.clone(),
        parameters,
        request_body,
        responses,
    })
}

/// `/pets/{id}` for `pets/[int id]`.
pub(crate) fn resource_path(resource: &ResourceFunction) -> String {
    let segments: Vec<String> = resource
        .path
        .iter()
        .filter_map(|segment| match segment {
            PathSegment::Literal { value } => Some(unescape(value)),
            PathSegment::Param { name, .. } => Some(format!("{{{}}}", unescape(name))),
            PathSegment::Rest { .. } => None,
        })
        .filter(|s| !s.is_empty() && s != ".")
        .collect();
    format!("/{}", segments.join("/"))
}

/// Strips identifier quoting and escapes (`'type` -> `type`, `a\-b` -> `a-b`).
pub(crate) fn unescape(identifier: &str) -> String {
    identifier
        .trim_start_matches('\'')
        .replace('\\', "")
}

/// `get` + `/pets/{id}` -> `getPetsId`.
fn operation_id_for(method: &str, resource: &ResourceFunction) -> String {
    let mut id = method.to_string();
    for segment in &resource.path {
        let word = match segment {
            PathSegment::Literal { value } => unescape(value),
            PathSegment::Param { name, .. } | PathSegment::Rest { name, .. } => unescape(name),
        };
        for part in word.split(|c: char| !c.is_ascii_alphanumeric()) {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                id.push(first.to_ascii_uppercase());
                id.push_str(chars.as_str());
            }
        }
    }
    id
}

fn unique_operation_id(candidate: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(candidate.clone()) {
        return candidate;
    }
    let mut counter = 1;
    loop {
        let next = format!("{}{}", candidate, counter);
        if taken.insert(next.clone()) {
            return next;
        }
        counter += 1;
    }
}

fn server_of(service: &ServiceDeclaration) -> Server {
    let base = if service.base_path.starts_with('/') {
        service.base_path.clone()
    } else {
        format!("/{}", service.base_path)
    };
    let base = if base == "/" { String::new() } else { base };

    let mut variables = IndexMap::new();
    variables.insert(
        "server".to_string(),
        ServerVariable {
            default: format!(
                "http://{}",
                service.host.as_deref().unwrap_or(DEFAULT_HOST)
            ),
        },
    );
    variables.insert(
        "port".to_string(),
        ServerVariable {
            default: service.port.unwrap_or(DEFAULT_PORT).to_string(),
        },
    );

    Server {
        url: format!("{{server}}:{{port}}{}", base),
        variables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::service::ResourceParameter;
    use crate::model::types::TypeDescriptor;
    use crate::model::TypeCatalog;

    fn resource(method: &str, path: Vec<PathSegment>) -> ResourceFunction {
        ResourceFunction {
            method: method.to_string(),
            path,
            parameters: vec![],
            return_type: None,
            cache: None,
            description: None,
            operation_id: None,
        }
    }

    fn literal(value: &str) -> PathSegment {
        PathSegment::Literal {
            value: value.to_string(),
        }
    }

    fn service(resources: Vec<ResourceFunction>) -> ServiceDeclaration {
        ServiceDeclaration {
            base_path: "/store".into(),
            title: None,
            version: None,
            description: None,
            host: None,
            port: None,
            resources,
            interceptors: Default::default(),
        }
    }

    #[test]
    fn test_operation_ids_are_unique() {
        let id_param = PathSegment::Param {
            name: "id".into(),
            ty: TypeDescriptor::int(),
        };
        let svc = service(vec![
            resource("get", vec![literal("pets"), id_param.clone()]),
            resource("get", vec![literal("pets"), literal("id")]),
        ]);
        let catalog = TypeCatalog::with_http_module();
        let mapping = map_service(&svc, &catalog, MappingOptions::default()).unwrap();

        let doc = mapping.document;
        assert_eq!(doc.operation("/pets/{id}", "get").unwrap().operation_id, "getPetsId");
        assert_eq!(doc.operation("/pets/id", "get").unwrap().operation_id, "getPetsId1");
        assert_eq!(doc.info.title, "/store");
        assert_eq!(doc.info.version, "0.1.0");
        assert_eq!(doc.servers[0].url, "{server}:{port}/store");
    }

    #[test]
    fn test_parameter_required_flags() {
        let mut res = resource("get", vec![literal("pets")]);
        res.parameters = vec![
            ResourceParameter {
                name: "limit".into(),
                kind: ParameterKind::Query,
                ty: TypeDescriptor::int(),
                has_default: true,
                header_name: None,
                media_type: None,
                description: None,
            },
            ResourceParameter {
                name: "tag".into(),
                kind: ParameterKind::Query,
                ty: TypeDescriptor::string(),
                has_default: false,
                header_name: None,
                media_type: None,
                description: None,
            },
            ResourceParameter {
                name: "trace".into(),
                kind: ParameterKind::Header,
                ty: TypeDescriptor::union(vec![TypeDescriptor::string(), TypeDescriptor::nil()]),
                has_default: false,
                header_name: Some("X-Trace".into()),
                media_type: None,
                description: None,
            },
        ];
        let catalog = TypeCatalog::with_http_module();
        let mapping = map_service(&service(vec![res]), &catalog, MappingOptions::default()).unwrap();
        let op = mapping.document.operation("/pets", "get").unwrap().clone();

        let flags: Vec<(&str, &str, bool)> = op
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.location.as_str(), p.required))
            .collect();
        assert_eq!(
            flags,
            vec![
                ("limit", "query", false),
                ("tag", "query", true),
                ("X-Trace", "header", false)
            ]
        );
        assert!(op.responses.contains_key("202"));
    }

    #[test]
    fn test_unsupported_accessor_is_reported_and_skipped() {
        let catalog = TypeCatalog::with_http_module();
        let svc = service(vec![resource("default", vec![]), resource("get", vec![])]);
        let mapping = map_service(&svc, &catalog, MappingOptions::default()).unwrap();
        assert!(mapping.diagnostics.has(DiagnosticCode::OperationFailed));
        assert_eq!(mapping.document.paths.len(), 1);
        assert!(mapping.document.operation("/", "get").is_some());
    }

    #[test]
    fn test_unescape_identifiers() {
        assert_eq!(unescape("'type"), "type");
        assert_eq!(unescape("pet\\-store"), "pet-store");
    }
}
