#![deny(missing_docs)]

//! # Contract Validation
//!
//! Checks a service declaration against an OpenAPI contract:
//! - every resource must be documented by a contract operation,
//! - every contract operation must be implemented by a resource,
//! - required contract query/header parameters and request bodies must be
//!   accepted by the implementing resource.
//!
//! Path templates are compared with their parameter names erased
//! (`/pets/{id}` and `/pets/{petId}` are the same path).

use crate::diagnostics::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::error::AppResult;
use crate::model::service::{ParameterKind, ResourceFunction, ServiceDeclaration};
use crate::oas::mapper::{resource_path, unescape, ACCESSORS};
use crate::oas::shims::{parse_contract, ContractDocument, ContractOperation, ContractPathItem};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{debug, info};

fn template_param_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[^}/]*\}").expect("Invalid regex"))
}

/// Erases parameter names and trailing slashes from a path template.
fn normalize_path(path: &str) -> String {
    let erased = template_param_regex().replace_all(path, "{}");
    let trimmed = erased.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// State of one validation run.
pub struct ValidationContext<'a> {
    service: &'a ServiceDeclaration,
    contract: &'a ContractDocument,
    diagnostics: Diagnostics,
    implemented: HashSet<(String, String)>,
}

impl<'a> ValidationContext<'a> {
    /// Creates a context for one service and one contract.
    pub fn new(service: &'a ServiceDeclaration, contract: &'a ContractDocument) -> Self {
        Self {
            service,
            contract,
            diagnostics: Diagnostics::new(),
            implemented: HashSet::new(),
        }
    }

    /// Runs every check and returns the findings.
    pub fn run(mut self) -> AppResult<Diagnostics> {
        let service = self.service;
        for resource in &service.resources {
            self.check_resource(resource)?;
        }
        self.check_operations();
        info!(
            findings = self.diagnostics.len(),
            "Validated service against contract"
        );
        Ok(self.diagnostics)
    }

    fn check_resource(&mut self, resource: &ResourceFunction) -> AppResult<()> {
        let method = resource.method.to_ascii_lowercase();
        let path = resource_path(resource);
        let key = normalize_path(&path);
        debug!(method = %method, path = %path, "Validating resource");

        if !ACCESSORS.contains(&method.as_str()) {
            return Ok(());
        }

        let contract = self.contract;
        let found = contract
            .paths
            .items
            .iter()
            .filter(|(template, _)| normalize_path(template) == key)
            .find_map(|(_, item)| {
                item.operations()
                    .into_iter()
                    .find(|(m, _)| *m == method)
                    .map(|(_, op)| (item, op))
            });

        let Some((item, operation)) = found else {
            self.diagnostics.error(
                DiagnosticCode::UndocumentedResource,
                format!(
                    "resource '{} {}' is not documented in the contract",
                    method, path
                ),
            );
            return Ok(());
        };

        self.implemented.insert((method.clone(), key));
        self.check_parameters(resource, &method, &path, item, operation)
    }

    fn check_parameters(
        &mut self,
        resource: &ResourceFunction,
        method: &str,
        path: &str,
        item: &ContractPathItem,
        operation: &ContractOperation,
    ) -> AppResult<()> {
        let contract = self.contract;
        for param in contract.effective_parameters(item, operation)? {
            if !param.required {
                continue;
            }
            let accepted = match param.location.as_str() {
                "query" => resource.parameters.iter().any(|p| {
                    p.kind == ParameterKind::Query && unescape(&p.name) == param.name
                }),
                "header" => resource.parameters.iter().any(|p| {
                    p.kind == ParameterKind::Header
                        && p.header_name
                            .clone()
                            .unwrap_or_else(|| unescape(&p.name))
                            .eq_ignore_ascii_case(&param.name)
                }),
                _ => true,
            };
            if !accepted {
                self.diagnostics.error(
                    DiagnosticCode::MissingParameter,
                    format!(
                        "required {} parameter '{}' of '{} {}' is not accepted by the resource",
                        param.location, param.name, method, path
                    ),
                );
            }
        }

        if let Some(body) = &operation.request_body {
            let body = contract.resolve_request_body(body)?;
            if body.required && resource.payload().is_none() {
                self.diagnostics.error(
                    DiagnosticCode::MissingParameter,
                    format!(
                        "required request body of '{} {}' is not accepted by the resource",
                        method, path
                    ),
                );
            }
        }
        Ok(())
    }

    fn check_operations(&mut self) {
        let contract = self.contract;
        for (template, item) in &contract.paths.items {
            let key = normalize_path(template);
            for (method, _) in item.operations() {
                if !self.implemented.contains(&(method.to_string(), key.clone())) {
                    self.diagnostics.error(
                        DiagnosticCode::UnimplementedOperation,
                        format!(
                            "contract operation '{} {}' is not implemented by the service",
                            method, template
                        ),
                    );
                }
            }
        }
    }
}

/// Validates a service against a YAML or JSON contract.
pub fn validate_service(
    service: &ServiceDeclaration,
    contract_source: &str,
) -> AppResult<Vec<Diagnostic>> {
    let contract = parse_contract(contract_source)?;
    let diagnostics = ValidationContext::new(service, &contract).run()?;
    Ok(diagnostics.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::service::{PathSegment, ResourceParameter};
    use crate::model::types::TypeDescriptor;
    use pretty_assertions::assert_eq;

    const CONTRACT: &str = r#"
openapi: 3.0.1
info:
  title: Pets
  version: 1.0.0
paths:
  /pets:
    get:
      parameters:
        - name: limit
          in: query
          required: true
          schema:
            type: integer
        - name: X-Trace
          in: header
          required: true
          schema:
            type: string
      responses:
        "200":
          description: Ok
    post:
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
      responses:
        "201":
          description: Created
  /pets/{petId}:
    delete:
      responses:
        "200":
          description: Ok
"#;

    fn resource(method: &str, path: Vec<PathSegment>) -> ResourceFunction {
        ResourceFunction {
            method: method.to_string(),
            path,
            parameters: Vec::new(),
            return_type: None,
            cache: None,
            description: None,
            operation_id: None,
        }
    }

    fn service(resources: Vec<ResourceFunction>) -> ServiceDeclaration {
        ServiceDeclaration {
            base_path: "/".to_string(),
            title: None,
            version: None,
            description: None,
            host: None,
            port: None,
            resources,
            interceptors: Default::default(),
        }
    }

    fn param(name: &str, kind: ParameterKind, ty: TypeDescriptor) -> ResourceParameter {
        ResourceParameter {
            name: name.to_string(),
            kind,
            ty,
            has_default: false,
            header_name: None,
            media_type: None,
            description: None,
        }
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
        diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_normalize_path_erases_parameter_names() {
        assert_eq!(normalize_path("/pets/{petId}/"), "/pets/{}");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_conforming_service_has_no_findings() {
        let mut get = resource("get", vec![PathSegment::Literal { value: "pets".into() }]);
        get.parameters = vec![
            param("limit", ParameterKind::Query, TypeDescriptor::int()),
            param("x\\-trace", ParameterKind::Header, TypeDescriptor::string()),
        ];
        let mut post = resource("post", vec![PathSegment::Literal { value: "pets".into() }]);
        post.parameters = vec![param("pet", ParameterKind::Payload, TypeDescriptor::anydata())];
        let delete = resource(
            "delete",
            vec![
                PathSegment::Literal { value: "pets".into() },
                PathSegment::Param {
                    name: "id".into(),
                    ty: TypeDescriptor::int(),
                },
            ],
        );

        let findings = validate_service(&service(vec![get, post, delete]), CONTRACT).unwrap();
        assert_eq!(findings, Vec::new());
    }

    #[test]
    fn test_mismatches_are_reported() {
        let get = resource("get", vec![PathSegment::Literal { value: "pets".into() }]);
        let post = resource("post", vec![PathSegment::Literal { value: "pets".into() }]);
        let put = resource("put", vec![PathSegment::Literal { value: "owners".into() }]);

        let findings = validate_service(&service(vec![get, post, put]), CONTRACT).unwrap();
        assert_eq!(
            codes(&findings),
            vec![
                DiagnosticCode::MissingParameter,
                DiagnosticCode::MissingParameter,
                DiagnosticCode::MissingParameter,
                DiagnosticCode::UndocumentedResource,
                DiagnosticCode::UnimplementedOperation,
            ]
        );
        assert!(findings[3].message.contains("put /owners"));
        assert!(findings[4].message.contains("delete /pets/{petId}"));
    }
}
