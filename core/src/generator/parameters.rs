#![deny(missing_docs)]

//! # Parameter Generation
//!
//! Query and header parameters become resource function parameters. Query
//! parameters are unannotated; header parameters carry `@http:Header` with
//! the wire name. Scalars and arrays of scalars are accepted; nested arrays,
//! objects and cookie parameters are reported and skipped.

use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::error::AppResult;
use crate::generator::naming::{escape_identifier, to_camel_case};
use crate::generator::nodes::{ParameterNode, TypeNode};
use crate::generator::types::{SchemaShape, TypeResolver};
use crate::oas::shims::ContractParameter;
use serde_json::Value;
use utoipa::openapi::schema::Schema;
use utoipa::openapi::RefOr;

/// Type of a path parameter (`string` when the schema is missing).
pub fn path_parameter_type(
    resolver: &TypeResolver<'_>,
    param: &ContractParameter,
) -> AppResult<TypeNode> {
    match &param.schema {
        Some(schema) => resolver.type_of(schema),
        None => Ok(TypeNode::named("string")),
    }
}

/// Builds the node for a query or header parameter.
///
/// Returns `Ok(None)` when the parameter is skipped; the reason is recorded.
pub fn parameter_node(
    resolver: &TypeResolver<'_>,
    param: &ContractParameter,
    diagnostics: &mut Diagnostics,
) -> AppResult<Option<ParameterNode>> {
    let location = param.location.as_str();
    if location != "query" && location != "header" {
        diagnostics.warn(
            DiagnosticCode::UnsupportedParameter,
            format!("{} parameter '{}' is not supported", location, param.name),
        );
        return Ok(None);
    }

    let (mut ty, default) = match &param.schema {
        Some(schema) => {
            match resolver.shape_of(schema)? {
                SchemaShape::NestedArray => {
                    diagnostics.warn(
                        DiagnosticCode::UnsupportedParameter,
                        format!(
                            "{} parameter '{}' is an array of arrays or objects",
                            location, param.name
                        ),
                    );
                    return Ok(None);
                }
                SchemaShape::Object => {
                    diagnostics.warn(
                        DiagnosticCode::UnsupportedParameter,
                        format!("{} parameter '{}' is an object", location, param.name),
                    );
                    return Ok(None);
                }
                _ => {}
            }
            (resolver.type_of(schema)?, default_of(schema))
        }
        None => (TypeNode::named("string"), None),
    };

    let mut default_expr = None;
    if !param.required {
        match default {
            Some(value) => default_expr = Some(value),
            None => ty = ty.optional(),
        }
    }
    if resolver.nullable() {
        ty = ty.optional();
    }

    let node = if location == "header" {
        ParameterNode {
            annotation: Some(format!("@http:Header {{name: {:?}}}", param.name)),
            ty,
            name: to_camel_case(&param.name),
            default: default_expr,
        }
    } else {
        ParameterNode {
            annotation: None,
            ty,
            name: escape_identifier(&param.name),
            default: default_expr,
        }
    };
    Ok(Some(node))
}

/// Literal expression for a scalar schema default.
fn default_of(schema: &RefOr<Schema>) -> Option<String> {
    let RefOr::T(Schema::Object(obj)) = schema else {
        return None;
    };
    match obj.default.as_ref()? {
        value @ (Value::String(_) | Value::Number(_) | Value::Bool(_)) => {
            serde_json::to_string(value).ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::shims::parse_contract;
    use pretty_assertions::assert_eq;

    const CONTRACT: &str = r#"
openapi: 3.0.1
info:
  title: Params
  version: 1.0.0
paths:
  /items:
    get:
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
            default: 10
        - name: tags
          in: query
          schema:
            type: array
            items:
              type: string
        - name: type
          in: query
          required: true
          schema:
            type: string
        - name: X-Request-Id
          in: header
          required: true
          schema:
            type: string
        - name: matrix
          in: query
          schema:
            type: array
            items:
              type: array
              items:
                type: integer
        - name: filter
          in: query
          schema:
            $ref: '#/components/schemas/Filter'
        - name: session
          in: cookie
          schema:
            type: string
      responses:
        "200":
          description: Ok
components:
  schemas:
    Filter:
      type: object
      properties:
        q:
          type: string
"#;

    #[test]
    fn test_parameter_nodes() {
        let contract = parse_contract(CONTRACT).unwrap();
        let resolver = TypeResolver::new(&contract, false);
        let item = &contract.paths.items["/items"];
        let op = item.get.as_ref().unwrap();
        let params = contract.effective_parameters(item, op).unwrap();

        let mut diagnostics = Diagnostics::new();
        let rendered: Vec<String> = params
            .iter()
            .filter_map(|p| parameter_node(&resolver, p, &mut diagnostics).unwrap())
            .map(|n| n.to_string())
            .collect();

        assert_eq!(
            rendered,
            vec![
                "int 'limit = 10",
                "string[]? tags",
                "string 'type",
                "@http:Header {name: \"X-Request-Id\"} string xRequestId",
            ]
        );
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics.has(DiagnosticCode::UnsupportedParameter));
    }

    #[test]
    fn test_self_referential_array_parameter_is_skipped() {
        let contract = parse_contract(
            r#"
openapi: 3.0.1
info:
  title: Nested
  version: 1.0.0
paths:
  /trees:
    get:
      parameters:
        - name: branches
          in: query
          schema:
            $ref: '#/components/schemas/Nested'
      responses:
        "200":
          description: Ok
components:
  schemas:
    Nested:
      type: array
      items:
        $ref: '#/components/schemas/Nested'
"#,
        )
        .unwrap();
        let resolver = TypeResolver::new(&contract, false);
        let item = &contract.paths.items["/trees"];
        let op = item.get.as_ref().unwrap();
        let params = contract.effective_parameters(item, op).unwrap();

        let mut diagnostics = Diagnostics::new();
        let node = parameter_node(&resolver, params[0], &mut diagnostics).unwrap();
        assert!(node.is_none());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.has(DiagnosticCode::UnsupportedParameter));
    }
}
