#![deny(missing_docs)]

//! # Payload Generation
//!
//! A request body becomes one `@http:Payload` parameter. Each media type
//! contributes a type; identical types collapse and differing ones form a
//! union.

use crate::error::AppResult;
use crate::generator::nodes::{ParameterNode, TypeNode};
use crate::generator::types::TypeResolver;
use crate::oas::shims::{ContractMediaType, ContractRequestBody};
use indexmap::IndexMap;

/// Type carried by one media type entry.
///
/// Without a schema the media type decides: JSON -> `json`, XML -> `xml`,
/// text -> `string`, form data -> `map<string>`, anything else -> `byte[]`.
pub fn media_type_node(
    resolver: &TypeResolver<'_>,
    media_type: &str,
    content: &ContractMediaType,
) -> AppResult<TypeNode> {
    if let Some(schema) = &content.schema {
        return resolver.type_of(schema);
    }
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or(media_type)
        .trim()
        .to_ascii_lowercase();
    let name = if essence == "application/json" || essence.ends_with("+json") {
        "json"
    } else if essence.ends_with("/xml") || essence.ends_with("+xml") {
        "xml"
    } else if essence.starts_with("text/") {
        "string"
    } else if essence == "application/x-www-form-urlencoded" {
        "map<string>"
    } else if essence == "*/*" {
        "anydata"
    } else {
        "byte[]"
    };
    Ok(TypeNode::named(name))
}

/// Combined type of every media type of a content map.
pub fn content_type(
    resolver: &TypeResolver<'_>,
    content: &IndexMap<String, ContractMediaType>,
) -> AppResult<Option<TypeNode>> {
    let members = content
        .iter()
        .map(|(media, entry)| media_type_node(resolver, media, entry))
        .collect::<AppResult<Vec<_>>>()?;
    if members.is_empty() {
        return Ok(None);
    }
    Ok(Some(TypeNode::union(members)))
}

/// Builds the payload parameter.
///
/// With `without_data_binding` the body is taken as `http:Request request`.
pub fn payload_node(
    resolver: &TypeResolver<'_>,
    body: &ContractRequestBody,
    without_data_binding: bool,
) -> AppResult<ParameterNode> {
    if without_data_binding {
        return Ok(ParameterNode {
            annotation: None,
            ty: TypeNode::named("http:Request"),
            name: "request".to_string(),
            default: None,
        });
    }

    let mut ty = content_type(resolver, &body.content)?.unwrap_or_else(|| TypeNode::named("anydata"));
    if !body.required || resolver.nullable() {
        ty = ty.optional();
    }
    Ok(ParameterNode {
        annotation: Some("@http:Payload".to_string()),
        ty,
        name: "payload".to_string(),
        default: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::shims::parse_contract;
    use pretty_assertions::assert_eq;

    const CONTRACT: &str = r#"
openapi: 3.0.1
info:
  title: Payloads
  version: 1.0.0
paths:
  /pets:
    post:
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Pet'
          application/xml:
            schema:
              $ref: '#/components/schemas/Pet'
      responses:
        "201":
          description: Created
    put:
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Pet'
          text/plain: {}
      responses:
        "200":
          description: Ok
components:
  schemas:
    Pet:
      type: object
      properties:
        name:
          type: string
"#;

    fn body<'c>(
        contract: &'c crate::oas::shims::ContractDocument,
        method: &str,
    ) -> &'c ContractRequestBody {
        let item = &contract.paths.items["/pets"];
        let (_, op) = item
            .operations()
            .into_iter()
            .find(|(m, _)| *m == method)
            .unwrap();
        contract
            .resolve_request_body(op.request_body.as_ref().unwrap())
            .unwrap()
    }

    #[test]
    fn test_common_schema_collapses() {
        let contract = parse_contract(CONTRACT).unwrap();
        let resolver = TypeResolver::new(&contract, false);
        let node = payload_node(&resolver, body(&contract, "post"), false).unwrap();
        assert_eq!(node.to_string(), "@http:Payload Pet payload");
    }

    #[test]
    fn test_differing_media_types_form_union() {
        let contract = parse_contract(CONTRACT).unwrap();
        let resolver = TypeResolver::new(&contract, false);
        let node = payload_node(&resolver, body(&contract, "put"), false).unwrap();
        assert_eq!(node.to_string(), "@http:Payload (Pet|string)? payload");
    }

    #[test]
    fn test_without_data_binding() {
        let contract = parse_contract(CONTRACT).unwrap();
        let resolver = TypeResolver::new(&contract, false);
        let node = payload_node(&resolver, body(&contract, "post"), true).unwrap();
        assert_eq!(node.to_string(), "http:Request request");
    }
}
