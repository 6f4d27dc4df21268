#![deny(missing_docs)]

//! # Return Type Generation
//!
//! Inverse of response classification. Each documented status code becomes
//! one member of the return union:
//! - the method's default success code without headers -> the body type
//!   (`http:<Status>` when there is no body),
//! - any other known code without body or headers -> `http:<Status>`,
//! - a known code with a body or headers -> an auxiliary record
//!   `record {| *http:<Status>; Body body; record {|...|} headers; |}`,
//! - `default` and unknown codes -> `http:Response`.
//!
//! An operation without responses returns `error?`.

use crate::error::AppResult;
use crate::generator::naming::escape_identifier;
use crate::generator::nodes::{RecordField, RecordNode, TypeDefinitionNode, TypeNode};
use crate::generator::payload::content_type;
use crate::generator::types::TypeResolver;
use crate::model::http::status_name;
use crate::oas::responses::default_status_code;
use crate::oas::shims::{ContractOperation, ContractResponse};

const HTTP_RESPONSE: &str = "http:Response";

/// Builds the return type of an operation, registering auxiliary records.
pub fn return_type(
    resolver: &TypeResolver<'_>,
    method: &str,
    operation: &ContractOperation,
    auxiliary: &mut Vec<TypeDefinitionNode>,
) -> AppResult<TypeNode> {
    if operation.responses.is_empty() {
        return Ok(TypeNode::named("error").optional());
    }

    let contract = resolver.contract();
    let success = default_status_code(method);
    let mut members = Vec::new();

    for (code, response) in &operation.responses {
        let response = contract.resolve_response(response)?;
        let Some(status) = status_name(code) else {
            members.push(TypeNode::named(HTTP_RESPONSE));
            continue;
        };

        let body = content_type(resolver, &response.content)?;
        let headers = headers_record(resolver, response)?;

        let member = match (body, headers) {
            (body, None) if code == success => {
                body.unwrap_or_else(|| TypeNode::named(format!("http:{}", status)))
            }
            (None, None) => TypeNode::named(format!("http:{}", status)),
            (body, headers) => {
                let name = auxiliary_record(status, body, headers, auxiliary);
                TypeNode::named(name)
            }
        };
        members.push(member);
    }

    Ok(TypeNode::union(members))
}

/// Inline record of the response headers, if any.
fn headers_record(
    resolver: &TypeResolver<'_>,
    response: &ContractResponse,
) -> AppResult<Option<RecordNode>> {
    if response.headers.is_empty() {
        return Ok(None);
    }
    let contract = resolver.contract();
    let mut record = RecordNode {
        closed: true,
        ..RecordNode::default()
    };
    for (name, header) in &response.headers {
        let header = contract.resolve_header(header)?;
        let ty = match &header.schema {
            Some(schema) => resolver.type_of(schema)?,
            None => TypeNode::named("string"),
        };
        record.fields.push(RecordField {
            name: escape_identifier(name),
            ty,
            optional: !header.required,
            doc: header.description.clone(),
        });
    }
    Ok(Some(record))
}

/// Registers `<Status><Body>` and returns the name it was stored under.
///
/// An identical definition is reused; a different one with the same name
/// gets a numeric suffix.
fn auxiliary_record(
    status: &str,
    body: Option<TypeNode>,
    headers: Option<RecordNode>,
    auxiliary: &mut Vec<TypeDefinitionNode>,
) -> String {
    let base = format!(
        "{}{}",
        status,
        body.as_ref().map(name_suffix).unwrap_or_default()
    );

    let mut record = RecordNode {
        inclusions: vec![format!("http:{}", status)],
        closed: true,
        ..RecordNode::default()
    };
    if let Some(body) = body {
        record.fields.push(RecordField {
            name: "body".to_string(),
            ty: body,
            optional: false,
            doc: None,
        });
    }
    if let Some(headers) = headers {
        record.fields.push(RecordField {
            name: "headers".to_string(),
            ty: TypeNode::Record(headers),
            optional: false,
            doc: None,
        });
    }
    let ty = TypeNode::Record(record);

    let mut name = base.clone();
    let mut counter = 1;
    loop {
        match auxiliary.iter().find(|d| d.name == name) {
            Some(existing) if existing.ty == ty => return name,
            Some(_) => {
                name = format!("{}{}", base, counter);
                counter += 1;
            }
            None => {
                auxiliary.push(TypeDefinitionNode {
                    name: name.clone(),
                    ty,
                    doc: None,
                });
                return name;
            }
        }
    }
}

/// `Pet` -> `Pet`, `Pet[]` -> `PetArray`, `map<string>` -> `StringMap`.
fn name_suffix(ty: &TypeNode) -> String {
    match ty {
        TypeNode::Named(name) => {
            let bare = name.rsplit(':').next().unwrap_or(name);
            let mut suffix = String::new();
            for part in bare
                .replace("[]", " Array")
                .split(|c: char| !c.is_ascii_alphanumeric())
            {
                let mut chars = part.chars();
                if let Some(first) = chars.next() {
                    suffix.push(first.to_ascii_uppercase());
                    suffix.push_str(chars.as_str());
                }
            }
            suffix
        }
        TypeNode::Array(element) => format!("{}Array", name_suffix(element)),
        TypeNode::Map(value) => format!("{}Map", name_suffix(value)),
        TypeNode::Optional(inner) => name_suffix(inner),
        _ => "Body".to_string(),
    }
}
