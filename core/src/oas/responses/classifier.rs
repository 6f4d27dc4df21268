//! Partitioning of return types into status/media buckets.

use super::{
    media_type_of, ResponseCodeMap, StatusBranch, ANY_MEDIA, DEFAULT_STATUS, JSON_MEDIA,
};
use crate::classify::builtin_primitive;
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::model::catalog::{SemanticModel, WellKnownType};
use crate::model::http::{status_code, status_code_of_error, HTTP_MODULE};
use crate::model::types::{RecordType, TypeDescriptor, TypeRef};
use crate::oas::synthesis::flatten_union;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

const ACCEPTED: &str = "202";
const INTERNAL_SERVER_ERROR: &str = "500";
const ANY_ENTITY_BODY: &str = "Any type of entity body";

/// Success code of a resource without an explicit status: `201` for POST,
/// `200` otherwise.
pub fn default_status_code(method: &str) -> &'static str {
    if method.eq_ignore_ascii_case("post") {
        "201"
    } else {
        "200"
    }
}

/// Partitions a return type into `(status code, media type)` buckets.
///
/// An absent return type yields a single `202` branch.
pub fn classify_responses(
    return_type: Option<&TypeDescriptor>,
    method: &str,
    model: &dyn SemanticModel,
    diagnostics: &mut Diagnostics,
) -> ResponseCodeMap {
    let mut map = ResponseCodeMap::new();
    let Some(return_type) = return_type else {
        map.entry(ACCEPTED.to_string()).or_default();
        return map;
    };

    let classifier = Classifier {
        model,
        default_code: default_status_code(method),
    };
    let mut members = Vec::new();
    classifier.expand(return_type, &mut members, &mut HashSet::new());

    for member in members {
        classifier.classify_member(&member, &mut map, diagnostics);
    }
    debug!(method, codes = ?map.keys().collect::<Vec<_>>(), "Classified responses");
    map
}

struct Classifier<'a> {
    model: &'a dyn SemanticModel,
    default_code: &'static str,
}

impl Classifier<'_> {
    /// Flattens unions, following references and readonly intersections
    /// that denote unions. Enum-like unions of literals stay named.
    fn expand(&self, ty: &TypeDescriptor, out: &mut Vec<TypeDescriptor>, seen: &mut HashSet<TypeRef>) {
        match ty {
            TypeDescriptor::Union { members } => {
                for member in flatten_union(members) {
                    self.expand(member, out, seen);
                }
            }
            TypeDescriptor::Intersection { .. } => match ty.strip_readonly() {
                Some(inner) if self.denotes_union(inner) => self.expand(inner, out, seen),
                _ => out.push(ty.clone()),
            },
            TypeDescriptor::Reference(r) if builtin_primitive(r).is_none() => {
                match self.model.resolve(r) {
                    Some(def) if self.denotes_union(&def.ty) && seen.insert(r.clone()) => {
                        self.expand(&def.ty, out, seen)
                    }
                    _ => out.push(ty.clone()),
                }
            }
            other => out.push(other.clone()),
        }
    }

    fn denotes_union(&self, ty: &TypeDescriptor) -> bool {
        match ty {
            TypeDescriptor::Union { members } => !flatten_union(members)
                .iter()
                .all(|m| matches!(m, TypeDescriptor::Singleton { .. }) || m.is_nil()),
            TypeDescriptor::Reference(r) => self
                .model
                .resolve(r)
                .is_some_and(|def| matches!(def.ty, TypeDescriptor::Union { .. })),
            TypeDescriptor::Intersection { .. } => {
                ty.strip_readonly().is_some_and(|inner| self.denotes_union(inner))
            }
            _ => false,
        }
    }

    fn classify_member(&self, member: &TypeDescriptor, map: &mut ResponseCodeMap, diagnostics: &mut Diagnostics) {
        if member.is_nil() {
            map.entry(ACCEPTED.to_string()).or_default();
            return;
        }

        if self.model.subtype_of(member, WellKnownType::Response) {
            let branch = map.entry(DEFAULT_STATUS.to_string()).or_default();
            branch.describe(Some(ANY_ENTITY_BODY));
            branch.add(ANY_MEDIA, TypeDescriptor::anydata());
            return;
        }

        if self.model.subtype_of(member, WellKnownType::StatusCodeResponse) {
            self.classify_status_record(member, map, diagnostics);
            return;
        }

        if self.is_error(member) {
            let code = self.error_status(member).unwrap_or(INTERNAL_SERVER_ERROR);
            map.entry(code.to_string())
                .or_default()
                .add(JSON_MEDIA, member.clone());
            return;
        }

        let media = media_type_of(member, self.model);
        map.entry(self.default_code.to_string())
            .or_default()
            .add(media, member.clone());
    }

    fn classify_status_record(
        &self,
        member: &TypeDescriptor,
        map: &mut ResponseCodeMap,
        diagnostics: &mut Diagnostics,
    ) {
        let code = self
            .status_of(member, &mut HashSet::new())
            .unwrap_or(self.default_code);
        let description = match member {
            TypeDescriptor::Reference(r) => self
                .model
                .resolve(r)
                .and_then(|def| def.description.as_deref()),
            _ => None,
        };

        let branch = map.entry(code.to_string()).or_default();
        branch.describe(description);

        let Some(record) = self.record_of(member) else {
            diagnostics.warn(
                DiagnosticCode::UnresolvedReference,
                format!("status response '{:?}' does not resolve to a record", member),
            );
            return;
        };

        if let Some(headers) = record.fields.get("headers") {
            self.collect_headers(&headers.ty, branch);
        }

        let Some(body) = record.fields.get("body") else {
            return;
        };
        if body.ty.is_anydata() {
            return;
        }

        let media_override = record.fields.get("mediaType").and_then(|f| match &f.ty {
            TypeDescriptor::Singleton {
                value: Value::String(s),
            } => Some(s.clone()),
            _ => None,
        });

        let mut bodies = Vec::new();
        self.expand(&body.ty, &mut bodies, &mut HashSet::new());
        for body_ty in bodies {
            if body_ty.is_nil() {
                continue;
            }
            let media = media_override
                .clone()
                .unwrap_or_else(|| media_type_of(&body_ty, self.model).to_string());
            branch.add(&media, body_ty);
        }
    }

    fn collect_headers(&self, headers: &TypeDescriptor, branch: &mut StatusBranch) {
        if let Some(record) = self.record_of(headers) {
            for (name, field) in &record.fields {
                branch.headers.insert(name.clone(), field.ty.clone());
            }
        }
    }

    /// Status code carried by a status record, found on the first `http`
    /// status type along its references and inclusions.
    fn status_of(&self, ty: &TypeDescriptor, seen: &mut HashSet<TypeRef>) -> Option<&'static str> {
        match ty {
            TypeDescriptor::Reference(r) => {
                if r.module == HTTP_MODULE {
                    if let Some(code) = status_code(&r.name) {
                        return Some(code);
                    }
                }
                if !seen.insert(r.clone()) {
                    return None;
                }
                let def = self.model.resolve(r)?;
                self.status_of(&def.ty, seen)
            }
            TypeDescriptor::Record(record) => record.inclusions.iter().find_map(|inc| {
                self.status_of(&TypeDescriptor::Reference(inc.clone()), seen)
            }),
            TypeDescriptor::Intersection { .. } => ty
                .strip_readonly()
                .and_then(|inner| self.status_of(inner, seen)),
            _ => None,
        }
    }

    fn record_of<'m>(&'m self, ty: &'m TypeDescriptor) -> Option<&'m RecordType> {
        let mut current = ty;
        let mut seen = HashSet::new();
        loop {
            match current {
                TypeDescriptor::Record(record) => return Some(record),
                TypeDescriptor::Reference(r) if seen.insert(r.clone()) => {
                    current = &self.model.resolve(r)?.ty;
                }
                TypeDescriptor::Intersection { .. } => current = current.strip_readonly()?,
                _ => return None,
            }
        }
    }

    fn is_error(&self, ty: &TypeDescriptor) -> bool {
        let mut current = ty;
        let mut seen = HashSet::new();
        loop {
            match current {
                TypeDescriptor::Error { .. } => return true,
                TypeDescriptor::Reference(r) if seen.insert(r.clone()) => {
                    match self.model.resolve(r) {
                        Some(def) => current = &def.ty,
                        None => return false,
                    }
                }
                TypeDescriptor::Intersection { .. } => match current.strip_readonly() {
                    Some(inner) => current = inner,
                    None => return false,
                },
                _ => return false,
            }
        }
    }

    /// `http:<Status>Error` along the reference chain.
    fn error_status(&self, ty: &TypeDescriptor) -> Option<&'static str> {
        if !self.model.subtype_of(ty, WellKnownType::StatusCodeError) {
            return None;
        }
        let mut current = ty;
        let mut seen = HashSet::new();
        while let TypeDescriptor::Reference(r) = current {
            if r.module == HTTP_MODULE {
                if let Some(code) = status_code_of_error(&r.name) {
                    return Some(code);
                }
            }
            if !seen.insert(r.clone()) {
                return None;
            }
            current = &self.model.resolve(r)?.ty;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{FieldDescriptor, TypeDefinition};
    use crate::model::TypeCatalog;

    fn catalog() -> TypeCatalog {
        let mut catalog = TypeCatalog::with_http_module();

        let mut pet = RecordType::default();
        pet.fields
            .insert("name".into(), FieldDescriptor::required(TypeDescriptor::string()));
        catalog.insert(TypeDefinition::new("app", "Pet", TypeDescriptor::Record(pet)));

        let mut rate_headers = RecordType::default();
        rate_headers.fields.insert(
            "X-Rate-Limit".into(),
            FieldDescriptor::required(TypeDescriptor::int()),
        );
        catalog.insert(TypeDefinition::new(
            "app",
            "RateHeaders",
            TypeDescriptor::Record(rate_headers),
        ));

        let mut created = RecordType {
            inclusions: vec![TypeRef::new("http", "Created")],
            ..RecordType::default()
        };
        created.fields.insert(
            "body".into(),
            FieldDescriptor::required(TypeDescriptor::reference("app", "Pet")),
        );
        created.fields.insert(
            "headers".into(),
            FieldDescriptor::required(TypeDescriptor::reference("app", "RateHeaders")),
        );
        created.fields.insert(
            "mediaType".into(),
            FieldDescriptor::optional(TypeDescriptor::string_literal("application/vnd.pet+json")),
        );
        catalog.insert(
            TypeDefinition::new("app", "PetCreated", TypeDescriptor::Record(created))
                .with_description("Pet stored"),
        );

        catalog.insert(TypeDefinition::new(
            "app",
            "MaybePet",
            TypeDescriptor::union(vec![
                TypeDescriptor::reference("app", "Pet"),
                TypeDescriptor::nil(),
            ]),
        ));
        catalog
    }

    fn classify(ty: Option<TypeDescriptor>, method: &str) -> ResponseCodeMap {
        let catalog = catalog();
        let mut diagnostics = Diagnostics::new();
        classify_responses(ty.as_ref(), method, &catalog, &mut diagnostics)
    }

    #[test]
    fn test_default_codes() {
        let get = classify(Some(TypeDescriptor::reference("app", "Pet")), "get");
        assert_eq!(get.keys().collect::<Vec<_>>(), vec!["200"]);
        assert_eq!(get["200"].content.keys().collect::<Vec<_>>(), vec![JSON_MEDIA]);

        let post = classify(Some(TypeDescriptor::reference("app", "Pet")), "post");
        assert_eq!(post.keys().collect::<Vec<_>>(), vec!["201"]);

        let none = classify(None, "get");
        assert_eq!(none.keys().collect::<Vec<_>>(), vec!["202"]);
        assert!(none["202"].content.is_empty());
    }

    #[test]
    fn test_pet_or_not_found() {
        let map = classify(
            Some(TypeDescriptor::union(vec![
                TypeDescriptor::reference("app", "Pet"),
                TypeDescriptor::reference("http", "NotFound"),
            ])),
            "get",
        );
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["200", "404"]);
        assert!(map["404"].content.is_empty());
    }

    #[test]
    fn test_nil_and_errors() {
        let map = classify(
            Some(TypeDescriptor::union(vec![
                TypeDescriptor::reference("app", "MaybePet"),
                TypeDescriptor::Error { detail: None },
                TypeDescriptor::reference("http", "NotFoundError"),
            ])),
            "get",
        );
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["200", "202", "500", "404"]);
        assert_eq!(map["404"].content.keys().collect::<Vec<_>>(), vec![JSON_MEDIA]);
    }

    #[test]
    fn test_status_record_body_headers_and_media_override() {
        let map = classify(Some(TypeDescriptor::reference("app", "PetCreated")), "get");
        let branch = &map["201"];
        assert_eq!(branch.description.as_deref(), Some("Pet stored"));
        assert_eq!(
            branch.content.keys().collect::<Vec<_>>(),
            vec!["application/vnd.pet+json"]
        );
        assert_eq!(
            branch.headers.keys().collect::<Vec<_>>(),
            vec!["X-Rate-Limit"]
        );
    }

    #[test]
    fn test_http_response_goes_to_default() {
        let map = classify(
            Some(TypeDescriptor::union(vec![
                TypeDescriptor::string(),
                TypeDescriptor::reference("http", "Response"),
            ])),
            "get",
        );
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["200", "default"]);
        assert_eq!(map["200"].content.keys().collect::<Vec<_>>(), vec!["text/plain"]);
        assert_eq!(map["default"].description.as_deref(), Some(ANY_ENTITY_BODY));
        assert_eq!(map["default"].content.keys().collect::<Vec<_>>(), vec![ANY_MEDIA]);
    }

    #[test]
    fn test_collisions_accumulate() {
        let map = classify(
            Some(TypeDescriptor::union(vec![
                TypeDescriptor::reference("app", "Pet"),
                TypeDescriptor::int(),
                TypeDescriptor::reference("app", "Pet"),
            ])),
            "get",
        );
        let bucket = &map["200"].content[JSON_MEDIA];
        assert_eq!(bucket.types().len(), 2);
        assert!(matches!(bucket.ty(), TypeDescriptor::Union { .. }));
    }
}
