//! Turning classified buckets into OpenAPI responses.

use super::cache::cache_headers;
use super::{ResponseCodeMap, DEFAULT_STATUS, JSON_MEDIA};
use crate::error::AppResult;
use crate::model::http::status_name;
use crate::model::service::CacheConfig;
use crate::model::types::TypeDescriptor;
use crate::oas::document::{ApiResponse, ApiResponses, Header, MediaType};
use crate::oas::schema::Schema;
use crate::oas::synthesis::{synthesize, SchemaContext};

const BAD_REQUEST: &str = "400";

/// Builds the response map of one operation.
///
/// `data_binding` is set when the resource binds a payload; such resources
/// also answer `400 BadRequest` with an error payload.
pub fn assemble(
    code_map: &ResponseCodeMap,
    cache: Option<&CacheConfig>,
    data_binding: bool,
    ctx: &mut SchemaContext<'_>,
) -> AppResult<ApiResponses> {
    let mut responses = ApiResponses::new();

    for (code, branch) in code_map {
        let description = branch
            .description
            .clone()
            .unwrap_or_else(|| status_description(code));
        let response = responses
            .entry(code.clone())
            .or_insert_with(|| ApiResponse::new(description));

        for (media, bucket) in &branch.content {
            let ty = bucket.ty();
            let schema = if ty.is_anydata() {
                None
            } else {
                synthesize(&ty, ctx)?
            };
            merge_content(response, media, schema);
        }

        for (name, ty) in &branch.headers {
            let schema = synthesize(ty, ctx)?.unwrap_or_else(Schema::string);
            response.headers.insert(
                name.clone(),
                Header {
                    description: None,
                    schema,
                },
            );
        }

        if let Some(cache) = cache {
            if code.starts_with('2') {
                response.headers.extend(cache_headers(cache));
            }
        }
    }

    if data_binding {
        let error_schema = synthesize(&TypeDescriptor::Error { detail: None }, ctx)?;
        let response = responses
            .entry(BAD_REQUEST.to_string())
            .or_insert_with(|| ApiResponse::new(status_description(BAD_REQUEST)));
        merge_content(response, JSON_MEDIA, error_schema);
    }

    Ok(responses)
}

/// Status table description; "Any type of entity body" for `default`.
pub(crate) fn status_description(code: &str) -> String {
    if code == DEFAULT_STATUS {
        return "Any type of entity body".to_string();
    }
    status_name(code).unwrap_or("Response").to_string()
}

/// Adds a schema under a media type, folding differing schemas into a
/// flattened, duplicate-free `oneOf`.
fn merge_content(response: &mut ApiResponse, media: &str, schema: Option<Schema>) {
    let Some(existing) = response.content.get_mut(media) else {
        response
            .content
            .insert(media.to_string(), MediaType { schema });
        return;
    };

    // An unconstrained body absorbs anything merged with it.
    let (Some(current), Some(incoming)) = (existing.schema.take(), schema) else {
        return;
    };
    if current == incoming {
        existing.schema = Some(current);
        return;
    }

    let mut members = Vec::new();
    for candidate in [current, incoming] {
        let parts = if is_plain_one_of(&candidate) {
            candidate.one_of
        } else {
            vec![candidate]
        };
        for part in parts {
            if !members.contains(&part) {
                members.push(part);
            }
        }
    }
    existing.schema = Some(Schema::one_of(members));
}

fn is_plain_one_of(schema: &Schema) -> bool {
    !schema.one_of.is_empty()
        && Schema {
            one_of: Vec::new(),
            ..schema.clone()
        }
        .is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::model::types::{FieldDescriptor, RecordType, TypeDefinition};
    use crate::model::TypeCatalog;
    use crate::oas::responses::classify_responses;
    use pretty_assertions::assert_eq;

    fn catalog() -> TypeCatalog {
        let mut catalog = TypeCatalog::with_http_module();
        let mut pet = RecordType::default();
        pet.fields
            .insert("name".into(), FieldDescriptor::required(TypeDescriptor::string()));
        catalog.insert(TypeDefinition::new("app", "Pet", TypeDescriptor::Record(pet)));
        catalog
    }

    fn responses_for(
        catalog: &TypeCatalog,
        ty: TypeDescriptor,
        cache: Option<&CacheConfig>,
        data_binding: bool,
    ) -> ApiResponses {
        let map = classify_responses(Some(&ty), "get", catalog, &mut Diagnostics::new());
        let mut ctx = SchemaContext::new(catalog);
        assemble(&map, cache, data_binding, &mut ctx).unwrap()
    }

    #[test]
    fn test_cache_headers_only_on_success() {
        let catalog = catalog();
        let responses = responses_for(
            &catalog,
            TypeDescriptor::union(vec![
                TypeDescriptor::reference("app", "Pet"),
                TypeDescriptor::reference("http", "NotFound"),
            ]),
            Some(&CacheConfig::default()),
            false,
        );

        assert_eq!(responses.keys().collect::<Vec<_>>(), vec!["200", "404"]);
        assert_eq!(
            responses["200"].headers.keys().collect::<Vec<_>>(),
            vec!["Cache-Control", "ETag", "Last-Modified"]
        );
        assert!(responses["404"].headers.is_empty());
        assert_eq!(responses["404"].description, "NotFound");
        assert_eq!(responses["200"].description, "Ok");
    }

    #[test]
    fn test_collision_under_one_media_becomes_one_of() {
        let catalog = catalog();
        let responses = responses_for(
            &catalog,
            TypeDescriptor::union(vec![
                TypeDescriptor::reference("app", "Pet"),
                TypeDescriptor::int(),
            ]),
            None,
            false,
        );
        let schema = responses["200"].content[JSON_MEDIA].schema.clone().unwrap();
        assert_eq!(schema.one_of.len(), 2);
        assert_eq!(schema.one_of[0], Schema::component_ref("Pet"));
    }

    #[test]
    fn test_anydata_has_no_schema() {
        let catalog = catalog();
        let responses = responses_for(&catalog, TypeDescriptor::anydata(), None, false);
        assert_eq!(
            responses["200"].content.keys().collect::<Vec<_>>(),
            vec!["*/*"]
        );
        assert!(responses["200"].content["*/*"].schema.is_none());
    }

    #[test]
    fn test_data_binding_adds_bad_request() {
        let catalog = catalog();
        let responses = responses_for(&catalog, TypeDescriptor::reference("app", "Pet"), None, true);
        let bad_request = &responses["400"];
        assert_eq!(bad_request.description, "BadRequest");
        assert_eq!(
            bad_request.content[JSON_MEDIA].schema,
            Some(Schema::component_ref("ErrorPayload"))
        );
    }

    #[test]
    fn test_merge_flattens_one_of() {
        let mut response = ApiResponse::new("Ok");
        merge_content(
            &mut response,
            JSON_MEDIA,
            Some(Schema::one_of(vec![Schema::string(), Schema::object()])),
        );
        merge_content(&mut response, JSON_MEDIA, Some(Schema::component_ref("Pet")));
        merge_content(&mut response, JSON_MEDIA, Some(Schema::string()));

        let schema = response.content[JSON_MEDIA].schema.clone().unwrap();
        assert_eq!(
            schema.one_of,
            vec![Schema::string(), Schema::object(), Schema::component_ref("Pet")]
        );
    }
}
