//! Cache headers derived from the cache annotation.

use crate::model::service::CacheConfig;
use crate::oas::document::Header;
use crate::oas::schema::Schema;
use indexmap::IndexMap;
use serde_json::Value;

const CACHE_CONTROL: &str = "Cache-Control";
const ETAG: &str = "ETag";
const LAST_MODIFIED: &str = "Last-Modified";

/// Builds the `Cache-Control` directive a cached response carries.
pub fn cache_control_directive(cache: &CacheConfig) -> String {
    let mut directives: Vec<String> = Vec::new();

    if cache.must_revalidate {
        directives.push("must-revalidate".to_string());
    }
    if cache.no_cache {
        directives.push(with_fields("no-cache", &cache.no_cache_fields));
    }
    if cache.no_store {
        directives.push("no-store".to_string());
    }
    if cache.no_transform {
        directives.push("no-transform".to_string());
    }
    if cache.is_private {
        directives.push(with_fields("private", &cache.private_fields));
    } else {
        directives.push("public".to_string());
    }
    if cache.proxy_revalidate {
        directives.push("proxy-revalidate".to_string());
    }
    if cache.max_age >= 0 {
        directives.push(format!("max-age={}", cache.max_age));
    }
    if cache.s_max_age >= 0 {
        directives.push(format!("s-maxage={}", cache.s_max_age));
    }

    directives.join(",")
}

fn with_fields(directive: &str, fields: &[String]) -> String {
    if fields.is_empty() {
        directive.to_string()
    } else {
        format!("{}=\"{}\"", directive, fields.join(","))
    }
}

/// Headers added to every 2xx response of a cached resource.
pub(super) fn cache_headers(cache: &CacheConfig) -> IndexMap<String, Header> {
    let mut headers = IndexMap::new();
    headers.insert(
        CACHE_CONTROL.to_string(),
        Header {
            description: None,
            schema: Schema {
                default: Some(Value::String(cache_control_directive(cache))),
                ..Schema::string()
            },
        },
    );
    if cache.set_etag {
        headers.insert(
            ETAG.to_string(),
            Header {
                description: None,
                schema: Schema::string(),
            },
        );
    }
    if cache.set_last_modified {
        headers.insert(
            LAST_MODIFIED.to_string(),
            Header {
                description: None,
                schema: Schema::string(),
            },
        );
    }
    headers
}
