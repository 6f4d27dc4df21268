#![deny(missing_docs)]

//! # Responses
//!
//! Return types are first partitioned into `(status code, media type)`
//! buckets by [`classify_responses`], then turned into OpenAPI responses by
//! [`assemble`].

use crate::model::types::TypeDescriptor;
use indexmap::IndexMap;

mod assembler;
mod cache;
mod classifier;
mod media;

pub use assembler::assemble;
pub use cache::cache_control_directive;
pub use classifier::{classify_responses, default_status_code};
pub use media::media_type_of;

/// `application/json`
pub const JSON_MEDIA: &str = "application/json";
/// `application/xml`
pub const XML_MEDIA: &str = "application/xml";
/// `text/plain`
pub const TEXT_MEDIA: &str = "text/plain";
/// `application/octet-stream`
pub const OCTET_MEDIA: &str = "application/octet-stream";
/// `*/*`
pub const ANY_MEDIA: &str = "*/*";
/// Status key of the catch-all response.
pub const DEFAULT_STATUS: &str = "default";

/// Types that landed on one `(status code, media type)` key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseBucket {
    types: Vec<TypeDescriptor>,
}

impl ResponseBucket {
    /// Adds a type unless an equal one is already present.
    pub fn push(&mut self, ty: TypeDescriptor) {
        if !self.types.contains(&ty) {
            self.types.push(ty);
        }
    }

    /// Distinct types in arrival order.
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    /// The single type, or the union of the colliding types.
    pub fn ty(&self) -> TypeDescriptor {
        match self.types.as_slice() {
            [single] => single.clone(),
            many => TypeDescriptor::union(many.to_vec()),
        }
    }
}

/// Everything known about one status code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusBranch {
    /// First description supplied for the code.
    pub description: Option<String>,
    /// Buckets keyed by media type.
    pub content: IndexMap<String, ResponseBucket>,
    /// Header name -> header type.
    pub headers: IndexMap<String, TypeDescriptor>,
}

impl StatusBranch {
    /// Records a body type under a media type.
    pub fn add(&mut self, media_type: &str, ty: TypeDescriptor) {
        self.content
            .entry(media_type.to_string())
            .or_default()
            .push(ty);
    }

    /// Keeps the first description.
    pub fn describe(&mut self, description: Option<&str>) {
        if self.description.is_none() {
            self.description = description.map(str::to_string);
        }
    }
}

/// Status code -> branch, in the order the codes were first seen.
pub type ResponseCodeMap = IndexMap<String, StatusBranch>;
