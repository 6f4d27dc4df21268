#![deny(missing_docs)]

//! # HTTP Module
//!
//! Shapes of the well-known `http` library types and the status code table
//! shared by both mapping directions.

use crate::model::types::{FieldDescriptor, PrimitiveType, RecordType, TypeDefinition, TypeDescriptor, TypeRef};
use indexmap::IndexMap;

/// Module name of the well-known HTTP library.
pub const HTTP_MODULE: &str = "http";

/// Status code to status type name.
pub const STATUS_CODES: &[(&str, &str)] = &[
    ("100", "Continue"),
    ("101", "SwitchingProtocols"),
    ("102", "Processing"),
    ("103", "EarlyHints"),
    ("200", "Ok"),
    ("201", "Created"),
    ("202", "Accepted"),
    ("203", "NonAuthoritativeInformation"),
    ("204", "NoContent"),
    ("205", "ResetContent"),
    ("206", "PartialContent"),
    ("207", "MultiStatus"),
    ("208", "AlreadyReported"),
    ("226", "IMUsed"),
    ("300", "MultipleChoices"),
    ("301", "MovedPermanently"),
    ("302", "Found"),
    ("303", "SeeOther"),
    ("304", "NotModified"),
    ("305", "UseProxy"),
    ("307", "TemporaryRedirect"),
    ("308", "PermanentRedirect"),
    ("400", "BadRequest"),
    ("401", "Unauthorized"),
    ("402", "PaymentRequired"),
    ("403", "Forbidden"),
    ("404", "NotFound"),
    ("405", "MethodNotAllowed"),
    ("406", "NotAcceptable"),
    ("407", "ProxyAuthenticationRequired"),
    ("408", "RequestTimeout"),
    ("409", "Conflict"),
    ("410", "Gone"),
    ("411", "LengthRequired"),
    ("412", "PreconditionFailed"),
    ("413", "PayloadTooLarge"),
    ("414", "UriTooLong"),
    ("415", "UnsupportedMediaType"),
    ("416", "RangeNotSatisfiable"),
    ("417", "ExpectationFailed"),
    ("421", "MisdirectedRequest"),
    ("422", "UnprocessableEntity"),
    ("423", "Locked"),
    ("424", "FailedDependency"),
    ("425", "TooEarly"),
    ("426", "UpgradeRequired"),
    ("428", "PreconditionRequired"),
    ("429", "TooManyRequests"),
    ("431", "RequestHeaderFieldsTooLarge"),
    ("451", "UnavailableDueToLegalReasons"),
    ("500", "InternalServerError"),
    ("501", "NotImplemented"),
    ("502", "BadGateway"),
    ("503", "ServiceUnavailable"),
    ("504", "GatewayTimeout"),
    ("505", "HttpVersionNotSupported"),
    ("506", "VariantAlsoNegotiates"),
    ("507", "InsufficientStorage"),
    ("508", "LoopDetected"),
    ("510", "NotExtended"),
    ("511", "NetworkAuthenticationRequired"),
];

/// Looks up the status type name for a code (`"404"` -> `"NotFound"`).
pub fn status_name(code: &str) -> Option<&'static str> {
    STATUS_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Looks up the code for a status type name (`"NotFound"` -> `"404"`).
pub fn status_code(name: &str) -> Option<&'static str> {
    STATUS_CODES
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(code, _)| *code)
}

/// Resolves the status code of an `http:<Status>Error` type name.
pub fn status_code_of_error(name: &str) -> Option<&'static str> {
    name.strip_suffix("Error").and_then(status_code)
}

fn http_ref(name: &str) -> TypeDescriptor {
    TypeDescriptor::reference(HTTP_MODULE, name)
}

fn closed_record(fields: Vec<(&str, FieldDescriptor)>) -> TypeDescriptor {
    TypeDescriptor::Record(RecordType {
        fields: fields
            .into_iter()
            .map(|(name, field)| (name.to_string(), field))
            .collect::<IndexMap<_, _>>(),
        rest: None,
        inclusions: Vec::new(),
    })
}

fn status_code_response_fields() -> Vec<(&'static str, FieldDescriptor)> {
    vec![
        ("status", FieldDescriptor::required(http_ref("Status"))),
        (
            "mediaType",
            FieldDescriptor::optional(TypeDescriptor::string()),
        ),
        (
            "headers",
            FieldDescriptor::optional(TypeDescriptor::map(TypeDescriptor::union(vec![
                TypeDescriptor::string(),
                TypeDescriptor::int(),
                TypeDescriptor::primitive(PrimitiveType::Boolean),
                TypeDescriptor::array(TypeDescriptor::string()),
            ]))),
        ),
        ("body", FieldDescriptor::optional(TypeDescriptor::anydata())),
    ]
}

/// Definitions of the `http` module types the engine relies on.
///
/// Every status type `http:<Status>` is a closed record including
/// `http:StatusCodeResponse`; every client or server error status also has
/// an `http:<Status>Error` error type refining `http:StatusCodeError`.
pub fn http_module_definitions() -> Vec<TypeDefinition> {
    let mut defs = vec![
        TypeDefinition::new(
            HTTP_MODULE,
            "Status",
            closed_record(vec![("code", FieldDescriptor::required(TypeDescriptor::int()))]),
        ),
        TypeDefinition::new(
            HTTP_MODULE,
            "StatusCodeResponse",
            closed_record(status_code_response_fields()),
        ),
        TypeDefinition::new(
            HTTP_MODULE,
            "ErrorPayload",
            closed_record(vec![
                ("timestamp", FieldDescriptor::required(TypeDescriptor::string())),
                ("status", FieldDescriptor::required(TypeDescriptor::int())),
                ("reason", FieldDescriptor::required(TypeDescriptor::string())),
                ("message", FieldDescriptor::required(TypeDescriptor::string())),
                ("path", FieldDescriptor::required(TypeDescriptor::string())),
                ("method", FieldDescriptor::required(TypeDescriptor::string())),
            ]),
        )
        .with_description("Represents the structure of the HTTP error payload"),
        TypeDefinition::new(HTTP_MODULE, "StatusCodeError", TypeDescriptor::Error { detail: None }),
        TypeDefinition::new(
            HTTP_MODULE,
            "Response",
            TypeDescriptor::primitive(PrimitiveType::Handle),
        ),
        TypeDefinition::new(
            HTTP_MODULE,
            "Request",
            TypeDescriptor::primitive(PrimitiveType::Handle),
        ),
        TypeDefinition::new(
            HTTP_MODULE,
            "Caller",
            TypeDescriptor::primitive(PrimitiveType::Handle),
        ),
        TypeDefinition::new(
            HTTP_MODULE,
            "NextService",
            TypeDescriptor::primitive(PrimitiveType::Handle),
        ),
    ];

    for (code, name) in STATUS_CODES {
        let mut record = RecordType {
            inclusions: vec![TypeRef::new(HTTP_MODULE, "StatusCodeResponse")],
            ..RecordType::default()
        };
        for (field, descriptor) in status_code_response_fields() {
            record.fields.insert(field.to_string(), descriptor);
        }
        defs.push(TypeDefinition::new(HTTP_MODULE, *name, TypeDescriptor::Record(record)));

        if code.starts_with('4') || code.starts_with('5') {
            defs.push(TypeDefinition::new(
                HTTP_MODULE,
                format!("{}Error", name),
                http_ref("StatusCodeError"),
            ));
        }
    }

    defs
}
