#![deny(missing_docs)]

//! # Syntax Nodes
//!
//! Signature-level nodes produced by the generator. Every node renders
//! itself through `Display`; bodies of generated resources are left empty.

use std::fmt;

/// A type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    /// Builtin or named type (`int`, `Pet`, `http:Ok`, `byte[]`).
    Named(String),
    /// String literal type (`"available"`).
    Literal(String),
    /// `T[]`
    Array(Box<TypeNode>),
    /// `map<T>`
    Map(Box<TypeNode>),
    /// `T?`
    Optional(Box<TypeNode>),
    /// `A|B|C`
    Union(Vec<TypeNode>),
    /// Inline record type.
    Record(RecordNode),
}

impl TypeNode {
    /// A named type.
    pub fn named(name: impl Into<String>) -> Self {
        TypeNode::Named(name.into())
    }

    /// `T[]`
    pub fn array(element: TypeNode) -> Self {
        TypeNode::Array(Box::new(element))
    }

    /// `map<T>`
    pub fn map(value: TypeNode) -> Self {
        TypeNode::Map(Box::new(value))
    }

    /// `T?`; types that already admit nil are returned as is.
    pub fn optional(self) -> Self {
        let nilable = match &self {
            TypeNode::Optional(_) => true,
            TypeNode::Named(name) => name == "anydata" || name == "json",
            _ => false,
        };
        if nilable {
            self
        } else {
            TypeNode::Optional(Box::new(self))
        }
    }

    /// Union of distinct members; a single member is returned as is.
    pub fn union(members: Vec<TypeNode>) -> Self {
        let mut distinct: Vec<TypeNode> = Vec::new();
        for member in members {
            let flattened = match member {
                TypeNode::Union(inner) => inner,
                other => vec![other],
            };
            for m in flattened {
                if !distinct.contains(&m) {
                    distinct.push(m);
                }
            }
        }
        match distinct.len() {
            1 => distinct.remove(0),
            _ => TypeNode::Union(distinct),
        }
    }

    /// True for `T?`.
    pub fn is_optional(&self) -> bool {
        matches!(self, TypeNode::Optional(_))
    }

    fn needs_parens(&self) -> bool {
        matches!(self, TypeNode::Union(_) | TypeNode::Optional(_))
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Named(name) => write!(f, "{}", name),
            TypeNode::Literal(value) => write!(f, "{:?}", value),
            TypeNode::Array(element) if element.needs_parens() => write!(f, "({})[]", element),
            TypeNode::Array(element) => write!(f, "{}[]", element),
            TypeNode::Map(value) => write!(f, "map<{}>", value),
            TypeNode::Optional(inner) if matches!(**inner, TypeNode::Union(_)) => {
                write!(f, "({})?", inner)
            }
            TypeNode::Optional(inner) => write!(f, "{}?", inner),
            TypeNode::Union(members) => {
                let parts: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                write!(f, "{}", parts.join("|"))
            }
            TypeNode::Record(record) => write!(f, "{}", record),
        }
    }
}

/// A record field.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    /// Escaped field name.
    pub name: String,
    /// Field type.
    pub ty: TypeNode,
    /// `name?` marker.
    pub optional: bool,
    /// Field documentation.
    pub doc: Option<String>,
}

/// Record type body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordNode {
    /// `*Type;` inclusions.
    pub inclusions: Vec<String>,
    /// Fields in declaration order.
    pub fields: Vec<RecordField>,
    /// Rest field type (`T...;`), closed records only.
    pub rest: Option<Box<TypeNode>>,
    /// `{| |}` instead of `{ }`.
    pub closed: bool,
}

impl RecordNode {
    /// Field lookup by escaped name.
    pub fn field(&self, name: &str) -> Option<&RecordField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl fmt::Display for RecordNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = if self.closed { ("{|", "|}") } else { ("{", "}") };
        let mut parts: Vec<String> = Vec::new();
        for inclusion in &self.inclusions {
            parts.push(format!("*{};", inclusion));
        }
        for field in &self.fields {
            let marker = if field.optional { "?" } else { "" };
            parts.push(format!("{} {}{};", field.ty, field.name, marker));
        }
        if let Some(rest) = &self.rest {
            parts.push(format!("{}...;", rest));
        }
        if parts.is_empty() {
            write!(f, "record {}{}", open, close)
        } else {
            write!(f, "record {} {} {}", open, parts.join(" "), close)
        }
    }
}

/// `public type Name T;`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinitionNode {
    /// Type name.
    pub name: String,
    /// Definition.
    pub ty: TypeNode,
    /// Documentation line.
    pub doc: Option<String>,
}

impl fmt::Display for TypeDefinitionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(doc) = &self.doc {
            write_doc(f, doc, "")?;
        }
        match &self.ty {
            TypeNode::Record(record) if !record.fields.is_empty() || record.rest.is_some() => {
                let (open, close) = if record.closed { ("{|", "|}") } else { ("{", "}") };
                writeln!(f, "public type {} record {}", self.name, open)?;
                for inclusion in &record.inclusions {
                    writeln!(f, "    *{};", inclusion)?;
                }
                for field in &record.fields {
                    if let Some(doc) = &field.doc {
                        write_doc(f, doc, "    ")?;
                    }
                    let marker = if field.optional { "?" } else { "" };
                    writeln!(f, "    {} {}{};", field.ty, field.name, marker)?;
                }
                if let Some(rest) = &record.rest {
                    writeln!(f, "    {}...;", rest)?;
                }
                writeln!(f, "{};", close)
            }
            other => writeln!(f, "public type {} {};", self.name, other),
        }
    }
}

fn write_doc(f: &mut fmt::Formatter<'_>, doc: &str, indent: &str) -> fmt::Result {
    for line in doc.lines() {
        writeln!(f, "{}# {}", indent, line.trim_end())?;
    }
    Ok(())
}

/// `listener http:Listener ep0 = new (9090, config = {host: "localhost"});`
#[derive(Debug, Clone, PartialEq)]
pub struct ListenerNode {
    /// Variable name.
    pub name: String,
    /// Bound host.
    pub host: String,
    /// Bound port.
    pub port: u16,
    /// Base path from the server URL.
    pub base_path: String,
}

impl fmt::Display for ListenerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "listener http:Listener {} = new ({}, config = {{host: {:?}}});",
            self.name, self.port, self.host
        )
    }
}

/// A resource function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    /// `@http:Header {name: "X-Trace"}`, `@http:Payload`, ...
    pub annotation: Option<String>,
    /// Parameter type.
    pub ty: TypeNode,
    /// Escaped name.
    pub name: String,
    /// Default value expression.
    pub default: Option<String>,
}

impl fmt::Display for ParameterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(annotation) = &self.annotation {
            write!(f, "{} ", annotation)?;
        }
        write!(f, "{} {}", self.ty, self.name)?;
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

/// A resource path segment.
#[derive(Debug, Clone, PartialEq)]
pub enum PathNode {
    /// Literal (escaped) segment.
    Literal(String),
    /// `[T name]`
    Param {
        /// Parameter type.
        ty: TypeNode,
        /// Escaped name.
        name: String,
    },
}

impl fmt::Display for PathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathNode::Literal(segment) => write!(f, "{}", segment),
            PathNode::Param { ty, name } => write!(f, "[{} {}]", ty, name),
        }
    }
}

/// A resource function skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    /// Accessor (`get`, `post`, ...).
    pub method: String,
    /// Path relative to the service base path; empty for `.`.
    pub path: Vec<PathNode>,
    /// Header, query and payload parameters.
    pub parameters: Vec<ParameterNode>,
    /// Return type; `None` renders no `returns` clause.
    pub return_type: Option<TypeNode>,
    /// Contract operation id.
    pub operation_id: Option<String>,
    /// Summary or description.
    pub doc: Option<String>,
}

impl ResourceNode {
    /// `resource function get pets/[int id](...) returns T`
    pub fn signature(&self) -> String {
        let path = if self.path.is_empty() {
            ".".to_string()
        } else {
            self.path
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join("/")
        };
        let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
        let mut signature = format!(
            "resource function {} {}({})",
            self.method,
            path,
            params.join(", ")
        );
        if let Some(ret) = &self.return_type {
            signature.push_str(&format!(" returns {}", ret));
        }
        signature
    }

    /// Path template of the resource, for lookups in tests and reports.
    pub fn path_template(&self) -> String {
        let segments: Vec<String> = self
            .path
            .iter()
            .map(|p| match p {
                PathNode::Literal(segment) => segment.clone(),
                PathNode::Param { name, .. } => format!("{{{}}}", name),
            })
            .collect();
        format!("/{}", segments.join("/"))
    }
}

impl fmt::Display for ResourceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(doc) = &self.doc {
            write_doc(f, doc, "    ")?;
        }
        writeln!(f, "    {} {{", self.signature())?;
        writeln!(f, "    }}")
    }
}

/// `service OASServiceType /base on ep0 { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceNode {
    /// Escaped absolute base path segments; empty for `/`.
    pub base_path: Vec<String>,
    /// Listener variable.
    pub listener: String,
    /// Implemented service type, if generated.
    pub service_type: Option<String>,
    /// Resource skeletons.
    pub resources: Vec<ResourceNode>,
}

impl ServiceNode {
    fn base_path(&self) -> String {
        format!("/{}", self.base_path.join("/"))
    }
}

impl fmt::Display for ServiceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.service_type {
            Some(ty) => writeln!(
                f,
                "service {} {} on {} {{",
                ty,
                self.base_path(),
                self.listener
            )?,
            None => writeln!(f, "service {} on {} {{", self.base_path(), self.listener)?,
        }
        for (i, resource) in self.resources.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", resource)?;
        }
        writeln!(f, "}}")
    }
}

/// `public type OASServiceType service object { ... };`
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceTypeNode {
    /// Type name.
    pub name: String,
    /// Resource method declarations.
    pub resources: Vec<ResourceNode>,
}

impl fmt::Display for ServiceTypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "public type {} service object {{", self.name)?;
        writeln!(f, "    *http:ServiceContract;")?;
        for resource in &self.resources {
            writeln!(f, "    {};", resource.signature())?;
        }
        writeln!(f, "}};")
    }
}
