//! Source text for generated services.

use crate::generator::{GeneratedService, GeneratorOptions};

const IMPORTS: &str = "import ballerina/http;\n";
const DEFAULT_STEM: &str = "openapi";
const TYPES_FILE: &str = "types.bal";
const SERVICE_TYPE_FILE: &str = "service_type.bal";

/// A rendered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// File name, relative to the output directory.
    pub name: String,
    /// File contents.
    pub contents: String,
}

fn header(options: &GeneratorOptions) -> String {
    let mut text = String::new();
    if let Some(license) = options.license.as_deref().filter(|l| !l.trim().is_empty()) {
        text.push_str(license.trim_end());
        text.push_str("\n\n");
    }
    text.push_str(IMPORTS);
    text
}

fn service_file_name(options: &GeneratorOptions) -> String {
    format!(
        "{}_service.bal",
        options.file_stem.as_deref().unwrap_or(DEFAULT_STEM)
    )
}

/// Renders the service, its types and (when generated) its service type.
///
/// With `single_file` everything lands in `<stem>_service.bal`; otherwise
/// type definitions go to `types.bal` and the service type to
/// `service_type.bal`.
pub fn render_service(generated: &GeneratedService, options: &GeneratorOptions) -> Vec<RenderedFile> {
    let mut service = header(options);
    service.push_str(&format!("\n{}", generated.listener));

    if options.single_file {
        if let Some(service_type) = &generated.service_type {
            service.push_str(&format!("\n{}", service_type));
        }
        for def in &generated.types {
            service.push_str(&format!("\n{}", def));
        }
        service.push_str(&format!("\n{}", generated.service));
        return vec![RenderedFile {
            name: service_file_name(options),
            contents: service,
        }];
    }

    service.push_str(&format!("\n{}", generated.service));
    let mut files = vec![RenderedFile {
        name: service_file_name(options),
        contents: service,
    }];

    if !generated.types.is_empty() {
        let mut types = header(options);
        for def in &generated.types {
            types.push_str(&format!("\n{}", def));
        }
        files.push(RenderedFile {
            name: TYPES_FILE.to_string(),
            contents: types,
        });
    }

    files.extend(render_service_type(generated, options));
    files
}

/// Renders the service object type alone, if one was generated.
pub fn render_service_type(
    generated: &GeneratedService,
    options: &GeneratorOptions,
) -> Option<RenderedFile> {
    let service_type = generated.service_type.as_ref()?;
    let mut contents = header(options);
    contents.push_str(&format!("\n{}", service_type));
    Some(RenderedFile {
        name: SERVICE_TYPE_FILE.to_string(),
        contents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{generate_service, ServiceMetadata};

    const CONTRACT: &str = r#"
openapi: 3.0.1
info:
  title: Pets
  version: 1.0.0
paths:
  /pets:
    get:
      responses:
        "200":
          description: Ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pet'
components:
  schemas:
    Pet:
      type: object
      properties:
        name:
          type: string
"#;

    #[test]
    fn test_split_files() {
        let options = GeneratorOptions {
            license: Some("// Copyright Pets Inc.".into()),
            metadata: ServiceMetadata {
                generate_service_type: true,
                ..ServiceMetadata::default()
            },
            file_stem: Some("pets".into()),
            ..GeneratorOptions::default()
        };
        let generated = generate_service(CONTRACT, &options).unwrap();
        let files = render_service(&generated, &options);

        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["pets_service.bal", "types.bal", "service_type.bal"]);
        assert!(files
            .iter()
            .all(|f| f.contents.starts_with("// Copyright Pets Inc.\n\nimport ballerina/http;")));
        assert!(files[0].contents.contains(
            "listener http:Listener ep0 = new (9090, config = {host: \"localhost\"});"
        ));
        assert!(files[0].contents.contains("service OASServiceType / on ep0 {"));
        assert!(files[0]
            .contents
            .contains("    resource function get pets() returns Pet {\n    }\n"));
        assert!(files[1].contents.contains("public type Pet record {\n    string name?;\n};"));
        assert!(files[2]
            .contents
            .contains("    resource function get pets() returns Pet;\n"));
    }

    #[test]
    fn test_single_file() {
        let options = GeneratorOptions {
            single_file: true,
            ..GeneratorOptions::default()
        };
        let generated = generate_service(CONTRACT, &options).unwrap();
        let files = render_service(&generated, &options);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "openapi_service.bal");
        let contents = &files[0].contents;
        let type_pos = contents.find("public type Pet").unwrap();
        let service_pos = contents.find("service / on ep0").unwrap();
        assert!(type_pos < service_pos);
        assert!(render_service_type(&generated, &options).is_none());
    }
}
