#![deny(missing_docs)]

//! # Service Command
//!
//! Generates a service skeleton (or only its service object type) from an
//! OpenAPI contract.

use std::fs;
use std::path::PathBuf;

use oas_bridge_core::generator::render_service_type;
use oas_bridge_core::{generate_service, render_service, Filter, GeneratorOptions, ServiceMetadata};
use tracing::info;

use crate::error::{CliError, CliResult};
use crate::input::{file_stem, read_file, read_license, report};

/// Arguments shared by the service and service-type commands.
#[derive(clap::Args, Debug, Clone)]
pub struct ServiceArgs {
    /// OpenAPI contract (YAML or JSON).
    #[clap(long, short)]
    pub input: PathBuf,

    /// Directory the source files are written to.
    #[clap(long, short, default_value = ".")]
    pub output: PathBuf,

    /// Only keep operations carrying one of these tags.
    #[clap(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Drop operations carrying one of these tags.
    #[clap(long, value_delimiter = ',')]
    pub exclude_tags: Vec<String>,

    /// Only keep these operation ids.
    #[clap(long, value_delimiter = ',')]
    pub operations: Vec<String>,

    /// Drop these operation ids.
    #[clap(long, value_delimiter = ',')]
    pub exclude_operations: Vec<String>,

    /// File whose contents are placed at the top of every generated file.
    #[clap(long)]
    pub license: Option<PathBuf>,

    /// Also generate a service object type and implement it.
    #[clap(long)]
    pub with_service_type: bool,

    /// Take request bodies as `http:Request` instead of bound payloads.
    #[clap(long)]
    pub without_data_binding: bool,

    /// Make every field and parameter type nilable.
    #[clap(long)]
    pub nullable: bool,

    /// Write everything into a single file.
    #[clap(long)]
    pub single_file: bool,
}

impl ServiceArgs {
    fn options(&self) -> CliResult<GeneratorOptions> {
        Ok(GeneratorOptions {
            filter: Filter {
                tags: self.tags.clone(),
                exclude_tags: self.exclude_tags.clone(),
                operations: self.operations.clone(),
                exclude_operations: self.exclude_operations.clone(),
            },
            metadata: ServiceMetadata {
                nullable: self.nullable,
                generate_service_type: self.with_service_type,
                generate_without_data_binding: self.without_data_binding,
            },
            license: read_license(self.license.as_deref())?,
            single_file: self.single_file,
            file_stem: file_stem(&self.input),
        })
    }
}

/// Executes generation. With `type_only` just the service object type is
/// written.
pub fn execute(args: &ServiceArgs, type_only: bool) -> CliResult<()> {
    let contract = read_file(&args.input)?;
    let mut options = args.options()?;
    if type_only {
        options.metadata.generate_service_type = true;
    }

    let generated = generate_service(&contract, &options)?;
    report(generated.diagnostics.iter());
    for path in &generated.unsupported_paths {
        eprintln!("Skipped unsupported path {}", path);
    }

    let files = if type_only {
        let file = render_service_type(&generated, &options).ok_or_else(|| {
            CliError::General("no service type could be generated".to_string())
        })?;
        vec![file]
    } else {
        render_service(&generated, &options)
    };

    fs::create_dir_all(&args.output)?;
    for file in files {
        let path = args.output.join(&file.name);
        fs::write(&path, file.contents)?;
        info!(path = %path.display(), "Wrote generated source");
        println!("Generated {:?}", path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    const CONTRACT: &str = r#"
openapi: 3.0.1
info:
  title: Pets
  version: 1.0.0
servers:
  - url: http://localhost:8080/v1
paths:
  /pets:
    get:
      operationId: listPets
      tags: [pets]
      responses:
        "200":
          description: Ok
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/Pet'
  /stores:
    get:
      operationId: listStores
      tags: [stores]
      responses:
        "200":
          description: Ok
          content:
            text/plain:
              schema:
                type: string
components:
  schemas:
    Pet:
      type: object
      required: [name]
      properties:
        name:
          type: string
"#;

    fn args(dir: &Path) -> ServiceArgs {
        let input = dir.join("pet-store.yaml");
        fs::write(&input, CONTRACT).unwrap();
        ServiceArgs {
            input,
            output: dir.join("generated"),
            tags: Vec::new(),
            exclude_tags: Vec::new(),
            operations: Vec::new(),
            exclude_operations: Vec::new(),
            license: None,
            with_service_type: false,
            without_data_binding: false,
            nullable: false,
            single_file: false,
        }
    }

    #[test]
    fn test_execute_writes_service_and_types() {
        let dir = tempdir().unwrap();
        let mut args = args(dir.path());
        let license = dir.path().join("LICENSE.txt");
        fs::write(&license, "// Licensed to the pet store.\n").unwrap();
        args.license = Some(license);
        args.exclude_tags = vec!["stores".to_string()];

        execute(&args, false).unwrap();

        let service = fs::read_to_string(args.output.join("pet_store_service.bal")).unwrap();
        assert!(service.starts_with("// Licensed to the pet store.\n\nimport ballerina/http;"));
        assert!(service.contains("new (8080, config = {host: \"localhost\"})"));
        assert!(service.contains("service /v1 on ep0 {"));
        assert!(service.contains("resource function get pets() returns Pet[]"));
        assert!(!service.contains("stores"));

        let types = fs::read_to_string(args.output.join("types.bal")).unwrap();
        assert!(types.contains("public type Pet record {"));
    }

    #[test]
    fn test_execute_service_type_only() {
        let dir = tempdir().unwrap();
        let args = args(dir.path());

        execute(&args, true).unwrap();

        let written: Vec<String> = fs::read_dir(&args.output)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(written, vec!["service_type.bal".to_string()]);
        let contents = fs::read_to_string(args.output.join("service_type.bal")).unwrap();
        assert!(contents.contains("public type OASServiceType service object {"));
        assert!(contents.contains("resource function get stores() returns string;"));
    }

    #[test]
    fn test_execute_missing_contract() {
        let dir = tempdir().unwrap();
        let mut args = args(dir.path());
        args.input = dir.path().join("missing.yaml");
        let err = execute(&args, false).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }
}
