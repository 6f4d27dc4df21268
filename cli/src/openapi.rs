#![deny(missing_docs)]

//! # OpenAPI Command
//!
//! Maps a service bundle (service declaration plus the type definitions it
//! uses) to an OpenAPI document.

use std::fs;
use std::path::PathBuf;

use oas_bridge_core::{map_service, MappingOptions, SchemaMode, TypeCatalog};
use tracing::info;

use crate::error::CliResult;
use crate::input::{read_service_bundle, report};

/// Arguments for the openapi command.
#[derive(clap::Args, Debug, Clone)]
pub struct OpenapiArgs {
    /// Service bundle (`.json`, or `.yaml`/`.yml`).
    #[clap(long, short)]
    pub input: PathBuf,

    /// Output file. The document is printed to stdout when omitted.
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Inline every named type instead of emitting components.
    #[clap(long)]
    pub expanded: bool,

    /// Emit JSON instead of YAML.
    #[clap(long)]
    pub json: bool,
}

/// Executes the forward mapping.
pub fn execute(args: &OpenapiArgs) -> CliResult<()> {
    let bundle = read_service_bundle(&args.input)?;

    let mut catalog = TypeCatalog::with_http_module();
    catalog.extend(bundle.definitions);

    let options = MappingOptions {
        mode: if args.expanded {
            SchemaMode::Expanded
        } else {
            SchemaMode::Referenced
        },
        ..MappingOptions::default()
    };
    let mapping = map_service(&bundle.service, &catalog, options)?;
    report(mapping.diagnostics.iter());

    let text = if args.json {
        mapping.document.to_json()?
    } else {
        mapping.document.to_yaml()?
    };

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text)?;
            info!(path = %path.display(), "Wrote OpenAPI document");
            println!("Generated OpenAPI document at {:?}", path);
        }
        None => print!("{}", text),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BUNDLE: &str = r#"{
        "service": {
            "base_path": "/store",
            "resources": [
                {
                    "method": "post",
                    "path": [{ "kind": "literal", "value": "orders" }],
                    "parameters": [
                        {
                            "name": "order",
                            "kind": "payload",
                            "type": { "kind": "reference", "module": "app", "name": "Order" }
                        }
                    ],
                    "return_type": { "kind": "reference", "module": "app", "name": "Order" }
                }
            ]
        },
        "definitions": [
            {
                "module": "app",
                "name": "Order",
                "type": {
                    "kind": "record",
                    "fields": { "quantity": { "type": { "kind": "primitive", "name": "int" } } }
                }
            }
        ]
    }"#;

    fn args(dir: &std::path::Path, json: bool) -> OpenapiArgs {
        let input = dir.join("store.json");
        fs::write(&input, BUNDLE).unwrap();
        OpenapiArgs {
            input,
            output: Some(dir.join("out").join(if json { "store.json" } else { "store.yaml" })),
            expanded: false,
            json,
        }
    }

    #[test]
    fn test_execute_writes_yaml() {
        let dir = tempdir().unwrap();
        let args = args(dir.path(), false);
        execute(&args).unwrap();

        let contents = fs::read_to_string(args.output.unwrap()).unwrap();
        assert!(contents.contains("/orders:"));
        assert!(contents.contains("'201':") || contents.contains("\"201\":"));
        assert!(contents.contains("Order:"));
    }

    #[test]
    fn test_execute_writes_json() {
        let dir = tempdir().unwrap();
        let args = args(dir.path(), true);
        execute(&args).unwrap();

        let contents = fs::read_to_string(args.output.unwrap()).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert!(doc["paths"]["/orders"]["post"]["responses"]["201"].is_object());
        assert!(doc["components"]["schemas"]["Order"].is_object());
    }
}
