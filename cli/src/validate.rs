#![deny(missing_docs)]

//! # Validate Command
//!
//! Checks a service bundle against an existing OpenAPI contract.

use std::path::PathBuf;

use oas_bridge_core::validate_service;

use crate::error::{CliError, CliResult};
use crate::input::{read_file, read_service_bundle, report};

/// Arguments for the validate command.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Service bundle (`.json`, or `.yaml`/`.yml`).
    #[clap(long, short)]
    pub input: PathBuf,

    /// OpenAPI contract the service must implement.
    #[clap(long, short)]
    pub contract: PathBuf,
}

/// Executes validation. Any finding fails the command.
pub fn execute(args: &ValidateArgs) -> CliResult<()> {
    let bundle = read_service_bundle(&args.input)?;
    let contract = read_file(&args.contract)?;

    let findings = validate_service(&bundle.service, &contract)?;
    report(&findings);
    if findings.is_empty() {
        println!("Service conforms to {:?}", args.contract);
        Ok(())
    } else {
        Err(CliError::General(format!(
            "{} contract violation(s)",
            findings.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const BUNDLE: &str = r#"{
        "service": {
            "base_path": "/",
            "resources": [
                {
                    "method": "get",
                    "path": [{ "kind": "literal", "value": "pets" }],
                    "return_type": { "kind": "primitive", "name": "string" }
                }
            ]
        }
    }"#;

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
  /stores:
    get:
      responses:
        "200":
          description: Ok
"#;

    #[test]
    fn test_unimplemented_operation_fails() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("service.json");
        let contract = dir.path().join("contract.yaml");
        fs::write(&input, BUNDLE).unwrap();
        fs::write(&contract, CONTRACT).unwrap();

        let err = execute(&ValidateArgs { input, contract }).unwrap_err();
        assert_eq!(err.to_string(), "Operation failed: 1 contract violation(s)");
    }

    #[test]
    fn test_conforming_service_passes() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("service.json");
        let contract = dir.path().join("contract.yaml");
        fs::write(&input, BUNDLE).unwrap();
        fs::write(&contract, CONTRACT.replace("  /stores:\n    get:\n      responses:\n        \"200\":\n          description: Ok\n", "")).unwrap();

        execute(&ValidateArgs { input, contract }).unwrap();
    }
}
