#![deny(missing_docs)]

//! # OAS Bridge CLI
//!
//! Command Line Interface for converting between service declarations and
//! OpenAPI contracts.
//!
//! Supported Commands:
//! - `openapi`: service bundle -> OpenAPI YAML/JSON.
//! - `service`: OpenAPI -> service skeleton, types and optional service type.
//! - `service-type`: OpenAPI -> service object type only.
//! - `validate`: checks a service bundle against an OpenAPI contract.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod error;
mod input;
mod openapi;
mod service;
mod validate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI bridge for HTTP services")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an OpenAPI document from a service bundle.
    Openapi(openapi::OpenapiArgs),
    /// Generate a service skeleton from an OpenAPI contract.
    Service(service::ServiceArgs),
    /// Generate only the service object type from an OpenAPI contract.
    ServiceType(service::ServiceArgs),
    /// Check a service bundle against an OpenAPI contract.
    Validate(validate::ValidateArgs),
}

fn run(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Openapi(args) => openapi::execute(args),
        Commands::Service(args) => service::execute(args, false),
        Commands::ServiceType(args) => service::execute(args, true),
        Commands::Validate(args) => validate::execute(args),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_flags_split_on_commas() {
        let cli = Cli::try_parse_from([
            "oas-bridge",
            "service",
            "--input",
            "pets.yaml",
            "--tags",
            "pets,stores",
            "--exclude-operations",
            "deletePet",
            "--with-service-type",
            "--nullable",
        ])
        .unwrap();
        let Commands::Service(args) = cli.command else {
            panic!("expected the service command");
        };
        assert_eq!(args.tags, vec!["pets".to_string(), "stores".to_string()]);
        assert_eq!(args.exclude_operations, vec!["deletePet".to_string()]);
        assert!(args.with_service_type);
        assert!(args.nullable);
        assert!(!args.single_file);
    }

    #[test]
    fn test_openapi_flags() {
        let cli = Cli::try_parse_from(["oas-bridge", "openapi", "-i", "svc.json", "--expanded", "--json"])
            .unwrap();
        let Commands::Openapi(args) = cli.command else {
            panic!("expected the openapi command");
        };
        assert!(args.expanded);
        assert!(args.json);
        assert!(args.output.is_none());
    }
}
