#![deny(missing_docs)]

//! # Listener Derivation
//!
//! The listener comes from the first server of the contract, with server
//! variables replaced by their defaults.

use crate::error::{AppError, AppResult};
use crate::generator::nodes::ListenerNode;
use crate::oas::shims::ContractServer;
use url::{ParseError, Url};

/// Listener variable name.
pub const LISTENER_NAME: &str = "ep0";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 9090;

/// Builds the listener declaration.
///
/// Without servers the listener binds `localhost:9090` with base path `/`.
/// Relative server URLs only contribute their base path.
pub fn derive_listener(servers: &[ContractServer]) -> AppResult<ListenerNode> {
    let Some(server) = servers.first() else {
        return Ok(listener(DEFAULT_HOST.to_string(), DEFAULT_PORT, "/"));
    };

    let mut resolved = server.url.clone();
    for (name, variable) in &server.variables {
        resolved = resolved.replace(&format!("{{{}}}", name), &variable.default);
    }

    match Url::parse(&resolved) {
        Ok(url) => {
            if url.cannot_be_a_base() {
                return Err(AppError::InvalidServerUrl(server.url.clone()));
            }
            let host = url
                .host_str()
                .filter(|h| !h.is_empty())
                .unwrap_or(DEFAULT_HOST)
                .to_string();
            let port = url.port_or_known_default().unwrap_or(DEFAULT_PORT);
            Ok(listener(host, port, url.path()))
        }
        Err(ParseError::RelativeUrlWithoutBase) if resolved.starts_with('/') => {
            Ok(listener(DEFAULT_HOST.to_string(), DEFAULT_PORT, &resolved))
        }
        Err(_) => Err(AppError::InvalidServerUrl(server.url.clone())),
    }
}

fn listener(host: String, port: u16, path: &str) -> ListenerNode {
    let trimmed = path.trim_end_matches('/');
    let base_path = if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    };
    ListenerNode {
        name: LISTENER_NAME.to_string(),
        host,
        port,
        base_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::shims::ContractServerVariable;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn server(url: &str, variables: &[(&str, &str)]) -> ContractServer {
        ContractServer {
            url: url.to_string(),
            description: None,
            variables: variables
                .iter()
                .map(|(name, default)| {
                    (
                        name.to_string(),
                        ContractServerVariable {
                            default: default.to_string(),
                            enum_values: None,
                            description: None,
                        },
                    )
                })
                .collect::<IndexMap<_, _>>(),
        }
    }

    #[test]
    fn test_default_listener() {
        let listener = derive_listener(&[]).unwrap();
        assert_eq!(listener.host, "localhost");
        assert_eq!(listener.port, 9090);
        assert_eq!(listener.base_path, "/");
    }

    #[test]
    fn test_listener_from_templated_server() {
        let servers = [server(
            "{server}:{port}/api/v1/",
            &[("server", "http://petstore.io"), ("port", "8080")],
        )];
        let listener = derive_listener(&servers).unwrap();
        assert_eq!(listener.host, "petstore.io");
        assert_eq!(listener.port, 8080);
        assert_eq!(listener.base_path, "/api/v1");
    }

    #[test]
    fn test_known_default_port_and_relative_url() {
        let listener = derive_listener(&[server("https://api.example.com", &[])]).unwrap();
        assert_eq!(listener.port, 443);
        assert_eq!(listener.base_path, "/");

        let listener = derive_listener(&[server("/v2", &[])]).unwrap();
        assert_eq!(listener.host, "localhost");
        assert_eq!(listener.base_path, "/v2");
    }

    #[test]
    fn test_invalid_server_url() {
        let err = derive_listener(&[server("http://exa mple.com:port", &[])]).unwrap_err();
        assert!(matches!(err, AppError::InvalidServerUrl(_)));
    }
}
