//! Command-line and environment configuration for the server binary.

use clap::Parser;

use crate::http::DEFAULT_MAX_BODY;
use crate::json::{DEFAULT_MAX_OUTPUT, MapKeyMode, ProjectOptions};
use crate::service::ServiceConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "cbor-json-bridge", version, about = "Decode hex-encoded CBOR into lossless JSON over HTTP")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "CBOR_BRIDGE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short, env = "CBOR_BRIDGE_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Largest projected JSON result, in bytes
    #[arg(long, env = "CBOR_BRIDGE_MAX_OUTPUT", default_value_t = DEFAULT_MAX_OUTPUT)]
    pub max_output: usize,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "CBOR_BRIDGE_MAX_REQUEST", default_value_t = DEFAULT_MAX_BODY)]
    pub max_request: usize,

    /// How maps with non-text keys are projected: `stringify` or `pairs`
    #[arg(long, env = "CBOR_BRIDGE_MAP_KEYS", default_value_t = MapKeyMode::Stringify)]
    pub map_keys: MapKeyMode,
}

impl Config {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            projection: ProjectOptions {
                map_keys: self.map_keys,
                max_output: self.max_output,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    /// Default value and env fallback of an argument, read from the command
    /// definition so the result does not depend on the test environment.
    fn declared(id: &str) -> (String, String) {
        let command = Config::command();
        let arg = command
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .unwrap_or_else(|| panic!("no argument {id}"));
        let default = arg
            .get_default_values()
            .iter()
            .map(|value| value.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(",");
        let env = arg.get_env().unwrap().to_string_lossy().into_owned();
        (default, env)
    }

    #[test]
    fn test_declared_defaults() {
        Config::command().debug_assert();
        assert_eq!(declared("host"), ("0.0.0.0".to_owned(), "CBOR_BRIDGE_HOST".to_owned()));
        assert_eq!(declared("port"), ("8080".to_owned(), "CBOR_BRIDGE_PORT".to_owned()));
        assert_eq!(
            declared("max_output"),
            (DEFAULT_MAX_OUTPUT.to_string(), "CBOR_BRIDGE_MAX_OUTPUT".to_owned())
        );
        assert_eq!(
            declared("max_request"),
            (DEFAULT_MAX_BODY.to_string(), "CBOR_BRIDGE_MAX_REQUEST".to_owned())
        );
        assert_eq!(
            declared("map_keys"),
            ("stringify".to_owned(), "CBOR_BRIDGE_MAP_KEYS".to_owned())
        );
    }

    #[test]
    fn test_default_values_match_service_defaults() {
        let config = Config::try_parse_from([
            "cbor-json-bridge",
            "--max-output",
            DEFAULT_MAX_OUTPUT.to_string().as_str(),
            "--map-keys",
            "stringify",
        ])
        .unwrap();
        assert_eq!(config.service_config(), ServiceConfig::default());
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "cbor-json-bridge",
            "--host",
            "127.0.0.1",
            "-p",
            "9000",
            "--max-output",
            "64",
            "--max-request",
            "128",
            "--map-keys",
            "pairs",
        ])
        .unwrap();
        assert_eq!(config.address(), "127.0.0.1:9000");
        assert_eq!(config.max_request, 128);
        assert_eq!(config.service_config().projection.max_output, 64);
        assert_eq!(config.service_config().projection.map_keys, MapKeyMode::Pairs);
    }

    #[test]
    fn test_rejects_unknown_map_key_mode() {
        assert!(Config::try_parse_from(["cbor-json-bridge", "--map-keys", "sorted"]).is_err());
    }
}
