//! Request handling: hex -> bytes -> value tree -> JSON -> response envelope.
//!
//! Business failures (bad hex, CBOR syntax errors, oversized output, the
//! encode stub) are answered with HTTP 200 and `"success":false`; only a
//! missing `hex` field is a 400. Clients have to look at the body.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::decode;
use crate::error::ServiceError;
use crate::hex_codec;
use crate::json::{self, ProjectOptions};

pub const LIBRARY_NAME: &str = env!("CARGO_PKG_NAME");
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const LANGUAGE: &str = "rust";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// JSON text
    pub body: String,
}

impl Response {
    fn json<T: Serialize>(status: u16, body: &T) -> Self {
        let body = serde_json::to_string(body).unwrap_or_else(|err| {
            log::error!("failed to serialize response body: {err}");
            r#"{"error":"Internal error"}"#.to_owned()
        });
        Response { status, body }
    }

    pub fn not_found() -> Self {
        Response::json(404, &ErrorBody { error: "Not found" })
    }

    pub fn bad_request() -> Self {
        Response::json(400, &ErrorBody { error: "Bad request" })
    }
}

impl From<ServiceError> for Response {
    fn from(err: ServiceError) -> Self {
        Response::json(
            err.status(),
            &Failure {
                success: false,
                error: err.to_string(),
            },
        )
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

#[derive(Serialize)]
struct Failure {
    success: bool,
    error: String,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    library: &'static str,
    version: &'static str,
    language: &'static str,
}

/// A successful decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Projected JSON text
    pub json: String,
    /// Time spent in the CBOR decoder
    pub duration: Duration,
}

impl Decoded {
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_nanos() as f64 / 1_000_000.0
    }

    /// `{"success":true,"result":<json>,"duration_ms":<float>}`
    pub fn envelope(&self) -> String {
        format!(
            r#"{{"success":true,"result":{},"duration_ms":{}}}"#,
            self.json,
            self.duration_ms()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceConfig {
    pub projection: ProjectOptions,
}

/// Stateless apart from its configuration; one instance serves every request.
#[derive(Debug, Clone, Default)]
pub struct Service {
    config: ServiceConfig,
}

impl Service {
    pub fn new(config: ServiceConfig) -> Self {
        Service { config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Route a request. Any query string is ignored.
    pub fn handle(&self, method: &str, path: &str, body: &str) -> Response {
        let path = path.split('?').next().unwrap_or(path);
        match (method, path) {
            ("GET", "/health") => self.health(),
            ("POST", "/decode") => self.decode(body),
            ("POST", "/encode") => self.encode(body),
            _ => Response::not_found(),
        }
    }

    pub fn health(&self) -> Response {
        Response::json(
            200,
            &Health {
                status: "ok",
                library: LIBRARY_NAME,
                version: LIBRARY_VERSION,
                language: LANGUAGE,
            },
        )
    }

    /// Handle a `/decode` body of the form `{"hex": "<hex>"}`.
    pub fn decode(&self, body: &str) -> Response {
        let result = extract_hex(body).and_then(|hex| self.decode_hex(&hex));
        match result {
            Ok(decoded) => Response {
                status: 200,
                body: decoded.envelope(),
            },
            Err(err) => {
                log::debug!("decode failed: {err:?}");
                err.into()
            }
        }
    }

    pub fn decode_hex(&self, hex: &str) -> Result<Decoded, ServiceError> {
        let bytes = hex_codec::decode(hex)?;

        let start = Instant::now();
        let value = decode::from_slice(&bytes)?;
        let duration = start.elapsed();

        log::debug!(
            "decoded {} bytes into {} in {:?}",
            bytes.len(),
            value.type_name(),
            duration
        );

        let json = json::project_with(&value, &self.config.projection)?;
        Ok(Decoded { json, duration })
    }

    /// JSON -> CBOR encoding is not provided; the answer is always the same
    /// business failure, whatever the body.
    pub fn encode(&self, _body: &str) -> Response {
        ServiceError::NotImplemented.into()
    }
}

/// Pull the string field `hex` out of a JSON request body.
///
/// The body must parse as a whole: a truncated body such as `{"hex":"01"` is
/// refused even though the field is complete. Any body without a string
/// `hex` member counts as a missing field.
fn extract_hex(body: &str) -> Result<String, ServiceError> {
    let request: serde_json::Value =
        serde_json::from_str(body).map_err(|_| ServiceError::MissingHex)?;
    request
        .get("hex")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or(ServiceError::MissingHex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, DecodeErrorKind, HexError, ProjectError};

    #[test]
    fn test_extract_hex() {
        assert_eq!(extract_hex(r#"{"hex":"01"}"#).unwrap(), "01");
        assert_eq!(extract_hex(r#"{ "other": 1, "hex" : "" }"#).unwrap(), "");
        assert_eq!(extract_hex("{}"), Err(ServiceError::MissingHex));
        assert_eq!(extract_hex(r#"{"hex":1}"#), Err(ServiceError::MissingHex));
        assert_eq!(extract_hex(r#"["hex"]"#), Err(ServiceError::MissingHex));
        assert_eq!(extract_hex(""), Err(ServiceError::MissingHex));
        assert_eq!(extract_hex("hex=01"), Err(ServiceError::MissingHex));
        // The whole body must be JSON, even when the field itself is complete.
        assert_eq!(extract_hex(r#"{"hex":"01""#), Err(ServiceError::MissingHex));
    }

    #[test]
    fn test_decode_hex_errors() {
        let service = Service::default();
        assert_eq!(
            service.decode_hex("abc"),
            Err(ServiceError::InvalidHex(HexError::OddLength(3)))
        );
        assert_eq!(
            service.decode_hex("8301"),
            Err(ServiceError::Cbor(DecodeError::new(
                DecodeErrorKind::UnexpectedEof,
                2
            )))
        );
    }

    #[test]
    fn test_decode_hex_output_limit() {
        let service = Service::new(ServiceConfig {
            projection: ProjectOptions {
                max_output: 4,
                ..ProjectOptions::default()
            },
        });
        assert_eq!(service.config().projection.max_output, 4);
        assert_eq!(Service::default().config(), &ServiceConfig::default());
        assert_eq!(service.decode_hex("1903e8").unwrap().json, "1000");
        assert_eq!(
            service.decode_hex("1a000186a0"),
            Err(ServiceError::Project(ProjectError::OutputTooLarge { limit: 4 }))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ServiceError::MissingHex.to_string(), r#"Missing "hex" field"#);
        assert_eq!(
            ServiceError::Cbor(DecodeError::new(DecodeErrorKind::TrailingData, 7)).to_string(),
            "CBOR decode error at position 7"
        );
        assert_eq!(
            ServiceError::Project(ProjectError::OutputTooLarge { limit: 10 }).to_string(),
            "Output too large (limit 10 bytes)"
        );
    }

    #[test]
    fn test_envelope_shape() {
        let decoded = Decoded {
            json: "[1,2]".to_owned(),
            duration: Duration::from_micros(1500),
        };
        assert_eq!(
            decoded.envelope(),
            r#"{"success":true,"result":[1,2],"duration_ms":1.5}"#
        );
    }

    #[test]
    fn test_routing() {
        let service = Service::default();
        assert_eq!(service.handle("GET", "/health?verbose=1", "").status, 200);
        assert_eq!(service.handle("GET", "/decode", "").status, 404);
        assert_eq!(service.handle("POST", "/health", "").status, 404);
        assert_eq!(service.handle("DELETE", "/", "").body, r#"{"error":"Not found"}"#);
    }
}
