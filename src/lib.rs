//! # CBOR JSON Bridge
//!
//! Decodes hex-encoded CBOR and projects the decoded value into JSON without
//! losing information JSON cannot express natively.
//!
//! ## Features
//! - Full support for CBOR major types 0-7, definite and indefinite lengths
//! - Half, single and double precision floats, including NaN and infinities
//! - Maps with arbitrary keys, duplicates kept in decode order
//! - Sentinel objects for byte strings, tags, `undefined` and non-finite floats:
//!   - `{"__cbor_bytes__": "<hex>"}`
//!   - `{"__cbor_tag__": <n>, "__cbor_value__": <value>}`
//!   - `{"__cbor_undefined__": true}`
//!   - `{"__cbor_float__": "NaN" | "Infinity" | "-Infinity"}`
//! - Decode errors report the byte offset where the input went wrong
//! - Output size cap with an explicit `OutputTooLarge` error instead of truncated JSON
//! - A small HTTP service (`GET /health`, `POST /decode`, `POST /encode`) in
//!   [`service`] and [`http`]
//!
//! ## Example
//! ```rust
//! use cbor_json_bridge::{from_slice, hex_codec, project};
//!
//! // [1, h'ff', 1(-1)]
//! let bytes = hex_codec::decode("8201").unwrap();
//! assert!(from_slice(&bytes).is_err());
//!
//! let bytes = hex_codec::decode("830141ffc120").unwrap();
//! let value = from_slice(&bytes).unwrap();
//! assert_eq!(
//!     project(&value),
//!     r#"[1,{"__cbor_bytes__":"ff"},{"__cbor_tag__":1,"__cbor_value__":-1}]"#
//! );
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod hex_codec;
pub mod http;
pub mod json;
pub mod service;
pub mod value;

pub use decode::{Decoder, MAX_DEPTH, from_slice};
pub use error::{DecodeError, DecodeErrorKind, HexError, ProjectError, ServiceError};
pub use json::{MapKeyMode, ProjectOptions, project, project_with};
pub use service::{Response, Service, ServiceConfig};
pub use value::CborValue;
