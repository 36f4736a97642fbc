//! Lossless projection of a [`CborValue`] tree into JSON text.
//!
//! Values JSON cannot express natively are wrapped in single-purpose sentinel
//! objects:
//!
//! | CBOR                 | JSON                                                  |
//! |----------------------|-------------------------------------------------------|
//! | byte string          | `{"__cbor_bytes__": "<lower-case hex>"}`               |
//! | tag `t` over `v`     | `{"__cbor_tag__": t, "__cbor_value__": <v>}`           |
//! | undefined            | `{"__cbor_undefined__": true}`                        |
//! | NaN, ±Infinity       | `{"__cbor_float__": "NaN"}`, `"Infinity"`, `"-Infinity"` |
//!
//! The sentinel key names are reserved: a CBOR map whose only key is literally
//! one of them projects to the same JSON as the sentinel.
//!
//! Map keys that are not text strings are projected themselves and the
//! resulting JSON text becomes the object key, e.g. `{1: "a"}` projects to
//! `{"1":"a"}`. This loses the key's type; [`MapKeyMode::Pairs`] keeps it.

use std::fmt::{self, Write};
use std::str::FromStr;

use crate::error::ProjectError;
use crate::hex_codec;
use crate::value::CborValue;

pub const BYTES_KEY: &str = "__cbor_bytes__";
pub const TAG_KEY: &str = "__cbor_tag__";
pub const TAG_VALUE_KEY: &str = "__cbor_value__";
pub const FLOAT_KEY: &str = "__cbor_float__";
pub const UNDEFINED_KEY: &str = "__cbor_undefined__";
/// Only emitted in [`MapKeyMode::Pairs`].
pub const MAP_KEY: &str = "__cbor_map__";

pub const DEFAULT_MAX_OUTPUT: usize = 1024 * 1024;

/// How maps with non-text keys are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapKeyMode {
    /// Project the key and use its JSON text as the object key.
    #[default]
    Stringify,
    /// Emit `{"__cbor_map__": [[key, value], ...]}` when any key is not text.
    Pairs,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown map key mode `{0}` (expected `stringify` or `pairs`)")]
pub struct ParseMapKeyModeError(String);

impl FromStr for MapKeyMode {
    type Err = ParseMapKeyModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stringify" => Ok(MapKeyMode::Stringify),
            "pairs" => Ok(MapKeyMode::Pairs),
            _ => Err(ParseMapKeyModeError(s.to_owned())),
        }
    }
}

impl fmt::Display for MapKeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MapKeyMode::Stringify => "stringify",
            MapKeyMode::Pairs => "pairs",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectOptions {
    pub map_keys: MapKeyMode,
    /// Upper bound on the projected text, in bytes.
    pub max_output: usize,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        ProjectOptions {
            map_keys: MapKeyMode::default(),
            max_output: DEFAULT_MAX_OUTPUT,
        }
    }
}

/// Project a value with the default key mode and no size limit.
///
/// Total over every [`CborValue`]; the output is always valid JSON.
pub fn project(value: &CborValue) -> String {
    let mut projector = Projector::new(MapKeyMode::Stringify, usize::MAX);
    projector.value(value);
    projector.out.buf
}

/// Project a value, failing with [`ProjectError::OutputTooLarge`] instead of
/// producing text longer than `options.max_output`.
pub fn project_with(value: &CborValue, options: &ProjectOptions) -> Result<String, ProjectError> {
    let mut projector = Projector::new(options.map_keys, options.max_output);
    projector.value(value);
    projector.out.finish()
}

/// Growable output buffer that refuses to grow past `limit`.
///
/// Once a write would cross the limit nothing more is appended, so callers
/// only ever see complete JSON or an error.
struct CappedBuffer {
    buf: String,
    limit: usize,
    overflowed: bool,
}

impl CappedBuffer {
    fn new(limit: usize) -> Self {
        CappedBuffer {
            buf: String::new(),
            limit,
            overflowed: false,
        }
    }

    fn remaining(&self) -> usize {
        self.limit - self.buf.len()
    }

    fn finish(self) -> Result<String, ProjectError> {
        if self.overflowed {
            return Err(ProjectError::OutputTooLarge { limit: self.limit });
        }
        Ok(self.buf)
    }
}

impl Write for CappedBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.overflowed || s.len() > self.remaining() {
            self.overflowed = true;
            return Err(fmt::Error);
        }
        self.buf.push_str(s);
        Ok(())
    }
}

struct Projector {
    out: CappedBuffer,
    map_keys: MapKeyMode,
}

impl Projector {
    fn new(map_keys: MapKeyMode, limit: usize) -> Self {
        Projector {
            out: CappedBuffer::new(limit),
            map_keys,
        }
    }

    // Write errors only signal overflow, which `CappedBuffer` records itself.
    fn raw(&mut self, s: &str) {
        let _ = self.out.write_str(s);
    }

    fn value(&mut self, value: &CborValue) {
        if self.out.overflowed {
            return;
        }
        match value {
            CborValue::Unsigned(n) => {
                let _ = write!(self.out, "{n}");
            }
            CborValue::Negative(n) => {
                let _ = write!(self.out, "{}", -1 - i128::from(*n));
            }
            CborValue::Bytes(bytes) => {
                self.sentinel_open(BYTES_KEY);
                self.string(&hex_codec::encode(bytes));
                self.raw("}");
            }
            CborValue::Text(text) => self.string(text),
            CborValue::Array(items) => {
                self.raw("[");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.raw(",");
                    }
                    self.value(item);
                }
                self.raw("]");
            }
            CborValue::Map(entries) => self.map(entries),
            CborValue::Tag(tag, inner) => {
                self.sentinel_open(TAG_KEY);
                let _ = write!(self.out, "{tag}");
                self.raw(",");
                self.string(TAG_VALUE_KEY);
                self.raw(":");
                self.value(inner);
                self.raw("}");
            }
            CborValue::Float(f) => self.float(*f),
            CborValue::Bool(true) => self.raw("true"),
            CborValue::Bool(false) => self.raw("false"),
            CborValue::Null | CborValue::Simple(_) => self.raw("null"),
            CborValue::Undefined => {
                self.sentinel_open(UNDEFINED_KEY);
                self.raw("true}");
            }
        }
    }

    /// Writes `{"<key>":`
    fn sentinel_open(&mut self, key: &str) {
        self.raw("{");
        self.string(key);
        self.raw(":");
    }

    fn float(&mut self, f: f64) {
        match serde_json::Number::from_f64(f) {
            Some(number) => {
                let _ = write!(self.out, "{number}");
            }
            None => {
                let name = if f.is_nan() {
                    "NaN"
                } else if f > 0.0 {
                    "Infinity"
                } else {
                    "-Infinity"
                };
                self.sentinel_open(FLOAT_KEY);
                self.string(name);
                self.raw("}");
            }
        }
    }

    fn map(&mut self, entries: &[(CborValue, CborValue)]) {
        let all_text = entries.iter().all(|(key, _)| key.is_text());
        if self.map_keys == MapKeyMode::Pairs && !all_text {
            self.sentinel_open(MAP_KEY);
            self.raw("[");
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    self.raw(",");
                }
                self.raw("[");
                self.value(key);
                self.raw(",");
                self.value(value);
                self.raw("]");
            }
            self.raw("]}");
            return;
        }

        self.raw("{");
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                self.raw(",");
            }
            match key {
                CborValue::Text(text) => self.string(text),
                other => {
                    // The key text can never be longer than what is left of the
                    // budget, so project it against that.
                    let mut nested = Projector::new(self.map_keys, self.out.remaining());
                    nested.value(other);
                    match nested.out.finish() {
                        Ok(key_text) => self.string(&key_text),
                        Err(_) => {
                            self.out.overflowed = true;
                            return;
                        }
                    }
                }
            }
            self.raw(":");
            self.value(value);
        }
        self.raw("}");
    }

    /// Writes a JSON string literal.
    fn string(&mut self, text: &str) {
        self.raw("\"");
        let bytes = text.as_bytes();
        let mut start = 0;
        for (i, &byte) in bytes.iter().enumerate() {
            let escape = match byte {
                b'"' => "\\\"",
                b'\\' => "\\\\",
                b'\n' => "\\n",
                b'\r' => "\\r",
                b'\t' => "\\t",
                0x00..=0x1f => "",
                _ => continue,
            };
            // Escapes only ever replace ASCII bytes, so `i` is a char boundary.
            if start < i {
                self.raw(&text[start..i]);
            }
            if escape.is_empty() {
                let _ = write!(self.out, "\\u{byte:04x}");
            } else {
                self.raw(escape);
            }
            start = i + 1;
        }
        if start < bytes.len() {
            self.raw(&text[start..]);
        }
        self.raw("\"");
    }
}
