//! Error types for every stage of the hex -> CBOR -> JSON pipeline.

use std::fmt;

/// The hex text was not an even-length run of `[0-9a-fA-F]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    #[error("odd number of hex digits ({0})")]
    OddLength(usize),

    #[error("invalid hex character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },
}

/// What went wrong while reading a CBOR data item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    UnexpectedEof,
    /// Additional information 28, 29 or 30.
    ReservedInfo(u8),
    /// Indefinite length on a major type that has none.
    UnexpectedIndefinite(u8),
    UnexpectedBreak,
    /// A chunk of an indefinite string had the wrong major type or was itself indefinite.
    InvalidChunk,
    InvalidUtf8,
    /// Two-byte simple value below 32.
    InvalidSimple(u8),
    DepthLimitExceeded,
    TrailingData,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::UnexpectedEof => write!(f, "unexpected end of input"),
            DecodeErrorKind::ReservedInfo(info) => {
                write!(f, "reserved additional information {info}")
            }
            DecodeErrorKind::UnexpectedIndefinite(major) => {
                write!(f, "indefinite length not allowed for major type {major}")
            }
            DecodeErrorKind::UnexpectedBreak => write!(f, "unexpected break"),
            DecodeErrorKind::InvalidChunk => write!(f, "invalid indefinite-length string chunk"),
            DecodeErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8 in text string"),
            DecodeErrorKind::InvalidSimple(value) => write!(f, "invalid simple value {value}"),
            DecodeErrorKind::DepthLimitExceeded => write!(f, "nesting depth limit exceeded"),
            DecodeErrorKind::TrailingData => write!(f, "trailing data after top-level item"),
        }
    }
}

/// A CBOR syntax error and the byte offset where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset}")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub offset: usize,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, offset: usize) -> Self {
        DecodeError { kind, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProjectError {
    #[error("Output too large (limit {limit} bytes)")]
    OutputTooLarge { limit: usize },
}

/// Failure classes of the decode service.
///
/// Display strings are the `error` values clients see in the response body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("Missing \"hex\" field")]
    MissingHex,

    #[error("Invalid hex string")]
    InvalidHex(#[from] HexError),

    #[error("CBOR decode error at position {}", .0.offset)]
    Cbor(#[from] DecodeError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error("Encoding not implemented in C container")]
    NotImplemented,
}

impl ServiceError {
    /// Only a structurally missing request field is an HTTP-level error.
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::MissingHex => 400,
            _ => 200,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
