/// Dynamic CBOR value tree produced by the decoder
///
/// Every well-formed CBOR data item maps onto exactly one variant. Maps keep
/// their entries in decode order, duplicates included, and accept any value as
/// a key.
///
/// # Example
/// ```
/// use cbor_json_bridge::{CborValue, from_slice};
///
/// // {1: "a", h'ff': [true, undefined]}
/// let value = from_slice(&[0xa2, 0x01, 0x61, 0x61, 0x41, 0xff, 0x82, 0xf5, 0xf7]).unwrap();
/// let entries = value.as_map().unwrap();
/// assert_eq!(entries[0], (CborValue::Unsigned(1), CborValue::from("a")));
/// assert!(entries[1].0.is_bytes());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CborValue {
    /// Major type 0
    Unsigned(u64),
    /// Major type 1; the represented integer is `-1 - n`
    Negative(u64),
    /// Byte string
    Bytes(Vec<u8>),
    /// Text string
    Text(String),
    /// Array of values
    Array(Vec<CborValue>),
    /// Map entries in decode order
    Map(Vec<(CborValue, CborValue)>),
    /// Tagged value (tag number, boxed content)
    Tag(u64, Box<CborValue>),
    /// Floating point value of any width, widened to f64
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Null value
    Null,
    /// Undefined value
    Undefined,
    /// Simple value without a name of its own
    Simple(u8),
}

impl CborValue {
    /// Returns true if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CborValue::Null)
    }

    /// Returns true if the value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, CborValue::Undefined)
    }

    /// Returns true if the value is a boolean
    pub fn is_bool(&self) -> bool {
        matches!(self, CborValue::Bool(_))
    }

    /// Returns true if the value is an integer of either sign
    pub fn is_integer(&self) -> bool {
        matches!(self, CborValue::Unsigned(_) | CborValue::Negative(_))
    }

    /// Returns true if the value is a float
    pub fn is_float(&self) -> bool {
        matches!(self, CborValue::Float(_))
    }

    /// Returns true if the value is bytes
    pub fn is_bytes(&self) -> bool {
        matches!(self, CborValue::Bytes(_))
    }

    /// Returns true if the value is text
    pub fn is_text(&self) -> bool {
        matches!(self, CborValue::Text(_))
    }

    /// Returns true if the value is an array
    pub fn is_array(&self) -> bool {
        matches!(self, CborValue::Array(_))
    }

    /// Returns true if the value is a map
    pub fn is_map(&self) -> bool {
        matches!(self, CborValue::Map(_))
    }

    /// Returns true if the value is tagged
    pub fn is_tag(&self) -> bool {
        matches!(self, CborValue::Tag(_, _))
    }

    /// Returns the value as a boolean, if it is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CborValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an integer.
    ///
    /// `i128` holds the full CBOR range, `-2^64..2^64`.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            CborValue::Unsigned(n) => Some(i128::from(*n)),
            CborValue::Negative(n) => Some(-1 - i128::from(*n)),
            _ => None,
        }
    }

    /// Returns the value as a float, if it is one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CborValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as bytes, if it is a byte string
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            CborValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as text, if it is a text string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CborValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an array, if it is one
    pub fn as_array(&self) -> Option<&[CborValue]> {
        match self {
            CborValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the map entries, if this is a map
    pub fn as_map(&self) -> Option<&[(CborValue, CborValue)]> {
        match self {
            CborValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the tag number and inner value, if this is a tagged value
    pub fn as_tag(&self) -> Option<(u64, &CborValue)> {
        match self {
            CborValue::Tag(tag, value) => Some((*tag, value)),
            _ => None,
        }
    }

    /// Short name of the variant, for log lines.
    pub fn type_name(&self) -> &'static str {
        match self {
            CborValue::Unsigned(_) => "unsigned",
            CborValue::Negative(_) => "negative",
            CborValue::Bytes(_) => "bytes",
            CborValue::Text(_) => "text",
            CborValue::Array(_) => "array",
            CborValue::Map(_) => "map",
            CborValue::Tag(_, _) => "tag",
            CborValue::Float(_) => "float",
            CborValue::Bool(_) => "bool",
            CborValue::Null => "null",
            CborValue::Undefined => "undefined",
            CborValue::Simple(_) => "simple",
        }
    }
}

impl From<u64> for CborValue {
    fn from(n: u64) -> Self {
        CborValue::Unsigned(n)
    }
}

impl From<i64> for CborValue {
    fn from(n: i64) -> Self {
        if n >= 0 {
            CborValue::Unsigned(n as u64)
        } else {
            // -1 - m == n  =>  m == !n for two's complement
            CborValue::Negative(!n as u64)
        }
    }
}

impl From<f64> for CborValue {
    fn from(f: f64) -> Self {
        CborValue::Float(f)
    }
}

impl From<bool> for CborValue {
    fn from(b: bool) -> Self {
        CborValue::Bool(b)
    }
}

impl From<&str> for CborValue {
    fn from(s: &str) -> Self {
        CborValue::Text(s.to_owned())
    }
}

impl From<String> for CborValue {
    fn from(s: String) -> Self {
        CborValue::Text(s)
    }
}
