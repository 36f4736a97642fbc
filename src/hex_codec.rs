//! Strict hex text <-> bytes conversion.

use crate::error::HexError;

/// Decode hex text into bytes.
///
/// Accepts only an even number of `[0-9a-fA-F]` characters. No whitespace,
/// prefixes or separators are skipped.
pub fn decode(hex: &str) -> Result<Vec<u8>, HexError> {
    if hex.len() % 2 != 0 {
        return Err(HexError::OddLength(hex.len()));
    }
    hex::decode(hex).map_err(|err| match err {
        hex::FromHexError::InvalidHexCharacter { c, index } => {
            HexError::InvalidCharacter { character: c, index }
        }
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            HexError::OddLength(hex.len())
        }
    })
}

/// Encode bytes as lower-case hex, two digits per byte.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_mixed_case() {
        assert_eq!(decode("00ffAb").unwrap(), vec![0x00, 0xff, 0xab]);
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_odd_length() {
        assert_eq!(decode("abc"), Err(HexError::OddLength(3)));
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        assert_eq!(
            decode("0g"),
            Err(HexError::InvalidCharacter { character: 'g', index: 1 })
        );
        assert!(decode("0x01").is_err());
        assert!(decode("01 02").is_err());
        assert!(decode("+1").is_err());
    }

    #[test]
    fn test_encode_lower_case() {
        assert_eq!(encode([0xdeu8, 0xad, 0xBE, 0xef]), "deadbeef");
        assert_eq!(encode(b""), "");
    }

    #[test]
    fn test_round_trip_all_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
    }
}
