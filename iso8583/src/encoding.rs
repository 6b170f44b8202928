//! ASCII encode/decode helpers for field and length-prefix data.
//!
//! Every field this system carries is ASCII (the bitmap is the one
//! binary exception, handled directly by [`crate::bitmap::Bitmap`]), so
//! unlike a general ISO 8583 implementation this module has no BCD or
//! EBCDIC path.

use crate::error::{Iso8583Error, Result};

/// Encode a string to ASCII bytes.
pub fn encode_ascii(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

/// Decode ASCII bytes to a string.
pub fn decode_ascii(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(|s| s.to_string())
        .map_err(|e| Iso8583Error::malformed(format!("invalid ASCII: {e}")))
}

/// Encode a length value as a zero-padded ASCII decimal prefix
/// (`digits` wide: 2 for LLVAR, 3 for LLLVAR).
pub fn encode_length(length: usize, digits: usize) -> Vec<u8> {
    format!("{length:0digits$}", digits = digits).into_bytes()
}

/// Decode a zero-padded ASCII decimal length prefix.
pub fn decode_length(bytes: &[u8]) -> Result<usize> {
    let s = decode_ascii(bytes)?;
    s.parse()
        .map_err(|_| Iso8583Error::malformed(format!("invalid length prefix {s:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_roundtrip() {
        let encoded = encode_ascii("Acme Widgets");
        assert_eq!(decode_ascii(&encoded).unwrap(), "Acme Widgets");
    }

    #[test]
    fn test_length_roundtrip_llvar() {
        let encoded = encode_length(12, 2);
        assert_eq!(encoded, b"12");
        assert_eq!(decode_length(&encoded).unwrap(), 12);
    }

    #[test]
    fn test_length_roundtrip_lllvar() {
        let encoded = encode_length(7, 3);
        assert_eq!(encoded, b"007");
        assert_eq!(decode_length(&encoded).unwrap(), 7);
    }

    #[test]
    fn test_invalid_length_prefix() {
        assert!(decode_length(b"xx").is_err());
    }
}
