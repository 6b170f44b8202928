//! Bitmap handling for the fixed 12-field message set.
//!
//! This system only ever speaks a primary bitmap (fields 1-64) and never
//! sets a secondary or tertiary one, so the bitmap is a plain 8-byte array
//! rather than a growable bit vector.

use crate::error::{Iso8583Error, Result};

/// Primary bitmap: one bit per field 1 through 64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bitmap {
    bytes: [u8; 8],
}

fn byte_and_bit(field: u8) -> (usize, u8) {
    let idx = (field - 1) as usize;
    (idx / 8, 7 - (idx % 8) as u8)
}

impl Bitmap {
    /// An empty bitmap with no field bits set.
    pub fn new() -> Self {
        Self { bytes: [0u8; 8] }
    }

    /// Build a bitmap from its 8-byte wire representation.
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self { bytes }
    }

    /// Build a bitmap from a hex-encoded 8-byte buffer (16 hex characters).
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let decoded = hex::decode(hex_str)
            .map_err(|e| Iso8583Error::malformed(format!("invalid bitmap hex: {e}")))?;
        let bytes: [u8; 8] = decoded
            .try_into()
            .map_err(|_| Iso8583Error::malformed("bitmap must be exactly 8 bytes"))?;
        Ok(Self { bytes })
    }

    /// Mark `field` (1-64) as present.
    pub fn set(&mut self, field: u8) -> Result<()> {
        if field == 0 || field > 64 {
            return Err(Iso8583Error::InvalidFieldNumber(field));
        }
        let (byte_idx, bit_idx) = byte_and_bit(field);
        self.bytes[byte_idx] |= 1 << bit_idx;
        Ok(())
    }

    /// Mark `field` (1-64) as absent.
    pub fn clear(&mut self, field: u8) -> Result<()> {
        if field == 0 || field > 64 {
            return Err(Iso8583Error::InvalidFieldNumber(field));
        }
        let (byte_idx, bit_idx) = byte_and_bit(field);
        self.bytes[byte_idx] &= !(1 << bit_idx);
        Ok(())
    }

    /// Whether `field` (1-64) is present.
    pub fn is_set(&self, field: u8) -> bool {
        if field == 0 || field > 64 {
            return false;
        }
        let (byte_idx, bit_idx) = byte_and_bit(field);
        self.bytes[byte_idx] & (1 << bit_idx) != 0
    }

    /// All set field numbers, in ascending order. Excludes field 1, which
    /// in a single-bitmap message never indicates data (it would mean "a
    /// secondary bitmap follows", which this system never sends).
    pub fn set_fields(&self) -> Vec<u8> {
        (2..=64).filter(|&f| self.is_set(f)).collect()
    }

    /// The raw 8-byte wire representation.
    pub fn to_bytes(&self) -> [u8; 8] {
        self.bytes
    }

    /// Hex-encoded wire representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl std::fmt::Display for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_is_set() {
        let mut bitmap = Bitmap::new();
        bitmap.set(2).unwrap();
        bitmap.set(11).unwrap();

        assert!(bitmap.is_set(2));
        assert!(bitmap.is_set(11));
        assert!(!bitmap.is_set(3));
    }

    #[test]
    fn test_bit_zero_never_set_by_data_fields() {
        let mut bitmap = Bitmap::new();
        bitmap.set(64).unwrap();
        assert!(!bitmap.is_set(1));
    }

    #[test]
    fn test_clear() {
        let mut bitmap = Bitmap::new();
        bitmap.set(5).unwrap();
        bitmap.clear(5).unwrap();
        assert!(!bitmap.is_set(5));
    }

    #[test]
    fn test_set_fields_ordering() {
        let mut bitmap = Bitmap::new();
        for f in [11, 2, 9, 3, 4, 7, 8, 10] {
            bitmap.set(f).unwrap();
        }
        assert_eq!(bitmap.set_fields(), vec![2, 3, 4, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_roundtrip_bytes_and_hex() {
        let mut bitmap = Bitmap::new();
        bitmap.set(2).unwrap();
        bitmap.set(11).unwrap();

        let bytes = bitmap.to_bytes();
        assert_eq!(Bitmap::from_bytes(bytes), bitmap);

        let hex_str = bitmap.to_hex();
        assert_eq!(Bitmap::from_hex(&hex_str).unwrap(), bitmap);
    }

    #[test]
    fn test_invalid_field_number() {
        let mut bitmap = Bitmap::new();
        assert!(bitmap.set(0).is_err());
        assert!(bitmap.set(65).is_err());
        assert!(!bitmap.is_set(0));
        assert!(!bitmap.is_set(65));
    }

    #[test]
    fn test_from_hex_wrong_length() {
        assert!(Bitmap::from_hex("00").is_err());
    }
}
