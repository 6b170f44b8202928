//! Field value representation for the twelve fields this crate speaks.

use crate::error::{Iso8583Error, Result};
use std::fmt;

/// A data field in the message (fields 2 through 11; field 0 is the MTI
/// and field 1 the bitmap, both handled specially by [`crate::message::Message`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Field {
    /// Primary Account Number.
    Pan = 2,
    /// Amount, in minor currency units.
    Amount = 3,
    /// Transmission date and time, RFC 3339.
    TransmissionDateTime = 4,
    /// Approval code on a response.
    ApprovalCode = 5,
    /// Authorization code on a response.
    AuthorizationCode = 6,
    /// ISO 4217 currency code.
    Currency = 7,
    /// Card verification value.
    Cvv = 8,
    /// Card expiration date.
    Expiration = 9,
    /// Acceptor (merchant) information composite.
    AcceptorInformation = 10,
    /// System Trace Audit Number.
    Stan = 11,
}

impl Field {
    /// This field's wire number.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Build a field from its wire number.
    pub fn from_number(num: u8) -> Result<Self> {
        match num {
            2 => Ok(Field::Pan),
            3 => Ok(Field::Amount),
            4 => Ok(Field::TransmissionDateTime),
            5 => Ok(Field::ApprovalCode),
            6 => Ok(Field::AuthorizationCode),
            7 => Ok(Field::Currency),
            8 => Ok(Field::Cvv),
            9 => Ok(Field::Expiration),
            10 => Ok(Field::AcceptorInformation),
            11 => Ok(Field::Stan),
            _ => Err(Iso8583Error::InvalidFieldNumber(num)),
        }
    }

    /// This field's definition, per the field table.
    pub fn definition(self) -> &'static crate::spec::FieldDefinition {
        crate::spec::field_definition(self.number())
            .expect("every Field variant has a table entry")
    }

    /// All data fields, in ascending order.
    pub fn all() -> [Field; 10] {
        [
            Field::Pan,
            Field::Amount,
            Field::TransmissionDateTime,
            Field::ApprovalCode,
            Field::AuthorizationCode,
            Field::Currency,
            Field::Cvv,
            Field::Expiration,
            Field::AcceptorInformation,
            Field::Stan,
        ]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field {} ({})", self.number(), self.definition().name)
    }
}

/// A parsed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// ASCII text value, stored decoded (length prefix/padding stripped).
    Ascii(String),
    /// Raw binary value (only used for the bitmap itself).
    Binary(Vec<u8>),
}

impl FieldValue {
    /// Build an ASCII value from anything stringlike.
    pub fn ascii<S: Into<String>>(s: S) -> Self {
        Self::Ascii(s.into())
    }

    /// Build a binary value.
    pub fn binary(bytes: Vec<u8>) -> Self {
        Self::Binary(bytes)
    }

    /// Borrow as a string, if this is an ASCII value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Ascii(s) => Some(s),
            Self::Binary(_) => None,
        }
    }

    /// Borrow as bytes, if this is a binary value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Ascii(_) => None,
            Self::Binary(b) => Some(b),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascii(s) => write!(f, "{s}"),
            Self::Binary(b) => write!(f, "{}", hex::encode(b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_number() {
        let field = Field::from_number(2).unwrap();
        assert_eq!(field, Field::Pan);
        assert_eq!(field.number(), 2);
    }

    #[test]
    fn test_field_definition() {
        let def = Field::Pan.definition();
        assert_eq!(def.number, 2);
        assert_eq!(def.name, "Primary Account Number");
    }

    #[test]
    fn test_invalid_field_number() {
        assert!(Field::from_number(0).is_err());
        assert!(Field::from_number(1).is_err());
        assert!(Field::from_number(12).is_err());
    }

    #[test]
    fn test_field_value_ascii() {
        let value = FieldValue::ascii("4242424242424242");
        assert_eq!(value.as_str(), Some("4242424242424242"));
        assert_eq!(value.as_bytes(), None);
    }

    #[test]
    fn test_field_value_binary_display() {
        let value = FieldValue::binary(vec![0xDE, 0xAD]);
        assert_eq!(value.to_string(), "dead");
    }

    #[test]
    fn test_all_fields_have_definitions() {
        for field in Field::all() {
            let _ = field.definition();
        }
    }
}
