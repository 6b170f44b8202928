//! Message structure and packing/unpacking.

use crate::bitmap::Bitmap;
use crate::error::{Iso8583Error, Result};
use crate::field::{Field, FieldValue};
use crate::mti::Mti;
use crate::spec::{DataType, LengthType};
use std::collections::HashMap;

/// A single ISO 8583-style authorization message: an MTI, a bitmap, and
/// the data fields the bitmap names.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Message Type Indicator.
    pub mti: Mti,
    fields: HashMap<u8, FieldValue>,
    bitmap: Bitmap,
}

impl Message {
    /// An empty message with the given MTI.
    pub fn new(mti: Mti) -> Self {
        Self {
            mti,
            fields: HashMap::new(),
            bitmap: Bitmap::new(),
        }
    }

    /// Parse a message from its wire bytes: 4-byte MTI, 8-byte bitmap,
    /// then the fields the bitmap names, in ascending field order.
    pub fn unpack(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 12 {
            return Err(Iso8583Error::malformed(format!(
                "message too short: need at least 12 bytes, got {}",
                bytes.len()
            )));
        }

        let mti_str = std::str::from_utf8(&bytes[0..4])
            .map_err(|e| Iso8583Error::malformed(format!("invalid MTI bytes: {e}")))?;
        let mti = Mti::parse(mti_str)?;

        let bitmap_bytes: [u8; 8] = bytes[4..12]
            .try_into()
            .expect("slice of length 8 converts to [u8; 8]");
        let bitmap = Bitmap::from_bytes(bitmap_bytes);

        let mut offset = 12;
        let mut fields = HashMap::new();

        for field_num in bitmap.set_fields() {
            let field = Field::from_number(field_num)?;
            let def = field.definition();
            let (value, consumed) = parse_field(&bytes[offset..], field_num, def)?;
            fields.insert(field_num, value);
            offset += consumed;
        }

        if offset != bytes.len() {
            return Err(Iso8583Error::malformed(format!(
                "{} trailing bytes after last field",
                bytes.len() - offset
            )));
        }

        Ok(Self {
            mti,
            fields,
            bitmap,
        })
    }

    /// Serialize this message to its wire bytes.
    pub fn pack(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(self.mti.as_str().as_bytes());
        bytes.extend_from_slice(&self.bitmap.to_bytes());

        let mut numbers: Vec<u8> = self.fields.keys().copied().collect();
        numbers.sort_unstable();

        for number in numbers {
            let value = &self.fields[&number];
            let def = crate::spec::field_definition(number)
                .expect("bitmap only names fields with a table entry");
            bytes.extend_from_slice(&generate_field(value, def));
        }

        bytes
    }

    /// Borrow a field's value.
    pub fn field(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(&field.number())
    }

    /// Set a field's value, marking it present in the bitmap.
    pub fn set_field(&mut self, field: Field, value: FieldValue) -> Result<()> {
        self.bitmap.set(field.number())?;
        self.fields.insert(field.number(), value);
        Ok(())
    }

    /// Remove a field, clearing it from the bitmap.
    pub fn remove_field(&mut self, field: Field) -> Result<()> {
        self.bitmap.clear(field.number())?;
        self.fields.remove(&field.number());
        Ok(())
    }

    /// Whether a field is present.
    pub fn has_field(&self, field: Field) -> bool {
        self.fields.contains_key(&field.number())
    }

    /// Present field numbers, ascending.
    pub fn field_numbers(&self) -> Vec<u8> {
        let mut numbers: Vec<u8> = self.fields.keys().copied().collect();
        numbers.sort_unstable();
        numbers
    }

    /// This message's bitmap.
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Start building a message with [`MessageBuilder`].
    pub fn builder(mti: Mti) -> MessageBuilder {
        MessageBuilder::new(mti)
    }
}

fn parse_field(bytes: &[u8], number: u8, def: &crate::spec::FieldDefinition) -> Result<(FieldValue, usize)> {
    match def.length {
        LengthType::Fixed(len) => {
            if bytes.len() < len {
                return Err(Iso8583Error::malformed(format!(
                    "field {number}: need {len} bytes, have {}",
                    bytes.len()
                )));
            }
            let raw = &bytes[..len];
            let value = match def.data_type {
                DataType::Binary => FieldValue::binary(raw.to_vec()),
                DataType::Ascii => FieldValue::ascii(decode_ascii(raw, number)?),
            };
            Ok((value, len))
        }
        LengthType::Llvar(max_len) => {
            let (len, prefix_len) = read_length(bytes, 2, max_len, number)?;
            let start = prefix_len;
            let end = start + len;
            if bytes.len() < end {
                return Err(Iso8583Error::malformed(format!(
                    "field {number}: length prefix names {len} bytes, only {} available",
                    bytes.len() - start
                )));
            }
            let value = FieldValue::ascii(decode_ascii(&bytes[start..end], number)?);
            Ok((value, end))
        }
        LengthType::Lllvar(max_len) => {
            let (len, prefix_len) = read_length(bytes, 3, max_len, number)?;
            let start = prefix_len;
            let end = start + len;
            if bytes.len() < end {
                return Err(Iso8583Error::malformed(format!(
                    "field {number}: length prefix names {len} bytes, only {} available",
                    bytes.len() - start
                )));
            }
            let value = FieldValue::ascii(decode_ascii(&bytes[start..end], number)?);
            Ok((value, end))
        }
    }
}

fn read_length(bytes: &[u8], digits: usize, max_len: usize, number: u8) -> Result<(usize, usize)> {
    if bytes.len() < digits {
        return Err(Iso8583Error::malformed(format!(
            "field {number}: missing {digits}-digit length prefix"
        )));
    }
    let len = crate::encoding::decode_length(&bytes[..digits])
        .map_err(|_| Iso8583Error::malformed(format!("field {number}: non-numeric length prefix")))?;
    if len > max_len {
        return Err(Iso8583Error::malformed(format!(
            "field {number}: length {len} exceeds maximum {max_len}"
        )));
    }
    Ok((len, digits))
}

fn decode_ascii(bytes: &[u8], number: u8) -> Result<String> {
    crate::encoding::decode_ascii(bytes)
        .map_err(|_| Iso8583Error::malformed(format!("field {number}: invalid ASCII")))
}

fn generate_field(value: &FieldValue, def: &crate::spec::FieldDefinition) -> Vec<u8> {
    match def.length {
        LengthType::Fixed(len) => match value {
            FieldValue::Ascii(s) => {
                let mut s = s.clone();
                if s.len() < len {
                    s = format!("{s:0>len$}", len = len);
                } else {
                    s.truncate(len);
                }
                s.into_bytes()
            }
            FieldValue::Binary(b) => {
                let mut b = b.clone();
                b.resize(len, 0);
                b
            }
        },
        LengthType::Llvar(_) => {
            let s = value.as_str().unwrap_or_default();
            let mut out = crate::encoding::encode_length(s.len(), 2);
            out.extend_from_slice(s.as_bytes());
            out
        }
        LengthType::Lllvar(_) => {
            let s = value.as_str().unwrap_or_default();
            let mut out = crate::encoding::encode_length(s.len(), 3);
            out.extend_from_slice(s.as_bytes());
            out
        }
    }
}

/// Builder for constructing a [`Message`] with required-field validation.
#[derive(Debug)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    /// Start a builder for the given MTI.
    pub fn new(mti: Mti) -> Self {
        Self {
            message: Message::new(mti),
        }
    }

    /// Set an ASCII field.
    pub fn field<S: Into<String>>(mut self, field: Field, value: S) -> Self {
        let _ = self.message.set_field(field, FieldValue::ascii(value));
        self
    }

    /// Validate required fields for the message's MTI and return it.
    pub fn build(self) -> Result<Message> {
        crate::validation::validate_required_fields(&self.message)?;
        Ok(self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> Message {
        Message::builder(Mti::AUTHORIZATION_REQUEST)
            .field(Field::Pan, "4242424242424242")
            .field(Field::Amount, "001000")
            .field(Field::TransmissionDateTime, "2024-01-15T10:30:00Z")
            .field(Field::Currency, "840")
            .field(Field::Cvv, "123")
            .field(Field::Expiration, "2801")
            .field(Field::AcceptorInformation, "")
            .field(Field::Stan, "000001")
            .build()
            .unwrap()
    }

    #[test]
    fn test_set_and_get_field() {
        let mut msg = Message::new(Mti::AUTHORIZATION_REQUEST);
        msg.set_field(Field::Pan, FieldValue::ascii("4242424242424242"))
            .unwrap();

        assert!(msg.has_field(Field::Pan));
        assert_eq!(
            msg.field(Field::Pan).unwrap().as_str(),
            Some("4242424242424242")
        );
    }

    #[test]
    fn test_remove_field() {
        let mut msg = Message::new(Mti::AUTHORIZATION_REQUEST);
        msg.set_field(Field::Pan, FieldValue::ascii("4242424242424242"))
            .unwrap();
        msg.remove_field(Field::Pan).unwrap();
        assert!(!msg.has_field(Field::Pan));
    }

    #[test]
    fn test_roundtrip() {
        let msg = sample_request();
        let bytes = msg.pack();
        let parsed = Message::unpack(&bytes).unwrap();

        assert_eq!(parsed.mti, Mti::AUTHORIZATION_REQUEST);
        assert_eq!(parsed.field(Field::Pan), msg.field(Field::Pan));
        assert_eq!(parsed.field(Field::Stan), msg.field(Field::Stan));
        assert_eq!(parsed.field_numbers(), msg.field_numbers());
    }

    #[test]
    fn test_builder_rejects_missing_required_field() {
        let result = Message::builder(Mti::AUTHORIZATION_REQUEST)
            .field(Field::Pan, "4242424242424242")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_unpack_rejects_trailing_bytes() {
        let msg = sample_request();
        let mut bytes = msg.pack();
        bytes.push(0xFF);
        assert!(Message::unpack(&bytes).is_err());
    }

    #[test]
    fn test_unpack_rejects_short_buffer() {
        assert!(Message::unpack(b"0100").is_err());
    }
}
