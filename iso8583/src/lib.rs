//! # iso8583
//!
//! ISO 8583-style message codec and framed TCP transport for a small
//! card-payment sandbox. Unlike a general ISO 8583:1987 implementation,
//! this crate speaks exactly two message types (`0100`/`0110`) built from
//! twelve fields, plus the async transport the acquirer and issuer use to
//! exchange them.
//!
//! ## Quick start
//!
//! ```no_run
//! use iso8583::field::Field;
//! use iso8583::message::Message;
//! use iso8583::mti::Mti;
//!
//! # fn main() -> iso8583::error::Result<()> {
//! let message = Message::builder(Mti::AUTHORIZATION_REQUEST)
//!     .field(Field::Pan, "4242424242424242")
//!     .field(Field::Amount, "001000")
//!     .field(Field::TransmissionDateTime, "2024-08-12T16:01:40Z")
//!     .field(Field::Currency, "840")
//!     .field(Field::Cvv, "7890")
//!     .field(Field::Expiration, "2512")
//!     .field(Field::AcceptorInformation, "")
//!     .field(Field::Stan, "000001")
//!     .build()?;
//!
//! let bytes = message.pack();
//! let parsed = Message::unpack(&bytes)?;
//! assert_eq!(parsed.mti, Mti::AUTHORIZATION_REQUEST);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod bitmap;
pub mod composite;
pub mod encoding;
pub mod error;
pub mod field;
pub mod message;
pub mod mti;
pub mod net;
pub mod spec;
pub mod validation;
pub mod wire;

pub use bitmap::Bitmap;
pub use error::{Iso8583Error, Result};
pub use field::{Field, FieldValue};
pub use message::{Message, MessageBuilder};
pub use mti::Mti;
pub use spec::{AcceptorTag, DataType, FieldDefinition, LengthType};
pub use wire::{AcceptorInformation, AuthorizationRequest, AuthorizationResponse, CardDetails};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lookup() {
        let pan = spec::field_definition(2).unwrap();
        assert_eq!(pan.data_type, DataType::Ascii);
    }

    #[test]
    fn test_bitmap() {
        let mut bitmap = Bitmap::new();
        bitmap.set(2).unwrap();
        assert!(bitmap.is_set(2));
    }

    #[test]
    fn test_message_roundtrip() {
        let message = Message::builder(Mti::AUTHORIZATION_REQUEST)
            .field(Field::Pan, "4242424242424242")
            .field(Field::Amount, "001000")
            .field(Field::TransmissionDateTime, "2024-08-12T16:01:40Z")
            .field(Field::Currency, "840")
            .field(Field::Cvv, "7890")
            .field(Field::Expiration, "2512")
            .field(Field::AcceptorInformation, "")
            .field(Field::Stan, "000001")
            .build()
            .unwrap();

        let bytes = message.pack();
        let parsed = Message::unpack(&bytes).unwrap();

        assert_eq!(parsed.mti, Mti::AUTHORIZATION_REQUEST);
    }
}
