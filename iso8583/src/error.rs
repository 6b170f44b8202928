//! Error types for ISO 8583 message processing and transport

use thiserror::Error;

/// Result type for ISO 8583 operations
pub type Result<T> = std::result::Result<T, Iso8583Error>;

/// Errors that can occur while packing, unpacking, or transporting ISO 8583
/// messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Iso8583Error {
    /// The byte buffer does not describe a valid message per the field
    /// table: a length prefix points past the end of the buffer, a
    /// decimal-ASCII length is non-numeric, a composite subfield tag is
    /// unknown, or trailing bytes remain after the last field named by the
    /// bitmap.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Invalid field number for this message set (only 0..=11 are defined).
    #[error("invalid field number: {0}")]
    InvalidFieldNumber(u8),

    /// Field not present in message.
    #[error("field {0} not present in message")]
    FieldNotPresent(u8),

    /// A domain value exceeds the field's wire capacity, e.g. an amount of
    /// 1_000_000 or more minor units, which overflows the 6-digit field 3.
    #[error("amount overflow: {0}")]
    AmountOverflow(String),

    /// Missing a field required by the message's MTI.
    #[error("missing required field {0} for MTI {1}")]
    MissingRequiredField(u8, String),

    /// The peer closed the connection, or a framed message exceeded the
    /// configured maximum frame length.
    #[error("transport closed: {0}")]
    TransportClosed(String),

    /// No reply arrived for a pending request within the configured send
    /// timeout.
    #[error("send timeout waiting for STAN {0}")]
    SendTimeout(String),

    /// I/O failure on the underlying socket.
    #[error("io error: {0}")]
    Io(String),
}

impl Iso8583Error {
    /// Build a [`Iso8583Error::MalformedMessage`] from a displayable reason.
    pub fn malformed<S: Into<String>>(reason: S) -> Self {
        Iso8583Error::MalformedMessage(reason.into())
    }
}

impl From<std::io::Error> for Iso8583Error {
    fn from(e: std::io::Error) -> Self {
        Iso8583Error::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Iso8583Error::malformed("unknown composite tag 99");
        assert_eq!(err.to_string(), "malformed message: unknown composite tag 99");

        let err = Iso8583Error::FieldNotPresent(2);
        assert_eq!(err.to_string(), "field 2 not present in message");

        let err = Iso8583Error::SendTimeout("000123".to_string());
        assert_eq!(err.to_string(), "send timeout waiting for STAN 000123");
    }

    #[test]
    fn test_error_equality() {
        let err1 = Iso8583Error::InvalidFieldNumber(12);
        let err2 = Iso8583Error::InvalidFieldNumber(12);
        let err3 = Iso8583Error::InvalidFieldNumber(13);

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
