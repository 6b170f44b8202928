//! Required-field validation for the two MTIs this system speaks.

use crate::error::{Iso8583Error, Result};
use crate::field::Field;
use crate::message::Message;
use crate::mti::Mti;

/// Fields an authorization request (`0100`) must carry.
pub const REQUIRED_FOR_REQUEST: &[Field] = &[
    Field::Pan,
    Field::Amount,
    Field::TransmissionDateTime,
    Field::Currency,
    Field::Cvv,
    Field::Expiration,
    Field::AcceptorInformation,
    Field::Stan,
];

/// Fields an authorization response (`0110`) must carry. Field 6
/// (authorization code) is deliberately not required here: it is absent
/// whenever `approval_code` is not the approved code.
pub const REQUIRED_FOR_RESPONSE: &[Field] = &[Field::ApprovalCode, Field::Stan];

/// Check that `msg` carries every field its MTI requires.
pub fn validate_required_fields(msg: &Message) -> Result<()> {
    let required = if msg.mti == Mti::AUTHORIZATION_REQUEST {
        REQUIRED_FOR_REQUEST
    } else {
        REQUIRED_FOR_RESPONSE
    };

    for field in required {
        if !msg.has_field(*field) {
            return Err(Iso8583Error::MissingRequiredField(
                field.number(),
                msg.mti.to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldValue;

    #[test]
    fn test_request_missing_field() {
        let mut msg = Message::new(Mti::AUTHORIZATION_REQUEST);
        msg.set_field(Field::Pan, FieldValue::ascii("4242424242424242"))
            .unwrap();

        let err = validate_required_fields(&msg).unwrap_err();
        assert!(matches!(err, Iso8583Error::MissingRequiredField(3, _)));
    }

    #[test]
    fn test_response_missing_field() {
        let mut msg = Message::new(Mti::AUTHORIZATION_RESPONSE);
        msg.set_field(Field::Stan, FieldValue::ascii("000001"))
            .unwrap();

        let err = validate_required_fields(&msg).unwrap_err();
        assert!(matches!(err, Iso8583Error::MissingRequiredField(5, _)));
    }

    #[test]
    fn test_complete_request_passes() {
        let mut msg = Message::new(Mti::AUTHORIZATION_REQUEST);
        for field in REQUIRED_FOR_REQUEST {
            msg.set_field(*field, FieldValue::ascii("x")).unwrap();
        }
        assert!(validate_required_fields(&msg).is_ok());
    }
}
