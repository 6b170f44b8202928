//! Marshal/unmarshal between domain structs and [`Message`]s.
//!
//! Rust has no reflective tag-to-field binding, so unlike a source that
//! walks struct tags at runtime, each domain type gets explicit
//! `to_message`/`from_message` functions that know their own field
//! numbers.

use crate::composite::{self, Subfield};
use crate::error::{Iso8583Error, Result};
use crate::field::{Field, FieldValue};
use crate::message::Message;
use crate::mti::Mti;
use crate::spec::AcceptorTag;

const MAX_AMOUNT_MINOR_UNITS: i64 = 1_000_000;

/// Card details carried on an authorization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetails {
    /// Primary account number, 16 ASCII digits.
    pub pan: String,
    /// Expiration, `YYMM`.
    pub expiration: String,
    /// Card verification value.
    pub cvv: String,
}

/// Merchant-facing subfields carried in field 10.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AcceptorInformation {
    /// Merchant display name.
    pub name: String,
    /// Merchant category code, 4 digits.
    pub mcc: String,
    /// Merchant postal code.
    pub postal_code: Option<String>,
    /// Merchant website.
    pub website: Option<String>,
}

impl AcceptorInformation {
    fn to_wire_string(&self) -> String {
        let mut subfields = vec![
            Subfield {
                tag: AcceptorTag::Name,
                value: self.name.clone(),
            },
            Subfield {
                tag: AcceptorTag::Mcc,
                value: self.mcc.clone(),
            },
        ];
        if let Some(postal) = &self.postal_code {
            subfields.push(Subfield {
                tag: AcceptorTag::PostalCode,
                value: postal.clone(),
            });
        }
        if let Some(website) = &self.website {
            subfields.push(Subfield {
                tag: AcceptorTag::WebSite,
                value: website.clone(),
            });
        }
        composite::encode(subfields)
    }

    fn from_wire_string(wire: &str) -> Result<Self> {
        let mut info = AcceptorInformation::default();
        for subfield in composite::decode(wire)? {
            match subfield.tag {
                AcceptorTag::Name => info.name = subfield.value,
                AcceptorTag::Mcc => info.mcc = subfield.value,
                AcceptorTag::PostalCode => info.postal_code = Some(subfield.value),
                AcceptorTag::WebSite => info.website = Some(subfield.value),
            }
        }
        Ok(info)
    }
}

/// Domain view of an inbound/outbound `0100` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// Amount in integer minor currency units.
    pub amount: i64,
    /// ISO 4217-ish currency code, e.g. `"840"` or `"USD"`.
    pub currency: String,
    /// Transmission timestamp, RFC 3339 UTC, exactly 20 characters.
    pub transmission_date_time: String,
    /// Card presented for the transaction.
    pub card: CardDetails,
    /// Merchant acceptor information.
    pub merchant: AcceptorInformation,
    /// System Trace Audit Number correlating this request to its reply.
    pub stan: String,
}

impl AuthorizationRequest {
    /// Marshal this domain request into a `0100` [`Message`].
    pub fn to_message(&self) -> Result<Message> {
        if self.amount < 0 || self.amount >= MAX_AMOUNT_MINOR_UNITS {
            return Err(Iso8583Error::AmountOverflow(self.amount.to_string()));
        }

        let mut msg = Message::new(Mti::AUTHORIZATION_REQUEST);
        msg.set_field(Field::Pan, FieldValue::ascii(self.card.pan.clone()))?;
        msg.set_field(Field::Amount, FieldValue::ascii(format!("{:06}", self.amount)))?;
        msg.set_field(
            Field::TransmissionDateTime,
            FieldValue::ascii(self.transmission_date_time.clone()),
        )?;
        msg.set_field(Field::Currency, FieldValue::ascii(self.currency.clone()))?;
        msg.set_field(Field::Cvv, FieldValue::ascii(self.card.cvv.clone()))?;
        msg.set_field(Field::Expiration, FieldValue::ascii(self.card.expiration.clone()))?;
        msg.set_field(
            Field::AcceptorInformation,
            FieldValue::ascii(self.merchant.to_wire_string()),
        )?;
        msg.set_field(Field::Stan, FieldValue::ascii(self.stan.clone()))?;
        Ok(msg)
    }

    /// Unmarshal a `0100` [`Message`] into a domain request.
    pub fn from_message(msg: &Message) -> Result<Self> {
        let amount_str = field_str(msg, Field::Amount)?;
        let amount: i64 = amount_str
            .parse()
            .map_err(|_| Iso8583Error::malformed(format!("non-numeric amount {amount_str:?}")))?;

        Ok(Self {
            amount,
            currency: field_str(msg, Field::Currency)?.to_string(),
            transmission_date_time: field_str(msg, Field::TransmissionDateTime)?.to_string(),
            card: CardDetails {
                pan: field_str(msg, Field::Pan)?.to_string(),
                expiration: field_str(msg, Field::Expiration)?.to_string(),
                cvv: field_str(msg, Field::Cvv)?.to_string(),
            },
            merchant: AcceptorInformation::from_wire_string(field_str(msg, Field::AcceptorInformation)?)?,
            stan: field_str(msg, Field::Stan)?.to_string(),
        })
    }
}

/// Domain view of an inbound/outbound `0110` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResponse {
    /// 2-digit approval code, see the issuer's approval code table.
    pub approval_code: String,
    /// 6-digit authorization code, present only when approved.
    pub authorization_code: Option<String>,
    /// STAN echoed from the originating request.
    pub stan: String,
}

impl AuthorizationResponse {
    /// Marshal this domain response into a `0110` [`Message`].
    pub fn to_message(&self) -> Result<Message> {
        let mut msg = Message::new(Mti::AUTHORIZATION_RESPONSE);
        msg.set_field(Field::ApprovalCode, FieldValue::ascii(self.approval_code.clone()))?;
        if let Some(auth_code) = &self.authorization_code {
            msg.set_field(Field::AuthorizationCode, FieldValue::ascii(auth_code.clone()))?;
        }
        msg.set_field(Field::Stan, FieldValue::ascii(self.stan.clone()))?;
        Ok(msg)
    }

    /// Unmarshal a `0110` [`Message`] into a domain response.
    pub fn from_message(msg: &Message) -> Result<Self> {
        Ok(Self {
            approval_code: field_str(msg, Field::ApprovalCode)?.to_string(),
            authorization_code: msg
                .field(Field::AuthorizationCode)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            stan: field_str(msg, Field::Stan)?.to_string(),
        })
    }
}

fn field_str(msg: &Message, field: Field) -> Result<&str> {
    msg.field(field)
        .and_then(|v| v.as_str())
        .ok_or(Iso8583Error::FieldNotPresent(field.number()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> AuthorizationRequest {
        AuthorizationRequest {
            amount: 1000,
            currency: "840".to_string(),
            transmission_date_time: "2024-08-12T16:01:40Z".to_string(),
            card: CardDetails {
                pan: "4242424242424242".to_string(),
                expiration: "2512".to_string(),
                cvv: "7890".to_string(),
            },
            merchant: AcceptorInformation {
                name: "Merchant Name".to_string(),
                mcc: "1234".to_string(),
                postal_code: Some("1234567890".to_string()),
                website: Some("https://www.merchant.com".to_string()),
            },
            stan: "000001".to_string(),
        }
    }

    #[test]
    fn test_request_roundtrip_through_wire_bytes() {
        let request = sample_request();
        let msg = request.to_message().unwrap();
        let bytes = msg.pack();
        let parsed = Message::unpack(&bytes).unwrap();
        let roundtripped = AuthorizationRequest::from_message(&parsed).unwrap();

        assert_eq!(roundtripped, request);
    }

    #[test]
    fn test_amount_overflow() {
        let mut request = sample_request();
        request.amount = MAX_AMOUNT_MINOR_UNITS;
        assert!(matches!(
            request.to_message(),
            Err(Iso8583Error::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_response_without_authorization_code() {
        let response = AuthorizationResponse {
            approval_code: "51".to_string(),
            authorization_code: None,
            stan: "000002".to_string(),
        };

        let msg = response.to_message().unwrap();
        assert!(!msg.has_field(Field::AuthorizationCode));

        let roundtripped = AuthorizationResponse::from_message(&msg).unwrap();
        assert_eq!(roundtripped, response);
    }

    #[test]
    fn test_response_with_authorization_code() {
        let response = AuthorizationResponse {
            approval_code: "00".to_string(),
            authorization_code: Some("123456".to_string()),
            stan: "000003".to_string(),
        };

        let msg = response.to_message().unwrap();
        let roundtripped = AuthorizationResponse::from_message(&msg).unwrap();
        assert_eq!(roundtripped, response);
    }
}
