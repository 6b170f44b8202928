//! Message Type Indicator handling.
//!
//! This system only ever speaks two MTIs: `0100` (authorization request)
//! and `0110` (authorization response), so the MTI is a thin validated
//! wrapper rather than a full class/function/origin decomposition.

use crate::error::{Iso8583Error, Result};
use std::fmt;

/// A validated 4-digit Message Type Indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mti(MtiValue);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MtiValue {
    AuthorizationRequest,
    AuthorizationResponse,
}

impl Mti {
    /// Authorization request (0100).
    pub const AUTHORIZATION_REQUEST: Self = Self(MtiValue::AuthorizationRequest);
    /// Authorization response (0110).
    pub const AUTHORIZATION_RESPONSE: Self = Self(MtiValue::AuthorizationResponse);

    /// Parse an MTI from its 4-character wire form.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "0100" => Ok(Self::AUTHORIZATION_REQUEST),
            "0110" => Ok(Self::AUTHORIZATION_RESPONSE),
            other => Err(Iso8583Error::malformed(format!("unsupported MTI {other}"))),
        }
    }

    /// The 4-character wire form.
    pub fn as_str(self) -> &'static str {
        match self.0 {
            MtiValue::AuthorizationRequest => "0100",
            MtiValue::AuthorizationResponse => "0110",
        }
    }

    /// Whether this MTI is a request.
    pub fn is_request(self) -> bool {
        matches!(self.0, MtiValue::AuthorizationRequest)
    }

    /// The response MTI that answers this request.
    pub fn to_response(self) -> Result<Self> {
        match self.0 {
            MtiValue::AuthorizationRequest => Ok(Self::AUTHORIZATION_RESPONSE),
            MtiValue::AuthorizationResponse => {
                Err(Iso8583Error::malformed("0110 has no response MTI"))
            }
        }
    }
}

impl fmt::Display for Mti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_mtis() {
        assert_eq!(Mti::parse("0100").unwrap(), Mti::AUTHORIZATION_REQUEST);
        assert_eq!(Mti::parse("0110").unwrap(), Mti::AUTHORIZATION_RESPONSE);
    }

    #[test]
    fn test_parse_unknown_mti() {
        assert!(Mti::parse("0200").is_err());
        assert!(Mti::parse("abcd").is_err());
        assert!(Mti::parse("01000").is_err());
    }

    #[test]
    fn test_request_response_predicate() {
        assert!(Mti::AUTHORIZATION_REQUEST.is_request());
        assert!(!Mti::AUTHORIZATION_RESPONSE.is_request());
    }

    #[test]
    fn test_to_response() {
        assert_eq!(
            Mti::AUTHORIZATION_REQUEST.to_response().unwrap(),
            Mti::AUTHORIZATION_RESPONSE
        );
        assert!(Mti::AUTHORIZATION_RESPONSE.to_response().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Mti::AUTHORIZATION_REQUEST.to_string(), "0100");
    }
}
