//! Merchant and payment domain types.

use chrono::{DateTime, Utc};

/// Fields needed to onboard a merchant.
#[derive(Debug, Clone)]
pub struct CreateMerchant {
    /// Merchant display name.
    pub name: String,
    /// Merchant category code.
    pub mcc: String,
    /// Merchant postal code.
    pub postal_code: String,
    /// Merchant website.
    pub website: String,
}

/// A merchant accepted onto the platform, carried into the acceptor
/// information of every 0100 this merchant's payments produce.
#[derive(Debug, Clone)]
pub struct Merchant {
    /// Merchant identifier.
    pub id: String,
    /// Merchant display name.
    pub name: String,
    /// Merchant category code.
    pub mcc: String,
    /// Merchant postal code.
    pub postal_code: String,
    /// Merchant website.
    pub website: String,
}

/// Card details as presented by the cardholder at checkout. Never
/// persisted in full, only [`SafeCard`] is stored.
#[derive(Debug, Clone)]
pub struct Card {
    /// Primary account number.
    pub number: String,
    /// Expiration, `YYMM`.
    pub expiration_date: String,
    /// Card verification value.
    pub cvv: String,
}

/// The subset of a card safe to persist: first 6 and last 4 digits of the
/// PAN, plus expiration. The full PAN and CVV never reach the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeCard {
    /// First 6 digits of the PAN.
    pub first6: String,
    /// Last 4 digits of the PAN.
    pub last4: String,
    /// Expiration, `YYMM`.
    pub expiration_date: String,
}

impl From<&Card> for SafeCard {
    fn from(card: &Card) -> Self {
        Self {
            first6: card.number[..6].to_string(),
            last4: card.number[card.number.len() - 4..].to_string(),
            expiration_date: card.expiration_date.clone(),
        }
    }
}

/// Fields needed to start a payment.
#[derive(Debug, Clone)]
pub struct CreatePayment {
    /// Amount in minor currency units.
    pub amount: i64,
    /// ISO 4217-ish currency code.
    pub currency: String,
    /// Card presented at checkout.
    pub card: Card,
}

/// Terminal outcome of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// Persisted, authorization not yet attempted or still in flight.
    Pending,
    /// The ISO 8583 round-trip to the issuer failed.
    Error,
    /// The issuer approved the authorization.
    Authorized,
    /// The issuer declined the authorization.
    Declined,
}

/// A payment attempt against a merchant.
#[derive(Debug, Clone)]
pub struct Payment {
    /// Payment identifier.
    pub id: String,
    /// Owning merchant.
    pub merchant_id: String,
    /// Amount in minor currency units.
    pub amount: i64,
    /// ISO 4217-ish currency code.
    pub currency: String,
    /// Card reduced to its non-sensitive fields.
    pub card: SafeCard,
    /// Current terminal status.
    pub status: PaymentStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Authorization code echoed from the issuer, set only when approved.
    pub authorization_code: Option<String>,
}

/// Outcome of an ISO 8583 authorization round-trip, as interpreted by the
/// orchestrator (the STAN that correlated the exchange is not domain state
/// the caller needs).
#[derive(Debug, Clone)]
pub struct AuthorizationResult {
    /// Two-digit approval code from the issuer.
    pub approval_code: String,
    /// Six-digit authorization code, present only when approved.
    pub authorization_code: Option<String>,
}
