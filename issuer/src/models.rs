//! Account, Card, and Transaction domain types.

use iso8583::AcceptorInformation;
use std::sync::Mutex;

/// Two-digit approval codes the authorization core replies with.
pub mod approval_code {
    /// Hold succeeded; the authorization is approved.
    pub const APPROVED: &str = "00";
    /// Reserved declined code, not emitted by any current flow.
    pub const DECLINED: &str = "05";
    /// The inbound 0100 could not be unmarshaled into a domain request.
    pub const INVALID_REQUEST: &str = "10";
    /// No card matches the presented PAN, expiration, and CVV.
    pub const INVALID_CARD: &str = "14";
    /// `Account::hold` rejected the request.
    pub const INSUFFICIENT_FUNDS: &str = "51";
    /// Any unexpected internal fault.
    pub const SYSTEM_ERROR: &str = "99";
}

/// Fields needed to open an account.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    /// Opening balance in minor currency units.
    pub balance: i64,
    /// ISO 4217-ish currency code.
    pub currency: String,
}

#[derive(Debug)]
struct Balances {
    available: i64,
    hold: i64,
}

/// A cardholder account. `available_balance` and `hold_balance` are guarded
/// by an internal mutex so `hold` is atomic independent of whatever lock
/// guards the repository's account list.
#[derive(Debug)]
pub struct Account {
    /// Account identifier.
    pub id: String,
    /// ISO 4217-ish currency code.
    pub currency: String,
    balances: Mutex<Balances>,
}

impl Account {
    /// Open a new account with the given opening balance.
    pub fn new(id: String, balance: i64, currency: String) -> Self {
        Self {
            id,
            currency,
            balances: Mutex::new(Balances {
                available: balance,
                hold: 0,
            }),
        }
    }

    /// Current available balance.
    pub fn available_balance(&self) -> i64 {
        self.balances.lock().expect("account mutex poisoned").available
    }

    /// Current hold balance.
    pub fn hold_balance(&self) -> i64 {
        self.balances.lock().expect("account mutex poisoned").hold
    }

    /// Move `amount` from available to hold, atomically. Rejects the hold
    /// without mutating either balance if funds are insufficient.
    pub fn hold(&self, amount: i64) -> crate::error::Result<()> {
        let mut balances = self.balances.lock().expect("account mutex poisoned");
        if balances.available < amount {
            return Err(crate::error::IssuerError::InsufficientFunds);
        }
        balances.available -= amount;
        balances.hold += amount;
        Ok(())
    }
}

/// A synthetic, non-PCI card issued against an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Card identifier.
    pub id: String,
    /// Owning account.
    pub account_id: String,
    /// Synthetic PAN, `9` followed by 15 random digits.
    pub pan: String,
    /// Expiration, `YYMM`.
    pub expiration: String,
    /// Fixed sandbox CVV.
    pub cvv: String,
}

/// Outcome of an authorization attempt, recorded once a card has been
/// matched. Decline-before-card-lookup (invalid card) never reaches this
/// state since no transaction is created for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// The hold succeeded.
    Authorized,
    /// The hold was rejected for insufficient funds.
    Declined,
}

/// A recorded authorization attempt against an account and card. Created
/// before the funds hold is attempted, then finalized once the outcome is
/// known; a transaction whose hold failed keeps `approval_code`,
/// `authorization_code`, and `status` unset, per the source behavior this
/// system preserves.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Transaction identifier.
    pub id: String,
    /// Owning account.
    pub account_id: String,
    /// Card presented for the authorization.
    pub card_id: String,
    /// Amount in minor currency units.
    pub amount: i64,
    /// ISO 4217-ish currency code.
    pub currency: String,
    /// Approval code, set once the hold outcome is known.
    pub approval_code: Option<String>,
    /// Authorization code, set only when approved.
    pub authorization_code: Option<String>,
    /// Terminal status, set once the hold outcome is known.
    pub status: Option<TransactionStatus>,
    /// Merchant snapshot carried from the request's acceptor information.
    pub merchant: Option<AcceptorInformation>,
}

impl Transaction {
    /// A freshly created, not-yet-finalized transaction.
    pub fn new(
        id: String,
        account_id: String,
        card_id: String,
        amount: i64,
        currency: String,
        merchant: Option<AcceptorInformation>,
    ) -> Self {
        Self {
            id,
            account_id,
            card_id,
            amount,
            currency,
            approval_code: None,
            authorization_code: None,
            status: None,
            merchant,
        }
    }
}
