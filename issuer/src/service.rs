//! The issuer's authorization core: card lookup, funds hold, and the
//! account-management operations the 0100/0110 flow depends on.

use crate::error::{IssuerError, Result};
use crate::models::{approval_code, Account, Card, CreateAccount, Transaction, TransactionStatus};
use crate::repository::Repository;
use chrono::{Months, Utc};
use iso8583::{AuthorizationRequest, AuthorizationResponse};
use rand::Rng;
use std::sync::Arc;
use uuid::Uuid;

/// A fixed sandbox CVV stamped on every synthetic card.
const SYNTHETIC_CVV: &str = "1234";

/// The issuer's account, card, and authorization operations, generic over
/// the repository so tests can swap in fakes.
pub struct Service<R: Repository> {
    repo: Arc<R>,
}

impl<R: Repository> Service<R> {
    /// Build a service over the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Open a new account.
    pub fn create_account(&self, req: CreateAccount) -> Result<Arc<Account>> {
        let account = Arc::new(Account::new(
            Uuid::new_v4().to_string(),
            req.balance,
            req.currency,
        ));
        self.repo.create_account(account.clone())?;
        Ok(account)
    }

    /// Fetch an account by id.
    pub fn get_account(&self, account_id: &str) -> Result<Arc<Account>> {
        self.repo.get_account(account_id)
    }

    /// Issue a synthetic, non-PCI card against an account.
    pub fn issue_card(&self, account_id: &str) -> Result<Arc<Card>> {
        let card = Arc::new(Card {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            pan: generate_synthetic_pan(),
            expiration: synthetic_expiration(),
            cvv: SYNTHETIC_CVV.to_string(),
        });
        self.repo.create_card(card.clone())?;
        Ok(card)
    }

    /// All transactions recorded against an account.
    pub fn list_transactions(&self, account_id: &str) -> Result<Vec<Transaction>> {
        self.repo.list_transactions(account_id)
    }

    /// Run the full authorization flow for an inbound domain request,
    /// producing the domain response to encode into a 0110 reply.
    /// Any internal fault is mapped to approval code 99, never propagated
    /// to the caller: a reply is always produced for a well-formed request.
    pub fn authorize_request(&self, req: AuthorizationRequest) -> AuthorizationResponse {
        let stan = req.stan.clone();
        match self.try_authorize(req) {
            Ok(response) => response,
            Err(_) => AuthorizationResponse {
                approval_code: approval_code::SYSTEM_ERROR.to_string(),
                authorization_code: None,
                stan,
            },
        }
    }

    fn try_authorize(&self, req: AuthorizationRequest) -> Result<AuthorizationResponse> {
        let card = match self.repo.find_card_for_authorization(&req.card) {
            Ok(card) => card,
            Err(IssuerError::NotFound) => {
                return Ok(AuthorizationResponse {
                    approval_code: approval_code::INVALID_CARD.to_string(),
                    authorization_code: None,
                    stan: req.stan,
                });
            }
            Err(e) => return Err(e),
        };

        let account = self.repo.get_account(&card.account_id)?;

        let transaction = Transaction::new(
            Uuid::new_v4().to_string(),
            card.account_id.clone(),
            card.id.clone(),
            req.amount,
            req.currency.clone(),
            Some(req.merchant.clone()),
        );
        let transaction_id = transaction.id.clone();
        self.repo.create_transaction(transaction)?;

        match account.hold(req.amount) {
            Ok(()) => {
                let authorization_code = generate_authorization_code();
                self.repo.finalize_transaction(
                    &transaction_id,
                    approval_code::APPROVED.to_string(),
                    Some(authorization_code.clone()),
                    TransactionStatus::Authorized,
                )?;
                Ok(AuthorizationResponse {
                    approval_code: approval_code::APPROVED.to_string(),
                    authorization_code: Some(authorization_code),
                    stan: req.stan,
                })
            }
            Err(IssuerError::InsufficientFunds) => Ok(AuthorizationResponse {
                approval_code: approval_code::INSUFFICIENT_FUNDS.to_string(),
                authorization_code: None,
                stan: req.stan,
            }),
            Err(e) => Err(e),
        }
    }
}

/// `9` followed by 15 random digits. Not a valid card number by design.
fn generate_synthetic_pan() -> String {
    let mut rng = rand::thread_rng();
    let digits: String = (0..15).map(|_| rng.gen_range(0..10).to_string()).collect();
    format!("9{digits}")
}

/// Three years and one month from now, formatted `YYMM`.
fn synthetic_expiration() -> String {
    Utc::now()
        .checked_add_months(Months::new(37))
        .expect("adding 37 months does not overflow")
        .format("%y%m")
        .to_string()
}

fn generate_authorization_code() -> String {
    let mut rng = rand::thread_rng();
    (0..6).map(|_| rng.gen_range(0..10).to_string()).collect()
}
