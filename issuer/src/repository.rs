//! In-memory repository: a single read/write lock per entity kind, per the
//! account-management side of the authorization core.

use crate::error::{IssuerError, Result};
use crate::models::{Account, Card, Transaction, TransactionStatus};
use iso8583::CardDetails;
use std::sync::{Arc, RwLock};

/// Storage the authorization core and account-management HTTP surface
/// consume. An in-memory implementation is the only one this sandbox ships,
/// but the trait keeps the service layer from depending on it directly.
pub trait Repository: Send + Sync {
    /// Persist a newly created account.
    fn create_account(&self, account: Arc<Account>) -> Result<()>;
    /// Fetch an account by id.
    fn get_account(&self, account_id: &str) -> Result<Arc<Account>>;
    /// Persist a newly issued card.
    fn create_card(&self, card: Arc<Card>) -> Result<()>;
    /// Linear scan for a card matching PAN, expiration, and CVV exactly.
    fn find_card_for_authorization(&self, card: &CardDetails) -> Result<Arc<Card>>;
    /// Persist a newly created, not-yet-finalized transaction.
    fn create_transaction(&self, transaction: Transaction) -> Result<()>;
    /// Finalize a previously created transaction's outcome.
    fn finalize_transaction(
        &self,
        transaction_id: &str,
        approval_code: String,
        authorization_code: Option<String>,
        status: TransactionStatus,
    ) -> Result<()>;
    /// All transactions recorded against an account.
    fn list_transactions(&self, account_id: &str) -> Result<Vec<Transaction>>;
}

/// In-memory, process-lifetime-only repository.
#[derive(Default)]
pub struct InMemoryRepository {
    accounts: RwLock<Vec<Arc<Account>>>,
    cards: RwLock<Vec<Arc<Card>>>,
    transactions: RwLock<Vec<Transaction>>,
}

impl InMemoryRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for InMemoryRepository {
    fn create_account(&self, account: Arc<Account>) -> Result<()> {
        self.accounts
            .write()
            .expect("accounts lock poisoned")
            .push(account);
        Ok(())
    }

    fn get_account(&self, account_id: &str) -> Result<Arc<Account>> {
        self.accounts
            .read()
            .expect("accounts lock poisoned")
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or(IssuerError::NotFound)
    }

    fn create_card(&self, card: Arc<Card>) -> Result<()> {
        self.cards.write().expect("cards lock poisoned").push(card);
        Ok(())
    }

    fn find_card_for_authorization(&self, card: &CardDetails) -> Result<Arc<Card>> {
        self.cards
            .read()
            .expect("cards lock poisoned")
            .iter()
            .find(|c| {
                c.pan == card.pan && c.expiration == card.expiration && c.cvv == card.cvv
            })
            .cloned()
            .ok_or(IssuerError::NotFound)
    }

    fn create_transaction(&self, transaction: Transaction) -> Result<()> {
        self.transactions
            .write()
            .expect("transactions lock poisoned")
            .push(transaction);
        Ok(())
    }

    fn finalize_transaction(
        &self,
        transaction_id: &str,
        approval_code: String,
        authorization_code: Option<String>,
        status: TransactionStatus,
    ) -> Result<()> {
        let mut transactions = self.transactions.write().expect("transactions lock poisoned");
        let transaction = transactions
            .iter_mut()
            .find(|t| t.id == transaction_id)
            .ok_or(IssuerError::NotFound)?;
        transaction.approval_code = Some(approval_code);
        transaction.authorization_code = authorization_code;
        transaction.status = Some(status);
        Ok(())
    }

    fn list_transactions(&self, account_id: &str) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .read()
            .expect("transactions lock poisoned")
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_details(pan: &str) -> CardDetails {
        CardDetails {
            pan: pan.to_string(),
            expiration: "2601".to_string(),
            cvv: "1234".to_string(),
        }
    }

    #[test]
    fn test_get_account_not_found() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get_account("missing"), Err(IssuerError::NotFound));
    }

    #[test]
    fn test_create_and_get_account() {
        let repo = InMemoryRepository::new();
        let account = Arc::new(Account::new("a1".to_string(), 1000, "USD".to_string()));
        repo.create_account(account.clone()).unwrap();

        let fetched = repo.get_account("a1").unwrap();
        assert_eq!(fetched.available_balance(), 1000);
    }

    #[test]
    fn test_find_card_requires_exact_match() {
        let repo = InMemoryRepository::new();
        let card = Arc::new(Card {
            id: "c1".to_string(),
            account_id: "a1".to_string(),
            pan: "9123456789012345".to_string(),
            expiration: "2601".to_string(),
            cvv: "1234".to_string(),
        });
        repo.create_card(card).unwrap();

        assert!(repo
            .find_card_for_authorization(&card_details("9123456789012345"))
            .is_ok());
        assert!(repo
            .find_card_for_authorization(&card_details("9999999999999999"))
            .is_err());
    }

    #[test]
    fn test_finalize_and_list_transactions() {
        let repo = InMemoryRepository::new();
        let transaction = Transaction::new(
            "t1".to_string(),
            "a1".to_string(),
            "c1".to_string(),
            1000,
            "USD".to_string(),
            None,
        );
        repo.create_transaction(transaction).unwrap();
        repo.finalize_transaction(
            "t1",
            "00".to_string(),
            Some("123456".to_string()),
            TransactionStatus::Authorized,
        )
        .unwrap();

        let transactions = repo.list_transactions("a1").unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].approval_code.as_deref(), Some("00"));
        assert_eq!(transactions[0].status, Some(TransactionStatus::Authorized));
    }
}
