//! The acquirer's payment orchestrator: persist a pending payment, compose
//! and send the ISO 8583 authorization, and translate the reply into a
//! terminal payment status.

use crate::error::Result;
use crate::iso8583_client::Iso8583Client;
use crate::models::{CreateMerchant, CreatePayment, Merchant, Payment, PaymentStatus, SafeCard};
use crate::repository::Repository;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

const APPROVAL_CODE_APPROVED: &str = "00";

/// Merchant onboarding and payment orchestration, generic over both the
/// repository and the ISO 8583 client so tests can substitute fakes for
/// either.
pub struct Service<R: Repository, C: Iso8583Client> {
    repo: Arc<R>,
    iso8583_client: Arc<C>,
}

impl<R: Repository, C: Iso8583Client> Service<R, C> {
    /// Build a service over the given repository and ISO 8583 client.
    pub fn new(repo: Arc<R>, iso8583_client: Arc<C>) -> Self {
        Self {
            repo,
            iso8583_client,
        }
    }

    /// Onboard a merchant.
    pub fn create_merchant(&self, create: CreateMerchant) -> Result<Merchant> {
        let merchant = Merchant {
            id: Uuid::new_v4().to_string(),
            name: create.name,
            mcc: create.mcc,
            postal_code: create.postal_code,
            website: create.website,
        };
        self.repo.create_merchant(merchant.clone())?;
        Ok(merchant)
    }

    /// Fetch a payment scoped to its owning merchant.
    pub fn get_payment(&self, merchant_id: &str, payment_id: &str) -> Result<Payment> {
        self.repo.get_payment(merchant_id, payment_id)
    }

    /// Persist a pending payment, authorize it over ISO 8583, and return
    /// the payment in its terminal state. Returns an error (and leaves the
    /// payment `Error`) only when the ISO 8583 round-trip itself failed or
    /// the merchant could not be found; a non-approval reply is a
    /// successful call that yields a `Declined` payment.
    pub async fn create_payment(&self, merchant_id: &str, create: CreatePayment) -> Result<Payment> {
        let mut payment = Payment {
            id: Uuid::new_v4().to_string(),
            merchant_id: merchant_id.to_string(),
            amount: create.amount,
            currency: create.currency,
            card: SafeCard::from(&create.card),
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
            authorization_code: None,
        };
        self.repo.create_payment(payment.clone())?;

        let merchant = self.repo.get_merchant(merchant_id)?;

        match self
            .iso8583_client
            .authorize_payment(&payment, &create.card, &merchant)
            .await
        {
            Ok(result) => {
                payment.authorization_code = result.authorization_code;
                payment.status = if result.approval_code == APPROVAL_CODE_APPROVED {
                    PaymentStatus::Authorized
                } else {
                    PaymentStatus::Declined
                };
                self.repo.update_payment(payment.clone())?;
                Ok(payment)
            }
            Err(e) => {
                payment.status = PaymentStatus::Error;
                self.repo.update_payment(payment)?;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AcquirerError;
    use crate::models::{AuthorizationResult, Card};
    use crate::repository::InMemoryRepository;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeClient {
        result: Mutex<Option<Result<AuthorizationResult>>>,
    }

    impl FakeClient {
        fn approved(authorization_code: &str) -> Self {
            Self {
                result: Mutex::new(Some(Ok(AuthorizationResult {
                    approval_code: "00".to_string(),
                    authorization_code: Some(authorization_code.to_string()),
                }))),
            }
        }

        fn declined(approval_code: &str) -> Self {
            Self {
                result: Mutex::new(Some(Ok(AuthorizationResult {
                    approval_code: approval_code.to_string(),
                    authorization_code: None,
                }))),
            }
        }

        fn failing() -> Self {
            Self {
                result: Mutex::new(Some(Err(AcquirerError::Internal(
                    "simulated transport failure".to_string(),
                )))),
            }
        }
    }

    #[async_trait]
    impl Iso8583Client for FakeClient {
        async fn authorize_payment(
            &self,
            _payment: &Payment,
            _card: &Card,
            _merchant: &Merchant,
        ) -> Result<AuthorizationResult> {
            self.result
                .lock()
                .unwrap()
                .take()
                .expect("authorize_payment called more than once in this test")
        }
    }

    fn create_payment_request() -> CreatePayment {
        CreatePayment {
            amount: 1000,
            currency: "USD".to_string(),
            card: Card {
                number: "4111111111111111".to_string(),
                expiration_date: "2601".to_string(),
                cvv: "123".to_string(),
            },
        }
    }

    fn merchant_request() -> CreateMerchant {
        CreateMerchant {
            name: "Demo Merchant".to_string(),
            mcc: "5411".to_string(),
            postal_code: "12345".to_string(),
            website: "https://demo.merchant.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_approved_payment() {
        let repo = Arc::new(InMemoryRepository::new());
        let client = Arc::new(FakeClient::approved("123456"));
        let service = Service::new(repo, client);

        let merchant = service.create_merchant(merchant_request()).unwrap();
        let payment = service
            .create_payment(&merchant.id, create_payment_request())
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Authorized);
        assert_eq!(payment.authorization_code.as_deref(), Some("123456"));
        assert_eq!(payment.card.first6, "411111");
        assert_eq!(payment.card.last4, "1111");
    }

    #[tokio::test]
    async fn test_declined_payment() {
        let repo = Arc::new(InMemoryRepository::new());
        let client = Arc::new(FakeClient::declined("51"));
        let service = Service::new(repo, client);

        let merchant = service.create_merchant(merchant_request()).unwrap();
        let payment = service
            .create_payment(&merchant.id, create_payment_request())
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Declined);
        assert!(payment.authorization_code.is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_marks_payment_error_and_returns_err() {
        let repo = Arc::new(InMemoryRepository::new());
        let client = Arc::new(FakeClient::failing());
        let service = Service::new(repo, client);

        let merchant = service.create_merchant(merchant_request()).unwrap();
        let result = service
            .create_payment(&merchant.id, create_payment_request())
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unknown_merchant_leaves_payment_pending_in_repo() {
        let repo = Arc::new(InMemoryRepository::new());
        let client = Arc::new(FakeClient::approved("000000"));
        let service = Service::new(repo.clone(), client);

        let result = service
            .create_payment("missing-merchant", create_payment_request())
            .await;

        assert!(result.is_err());
    }
}
