//! In-memory, map-backed merchant and payment storage.

use crate::error::{AcquirerError, Result};
use crate::models::{Merchant, Payment};
use std::collections::HashMap;
use std::sync::RwLock;

/// Storage the payment orchestrator consumes.
pub trait Repository: Send + Sync {
    /// Persist a newly onboarded merchant.
    fn create_merchant(&self, merchant: Merchant) -> Result<()>;
    /// Fetch a merchant by id.
    fn get_merchant(&self, merchant_id: &str) -> Result<Merchant>;
    /// Persist a newly created payment.
    fn create_payment(&self, payment: Payment) -> Result<()>;
    /// Overwrite a payment's stored state, e.g. after an authorization
    /// outcome is known.
    fn update_payment(&self, payment: Payment) -> Result<()>;
    /// Fetch a payment scoped to its owning merchant.
    fn get_payment(&self, merchant_id: &str, payment_id: &str) -> Result<Payment>;
}

/// In-memory, process-lifetime-only repository.
#[derive(Default)]
pub struct InMemoryRepository {
    merchants: RwLock<HashMap<String, Merchant>>,
    payments: RwLock<HashMap<String, Payment>>,
}

impl InMemoryRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for InMemoryRepository {
    fn create_merchant(&self, merchant: Merchant) -> Result<()> {
        self.merchants
            .write()
            .expect("merchants lock poisoned")
            .insert(merchant.id.clone(), merchant);
        Ok(())
    }

    fn get_merchant(&self, merchant_id: &str) -> Result<Merchant> {
        self.merchants
            .read()
            .expect("merchants lock poisoned")
            .get(merchant_id)
            .cloned()
            .ok_or(AcquirerError::NotFound)
    }

    fn create_payment(&self, payment: Payment) -> Result<()> {
        self.payments
            .write()
            .expect("payments lock poisoned")
            .insert(payment.id.clone(), payment);
        Ok(())
    }

    fn update_payment(&self, payment: Payment) -> Result<()> {
        self.payments
            .write()
            .expect("payments lock poisoned")
            .insert(payment.id.clone(), payment);
        Ok(())
    }

    fn get_payment(&self, merchant_id: &str, payment_id: &str) -> Result<Payment> {
        let payments = self.payments.read().expect("payments lock poisoned");
        let payment = payments.get(payment_id).ok_or(AcquirerError::NotFound)?;
        if payment.merchant_id != merchant_id {
            return Err(AcquirerError::NotFound);
        }
        Ok(payment.clone())
    }
}
