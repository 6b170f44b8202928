//! ISO 8583 client wrapper: composes a `0100` from payment context, sends
//! it to the issuer, and interprets the `0110` reply.

use crate::error::Result;
use crate::models::{AuthorizationResult, Card, Merchant, Payment};
use async_trait::async_trait;
use chrono::Utc;
use iso8583::net::{Client, StanGenerator};
use iso8583::{AcceptorInformation, AuthorizationRequest, AuthorizationResponse, CardDetails};
use std::time::Duration;

/// Authorizes a payment over ISO 8583, decoupling the orchestrator from the
/// transport so tests can substitute a fake.
#[async_trait]
pub trait Iso8583Client: Send + Sync {
    /// Compose, send, and interpret a 0100/0110 exchange for this payment.
    async fn authorize_payment(
        &self,
        payment: &Payment,
        card: &Card,
        merchant: &Merchant,
    ) -> Result<AuthorizationResult>;
}

/// A [`Iso8583Client`] backed by a real TCP connection to the issuer.
pub struct Iso8583ClientImpl {
    client: Client,
    stan_generator: StanGenerator,
}

impl Iso8583ClientImpl {
    /// Connect to the issuer's ISO 8583 server with the default send
    /// timeout (5 seconds).
    pub async fn connect(addr: &str) -> iso8583::Result<Self> {
        Self::connect_with_timeout(addr, Duration::from_secs(5)).await
    }

    /// Connect to the issuer's ISO 8583 server with an explicit send
    /// timeout.
    pub async fn connect_with_timeout(addr: &str, send_timeout: Duration) -> iso8583::Result<Self> {
        Ok(Self {
            client: Client::connect(addr).await?.with_send_timeout(send_timeout),
            stan_generator: StanGenerator::new(),
        })
    }
}

#[async_trait]
impl Iso8583Client for Iso8583ClientImpl {
    async fn authorize_payment(
        &self,
        payment: &Payment,
        card: &Card,
        merchant: &Merchant,
    ) -> Result<AuthorizationResult> {
        let request = AuthorizationRequest {
            amount: payment.amount,
            currency: payment.currency.clone(),
            transmission_date_time: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            card: CardDetails {
                pan: card.number.clone(),
                expiration: card.expiration_date.clone(),
                cvv: card.cvv.clone(),
            },
            merchant: AcceptorInformation {
                name: merchant.name.clone(),
                mcc: merchant.mcc.clone(),
                postal_code: Some(merchant.postal_code.clone()),
                website: Some(merchant.website.clone()),
            },
            stan: self.stan_generator.next_stan(),
        };

        let message = request.to_message()?;
        let reply = self.client.send(&message).await?;
        let response = AuthorizationResponse::from_message(&reply)?;

        Ok(AuthorizationResult {
            approval_code: response.approval_code,
            authorization_code: response.authorization_code,
        })
    }
}
