//! Thin `axum` adapter over the acquirer's merchant/payment core.

use crate::error::AcquirerError;
use crate::iso8583_client::Iso8583Client;
use crate::models::{self, Card, Merchant, Payment, PaymentStatus};
use crate::repository::Repository;
use crate::service::Service;
use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// `Json` extractor that rejects any decode failure (wrong Content-Type,
/// malformed body, or a field of the wrong type) with 400, rather than
/// axum's default 415/422 split.
struct ApiJson<T>(T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err((StatusCode::BAD_REQUEST, rejection.to_string()).into_response()),
        }
    }
}

/// Shared state handed to every route handler.
pub struct AppState<R: Repository, C: Iso8583Client> {
    service: Arc<Service<R, C>>,
}

impl<R: Repository, C: Iso8583Client> AppState<R, C> {
    /// Build router state over the given service.
    pub fn new(service: Arc<Service<R, C>>) -> Self {
        Self { service }
    }
}

impl<R: Repository, C: Iso8583Client> Clone for AppState<R, C> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

/// Build the acquirer's HTTP router: merchant onboarding and payment
/// endpoints, request-traced via `tower_http`.
pub fn router<R: Repository + 'static, C: Iso8583Client + 'static>(
    state: AppState<R, C>,
) -> Router {
    Router::new()
        .route("/merchants", post(create_merchant::<R, C>))
        .route(
            "/merchants/:merchant_id/payments",
            post(create_payment::<R, C>),
        )
        .route(
            "/merchants/:merchant_id/payments/:payment_id",
            get(get_payment::<R, C>),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Deserialize)]
struct CreateMerchantRequest {
    name: String,
    mcc: String,
    postal_code: String,
    website: String,
}

#[derive(Debug, Serialize)]
struct MerchantResponse {
    id: String,
    name: String,
    mcc: String,
    postal_code: String,
    website: String,
}

impl From<&Merchant> for MerchantResponse {
    fn from(merchant: &Merchant) -> Self {
        Self {
            id: merchant.id.clone(),
            name: merchant.name.clone(),
            mcc: merchant.mcc.clone(),
            postal_code: merchant.postal_code.clone(),
            website: merchant.website.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CardRequest {
    number: String,
    expiration_date: String,
    cvv: String,
}

impl From<CardRequest> for Card {
    fn from(card: CardRequest) -> Self {
        Self {
            number: card.number,
            expiration_date: card.expiration_date,
            cvv: card.cvv,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatePaymentRequest {
    amount: i64,
    currency: String,
    card: CardRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum PaymentStatusResponse {
    Pending,
    Error,
    Authorized,
    Declined,
}

impl From<PaymentStatus> for PaymentStatusResponse {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Pending => PaymentStatusResponse::Pending,
            PaymentStatus::Error => PaymentStatusResponse::Error,
            PaymentStatus::Authorized => PaymentStatusResponse::Authorized,
            PaymentStatus::Declined => PaymentStatusResponse::Declined,
        }
    }
}

#[derive(Debug, Serialize)]
struct SafeCardResponse {
    first6: String,
    last4: String,
    expiration_date: String,
}

#[derive(Debug, Serialize)]
struct PaymentResponse {
    id: String,
    merchant_id: String,
    amount: i64,
    currency: String,
    card: SafeCardResponse,
    status: PaymentStatusResponse,
    created_at: DateTime<Utc>,
    authorization_code: Option<String>,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id.clone(),
            merchant_id: payment.merchant_id.clone(),
            amount: payment.amount,
            currency: payment.currency.clone(),
            card: SafeCardResponse {
                first6: payment.card.first6.clone(),
                last4: payment.card.last4.clone(),
                expiration_date: payment.card.expiration_date.clone(),
            },
            status: payment.status.into(),
            created_at: payment.created_at,
            authorization_code: payment.authorization_code.clone(),
        }
    }
}

impl IntoResponse for AcquirerError {
    fn into_response(self) -> Response {
        let status = match self {
            AcquirerError::NotFound => StatusCode::NOT_FOUND,
            AcquirerError::Authorization(_) | AcquirerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

async fn create_merchant<R: Repository, C: Iso8583Client>(
    State(state): State<AppState<R, C>>,
    ApiJson(body): ApiJson<CreateMerchantRequest>,
) -> Result<Response, AcquirerError> {
    let merchant = state.service.create_merchant(models::CreateMerchant {
        name: body.name,
        mcc: body.mcc,
        postal_code: body.postal_code,
        website: body.website,
    })?;
    Ok((StatusCode::CREATED, Json(MerchantResponse::from(&merchant))).into_response())
}

async fn create_payment<R: Repository, C: Iso8583Client>(
    State(state): State<AppState<R, C>>,
    Path(merchant_id): Path<String>,
    ApiJson(body): ApiJson<CreatePaymentRequest>,
) -> Result<Response, AcquirerError> {
    let payment = state
        .service
        .create_payment(
            &merchant_id,
            models::CreatePayment {
                amount: body.amount,
                currency: body.currency,
                card: body.card.into(),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(PaymentResponse::from(&payment))).into_response())
}

async fn get_payment<R: Repository, C: Iso8583Client>(
    State(state): State<AppState<R, C>>,
    Path((merchant_id, payment_id)): Path<(String, String)>,
) -> Result<Response, AcquirerError> {
    let payment = state.service.get_payment(&merchant_id, &payment_id)?;
    Ok((StatusCode::OK, Json(PaymentResponse::from(&payment))).into_response())
}
