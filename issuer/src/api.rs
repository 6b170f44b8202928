//! Thin `axum` adapter over the issuer's account/card/transaction core.

use crate::error::IssuerError;
use crate::models::{self, Account, Card, Transaction, TransactionStatus};
use crate::repository::Repository;
use crate::service::Service;
use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
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
pub struct AppState<R: Repository> {
    service: Arc<Service<R>>,
}

impl<R: Repository> AppState<R> {
    /// Build router state over the given service.
    pub fn new(service: Arc<Service<R>>) -> Self {
        Self { service }
    }

    /// Borrow the underlying service, e.g. to mount it as an ISO 8583
    /// inbound handler alongside the HTTP router.
    pub fn service(&self) -> &Arc<Service<R>> {
        &self.service
    }
}

impl<R: Repository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

/// Build the issuer's HTTP router: account, card, and transaction
/// endpoints, request-traced via `tower_http`.
pub fn router<R: Repository + 'static>(state: AppState<R>) -> Router {
    Router::new()
        .route("/accounts", post(create_account::<R>))
        .route("/accounts/:account_id", get(get_account::<R>))
        .route("/accounts/:account_id/cards", post(issue_card::<R>))
        .route(
            "/accounts/:account_id/transactions",
            get(list_transactions::<R>),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Deserialize)]
struct CreateAccountRequest {
    balance: i64,
    currency: String,
}

#[derive(Debug, Serialize)]
struct AccountResponse {
    id: String,
    available_balance: i64,
    hold_balance: i64,
    currency: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            available_balance: account.available_balance(),
            hold_balance: account.hold_balance(),
            currency: account.currency.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CardResponse {
    id: String,
    account_id: String,
    pan: String,
    expiration: String,
    cvv: String,
}

impl From<&Card> for CardResponse {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id.clone(),
            account_id: card.account_id.clone(),
            pan: card.pan.clone(),
            expiration: card.expiration.clone(),
            cvv: card.cvv.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum TransactionStatusResponse {
    Authorized,
    Declined,
}

impl From<TransactionStatus> for TransactionStatusResponse {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Authorized => TransactionStatusResponse::Authorized,
            TransactionStatus::Declined => TransactionStatusResponse::Declined,
        }
    }
}

#[derive(Debug, Serialize)]
struct MerchantResponse {
    name: String,
    mcc: String,
    postal_code: Option<String>,
    website: Option<String>,
}

#[derive(Debug, Serialize)]
struct TransactionResponse {
    id: String,
    account_id: String,
    card_id: String,
    amount: i64,
    currency: String,
    approval_code: Option<String>,
    authorization_code: Option<String>,
    status: Option<TransactionStatusResponse>,
    merchant: Option<MerchantResponse>,
}

impl From<&Transaction> for TransactionResponse {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id.clone(),
            account_id: transaction.account_id.clone(),
            card_id: transaction.card_id.clone(),
            amount: transaction.amount,
            currency: transaction.currency.clone(),
            approval_code: transaction.approval_code.clone(),
            authorization_code: transaction.authorization_code.clone(),
            status: transaction.status.map(Into::into),
            merchant: transaction.merchant.as_ref().map(|m| MerchantResponse {
                name: m.name.clone(),
                mcc: m.mcc.clone(),
                postal_code: m.postal_code.clone(),
                website: m.website.clone(),
            }),
        }
    }
}

impl IntoResponse for IssuerError {
    fn into_response(self) -> Response {
        let status = match self {
            IssuerError::NotFound => StatusCode::NOT_FOUND,
            IssuerError::InsufficientFunds => StatusCode::BAD_REQUEST,
            IssuerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

async fn create_account<R: Repository>(
    State(state): State<AppState<R>>,
    ApiJson(body): ApiJson<CreateAccountRequest>,
) -> Result<Response, IssuerError> {
    let account = state.service.create_account(models::CreateAccount {
        balance: body.balance,
        currency: body.currency,
    })?;
    Ok((
        StatusCode::CREATED,
        Json(AccountResponse::from(account.as_ref())),
    )
        .into_response())
}

async fn get_account<R: Repository>(
    State(state): State<AppState<R>>,
    Path(account_id): Path<String>,
) -> Result<Response, IssuerError> {
    let account = state.service.get_account(&account_id)?;
    Ok((StatusCode::OK, Json(AccountResponse::from(account.as_ref()))).into_response())
}

async fn issue_card<R: Repository>(
    State(state): State<AppState<R>>,
    Path(account_id): Path<String>,
) -> Result<Response, IssuerError> {
    let card = state.service.issue_card(&account_id)?;
    Ok((StatusCode::CREATED, Json(CardResponse::from(card.as_ref()))).into_response())
}

async fn list_transactions<R: Repository>(
    State(state): State<AppState<R>>,
    Path(account_id): Path<String>,
) -> Result<Response, IssuerError> {
    let transactions = state.service.list_transactions(&account_id)?;
    let body: Vec<TransactionResponse> = transactions.iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(body)).into_response())
}
