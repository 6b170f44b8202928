//! Mounts the authorization core as an ISO 8583 [`InboundHandler`].

use crate::models::approval_code;
use crate::repository::Repository;
use crate::service::Service;
use async_trait::async_trait;
use iso8583::field::Field;
use iso8583::mti::Mti;
use iso8583::net::InboundHandler;
use iso8583::{AuthorizationRequest, AuthorizationResponse, Message};
use std::sync::Arc;
use tracing::{error, warn};

/// Dispatches inbound `0100` messages to the authorization core and encodes
/// its domain response back into a `0110` reply. Any other MTI is logged
/// and ignored, per the core's `HandleRequest` switch.
pub struct AuthorizationHandler<R: Repository> {
    service: Arc<Service<R>>,
}

impl<R: Repository> AuthorizationHandler<R> {
    /// Mount the given service as an inbound handler.
    pub fn new(service: Arc<Service<R>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<R: Repository + 'static> InboundHandler for AuthorizationHandler<R> {
    async fn handle(&self, request: Message) -> Option<Message> {
        if request.mti != Mti::AUTHORIZATION_REQUEST {
            warn!(mti = %request.mti, "ignoring non-authorization-request message");
            return None;
        }

        let stan = request
            .field(Field::Stan)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let domain_request = match AuthorizationRequest::from_message(&request) {
            Ok(req) => req,
            Err(e) => {
                warn!(error = %e, "rejecting malformed authorization request");
                let response = AuthorizationResponse {
                    approval_code: approval_code::INVALID_REQUEST.to_string(),
                    authorization_code: None,
                    stan,
                };
                return response.to_message().ok();
            }
        };

        let response = self.service.authorize_request(domain_request);
        match response.to_message() {
            Ok(msg) => Some(msg),
            Err(e) => {
                error!(error = %e, "failed to encode authorization response, dropping reply");
                None
            }
        }
    }
}
