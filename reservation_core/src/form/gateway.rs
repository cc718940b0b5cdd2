//! How the form reaches the submission service

use crate::models::{ReservationRequest, SubmissionResult};
use crate::services::ReservationService;
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

/// The call itself failed; no result envelope came back.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unreadable response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ReservationGateway: Send + Sync {
    async fn submit_reservation(
        &self,
        request: ReservationRequest,
    ) -> Result<SubmissionResult, GatewayError>;
}

/// In-process: the form and the service share a binary.
#[async_trait]
impl ReservationGateway for ReservationService {
    async fn submit_reservation(
        &self,
        request: ReservationRequest,
    ) -> Result<SubmissionResult, GatewayError> {
        Ok(self.submit(request).await)
    }
}

/// Posts to `POST /api/reservations` of a running server.
#[derive(Clone)]
pub struct HttpGateway {
    http: Client,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            http: Client::new(),
            endpoint: format!("{}/api/reservations", base_url.as_ref().trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReservationGateway for HttpGateway {
    async fn submit_reservation(
        &self,
        request: ReservationRequest,
    ) -> Result<SubmissionResult, GatewayError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        // Failure envelopes arrive with 4xx/5xx statuses, so the status is not checked.
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        serde_json::from_slice::<SubmissionResult>(&body)
            .map_err(|e| GatewayError::Decode(format!("{} ({})", e, status)))
    }
}
