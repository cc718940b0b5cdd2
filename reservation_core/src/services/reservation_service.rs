//! Server-side submission of reservations
//!
//! Turns a [`ReservationRequest`] into exactly one store insert and folds every
//! outcome into a [`SubmissionResult`]. Nothing in here returns an error to
//! the caller; failures become `{ success: false, error }`.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::models::{ReservationRequest, StoreSchema, SubmissionResult, FIELD_ORDER};
use crate::store::ReservationStore;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shown when something failed that the visitor cannot act on.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "예상치 못한 오류가 발생했습니다.";

const INVALID_REQUEST_MESSAGE: &str = "입력하신 내용을 다시 확인해주세요.";

/// What happened to one submission, before it is flattened for the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Created(Vec<serde_json::Value>),
    /// Rejected before reaching the store.
    Invalid(String),
    /// Rejected by the store, with its message.
    Rejected(String),
    /// Failed in a way whose detail stays in the logs.
    Failed,
}

impl SubmissionOutcome {
    pub fn into_result(self) -> SubmissionResult {
        match self {
            SubmissionOutcome::Created(rows) => SubmissionResult::success(rows),
            SubmissionOutcome::Invalid(message) | SubmissionOutcome::Rejected(message) => {
                SubmissionResult::failure(message)
            }
            SubmissionOutcome::Failed => SubmissionResult::failure(UNEXPECTED_ERROR_MESSAGE),
        }
    }
}

#[derive(Clone)]
pub struct ReservationService {
    store: Arc<dyn ReservationStore>,
    schema: StoreSchema,
    table: String,
}

impl ReservationService {
    pub fn new(store: Arc<dyn ReservationStore>, config: &StoreConfig) -> Self {
        Self {
            store,
            schema: config.schema,
            table: config.table_name().to_string(),
        }
    }

    pub fn with_schema(store: Arc<dyn ReservationStore>, schema: StoreSchema) -> Self {
        Self {
            store,
            schema,
            table: schema.default_table().to_string(),
        }
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub async fn submit(&self, request: ReservationRequest) -> SubmissionResult {
        self.process(request).await.into_result()
    }

    pub async fn process(&self, request: ReservationRequest) -> SubmissionOutcome {
        let validation = request.check();
        if !validation.is_valid {
            let message = validation
                .first_error(FIELD_ORDER)
                .unwrap_or(INVALID_REQUEST_MESSAGE)
                .to_string();
            warn!("Reservation rejected by validation: {}", message);
            return SubmissionOutcome::Invalid(message);
        }

        let row = self.schema.to_row(&request);

        match self.store.insert_one(&self.table, &row).await {
            Ok(rows) => {
                info!(
                    table = %self.table,
                    store = self.store.name(),
                    rows = rows.len(),
                    "Reservation created"
                );
                SubmissionOutcome::Created(rows)
            }
            Err(StoreError::Rejected { message }) => {
                error!(table = %self.table, "Store error: {}", message);
                SubmissionOutcome::Rejected(message)
            }
            Err(StoreError::Unexpected(detail)) => {
                error!(table = %self.table, "Unexpected error: {}", detail);
                SubmissionOutcome::Failed
            }
        }
    }
}
