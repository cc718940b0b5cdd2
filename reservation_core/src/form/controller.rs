use crate::form::gateway::ReservationGateway;
use crate::form::months::{current_month_options, month_options, MonthOption};
use crate::form::state::{FieldUpdate, FormState};
use crate::models::SubmissionResult;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Shown when the service reports a failure without a message.
pub const SUBMIT_FAILED_MESSAGE: &str = "예약 접수 중 오류가 발생했습니다.";
/// Shown when the service could not be reached at all.
pub const SUBMIT_RETRY_MESSAGE: &str = "예약 접수 중 오류가 발생했습니다. 다시 시도해주세요.";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Accepted; the form resets after the configured delay.
    Submitted,
    /// The call was made and failed; the message is now in `submit_error`.
    Failed(String),
    /// Client-side validation failed; no call was made.
    Invalid(String),
    /// Submitting is disabled (no photo type, in flight, or already submitted).
    Ignored,
}

/// Clears `is_submitting` however the submit future ends, cancellation included.
struct InFlight {
    state: Arc<Mutex<FormState>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.state.lock().is_submitting = false;
    }
}

/// State and submit workflow of one reservation form instance.
#[derive(Clone)]
pub struct FormController {
    state: Arc<Mutex<FormState>>,
    gateway: Arc<dyn ReservationGateway>,
    months: Arc<Vec<MonthOption>>,
    reset_delay: Duration,
}

impl FormController {
    pub fn new(gateway: Arc<dyn ReservationGateway>, reset_delay: Duration) -> Self {
        Self::with_months(gateway, reset_delay, current_month_options())
    }

    /// Same as [`FormController::new`] with the picklist anchored at `today`.
    pub fn with_today(
        gateway: Arc<dyn ReservationGateway>,
        reset_delay: Duration,
        today: NaiveDate,
    ) -> Self {
        Self::with_months(gateway, reset_delay, month_options(today))
    }

    fn with_months(
        gateway: Arc<dyn ReservationGateway>,
        reset_delay: Duration,
        months: Vec<MonthOption>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(FormState::default())),
            gateway,
            months: Arc::new(months),
            reset_delay,
        }
    }

    pub fn month_options(&self) -> &[MonthOption] {
        &self.months
    }

    pub fn snapshot(&self) -> FormState {
        self.state.lock().clone()
    }

    pub fn can_submit(&self) -> bool {
        self.state.lock().can_submit()
    }

    pub fn update(&self, update: FieldUpdate) -> bool {
        self.state.lock().apply(update)
    }

    /// Runs one submission. At most one call to the gateway is in flight per
    /// controller; overlapping calls return [`SubmitOutcome::Ignored`].
    pub async fn submit(&self) -> SubmitOutcome {
        let (request, _in_flight) = {
            let mut state = self.state.lock();
            if !state.can_submit() {
                return SubmitOutcome::Ignored;
            }

            match state.fields.to_request() {
                Ok(request) => {
                    state.is_submitting = true;
                    state.submit_error = None;
                    (
                        request,
                        InFlight {
                            state: self.state.clone(),
                        },
                    )
                }
                Err(message) => {
                    state.submit_error = Some(message.clone());
                    return SubmitOutcome::Invalid(message);
                }
            }
        };

        let outcome = match self.gateway.submit_reservation(request).await {
            Ok(SubmissionResult::Success { data }) => {
                info!(rows = data.len(), "Reservation created");
                SubmitOutcome::Submitted
            }
            Ok(SubmissionResult::Failure { error }) => {
                let message = if error.trim().is_empty() {
                    SUBMIT_FAILED_MESSAGE.to_string()
                } else {
                    error
                };
                SubmitOutcome::Failed(message)
            }
            Err(e) => {
                error!("Form submission error: {}", e);
                SubmitOutcome::Failed(SUBMIT_RETRY_MESSAGE.to_string())
            }
        };

        {
            let mut state = self.state.lock();
            match &outcome {
                SubmitOutcome::Submitted => state.is_submitted = true,
                SubmitOutcome::Failed(message) => state.submit_error = Some(message.clone()),
                SubmitOutcome::Invalid(_) | SubmitOutcome::Ignored => {}
            }
        }

        if outcome == SubmitOutcome::Submitted {
            self.schedule_reset();
        }

        outcome
    }

    fn schedule_reset(&self) {
        let state = self.state.clone();
        let delay = self.reset_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.lock().reset();
        });
    }
}
