//! Client-side reservation form: field state, month picklist and the submit workflow

pub mod controller;
pub mod gateway;
pub mod months;
pub mod state;

pub use controller::{FormController, SubmitOutcome, SUBMIT_FAILED_MESSAGE, SUBMIT_RETRY_MESSAGE};
pub use gateway::{GatewayError, HttpGateway, ReservationGateway};
pub use months::{current_month_options, month_options, MonthOption, PICKLIST_LEN};
pub use state::{FieldUpdate, FormFields, FormState};
