pub mod json;

pub use json::{EnvelopeJson, EnvelopeJsonRejection};
