pub mod request;
pub mod reservation;

pub use request::ApiResponse;
pub use reservation::*;
