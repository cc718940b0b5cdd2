pub mod health;
pub mod reservations;
pub mod routes;
