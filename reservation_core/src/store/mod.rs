//! Clients for the table that holds reservations

pub mod memory;
pub mod supabase;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

use crate::error::StoreError;
use crate::models::ReservationRow;
use async_trait::async_trait;

/// A backend that can append one reservation row to a named table.
///
/// Implementations are shared across requests behind an `Arc` and must not
/// retry on their own: one call is one insert attempt.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Inserts `row` into `table` and returns the rows the store reports as
    /// inserted, including store-assigned columns.
    async fn insert_one(
        &self,
        table: &str,
        row: &ReservationRow,
    ) -> Result<Vec<serde_json::Value>, StoreError>;

    fn name(&self) -> &'static str;
}
