//! Transaction-id allocation seeded from the remote sheet.

use crate::domain::ports::SheetStore;
use crate::utils::error::Result;
use tokio::sync::Mutex;

/// Allocates positive integer transaction ids that are not present in the
/// target sheet's id column. No local counter survives a restart; every
/// allocation re-reads the remote state.
///
/// Allocation is serialized by an async lock, and a session high-water
/// mark keeps two in-flight requests from being handed the same id while
/// the first append is still on the wire. Two *processes* sharing a sheet
/// can still race; that hazard is inherited from the remote store having
/// no transactional read-then-append.
pub struct TransactionIdGenerator {
    last_issued: Mutex<u64>,
}

impl TransactionIdGenerator {
    pub fn new() -> Self {
        Self {
            last_issued: Mutex::new(0),
        }
    }

    /// Reads the sheet's id column and returns one past the largest value
    /// seen, or past the largest id issued this session, whichever is
    /// greater. An unreadable remote is an error, never a guessed id.
    pub async fn next_id<S: SheetStore>(&self, store: &S) -> Result<u64> {
        let mut last_issued = self.last_issued.lock().await;

        let ids = store.transaction_ids().await?;
        let remote_max = ids
            .iter()
            .filter_map(|cell| cell.trim().parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        let id = remote_max.max(*last_issued) + 1;
        *last_issued = id;
        tracing::debug!("Allocated transaction id {} (remote max {})", id, remote_max);
        Ok(id)
    }
}

impl Default for TransactionIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
