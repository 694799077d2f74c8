use crate::domain::model::{AppendOutcome, HeaderLayout, OutputRow};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The remote spreadsheet, seen as an opaque fallible store. No
/// transactional guarantees across the id-read / build / append sequence.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Row-1 labels of the target worksheet, in column order.
    async fn header_row(&self) -> Result<HeaderLayout>;

    /// Raw cell values of the transaction-id column, below the header.
    /// Empty when the sheet has no id column or no data rows yet.
    async fn transaction_ids(&self) -> Result<Vec<String>>;

    /// Appends rows at the end of the sheet. Not idempotent; calling twice
    /// with the same rows duplicates them.
    async fn append_rows(&self, rows: &[OutputRow]) -> Result<AppendOutcome>;
}
