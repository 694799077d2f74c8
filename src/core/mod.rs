pub mod appender;
pub mod builder;
pub mod mapping;
pub mod pipeline;
pub mod txn_id;

pub use crate::domain::model::{AppendOutcome, HeaderLayout, InvoiceRecord, OutputRow};
pub use crate::domain::ports::SheetStore;
pub use crate::utils::error::Result;
