pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use crate::adapters::sheets_api::SheetsApiStore;
pub use crate::config::toml_config::AppConfig;
pub use crate::config::CliConfig;
pub use crate::core::appender::{RetryPolicy, RowAppender};
pub use crate::core::pipeline::InvoicePipeline;
pub use crate::domain::model::{InvoiceSubmission, SubmissionReceipt};
pub use crate::domain::ports::SheetStore;
pub use crate::server::idle::IdleSupervisor;
pub use crate::server::AppState;
pub use crate::utils::error::{RelayError, Result};
