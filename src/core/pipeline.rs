//! The request-to-row pipeline: validate, stamp, build, append.

use crate::core::appender::{RetryPolicy, RowAppender};
use crate::core::builder;
use crate::core::txn_id::TransactionIdGenerator;
use crate::domain::model::{InvoiceRecord, InvoiceSubmission, SubmissionReceipt};
use crate::domain::ports::SheetStore;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

pub struct InvoicePipeline<S: SheetStore> {
    store: S,
    ids: TransactionIdGenerator,
    appender: RowAppender,
}

impl<S: SheetStore> InvoicePipeline<S> {
    pub fn new(store: S, retry: RetryPolicy) -> Self {
        Self {
            store,
            ids: TransactionIdGenerator::new(),
            appender: RowAppender::new(retry),
        }
    }

    /// Runs one submission through the full pipeline. Validation happens
    /// before any remote interaction; the transaction id is stamped exactly
    /// once; the header layout is read live so the rows follow whatever
    /// column order the sheet has right now.
    pub async fn submit(&self, submission: InvoiceSubmission) -> Result<SubmissionReceipt> {
        submission.validate()?;

        let transaction_id = self.ids.next_id(&self.store).await?;
        let invoice = InvoiceRecord::stamped(submission, transaction_id);
        tracing::info!(
            "Processing invoice {} as transaction {}",
            invoice.invoice_number,
            transaction_id
        );

        let headers = self.store.header_row().await?;
        let rows = builder::build_rows(&invoice, &headers);

        // Zero line items means zero rows; skip the remote call entirely.
        if rows.is_empty() {
            tracing::info!(
                "Invoice {} has no line items, nothing to append",
                invoice.invoice_number
            );
            return Ok(SubmissionReceipt {
                transaction_id,
                rows,
                appended_rows: 0,
            });
        }

        let outcome = self.appender.append(&self.store, &rows).await?;
        tracing::info!(
            "Appended {} rows for transaction {}",
            outcome.appended_rows,
            transaction_id
        );

        Ok(SubmissionReceipt {
            transaction_id,
            rows,
            appended_rows: outcome.appended_rows,
        })
    }
}
