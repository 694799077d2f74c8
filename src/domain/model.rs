use crate::utils::error::Result;
use crate::utils::validation::{
    validate_date, validate_non_negative, validate_required_text, Validate,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A single spreadsheet cell. Numbers stay numbers so the remote sheet
/// receives them untyped rather than as quoted strings.
pub type Cell = serde_json::Value;

/// One sheet row, positionally aligned to the header layout it was built
/// against.
pub type OutputRow = Vec<Cell>;

/// Row-1 labels of the target worksheet, in column order. Always fetched
/// live; the remote column order is the source of truth and may change
/// between requests.
pub type HeaderLayout = Vec<String>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gst_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    pub hsn: String,
    pub quantity: i64,
    pub uom: String,
    pub rate: f64,
    pub basic_amount: f64,
    pub discount: f64,
    pub taxable_value: f64,
    pub cgst_rate: f64,
    pub sgst_rate: f64,
    pub cess_rate: f64,
    pub cgst_amount: f64,
    pub sgst_amount: f64,
    pub cess_amount: f64,
    pub gross_value: f64,
}

impl LineItem {
    /// Looks up one of the item's fields by its semantic name. Unknown
    /// names yield `None`; the row builder turns that into an empty cell.
    pub fn field(&self, name: &str) -> Option<Cell> {
        let value = match name {
            "name" => json!(self.name),
            "hsn" => json!(self.hsn),
            "quantity" => json!(self.quantity),
            "uom" => json!(self.uom),
            "rate" => json!(self.rate),
            "basicAmount" => json!(self.basic_amount),
            "discount" => json!(self.discount),
            "taxableValue" => json!(self.taxable_value),
            "cgstRate" => json!(self.cgst_rate),
            "sgstRate" => json!(self.sgst_rate),
            "cessRate" => json!(self.cess_rate),
            "cgstAmount" => json!(self.cgst_amount),
            "sgstAmount" => json!(self.sgst_amount),
            "cessAmount" => json!(self.cess_amount),
            "grossValue" => json!(self.gross_value),
            _ => return None,
        };
        Some(value)
    }
}

/// The inbound submission, as posted by the form. No transaction id yet;
/// the pipeline stamps one after validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceSubmission {
    pub invoice_number: String,
    pub date: String,
    pub seller: Party,
    pub buyer: Party,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl Validate for InvoiceSubmission {
    fn validate(&self) -> Result<()> {
        validate_required_text("invoice_number", &self.invoice_number)?;
        validate_date("date", &self.date)?;
        validate_required_text("seller.name", &self.seller.name)?;
        validate_required_text("buyer.name", &self.buyer.name)?;

        for (i, item) in self.items.iter().enumerate() {
            validate_required_text(&format!("items[{i}].name"), &item.name)?;
            validate_non_negative(&format!("items[{i}].quantity"), item.quantity as f64)?;
            validate_non_negative(&format!("items[{i}].rate"), item.rate)?;
            validate_non_negative(&format!("items[{i}].basicAmount"), item.basic_amount)?;
            validate_non_negative(&format!("items[{i}].discount"), item.discount)?;
            validate_non_negative(&format!("items[{i}].taxableValue"), item.taxable_value)?;
            validate_non_negative(&format!("items[{i}].cgstRate"), item.cgst_rate)?;
            validate_non_negative(&format!("items[{i}].sgstRate"), item.sgst_rate)?;
            validate_non_negative(&format!("items[{i}].cessRate"), item.cess_rate)?;
            validate_non_negative(&format!("items[{i}].cgstAmount"), item.cgst_amount)?;
            validate_non_negative(&format!("items[{i}].sgstAmount"), item.sgst_amount)?;
            validate_non_negative(&format!("items[{i}].cessAmount"), item.cess_amount)?;
            validate_non_negative(&format!("items[{i}].grossValue"), item.gross_value)?;
        }
        Ok(())
    }
}

/// A validated invoice with its transaction id stamped. Owned by the
/// handling request and discarded once the response is produced.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceRecord {
    pub transaction_id: u64,
    pub invoice_number: String,
    pub date: String,
    pub seller: Party,
    pub buyer: Party,
    pub items: Vec<LineItem>,
}

impl InvoiceRecord {
    pub fn stamped(submission: InvoiceSubmission, transaction_id: u64) -> Self {
        Self {
            transaction_id,
            invoice_number: submission.invoice_number,
            date: submission.date,
            seller: submission.seller,
            buyer: submission.buyer,
            items: submission.items,
        }
    }

    /// Top-level field lookup for headers that map to neither a line-item
    /// attribute nor a party.
    pub fn field(&self, name: &str) -> Option<Cell> {
        let value = match name {
            "transaction_id" => json!(self.transaction_id),
            "invoice_number" => json!(self.invoice_number),
            "date" => json!(self.date),
            _ => return None,
        };
        Some(value)
    }

    pub fn party(&self, name: &str) -> Option<&Party> {
        match name {
            "seller" => Some(&self.seller),
            "buyer" => Some(&self.buyer),
            _ => None,
        }
    }
}

/// What the remote append reported back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppendOutcome {
    pub appended_rows: usize,
    pub updated_range: Option<String>,
}

/// The response body for a successful submission: the stamped id and the
/// rows as they were written (empty for a zero-item submission).
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub transaction_id: u64,
    pub rows: Vec<OutputRow>,
    pub appended_rows: usize,
}
