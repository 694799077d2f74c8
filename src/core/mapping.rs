//! Header-label to field-name mapping for the invoice worksheet.
//!
//! The table is many-to-one: the three buyer headers (and the three seller
//! headers) all resolve to one party field, and the row builder picks the
//! sub-attribute from the literal header text. The field name alone is not
//! enough to know which party attribute a column wants.

/// Literal row-1 labels and the semantic field each denotes.
pub const COLUMN_MAPPING: &[(&str, &str)] = &[
    ("Transaction ID", "transaction_id"),
    ("INVOICE NO", "invoice_number"),
    ("Date", "date"),
    ("Name", "name"),
    ("HSN", "hsn"),
    ("Quantity", "quantity"),
    ("UOM", "uom"),
    ("Rate", "rate"),
    ("Discount", "discount"),
    ("Basic Amount", "basicAmount"),
    ("Taxable Value", "taxableValue"),
    ("CGST Rate", "cgstRate"),
    ("CGST Amount", "cgstAmount"),
    ("SGST Rate", "sgstRate"),
    ("SGST Amount", "sgstAmount"),
    ("CESS Rate", "cessRate"),
    ("CESS Amount", "cessAmount"),
    ("Gross Value", "grossValue"),
    ("Buyer Name", "buyer"),
    ("Buyer Address", "buyer"),
    ("Buyer GST", "buyer"),
    ("Seller Name", "seller"),
    ("Seller Address", "seller"),
    ("Seller GST", "seller"),
];

/// Field names that live on a line item rather than on the invoice.
const ITEM_FIELDS: &[&str] = &[
    "name",
    "hsn",
    "quantity",
    "uom",
    "rate",
    "basicAmount",
    "discount",
    "taxableValue",
    "cgstRate",
    "sgstRate",
    "cessRate",
    "cgstAmount",
    "sgstAmount",
    "cessAmount",
    "grossValue",
];

/// Resolves a header label to its semantic field name. Unknown headers
/// return `None`; the row builder emits an empty cell for those.
pub fn map_header(header: &str) -> Option<&'static str> {
    COLUMN_MAPPING
        .iter()
        .find(|(label, _)| *label == header)
        .map(|(_, field)| *field)
}

pub fn is_item_field(field: &str) -> bool {
    ITEM_FIELDS.contains(&field)
}

pub fn is_party_field(field: &str) -> bool {
    field == "seller" || field == "buyer"
}
