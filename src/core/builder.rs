//! Expands a stamped invoice into sheet rows against the live header layout.

use crate::core::mapping;
use crate::domain::model::{Cell, InvoiceRecord, LineItem, OutputRow, Party};

fn empty_cell() -> Cell {
    Cell::String(String::new())
}

/// One output row per line item, in item order. A zero-item invoice yields
/// zero rows; callers treat that as a successful no-op, not a failure.
pub fn build_rows(invoice: &InvoiceRecord, headers: &[String]) -> Vec<OutputRow> {
    invoice
        .items
        .iter()
        .map(|item| build_row(invoice, item, headers))
        .collect()
}

fn build_row(invoice: &InvoiceRecord, item: &LineItem, headers: &[String]) -> OutputRow {
    headers
        .iter()
        .map(|header| cell_for(invoice, item, header))
        .collect()
}

fn cell_for(invoice: &InvoiceRecord, item: &LineItem, header: &str) -> Cell {
    let Some(field) = mapping::map_header(header) else {
        // Unmapped headers still get a cell so every column position exists.
        return empty_cell();
    };

    if mapping::is_item_field(field) {
        return item.field(field).unwrap_or_else(empty_cell);
    }

    if mapping::is_party_field(field) {
        return match invoice.party(field) {
            Some(party) => party_cell(party, header),
            None => empty_cell(),
        };
    }

    invoice.field(field).unwrap_or_else(empty_cell)
}

/// Which party attribute a column wants is carried by the header text, not
/// the field name. "…Name" reads the name; if that is empty, "…Address"
/// reads the address; if still empty, "…GST" reads the tax id. Each header
/// runs the chain independently.
fn party_cell(party: &Party, header: &str) -> Cell {
    let mut value = "";
    if header.ends_with("Name") {
        value = &party.name;
    }
    if value.is_empty() && header.ends_with("Address") {
        value = &party.address;
    }
    if value.is_empty() && header.ends_with("GST") {
        value = &party.gst_number;
    }
    Cell::String(value.to_string())
}
