// Adapters layer: concrete implementations of the domain ports against
// external systems. Currently one: the spreadsheet provider's REST API.

pub mod sheets_api;
