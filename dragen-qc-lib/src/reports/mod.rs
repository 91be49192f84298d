//! Multi-format report generation for ingested DRAGEN metrics
//!
//! This module turns the finalized output of an ingestion batch into reports for
//! people and flat dumps for downstream tools.
//!
//! # Implementation Model
//!
//! Five report generators are provided, each accessed through a `generate` function:
//! - **Console**: Per-sample metric listing with highlight colors and word wrapping
//! - **CSV**: Raw values of the module table, with a configurable delimiter (also used
//!   for the TSV data file)
//! - **HTML**: Self-contained document with every table, shaded cells, and toggleable
//!   hidden columns
//! - **Excel**: Native .xlsx format with one sheet per table
//! - **JSON**: Raw values and header metadata
//!
//! All generators operate on the same input, a `BatchOutput`, so a single ingestion
//! run can feed any combination of them. Display formatting (modify transforms,
//! number formats, suffixes, colour scales, conditional highlights) always comes from
//! the column headers; the data dumps carry the values as read from the files.

mod common;
mod console;
mod csv;
mod excel;
mod html;
mod json;

pub use console::generate as generate_console;
pub use csv::generate as generate_csv;
pub use excel::generate as generate_xlsx;
pub use html::generate as generate_html;
pub use json::generate as generate_json;
