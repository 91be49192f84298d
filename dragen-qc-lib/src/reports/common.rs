//! Common utilities shared across report generators.

use crate::ingest::{BatchOutput, MetricTable};
use crate::metrics::{ColumnHeader, MetricValue};

/// The general statistics table followed by every module table, in display order.
pub fn tables(output: &BatchOutput) -> impl Iterator<Item = &MetricTable> {
    core::iter::once(&output.general).chain(output.sections.iter())
}

/// The table whose columns make up the flat data dumps.
pub fn data_table(output: &BatchOutput) -> &MetricTable {
    output.sections.first().unwrap_or(&output.general)
}

/// Cell text for a sample, or `None` when the sample has no value for the column.
pub fn cell_text(table: &MetricTable, sample: &str, column: &ColumnHeader) -> Option<String> {
    table.value(sample, &column.key).map(|value| column.display_value(value))
}

/// Raw value text as found in the metric files, before any display transform.
pub fn raw_text(value: &MetricValue) -> String {
    value.to_string()
}

/// Column label carrying the namespace, as used by tabular dumps.
pub fn qualified_title(column: &ColumnHeader) -> String {
    if column.namespace.is_empty() {
        column.title.to_string()
    } else {
        format!("{}: {}", column.namespace, column.title)
    }
}
