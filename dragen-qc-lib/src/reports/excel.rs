use super::common;
use crate::Result;
use crate::ingest::{BatchOutput, MetricTable};
use crate::metrics::{ColumnHeader, MetricValue, packed_rgb};
use rust_xlsxwriter::{Color, DocProperties, Format, FormatAlign, Workbook, Worksheet};
use std::io::Write;

/// Excel's limit on sheet name length.
const MAX_SHEET_NAME_LEN: usize = 31;

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
pub fn generate<W: Write>(output: &BatchOutput, writer: &mut W) -> Result<()> {
    let mut workbook = Workbook::new();

    let properties = DocProperties::new().set_author("dragen-qc");
    workbook.set_properties(&properties);

    for table in common::tables(output) {
        let worksheet = workbook.add_worksheet().set_name(sheet_name(&table.title))?;
        write_table(worksheet, table)?;
    }

    let data = workbook.save_to_buffer()?;
    writer.write_all(&data)?;

    Ok(())
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
fn write_table(worksheet: &mut Worksheet, table: &MetricTable) -> Result<()> {
    let bold_format = Format::new().set_bold();
    let left_align_format = Format::new().set_align(FormatAlign::Left);

    worksheet.write_string_with_format(0, 0, "Sample", &bold_format)?;

    for (col_idx, column) in table.columns.iter().enumerate() {
        let col = column_number(col_idx);
        worksheet.write_string_with_format(0, col, column.title.as_str(), &bold_format)?;
        if column.hidden {
            worksheet.set_column_hidden(col)?;
        }
    }

    worksheet.set_freeze_panes(1, 1)?;

    let mut row = 1;
    for (sample, record) in table.samples.iter() {
        worksheet.write_string_with_format(row, 0, sample, &left_align_format)?;

        for (col_idx, column) in table.columns.iter().enumerate() {
            if let Some(value) = record.get(column.key.as_str()) {
                write_metric_value(worksheet, row, column_number(col_idx), column, value)?;
            }
        }

        row += 1;
    }

    worksheet.autofit();
    Ok(())
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
fn write_metric_value(worksheet: &mut Worksheet, row: u32, col: u16, column: &ColumnHeader, value: &MetricValue) -> Result<()> {
    let mut format = Format::new();
    if let Some(highlight) = column.highlight(value) {
        format = format.set_font_color(Color::RGB(packed_rgb(highlight.rgb()))).set_bold();
    }

    if let Some(number) = column.numeric_value(value) {
        let format = format.set_num_format(number_pattern(column));
        worksheet.write_number_with_format(row, col, number, &format)?;
    } else {
        worksheet.write_string_with_format(row, col, value.to_string(), &format)?;
    }

    Ok(())
}

/// Spreadsheet number format for a column, with the suffix as a literal.
fn number_pattern(column: &ColumnHeader) -> String {
    let pattern = column.format.excel_pattern();
    if column.suffix.is_empty() {
        pattern
    } else {
        format!("{pattern}\"{}\"", column.suffix)
    }
}

fn sheet_name(title: &str) -> String {
    title.chars().take(MAX_SHEET_NAME_LEN).collect()
}

#[expect(clippy::cast_possible_truncation, reason = "Column index limited by Excel's u16 column limit")]
const fn column_number(col_idx: usize) -> u16 {
    (col_idx + 1) as u16
}
