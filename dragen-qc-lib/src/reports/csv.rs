use super::common;
use crate::Result;
use crate::ingest::BatchOutput;
use core::fmt::Write;
use ohno::IntoAppError;

/// Write the raw values of the module table, one row per sample and one column per metric key.
pub fn generate<W: Write>(output: &BatchOutput, delimiter: u8, writer: &mut W) -> Result<()> {
    let table = common::data_table(output);
    let mut buffer = Vec::new();

    {
        let mut csv_writer = csv::WriterBuilder::new().delimiter(delimiter).from_writer(&mut buffer);

        let header = core::iter::once("Sample").chain(table.columns.iter().map(|c| c.key.as_str()));
        csv_writer.write_record(header)?;

        for (sample, record) in table.samples.iter() {
            let row = core::iter::once(sample.to_string()).chain(
                table
                    .columns
                    .iter()
                    .map(|column| record.get(column.key.as_str()).map(common::raw_text).unwrap_or_default()),
            );
            csv_writer.write_record(row)?;
        }

        csv_writer.flush()?;
    }

    let text = String::from_utf8(buffer).into_app_err("data dump is not valid UTF-8")?;
    write!(writer, "{text}")?;
    Ok(())
}
