use super::common;
use crate::Result;
use crate::ingest::{BatchOutput, MetricTable};
use crate::metrics::MetricValue;
use core::fmt::Write;
use serde_json::json;

#[expect(unused_results, reason = "Map::insert returns the replaced value, which is never present here")]
pub fn generate<W: Write>(output: &BatchOutput, writer: &mut W) -> Result<()> {
    let mut tables = Vec::new();
    for table in common::tables(output) {
        tables.push(table_to_json(table));
    }

    let mut headers = serde_json::Map::new();
    for (key, header) in output.headers.iter() {
        headers.insert(
            key.to_string(),
            json!({
                "namespace": header.namespace.as_str(),
                "title": header.title.as_str(),
                "description": header.description.as_str(),
            }),
        );
    }

    let document = json!({
        "tables": tables,
        "headers": headers,
    });

    write!(writer, "{}", serde_json::to_string_pretty(&document)?)?;
    Ok(())
}

#[expect(unused_results, reason = "Map::insert returns the replaced value, which is never present here")]
fn table_to_json(table: &MetricTable) -> serde_json::Value {
    let mut samples = serde_json::Map::new();
    for (sample, record) in table.samples.iter() {
        let mut values = serde_json::Map::new();
        for column in &table.columns {
            if let Some(value) = record.get(column.key.as_str()) {
                values.insert(column.key.to_string(), metric_value_to_json(value));
            }
        }
        samples.insert(sample.to_string(), json!(values));
    }

    json!({
        "id": table.id,
        "title": table.title,
        "columns": table.columns.iter().map(|c| c.key.as_str()).collect::<Vec<_>>(),
        "samples": samples,
    })
}

fn metric_value_to_json(value: &MetricValue) -> serde_json::Value {
    match value {
        MetricValue::Integer(i) => json!(i),
        MetricValue::Float(f) => json!(f),
        MetricValue::Text(s) => json!(s.as_str()),
    }
}
