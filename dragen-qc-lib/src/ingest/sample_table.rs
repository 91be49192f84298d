use crate::HashMap;
use crate::metrics::{ColumnHeader, MetricValue};
use compact_str::CompactString;
use std::collections::BTreeMap;

/// Metric key to value for one sample.
pub type MetricRecord = HashMap<CompactString, MetricValue>;

/// Sample identifier to record, ordered by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleTable {
    samples: BTreeMap<String, MetricRecord>,
}

impl SampleTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sample, returning the record it replaced.
    pub fn insert(&mut self, name: impl Into<String>, record: MetricRecord) -> Option<MetricRecord> {
        self.samples.insert(name.into(), record)
    }

    /// The record for `name`, created empty when missing.
    pub fn record_mut(&mut self, name: &str) -> &mut MetricRecord {
        self.samples.entry(name.to_string()).or_default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MetricRecord> {
        self.samples.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.samples.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricRecord)> {
        self.samples.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Whether any sample has a value for `key`.
    #[must_use]
    pub fn has_metric(&self, key: &str) -> bool {
        self.samples.values().any(|record| record.contains_key(key))
    }
}

/// A finalized table ready for the report generators.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    pub id: String,
    pub title: String,
    pub description: String,
    pub samples: SampleTable,

    /// In display order; only keys present in some record.
    pub columns: Vec<ColumnHeader>,
}

impl MetricTable {
    #[must_use]
    pub fn value(&self, sample: &str, key: &str) -> Option<&MetricValue> {
        self.samples.get(sample)?.get(key)
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnHeader> {
        self.columns.iter().filter(|column| !column.hidden)
    }

    /// Smallest and largest displayed value of a column across samples.
    #[must_use]
    pub fn observed_range(&self, column: &ColumnHeader) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .filter_map(|(_, record)| record.get(column.key.as_str()))
            .filter_map(|value| column.numeric_value(value))
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{HeaderConfig, Modify, Section, TableView};

    fn record(pairs: &[(&str, MetricValue)]) -> MetricRecord {
        pairs.iter().map(|(k, v)| (CompactString::new(k), v.clone())).collect()
    }

    fn table() -> MetricTable {
        let mut samples = SampleTable::new();
        let _ = samples.insert("S2", record(&[("segments", MetricValue::Integer(30)), ("kar", MetricValue::Text("XY".into()))]));
        let _ = samples.insert("S1", record(&[("segments", MetricValue::Integer(10))]));

        let mut header = HeaderConfig::section_defaults(Section::CnvSummary);
        header.modify = Modify::Scale(2.0);
        MetricTable {
            id: "t".into(),
            title: "T".into(),
            description: String::new(),
            samples,
            columns: vec![
                header.to_column("segments", TableView::General),
                HeaderConfig::section_defaults(Section::CnvSummary).to_column("kar", TableView::Module),
            ],
        }
    }

    #[test]
    fn test_samples_are_ordered_by_name() {
        let t = table();
        assert_eq!(t.samples.names().collect::<Vec<_>>(), ["S1", "S2"]);
    }

    #[test]
    fn test_value_lookup() {
        let t = table();
        assert_eq!(t.value("S1", "segments"), Some(&MetricValue::Integer(10)));
        assert_eq!(t.value("S1", "kar"), None);
        assert_eq!(t.value("S3", "segments"), None);
        assert!(t.samples.has_metric("kar"));
        assert!(!t.samples.has_metric("missing"));
    }

    #[test]
    fn test_observed_range_uses_modified_values() {
        let t = table();
        assert_eq!(t.observed_range(&t.columns[0]), Some((20.0, 60.0)));
        assert_eq!(t.observed_range(&t.columns[1]), None);
    }

    #[test]
    fn test_visible_columns() {
        let t = table();
        let visible: Vec<_> = t.visible_columns().map(|c| c.key.as_str()).collect();
        assert_eq!(visible, ["kar"]);
    }

    #[test]
    fn test_record_mut_creates_missing() {
        let mut samples = SampleTable::new();
        let _ = samples.record_mut("S1").insert("k".into(), MetricValue::Integer(1));
        assert_eq!(samples.len(), 1);
        assert!(samples.contains("S1"));
    }
}
