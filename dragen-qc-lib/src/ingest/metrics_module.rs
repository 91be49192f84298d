use super::{DiagnosticsLog, LogFile, MetricRecord, MetricTable, ResolvedSample, SampleKey, SampleNames};
use crate::metrics::HeaderRegistry;

/// One kind of DRAGEN metric file and how to ingest it.
pub trait MetricsModule {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Accepted line shapes, quoted when reporting invalid lines.
    fn line_forms(&self) -> &'static [&'static str];

    /// Discovery pre-filter.
    fn is_candidate(&self, file_name: &str) -> bool;

    /// Strict file-name parse; `None` rejects the file.
    fn sample_key(&self, file_name: &str) -> Option<SampleKey>;

    /// Parse a file into a record. An empty record means the file yields no sample.
    fn parse(&self, file: &LogFile, headers: &mut HeaderRegistry, diagnostics: &mut DiagnosticsLog) -> MetricRecord;

    fn display_name(&self, key: &SampleKey, names: &dyn SampleNames) -> String {
        names.clean(&key.raw_id())
    }

    fn section_title(&self) -> &'static str;
    fn anchor(&self) -> &'static str;
    fn description(&self) -> &'static str;

    /// Base name of the flat data dump.
    fn data_file_stem(&self) -> &'static str;

    /// Tables emitted after the module's own table.
    fn extra_tables(&self, _samples: &[ResolvedSample], _headers: &HeaderRegistry, _names: &dyn SampleNames) -> Vec<MetricTable> {
        Vec::new()
    }
}
