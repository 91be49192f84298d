use super::{DiagnosticKind, DiagnosticsLog, LogFile, MetricRecord};
use crate::metrics::{HeaderConfig, HeaderRegistry, MetricValue};
use compact_str::CompactString;

/// Per-file parsing state: the record being built plus the batch's headers and diagnostics.
#[derive(Debug)]
pub struct ParseContext<'a> {
    file: &'a LogFile,
    headers: &'a mut HeaderRegistry,
    diagnostics: &'a mut DiagnosticsLog,
    record: MetricRecord,
}

impl<'a> ParseContext<'a> {
    pub fn new(file: &'a LogFile, headers: &'a mut HeaderRegistry, diagnostics: &'a mut DiagnosticsLog) -> Self {
        Self {
            file,
            headers,
            diagnostics,
            record: MetricRecord::default(),
        }
    }

    /// Coerce a raw value, reporting it as unusual when it is not a number.
    pub fn coerce(&mut self, metric: &str, raw: &str) -> MetricValue {
        let value = MetricValue::coerce(raw);
        if value.is_text() {
            self.report(DiagnosticKind::UnusualValue, format!("{} = {raw}", metric.trim()));
        }
        value
    }

    pub fn unknown_metric(&mut self, item: impl Into<String>) {
        self.report(DiagnosticKind::UnknownMetric, item);
    }

    pub fn invalid_line(&mut self, line: &str) {
        self.report(DiagnosticKind::InvalidFileLine, line);
    }

    /// Store a value and register its header unless the key already has one.
    pub fn insert(&mut self, key: &str, value: MetricValue, make_header: impl FnOnce() -> HeaderConfig) {
        let _ = self.headers.insert_if_absent(key, make_header);
        let _ = self.record.insert(CompactString::new(key), value);
    }

    #[must_use]
    pub fn finish(self) -> MetricRecord {
        self.record
    }

    fn report(&mut self, kind: DiagnosticKind, item: impl Into<String>) {
        self.diagnostics.append(kind, &self.file.directory, &self.file.file_name, item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Section;

    #[test]
    fn test_coerce_reports_text_values() {
        let file = LogFile::new("/d", "f.csv", "");
        let mut headers = HeaderRegistry::new();
        let mut diagnostics = DiagnosticsLog::new();
        let mut ctx = ParseContext::new(&file, &mut headers, &mut diagnostics);

        assert_eq!(ctx.coerce("Segments", "17"), MetricValue::Integer(17));
        assert_eq!(ctx.coerce(" Segments ", "NA"), MetricValue::Text("NA".into()));
        let _ = ctx.finish();

        assert_eq!(diagnostics.items(DiagnosticKind::UnusualValue, "/d", "f.csv").unwrap(), ["Segments = NA"]);
    }

    #[test]
    fn test_insert_registers_header_once() {
        let file = LogFile::new("/d", "f.csv", "");
        let mut headers = HeaderRegistry::new();
        let mut diagnostics = DiagnosticsLog::new();
        let mut ctx = ParseContext::new(&file, &mut headers, &mut diagnostics);

        let header = || HeaderConfig::section_defaults(Section::CnvSummary);
        ctx.insert("k", MetricValue::Integer(1), header);
        ctx.insert("k", MetricValue::Integer(2), || panic!("header must not be rebuilt"));
        let record = ctx.finish();

        assert_eq!(record.get("k"), Some(&MetricValue::Integer(2)));
        assert_eq!(headers.len(), 1);
    }
}
