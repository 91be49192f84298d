use super::{
    DiagnosticsLog, LineKind, LogFile, MetricLine, MetricRecord, MetricsModule, ParseContext, SampleKey, classify, is_cnv_candidate,
    parse_cnv_file_name,
};
use crate::metrics::{
    HeaderConfig, HeaderRegistry, MetricValue, PANEL_PRIORITY_OFFSET, SECOND_VALUE_SUFFIX, Section, header_for, lookup,
    normalize_metric_key, second_value_key, suggest,
};
use compact_str::{CompactString, format_compact};
use regex::Regex;
use std::sync::LazyLock;

static KARYOTYPE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)[XY]").expect("invalid regex"));

const LINE_FORMS: &[&str] = &[
    "CNV SUMMARY,,<metric>,<value1> or",
    "CNV SUMMARY,,<metric>,<value1>,<value2> or",
    "SEX GENOTYPER,,<metric>,<value1>,<value2>",
];

pub const KARYOTYPE_KEY: &str = "Karyotype";
pub const CONFIDENCE_KEY: &str = "Confidence";

/// `*.cnv_metrics*.csv` files: `CNV SUMMARY` and `SEX GENOTYPER` rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct CnvModule;

impl MetricsModule for CnvModule {
    fn name(&self) -> &'static str {
        "cnv"
    }

    fn line_forms(&self) -> &'static [&'static str] {
        LINE_FORMS
    }

    fn is_candidate(&self, file_name: &str) -> bool {
        is_cnv_candidate(file_name)
    }

    fn sample_key(&self, file_name: &str) -> Option<SampleKey> {
        parse_cnv_file_name(file_name)
    }

    fn parse(&self, file: &LogFile, headers: &mut HeaderRegistry, diagnostics: &mut DiagnosticsLog) -> MetricRecord {
        let mut ctx = ParseContext::new(file, headers, diagnostics);
        let mut karyotype_rows = 0;
        let mut genotype_rows = 0;

        for line in file.contents.lines() {
            match classify(line) {
                LineKind::Blank => {}
                LineKind::Invalid => ctx.invalid_line(line),
                LineKind::Metric(m) => match Section::recognize(m.section) {
                    Some(Section::CnvSummary) => summary_row(&mut ctx, &m),
                    Some(Section::SexGenotyper) if KARYOTYPE_REGEX.is_match(m.value1) => {
                        karyotype_row(&mut ctx, &m, karyotype_rows);
                        karyotype_rows += 1;
                    }
                    Some(Section::SexGenotyper) => {
                        genotype_row(&mut ctx, &m, genotype_rows);
                        genotype_rows += 1;
                    }
                    _ => ctx.invalid_line(line),
                },
            }
        }

        ctx.finish()
    }

    fn section_title(&self) -> &'static str {
        "CNV metrics"
    }

    fn anchor(&self) -> &'static str {
        "dragen-cnv-metrics"
    }

    fn description(&self) -> &'static str {
        "Summary metrics from the DRAGEN copy number variant caller, including the estimated sex karyotype."
    }

    fn data_file_stem(&self) -> &'static str {
        "dragen_cnv_metrics"
    }
}

fn summary_row(ctx: &mut ParseContext<'_>, m: &MetricLine<'_>) {
    let metric = m.metric.trim();
    let key = normalize_metric_key(metric);
    check_known(ctx, &key, metric);

    let value = ctx.coerce(metric, m.value1);
    ctx.insert(&key, value, || header_for(Section::CnvSummary, &key, metric));

    if let Some(raw) = m.value2() {
        let key2 = second_value_key(&key);
        let metric2 = format!("{metric}{SECOND_VALUE_SUFFIX}");
        check_known(ctx, &key2, &metric2);

        let value = ctx.coerce(&metric2, raw);
        ctx.insert(&key2, value, || header_for(Section::CnvSummary, &key2, &metric2));
    }
}

fn check_known(ctx: &mut ParseContext<'_>, key: &str, metric: &str) {
    if lookup(Section::CnvSummary, key).is_some() {
        return;
    }

    match suggest(Section::CnvSummary, key) {
        Some(known) => ctx.unknown_metric(format!("{metric} (closest known metric: '{known}')")),
        None => ctx.unknown_metric(metric),
    }
}

/// The first karyotype row is the case sample; each later one is a panel-of-normals sample.
fn karyotype_row(ctx: &mut ParseContext<'_>, m: &MetricLine<'_>, index: u32) {
    let (karyotype_key, confidence_key) = if index == 0 {
        (CompactString::new(KARYOTYPE_KEY), CompactString::new(CONFIDENCE_KEY))
    } else {
        (format_compact!("{KARYOTYPE_KEY} panel {index}"), format_compact!("{CONFIDENCE_KEY} panel {index}"))
    };

    ctx.insert(&karyotype_key, MetricValue::Text(m.value1.into()), || karyotype_header(index));

    if let Some(raw) = m.value2() {
        let value = ctx.coerce(&confidence_key, raw);
        ctx.insert(&confidence_key, value, || confidence_header(index));
    }
}

fn karyotype_header(index: u32) -> HeaderConfig {
    let mut header = header_for(Section::SexGenotyper, "karyotype", "karyotype");
    if index > 0 {
        header.title = format_compact!("Kar P{index}");
        header.description = format_compact!("Estimated sex karyotype for panel-of-normals sample {index}.");
        header.priority = PANEL_PRIORITY_OFFSET + 2 * index;
    }
    header
}

fn confidence_header(index: u32) -> HeaderConfig {
    let mut header = header_for(Section::SexGenotyper, "confidence", "confidence");
    if index > 0 {
        header.title = format_compact!("KarConf P{index}");
        header.description = format_compact!("Karyotype confidence for panel-of-normals sample {index}.");
        header.priority = PANEL_PRIORITY_OFFSET + 2 * index + 1;
    }
    header
}

/// A sex genotyper row without a karyotype call, keyed by its own metric field.
fn genotype_row(ctx: &mut ParseContext<'_>, m: &MetricLine<'_>, index: u32) {
    let metric = m.metric.trim();
    let key = if index == 0 {
        format_compact!("{metric}_CNV_metrics")
    } else {
        format_compact!("{metric}_CNV_metrics{index}")
    };

    let value = ctx.coerce(&key, m.value1);
    ctx.insert(&key, value, || header_for(Section::SexGenotyper, &key, &key));

    if let Some(raw) = m.value2() {
        let key2 = second_value_key(&key);
        let value = ctx.coerce(&key2, raw);
        ctx.insert(&key2, value, || header_for(Section::SexGenotyper, &key2, &key2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::DiagnosticKind;
    use crate::metrics::{DEFAULT_PRIORITY, Modify};

    fn parse(contents: &str) -> (MetricRecord, HeaderRegistry, DiagnosticsLog) {
        let file = LogFile::new("/d", "S1.cnv_metrics.csv", contents);
        let mut headers = HeaderRegistry::new();
        let mut diagnostics = DiagnosticsLog::new();
        let record = CnvModule.parse(&file, &mut headers, &mut diagnostics);
        (record, headers, diagnostics)
    }

    #[test]
    fn test_summary_and_karyotype() {
        let (record, headers, diagnostics) = parse("CNV SUMMARY,,Number of Segments,17\nSEX GENOTYPER,,S1,XX,0.99\n");
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("number of segments"), Some(&MetricValue::Integer(17)));
        assert_eq!(record.get(KARYOTYPE_KEY), Some(&MetricValue::Text("XX".into())));
        assert_eq!(record.get(CONFIDENCE_KEY), Some(&MetricValue::Float(0.99)));
        assert_eq!(headers.len(), 3);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_second_value_key() {
        let (record, headers, _) = parse("CNV SUMMARY,,Number of filtered records (duplicates),1000,12.5");
        assert_eq!(record.get("number of filtered records (duplicates)"), Some(&MetricValue::Integer(1000)));
        assert_eq!(
            record.get("number of filtered records (duplicates)(second value)"),
            Some(&MetricValue::Float(12.5))
        );
        let header = headers.get("number of filtered records (duplicates)(second value)").unwrap();
        assert_eq!(header.title, "Duplicates%");
    }

    #[test]
    fn test_catalog_header_applies_modify() {
        let (_, headers, _) = parse("CNV SUMMARY,,Number of alignment records,3000000");
        assert_eq!(headers.get("number of alignment records").unwrap().modify, Modify::MILLIONS);
    }

    #[test]
    fn test_unknown_metric_is_reported_with_suggestion() {
        let (record, headers, diagnostics) = parse("CNV SUMMARY,,Number of Segmnts,5\nCNV SUMMARY,,Brand new thing,1");
        assert_eq!(record.len(), 2);
        assert_eq!(headers.get("brand new thing").unwrap().title, "Brand new thing");
        assert_eq!(
            diagnostics.items(DiagnosticKind::UnknownMetric, "/d", "S1.cnv_metrics.csv").unwrap(),
            [
                "Number of Segmnts (closest known metric: 'number of segments')",
                "Brand new thing"
            ]
        );
    }

    #[test]
    fn test_unusual_value() {
        let (record, _, diagnostics) = parse("CNV SUMMARY,,Number of Segments,NA");
        assert_eq!(record.get("number of segments"), Some(&MetricValue::Text("NA".into())));
        assert_eq!(
            diagnostics.items(DiagnosticKind::UnusualValue, "/d", "S1.cnv_metrics.csv").unwrap(),
            ["Number of Segments = NA"]
        );
    }

    #[test]
    fn test_panel_of_normals_rows() {
        let (record, headers, _) = parse("SEX GENOTYPER,,Case,XY,0.98\nSEX GENOTYPER,,PON1,XX,0.97\nSEX GENOTYPER,,PON2,XY,0.95");
        assert_eq!(record.get("Karyotype"), Some(&MetricValue::Text("XY".into())));
        assert_eq!(record.get("Karyotype panel 1"), Some(&MetricValue::Text("XX".into())));
        assert_eq!(record.get("Confidence panel 2"), Some(&MetricValue::Float(0.95)));

        assert_eq!(headers.get("Karyotype").unwrap().priority, DEFAULT_PRIORITY);
        assert_eq!(headers.get("Karyotype panel 1").unwrap().priority, PANEL_PRIORITY_OFFSET + 2);
        assert_eq!(headers.get("Confidence panel 1").unwrap().priority, PANEL_PRIORITY_OFFSET + 3);
        assert_eq!(headers.get("Karyotype panel 2").unwrap().title, "Kar P2");
    }

    #[test]
    fn test_karyotype_is_not_coerced() {
        let (_, _, diagnostics) = parse("SEX GENOTYPER,,S1,XXY,0.5");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_non_karyotype_genotype_rows() {
        let (record, _, diagnostics) = parse("SEX GENOTYPER,,S1,0.5,1\nSEX GENOTYPER,,S1,NA");
        assert_eq!(record.get("S1_CNV_metrics"), Some(&MetricValue::Float(0.5)));
        assert_eq!(record.get("S1_CNV_metrics(second value)"), Some(&MetricValue::Integer(1)));
        assert_eq!(record.get("S1_CNV_metrics1"), Some(&MetricValue::Text("NA".into())));
        assert_eq!(diagnostics.count(DiagnosticKind::UnusualValue), 1);
    }

    #[test]
    fn test_other_sections_are_invalid_lines() {
        let (record, _, diagnostics) = parse("COVERAGE SUMMARY,,Aligned bases,1\n\n   \nbad");
        assert!(record.is_empty());
        assert_eq!(diagnostics.count(DiagnosticKind::InvalidFileLine), 2);
    }

    #[test]
    fn test_file_names() {
        assert_eq!(CnvModule.sample_key("S1.cnv_metrics.csv").unwrap().raw_id(), "S1");
        assert!(CnvModule.sample_key("S1.csv").is_none());
        assert!(CnvModule.is_candidate("S1.cnv_metrics.csv"));
    }
}
