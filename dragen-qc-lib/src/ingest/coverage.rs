use super::{
    DiagnosticsLog, LineKind, LogFile, MetricLine, MetricRecord, MetricTable, MetricsModule, ParseContext, ResolvedSample, SampleKey,
    SampleNames, SampleTable, classify, clean_phenotype, is_coverage_candidate, parse_coverage_file_name,
};
use crate::metrics::{
    CountUnits, HeaderRegistry, RuleColumn, RuleMatch, SECOND_VALUE_SUFFIX, Section, TableView, header_for, match_coverage_metric,
    normalize_metric_key, second_value_key,
};
use compact_str::format_compact;

const LINE_FORMS: &[&str] = &["COVERAGE SUMMARY,,<metric>,<value1> or", "COVERAGE SUMMARY,,<metric>,<value1>,<value2>"];

/// `*_coverage_metrics*.csv` files: `COVERAGE SUMMARY` rows over a region.
#[derive(Debug, Clone, Default)]
pub struct CoverageModule {
    units: CountUnits,
}

impl CoverageModule {
    #[must_use]
    pub const fn new(units: CountUnits) -> Self {
        Self { units }
    }

    fn metric_row(&self, ctx: &mut ParseContext<'_>, m: &MetricLine<'_>) {
        let metric = m.metric.trim();
        let value = ctx.coerce(metric, m.value1);
        let second = m.value2().map(|raw| {
            let metric2 = format!("{metric}{SECOND_VALUE_SUFFIX}");
            ctx.coerce(&metric2, raw)
        });

        let (first_key, second_column) = match match_coverage_metric(metric, &self.units) {
            Some(RuleMatch {
                first: RuleColumn { key, header },
                second,
            }) => {
                ctx.insert(&key, value, || header);
                (key, second)
            }
            None => {
                ctx.unknown_metric(metric);
                let key = normalize_metric_key(metric);
                ctx.insert(&key, value, || header_for(Section::CoverageSummary, &key, metric));
                (key, None)
            }
        };

        let Some(value2) = second else {
            return;
        };

        match second_column {
            Some(RuleColumn { key, header }) => ctx.insert(&key, value2, || header),
            None => {
                let key2 = second_value_key(&first_key);
                let metric2 = format!("{metric}{SECOND_VALUE_SUFFIX}");
                ctx.insert(&key2, value2, || header_for(Section::CoverageSummary, &key2, &metric2));
            }
        }
    }
}

impl MetricsModule for CoverageModule {
    fn name(&self) -> &'static str {
        "coverage"
    }

    fn line_forms(&self) -> &'static [&'static str] {
        LINE_FORMS
    }

    fn is_candidate(&self, file_name: &str) -> bool {
        is_coverage_candidate(file_name)
    }

    fn sample_key(&self, file_name: &str) -> Option<SampleKey> {
        parse_coverage_file_name(file_name)
    }

    fn parse(&self, file: &LogFile, headers: &mut HeaderRegistry, diagnostics: &mut DiagnosticsLog) -> MetricRecord {
        let mut ctx = ParseContext::new(file, headers, diagnostics);

        for line in file.contents.lines() {
            match classify(line) {
                LineKind::Blank => {}
                LineKind::Metric(m) if Section::recognize(m.section) == Some(Section::CoverageSummary) => self.metric_row(&mut ctx, &m),
                LineKind::Metric(_) | LineKind::Invalid => ctx.invalid_line(line),
            }
        }

        ctx.finish()
    }

    /// `<sample>_<phenotype>`, each part cleaned on its own.
    fn display_name(&self, key: &SampleKey, names: &dyn SampleNames) -> String {
        let sample = names.clean(&key.sample);
        let phenotype = key.phenotype.as_deref().map(clean_phenotype).unwrap_or_default();
        if phenotype.is_empty() { sample } else { format!("{sample}_{phenotype}") }
    }

    fn section_title(&self) -> &'static str {
        "Coverage metrics"
    }

    fn anchor(&self) -> &'static str {
        "dragen-cov-metrics"
    }

    fn description(&self) -> &'static str {
        "Coverage metrics over a region, where the region can be a target region, a QC coverage region, or the whole genome."
    }

    fn data_file_stem(&self) -> &'static str {
        "dragen_cov_metrics"
    }

    /// One row per sample with a column per phenotype and metric.
    fn extra_tables(&self, samples: &[ResolvedSample], headers: &HeaderRegistry, names: &dyn SampleNames) -> Vec<MetricTable> {
        let mut table = SampleTable::new();
        let mut by_sample_headers = HeaderRegistry::new();

        for sample in samples {
            let name = if sample.collided {
                sample.key.sample.clone()
            } else {
                names.clean(&sample.key.sample)
            };
            let phenotype = sample.key.phenotype.as_deref().map(clean_phenotype).unwrap_or_default();
            let row = table.record_mut(&name);

            for (key, header) in headers.iter() {
                let Some(value) = sample.record.get(key) else {
                    continue;
                };

                if phenotype.is_empty() {
                    let _ = row.entry(key.into()).or_insert_with(|| value.clone());
                    let _ = by_sample_headers.insert_if_absent(key, || header.clone());
                } else {
                    let combined = format_compact!("{phenotype} {key}");
                    let _ = row.entry(combined.clone()).or_insert_with(|| value.clone());
                    let _ = by_sample_headers.insert_if_absent(&combined, || {
                        let mut header = header.clone();
                        header.title = format_compact!("{} {phenotype}", header.title);
                        header.hidden = false;
                        header.hidden_in_own_table = false;
                        header
                    });
                }
            }
        }

        let columns = by_sample_headers.columns(TableView::Module, |key| table.has_metric(key));
        vec![MetricTable {
            id: "dragen-cov-metrics-by-sample".to_string(),
            title: "Coverage metrics by sample".to_string(),
            description: "Coverage metrics of every phenotype side by side, one row per sample.".to_string(),
            samples: table,
            columns,
        }]
    }
}
