use super::{DiagnosticKind, DiagnosticsLog, LogFile, MetricRecord, MetricTable, MetricsModule, SampleKey, SampleNames, SampleTable};
use crate::metrics::{HeaderRegistry, TableView};
use std::collections::BTreeMap;

const LOG_TARGET: &str = "     batch";

/// A sample after ignore filtering and name reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSample {
    /// The name the sample is reported under.
    pub name: String,
    pub key: SampleKey,
    pub record: MetricRecord,

    /// Whether cleaning collided with another sample, leaving the raw name in place.
    pub collided: bool,
}

/// Everything a batch produces for the report generators.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Columns for the general statistics table.
    pub general: MetricTable,

    /// The module's own table followed by any extra tables.
    pub sections: Vec<MetricTable>,
    pub headers: HeaderRegistry,
    pub diagnostics: DiagnosticsLog,
    pub data_file_stem: &'static str,
}

impl BatchOutput {
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.general.samples.len()
    }
}

struct IngestedSample {
    key: SampleKey,
    record: MetricRecord,
}

/// Ingestion state for one run of one module.
///
/// Files are fed one at a time through [`Batch::ingest`]; [`Batch::finalize`] consumes the
/// batch and produces immutable tables.
pub struct Batch<M> {
    module: M,
    headers: HeaderRegistry,
    diagnostics: DiagnosticsLog,
    samples: BTreeMap<String, IngestedSample>,
}

impl<M: MetricsModule> Batch<M> {
    #[must_use]
    pub fn new(module: M) -> Self {
        let diagnostics = DiagnosticsLog::new().with_line_forms(module.line_forms());
        Self {
            module,
            headers: HeaderRegistry::new(),
            diagnostics,
            samples: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn module(&self) -> &M {
        &self.module
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderRegistry {
        &self.headers
    }

    #[must_use]
    pub const fn diagnostics(&self) -> &DiagnosticsLog {
        &self.diagnostics
    }

    /// Number of samples accepted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Ingest one file. Returns whether it contributed a sample.
    pub fn ingest(&mut self, file: &LogFile) -> bool {
        let Some(key) = self.module.sample_key(&file.file_name) else {
            log::debug!(target: LOG_TARGET, "Rejecting '{}/{}': unexpected file name", file.directory, file.file_name);
            self.diagnostics.append_file(DiagnosticKind::InvalidFileName, &file.directory, &file.file_name);
            return false;
        };

        let raw_id = key.raw_id();
        if self.samples.contains_key(&raw_id) {
            log::debug!(target: LOG_TARGET, "Rejecting '{}/{}': sample '{raw_id}' already ingested", file.directory, file.file_name);
            self.diagnostics.append_file(DiagnosticKind::DuplicateFileName, &file.directory, &file.file_name);
            return false;
        }

        let record = self.module.parse(file, &mut self.headers, &mut self.diagnostics);
        if record.is_empty() {
            log::debug!(target: LOG_TARGET, "'{}/{}' has no usable lines", file.directory, file.file_name);
            return false;
        }

        log::trace!(target: LOG_TARGET, "Ingested {} metrics for sample '{raw_id}'", record.len());
        let _ = self.samples.insert(raw_id, IngestedSample { key, record });
        true
    }

    /// Filter ignored samples, reconcile cleaned names, and build the output tables.
    #[must_use]
    pub fn finalize(self, names: &dyn SampleNames) -> BatchOutput {
        let Self {
            module,
            headers,
            mut diagnostics,
            samples,
        } = self;

        let mut by_clean_name: BTreeMap<String, Vec<(String, IngestedSample)>> = BTreeMap::new();
        for (raw_id, sample) in samples {
            let clean = module.display_name(&sample.key, names);
            if names.is_ignored(&raw_id) || names.is_ignored(&clean) {
                log::debug!(target: LOG_TARGET, "Ignoring sample '{raw_id}'");
                continue;
            }
            by_clean_name.entry(clean).or_default().push((raw_id, sample));
        }

        let mut resolved = Vec::new();
        for (clean, group) in by_clean_name {
            let collided = group.len() > 1;
            if collided {
                for (raw_id, _) in &group {
                    diagnostics.append(DiagnosticKind::DuplicateCleanSampleName, "", &clean, raw_id.as_str());
                }
            }

            for (raw_id, sample) in group {
                resolved.push(ResolvedSample {
                    name: if collided { raw_id } else { clean.clone() },
                    key: sample.key,
                    record: sample.record,
                    collided,
                });
            }
        }
        revert_clashing_names(&mut resolved, &mut diagnostics);
        resolved.sort_by(|a, b| a.name.cmp(&b.name));

        let mut samples = SampleTable::new();
        for sample in &resolved {
            let _ = samples.insert(sample.name.clone(), sample.record.clone());
        }

        let general = MetricTable {
            id: format!("{}-general", module.anchor()),
            title: "General statistics".to_string(),
            description: module.description().to_string(),
            columns: headers.columns(TableView::General, |key| samples.has_metric(key)),
            samples: samples.clone(),
        };

        let own = MetricTable {
            id: module.anchor().to_string(),
            title: module.section_title().to_string(),
            description: module.description().to_string(),
            columns: headers.columns(TableView::Module, |key| samples.has_metric(key)),
            samples,
        };

        let mut sections = vec![own];
        sections.extend(module.extra_tables(&resolved, &headers, names));

        log::info!(
            target: LOG_TARGET,
            "{}: {} samples, {} metrics",
            module.name(),
            general.samples.len(),
            headers.len()
        );

        BatchOutput {
            general,
            sections,
            headers,
            diagnostics,
            data_file_stem: module.data_file_stem(),
        }
    }
}

/// A cleaned name can still equal a raw name kept by an earlier collision. Every sample
/// sharing such a name falls back to its raw identifier, which is unique.
fn revert_clashing_names(resolved: &mut [ResolvedSample], diagnostics: &mut DiagnosticsLog) {
    loop {
        let mut by_name: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (index, sample) in resolved.iter().enumerate() {
            by_name.entry(sample.name.as_str()).or_default().push(index);
        }

        let clashes: Vec<(String, Vec<usize>)> = by_name
            .into_iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|(name, indices)| (name.to_string(), indices))
            .collect();
        if clashes.is_empty() {
            return;
        }

        for (name, indices) in clashes {
            for index in indices {
                let sample = &mut resolved[index];
                let raw_id = sample.key.raw_id();
                log::debug!(target: LOG_TARGET, "Sample '{raw_id}' clashes with another sample named '{name}'");
                diagnostics.append(DiagnosticKind::DuplicateCleanSampleName, "", &name, raw_id.as_str());
                sample.name = raw_id;
                sample.collided = true;
            }
        }
    }
}
