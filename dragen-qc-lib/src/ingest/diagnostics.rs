use core::fmt::Write;
use std::collections::BTreeMap;
use strum::{EnumIter, IntoEnumIterator};

const LOG_TARGET: &str = "diagnostic";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Categories of anomalies found while ingesting a batch, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum DiagnosticKind {
    DuplicateFileName,
    DuplicateCleanSampleName,
    InvalidFileName,
    InvalidFileLine,
    UnknownMetric,
    UnusualValue,
}

impl DiagnosticKind {
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::DuplicateFileName | Self::DuplicateCleanSampleName | Self::InvalidFileName | Self::InvalidFileLine => Severity::Error,
            Self::UnknownMetric | Self::UnusualValue => Severity::Warning,
        }
    }

    /// Whether every occurrence is listed, rather than each distinct item once.
    #[must_use]
    pub const fn lists_every_occurrence(self) -> bool {
        matches!(self, Self::InvalidFileLine | Self::UnusualValue)
    }
}

type FileItems = BTreeMap<String, Vec<String>>;

/// Anomalies collected over one batch, grouped by category, directory, and file.
///
/// Items within a file keep their insertion order. Invalid lines and unusual values are listed
/// per occurrence; other repeated items are stored once.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsLog {
    entries: BTreeMap<DiagnosticKind, BTreeMap<String, FileItems>>,
    line_forms: &'static [&'static str],
}

impl DiagnosticsLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Line shapes quoted in the invalid-line section of the report.
    #[must_use]
    pub fn with_line_forms(mut self, line_forms: &'static [&'static str]) -> Self {
        self.line_forms = line_forms;
        self
    }

    pub fn append(&mut self, kind: DiagnosticKind, directory: &str, file: &str, item: impl Into<String>) {
        let items = self.file_items(kind, directory, file);
        let item = item.into();
        if kind.lists_every_occurrence() || !items.contains(&item) {
            items.push(item);
        }
    }

    /// Record a file without any per-file items, e.g. a rejected file name.
    pub fn append_file(&mut self, kind: DiagnosticKind, directory: &str, file: &str) {
        let _ = self.file_items(kind, directory, file);
    }

    fn file_items(&mut self, kind: DiagnosticKind, directory: &str, file: &str) -> &mut Vec<String> {
        self.entries
            .entry(kind)
            .or_default()
            .entry(directory.to_string())
            .or_default()
            .entry(file.to_string())
            .or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries.keys().any(|kind| kind.severity() == Severity::Error)
    }

    /// Number of recorded entries of a kind; a file without items counts once.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.get(&kind).map_or(0, |dirs| {
            dirs.values().flat_map(BTreeMap::values).map(|items| items.len().max(1)).sum()
        })
    }

    /// Items recorded for one file.
    #[must_use]
    pub fn items(&self, kind: DiagnosticKind, directory: &str, file: &str) -> Option<&[String]> {
        self.entries.get(&kind)?.get(directory)?.get(file).map(Vec::as_slice)
    }

    /// The full human-readable report; empty when nothing was recorded.
    #[must_use]
    pub fn render(&self) -> String {
        DiagnosticKind::iter()
            .filter_map(|kind| self.render_kind(kind))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Send every non-empty category through the log facade at its severity.
    pub fn emit(&self) {
        for kind in DiagnosticKind::iter() {
            if let Some(section) = self.render_kind(kind) {
                match kind.severity() {
                    Severity::Error => log::error!(target: LOG_TARGET, "{section}"),
                    Severity::Warning => log::warn!(target: LOG_TARGET, "{section}"),
                }
            }
        }
    }

    fn render_kind(&self, kind: DiagnosticKind) -> Option<String> {
        let dirs = self.entries.get(&kind)?;
        let mut out = self.preamble(kind);

        for (directory, files) in dirs {
            if kind == DiagnosticKind::DuplicateCleanSampleName {
                // stored as "" -> cleaned name -> raw names
                for (clean, raws) in files {
                    let _ = write!(out, "\n  {clean} is formed from:");
                    for raw in raws {
                        let _ = write!(out, "\n    {raw}");
                    }
                }
                continue;
            }

            let _ = write!(out, "\n  {directory}:");
            for (file, items) in files {
                if items.is_empty() {
                    let _ = write!(out, "\n    {file}");
                } else {
                    let _ = write!(out, "\n    {file}:");
                    for item in items {
                        let _ = write!(out, "\n      {item}");
                    }
                }
            }
        }

        Some(out)
    }

    fn preamble(&self, kind: DiagnosticKind) -> String {
        match kind {
            DiagnosticKind::DuplicateFileName => "The following duplicates were found:".to_string(),
            DiagnosticKind::DuplicateCleanSampleName => {
                "The following sample names are left as they are because their cleaned versions are duplicates:".to_string()
            }
            DiagnosticKind::InvalidFileName => "The following files have names that do not match the expected pattern:".to_string(),
            DiagnosticKind::InvalidFileLine => {
                if self.line_forms.is_empty() {
                    "The following files contain invalid lines:".to_string()
                } else {
                    format!(
                        "The lines in files must be:\n{}\n\nThe following files contain invalid lines:",
                        self.line_forms.join("\n")
                    )
                }
            }
            DiagnosticKind::UnknownMetric => "The following files contain unknown metrics:".to_string(),
            DiagnosticKind::UnusualValue => {
                "All metric values except integers and floats are non-standard.\nThe following files contain non-standard values:".to_string()
            }
        }
    }
}
