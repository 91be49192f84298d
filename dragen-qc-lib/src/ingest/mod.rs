//! Ingestion of DRAGEN metric files into per-sample tables
//!
//! A run of one module goes through three stages:
//!
//! 1. [`discover`] walks the input directories and reads every candidate file into a
//!    [`LogFile`].
//! 2. A [`Batch`] ingests the files one at a time. The module's strict file-name grammar
//!    yields a [`SampleKey`]; duplicates of an already ingested sample are rejected; each
//!    line is matched against the line grammar, coerced, and stored in the sample's
//!    [`MetricRecord`] while its header is registered once in the batch's
//!    [`HeaderRegistry`](crate::metrics::HeaderRegistry).
//! 3. [`Batch::finalize`] applies the [`SampleNames`] policy (ignore list, cleaning, and
//!    collision reconciliation) and produces immutable [`MetricTable`]s.
//!
//! Nothing here fails. Every anomaly is recorded in the batch's [`DiagnosticsLog`], which
//! is rendered once at the end of the run.
//!
//! The two file kinds are implemented as [`MetricsModule`]s: [`CnvModule`] and
//! [`CoverageModule`].

mod batch;
mod cnv;
mod coverage;
mod diagnostics;
mod discovery;
mod file_name;
mod line_grammar;
mod log_file;
mod metrics_module;
mod parse_context;
mod sample_names;
mod sample_table;

pub use batch::{Batch, BatchOutput, ResolvedSample};
pub use cnv::{CONFIDENCE_KEY, CnvModule, KARYOTYPE_KEY};
pub use coverage::CoverageModule;
pub use diagnostics::{DiagnosticKind, DiagnosticsLog, Severity};
pub use discovery::discover;
pub use file_name::{SampleKey, is_cnv_candidate, is_coverage_candidate, parse_cnv_file_name, parse_coverage_file_name};
pub use line_grammar::{LineKind, MetricLine, classify};
pub use log_file::LogFile;
pub use metrics_module::MetricsModule;
pub use parse_context::ParseContext;
pub use sample_names::{ConfiguredNames, DragenNames, IdentityNames, NameCleaning, SampleNames, clean_phenotype};
pub use sample_table::{MetricRecord, MetricTable, SampleTable};
