//! Typed metric values and their presentation metadata
//!
//! Every line of a DRAGEN metric file ends up as one or two [`MetricValue`]s stored
//! under a metric key. Each key also owns exactly one [`HeaderConfig`] describing how
//! report generators present it: title, colour scale, number format, conditional
//! highlighting, a display-time [`Modify`] transform, and its visibility in the general
//! and module tables.
//!
//! # Implementation Model
//!
//! Headers are built in two layers. [`HeaderConfig::section_defaults`] supplies the
//! baseline for a [`Section`], and the static catalog in `metric_def.rs` overlays
//! per-metric overrides for CNV and sex genotyper keys. Coverage metric names vary with
//! the region they describe, so they are instead matched against the ordered rule table
//! in `coverage_rules.rs`, where each rule builds keys and headers from the captured text.
//!
//! Headers are collected into a [`HeaderRegistry`] during ingestion. First sight wins.
//! Once a batch is complete the registry is turned into renderer-facing
//! [`ColumnHeader`]s, one set per [`TableView`].

mod color;
mod coverage_rules;
mod header;
mod metric_def;
mod metric_value;
mod number_format;
mod registry;
mod section;

pub use color::{ColorScale, CondColor, Rgb, css_hex, packed_rgb};
pub use coverage_rules::{CountUnits, RuleColumn, RuleMatch, match_coverage_metric};
pub use header::{
    ColumnHeader, CondPredicate, CondRule, DEFAULT_PRIORITY, HeaderConfig, Modify, PANEL_PRIORITY_OFFSET, SECOND_VALUE_SUFFIX,
    TableView, normalize_metric_key, second_value_key,
};
pub use metric_def::{header_for, lookup, suggest};
pub use metric_value::MetricValue;
pub use number_format::NumberFormat;
pub use registry::HeaderRegistry;
pub use section::Section;

#[cfg(any(debug_assertions, test))]
pub use metric_def::{METRIC_DEFINITIONS, MetricDef};
