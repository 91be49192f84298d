#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for dragen-qc
//!
//! This library consolidates all functionality for the dragen-qc tool, which collects
//! DRAGEN CNV and coverage metric files into per-sample QC tables.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`ingest`]: File discovery, line parsing, sample aggregation, and diagnostics
//! - [`metrics`]: Typed metric values, the metric catalog, and column headers
//! - [`reports`]: Report generation in multiple formats

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
pub type HashSet<T> = rustc_hash::FxHashSet<T>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod ingest;
#[cfg(not(any(debug_assertions, test)))]
mod ingest;

#[cfg(any(debug_assertions, test))]
pub mod metrics;
#[cfg(not(any(debug_assertions, test)))]
mod metrics;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

pub use crate::commands::{Host, run};
