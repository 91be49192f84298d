//! Command-line interface and orchestration for dragen-qc
//!
//! This module implements the CLI commands and ties discovery, ingestion, and
//! reporting together. It handles argument parsing, configuration management, and
//! the high-level workflow.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **cnv**: Collect DRAGEN CNV metric files from one or more directories and report
//!   CNV summary and sex genotyper metrics per sample
//! - **coverage**: Collect DRAGEN coverage metric files and report coverage metrics
//!   per sample and region, plus a side-by-side view per sample
//! - **init**: Generate a default configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. The cnv and coverage commands share one pipeline in
//! the `common` module:
//!
//! 1. Initialize logging and load configuration
//! 2. Walk the given directories for candidate files
//! 3. Ingest each file into a batch for the command's metrics module
//! 4. Finalize the batch, applying sample-name cleaning and ignore patterns
//! 5. Emit the diagnostics report through the logger
//! 6. Generate the requested reports
//!
//! Configuration is a TOML file controlling coverage count units and sample-name
//! handling. Every setting has a default, so the file is optional.

mod cnv;
mod common;
mod config;
mod coverage;
mod host;
mod init;
mod run;

#[cfg(debug_assertions)]
pub use config::Config;

pub use cnv::{CnvArgs, process_cnv};
pub use common::{ColorMode, CommonArgs, LogLevel};
pub use coverage::{CoverageArgs, process_coverage};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
