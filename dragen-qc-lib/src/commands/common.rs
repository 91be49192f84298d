//! Common processing logic shared between the cnv and coverage commands.

use super::Host;
use super::config::Config;
use crate::Result;
use crate::ingest::{Batch, BatchOutput, MetricsModule, discover};
use crate::reports::{generate_console, generate_csv, generate_html, generate_json, generate_xlsx};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use clap::Args;
use clap::ValueEnum;
use ohno::IntoAppError;
use std::fs;
use std::io::Write;

const LOG_TARGET: &str = "    common";

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Common arguments shared between the cnv and coverage commands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Directories to search for DRAGEN metric files
    #[arg(value_name = "DIR", required = true)]
    pub dirs: Vec<Utf8PathBuf>,

    /// Path to configuration file (default is `dragen-qc.toml` in the current directory)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Output metrics to an Excel spreadsheet file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub excel: Option<Utf8PathBuf>,

    /// Output metrics to an HTML file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub html: Option<Utf8PathBuf>,

    /// Output raw metric values to a CSV file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub csv: Option<Utf8PathBuf>,

    /// Output raw metric values to a JSON file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,

    /// Write a tab-separated data file of raw metric values into this directory
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub data_dir: Option<Utf8PathBuf>,

    /// Output metrics to the console.
    /// If omitted, console output is shown only when no other reports are generated.
    #[arg(long, help_heading = "Report Output")]
    pub console: bool,

    /// Exit with status code 1 if any error-level diagnostic is reported
    #[arg(long)]
    pub strict: bool,
}

pub struct Common<'a, H: Host> {
    pub config: Config,
    host: &'a mut H,
    dirs: Vec<Utf8PathBuf>,
    color: ColorMode,
    strict: bool,
    console: bool,
    html: Option<Utf8PathBuf>,
    excel: Option<Utf8PathBuf>,
    csv: Option<Utf8PathBuf>,
    json: Option<Utf8PathBuf>,
    data_dir: Option<Utf8PathBuf>,
}

impl<'a, H: Host> Common<'a, H> {
    /// Create a new Common processor with logger and config
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded
    pub fn new(host: &'a mut H, args: &CommonArgs) -> Result<Self> {
        Self::init_logging(args.log_level);

        let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;

        Ok(Self {
            config,
            host,
            dirs: args.dirs.clone(),
            color: args.color,
            strict: args.strict,
            console: args.console,
            html: args.html.clone(),
            excel: args.excel.clone(),
            csv: args.csv.clone(),
            json: args.json.clone(),
            data_dir: args.data_dir.clone(),
        })
    }

    /// Initialize logger based on log level
    fn init_logging(log_level: LogLevel) {
        let level = match log_level {
            LogLevel::None => return,
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        // a second command in the same process keeps the first logger
        let _ = env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
            .try_init();
    }

    /// Discover, ingest, and report on every file the module recognizes
    ///
    /// # Errors
    ///
    /// Returns an error if the configured name patterns are invalid, a report cannot be
    /// written, or `--strict` is set and an error-level diagnostic was reported
    pub fn process<M: MetricsModule>(&mut self, module: M) -> Result<()> {
        let names = self.config.sample_names()?;

        for dir in &self.dirs {
            if !dir.is_dir() {
                let _ = writeln!(self.host.error(), "Directory '{dir}' does not exist or is not a directory");
            }
        }

        let files = discover(&self.dirs, |name| module.is_candidate(name), self.config.max_file_size);

        let mut batch = Batch::new(module);
        for file in &files {
            let _ = batch.ingest(file);
        }

        let module_name = batch.module().name();
        let output = batch.finalize(&names);
        output.diagnostics.emit();

        if output.sample_count() == 0 {
            log::info!(target: LOG_TARGET, "No {module_name} samples in {} candidate files", files.len());
            let _ = writeln!(self.host.error(), "No DRAGEN {module_name} metrics found");
        }

        self.report(&output)?;

        if self.strict && output.diagnostics.has_errors() {
            return Err(ohno::AppError::new("one or more error-level diagnostics were reported"));
        }

        Ok(())
    }

    pub fn report(&mut self, output: &BatchOutput) -> Result<()> {
        let generating_reports =
            self.html.is_some() || self.excel.is_some() || self.csv.is_some() || self.json.is_some() || self.data_dir.is_some();

        // Show console output if --console is set, or if no reports are being generated
        if (self.console || !generating_reports) && output.sample_count() > 0 {
            let mut console_output = String::new();
            let use_colors = match self.color {
                ColorMode::Always => true,
                ColorMode::Never => false,
                ColorMode::Auto => {
                    use std::io::{IsTerminal, stdout};
                    stdout().is_terminal()
                }
            };
            generate_console(output, use_colors, &mut console_output)?;
            let _ = write!(self.host.output(), "{console_output}");
        }

        if let Some(filename) = &self.html {
            let mut html = String::new();
            generate_html(output, Local::now(), &mut html)?;
            fs::write(filename, html).into_app_err_with(|| format!("writing HTML report to '{filename}'"))?;
        }

        if let Some(filename) = &self.excel {
            let mut file = fs::File::create(filename).into_app_err_with(|| format!("creating Excel report '{filename}'"))?;
            generate_xlsx(output, &mut file)?;
        }

        if let Some(filename) = &self.csv {
            let mut csv_output = String::new();
            generate_csv(output, b',', &mut csv_output)?;
            fs::write(filename, csv_output).into_app_err_with(|| format!("writing CSV report to '{filename}'"))?;
        }

        if let Some(filename) = &self.json {
            let mut json_output = String::new();
            generate_json(output, &mut json_output)?;
            fs::write(filename, json_output).into_app_err_with(|| format!("writing JSON report to '{filename}'"))?;
        }

        if let Some(dir) = &self.data_dir {
            fs::create_dir_all(dir).into_app_err_with(|| format!("creating data directory '{dir}'"))?;
            let filename = dir.join(format!("{}.tsv", output.data_file_stem));
            let mut tsv_output = String::new();
            generate_csv(output, b'\t', &mut tsv_output)?;
            fs::write(&filename, tsv_output).into_app_err_with(|| format!("writing data file '{filename}'"))?;
            log::info!(target: LOG_TARGET, "Wrote data file '{filename}'");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use crate::ingest::CnvModule;

    fn args(dir: &Utf8Path) -> CommonArgs {
        CommonArgs {
            dirs: vec![dir.to_path_buf()],
            config: None,
            color: ColorMode::Never,
            log_level: LogLevel::None,
            excel: None,
            html: None,
            csv: None,
            json: None,
            data_dir: None,
            console: false,
            strict: false,
        }
    }

    fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        (tmp, path)
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_console_output_by_default() {
        let (_tmp, dir) = temp_dir();
        fs::write(dir.join("S1.cnv_metrics.csv"), "CNV SUMMARY,,Number of Segments,17\n").unwrap();

        let mut host = TestHost::new();
        let mut common = Common::new(&mut host, &args(&dir)).unwrap();
        common.process(CnvModule).unwrap();

        let out = host.output_text();
        assert!(out.contains("CNV metrics"));
        assert!(out.contains("Segments : 17"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_data_dir_suppresses_console() {
        let (_tmp, dir) = temp_dir();
        fs::write(dir.join("S1.cnv_metrics.csv"), "CNV SUMMARY,,Number of Segments,17\n").unwrap();
        let data_dir = dir.join("data");

        let mut host = TestHost::new();
        let mut common_args = args(&dir);
        common_args.data_dir = Some(data_dir.clone());
        let mut common = Common::new(&mut host, &common_args).unwrap();
        common.process(CnvModule).unwrap();

        assert!(host.output_text().is_empty());
        let tsv = fs::read_to_string(data_dir.join("dragen_cnv_metrics.tsv")).unwrap();
        assert_eq!(tsv, "Sample\tnumber of segments\nS1\t17\n");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_strict_fails_on_error_diagnostics() {
        let (_tmp, dir) = temp_dir();
        fs::write(dir.join("S1.cnv_metrics.csv"), "not a metric line\n").unwrap();

        let mut host = TestHost::new();
        let mut common_args = args(&dir);
        common_args.strict = true;
        let mut common = Common::new(&mut host, &common_args).unwrap();
        let err = common.process(CnvModule).unwrap_err();

        assert!(err.to_string().contains("error-level diagnostics"));
        assert!(host.error_text().contains("No DRAGEN cnv metrics found"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_missing_directory_is_reported() {
        let (_tmp, dir) = temp_dir();
        let missing = dir.join("missing");

        let mut host = TestHost::new();
        let mut common = Common::new(&mut host, &args(&missing)).unwrap();
        common.process(CnvModule).unwrap();

        assert!(host.error_text().contains("does not exist"));
    }
}
