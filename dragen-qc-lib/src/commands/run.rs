//! Command dispatch logic for dragen-qc

use super::{CnvArgs, CoverageArgs, InitArgs, init_config, process_cnv, process_coverage};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use std::io::Write;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "dragen-qc", bin_name = "dragen-qc", version, author, long_about = None)]
#[command(about = "Collect DRAGEN CNV and coverage metrics into QC reports")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: QcSubcommand,
}

#[derive(Subcommand, Debug)]
enum QcSubcommand {
    /// Collect `*.cnv_metrics.csv` files and report CNV and sex genotyper metrics
    Cnv(Box<CnvArgs>),
    /// Collect `*_coverage_metrics*.csv` files and report coverage metrics per region
    Coverage(Box<CoverageArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if the executed command fails
pub fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            // help and version requests are not errors
            let text = e.render().to_string();
            if e.use_stderr() {
                let _ = write!(host.error(), "{text}");
            } else {
                let _ = write!(host.output(), "{text}");
            }
            host.exit(e.exit_code());
            return Ok(());
        }
    };

    match &cli.command {
        QcSubcommand::Cnv(cnv_args) => process_cnv(host, cnv_args),
        QcSubcommand::Coverage(coverage_args) => process_coverage(host, coverage_args),
        QcSubcommand::Init(init_args) => init_config(host, init_args),
    }
}
