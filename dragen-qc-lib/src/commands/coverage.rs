use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::ingest::CoverageModule;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct CoverageArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn process_coverage<H: Host>(host: &mut H, args: &CoverageArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    let module = CoverageModule::new(common.config.count_units());
    common.process(module)
}
