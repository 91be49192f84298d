use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::ingest::CnvModule;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct CnvArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn process_cnv<H: Host>(host: &mut H, args: &CnvArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    common.process(CnvModule)
}
