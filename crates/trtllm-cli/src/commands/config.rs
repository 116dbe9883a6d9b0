//! `trtllm config`

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use trtllm::ExecutorConfig;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// TOML file layered under TRTLLM__* environment variables
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn handle_config(args: ConfigArgs) -> i32 {
    match render(&args) {
        Ok(rendered) => {
            print!("{}", rendered);
            0
        }
        Err(err) => super::report("config", err),
    }
}

fn render(args: &ConfigArgs) -> anyhow::Result<String> {
    let config = ExecutorConfig::load(args.config.as_deref()).context("loading configuration")?;
    Ok(config.to_toml_string()?)
}
