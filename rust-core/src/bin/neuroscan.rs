use std::process::ExitCode;

use clap::Parser;

use neuroscan::api::{self, Cli};
use neuroscan::common::{log, ScanCfg};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match ScanCfg::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("neuroscan: {err}");
            return ExitCode::from(err.code().as_u32() as u8);
        }
    };
    log::init(&cfg);

    match api::run(cli, cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("neuroscan: {err:#}");
            ExitCode::from(api::exit_code(&err))
        }
    }
}
