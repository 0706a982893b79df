//! Care Analysis command line entry point.

use anyhow::Context;
use care_analysis::analysis::Analysis;
use care_analysis::config::{AnalysisConfig, Cli};
use clap::Parser;
use std::io;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = AnalysisConfig::from(Cli::parse());
    log::debug!("Running with {:?}", config);

    let stdout = io::stdout();
    let mut analysis = Analysis::new(&config, stdout.lock());

    match analysis.run() {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            log::debug!("Analysis aborted: {:?}", err);
            analysis
                .report_error(&err)
                .context("failed to write to stdout")?;
            Ok(ExitCode::FAILURE)
        }
    }
}
