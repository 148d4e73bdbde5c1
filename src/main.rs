use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rxplay::{
    config::{Cli, PlaygroundConfig},
    playground::{Playground, TracingSink},
};

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match PlaygroundConfig::try_from(Cli::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("rxplay: {e}");
            return ExitCode::from(2);
        }
    };
    init_tracing(&config.log_level);

    let mut playground = Playground::new(config.feed(), TracingSink);

    if let Err(e) = playground.run(config.demo) {
        tracing::error!(error = %e, "demo could not start");
        return ExitCode::FAILURE;
    }

    tokio::select! {
        finished = playground.finish() => {
            if let Err(e) = finished {
                tracing::error!(error = %e, "producing task failed");
                return ExitCode::FAILURE;
            }
            tracing::info!("demo finished");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted");
        }
    }
    ExitCode::SUCCESS
}
