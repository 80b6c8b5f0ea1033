use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::app::App;

mod cli;
mod ui;

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();
    init_tracing(app.verbose);
    app.run().await
}

/// `--verbose` wins over `RUST_LOG`; without either only warnings are shown.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
