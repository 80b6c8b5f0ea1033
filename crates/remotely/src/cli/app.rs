use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::cli::{get, json, upload};

#[derive(Clone, Debug, Parser)]
#[command(name = "remotely", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Overrides RUST_LOG.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "g", name = "get", about = "Fetch a URL and print every state of the request")]
    Get(get::GetArg),
    #[command(alias = "j", name = "json", about = "Fetch a URL and print its JSON body")]
    Json(json::JsonArg),
    #[command(alias = "up", name = "upload", about = "POST a file and show transfer progress")]
    Upload(upload::UploadArg),
}

impl App {
    pub async fn run(self) -> Result<()> {
        match self.cmd {
            Commands::Get(arg) => arg.run().await,
            Commands::Json(arg) => arg.run().await,
            Commands::Upload(arg) => arg.run().await,
        }
    }
}
