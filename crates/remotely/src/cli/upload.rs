use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use futures_util::StreamExt;
use remotely_data::RemoteData;
use remotely_fetch::{Method, ReqwestTransport, from_tracked_request};
use tracing::info;

use crate::cli::request::RequestArgs;
use crate::ui::tracker::{ProgressTrackerBuilder, Tracker, TrackerBuilder};

#[derive(Clone, Debug, Args)]
pub struct UploadArg {
    /// URL the file is posted to.
    pub url: String,

    /// File sent as the request body.
    pub file: PathBuf,

    #[command(flatten)]
    pub request: RequestArgs,
}

impl UploadArg {
    pub async fn run(self) -> Result<()> {
        let body = tokio::fs::read(&self.file)
            .await
            .with_context(|| format!("failed to read {}", self.file.display()))?;
        info!(file = %self.file.display(), bytes = body.len(), "uploading");

        let tracker = ProgressTrackerBuilder::default()
            .with_len(body.len() as u64)
            .with_prefix("Transfer")
            .with_finish("done")
            .build();

        let config = self.request.tracked(&self.url).method(Method::Post).body(body);
        let stream = from_tracked_request(ReqwestTransport::new(), config);

        let mut states = stream.subscribe();
        while let Some(state) = states.next().await {
            match state {
                RemoteData::InProgress(Some(progress)) => {
                    tracker.step(progress);
                }
                RemoteData::InProgress(None) | RemoteData::Uninitiated => {}
                RemoteData::Succeeded(response) => {
                    tracker.finish();
                    println!("{} {}", response.status, response.text());
                    return Ok(());
                }
                RemoteData::Failed(error) => {
                    tracker.abandon(&error.to_string());
                    return Err(error.into());
                }
            }
        }
        bail!("upload of {} ended without a response", self.file.display())
    }
}
