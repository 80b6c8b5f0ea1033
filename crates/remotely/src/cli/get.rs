use anyhow::Result;
use clap::Args;
use futures_util::StreamExt;
use remotely_data::RemoteData;
use remotely_fetch::{HttpResponse, ReqwestClient, from_request};

use crate::cli::request::{RequestArgs, describe};

#[derive(Clone, Debug, Args)]
pub struct GetArg {
    /// URL to fetch.
    pub url: String,

    #[command(flatten)]
    pub request: RequestArgs,
}

impl GetArg {
    pub async fn run(self) -> Result<()> {
        let stream = from_request(ReqwestClient::new(), self.url, self.request.options());

        let mut states = stream.subscribe();
        while let Some(state) = states.next().await {
            println!("{}", describe(&state, |response| response.status().to_string()));
            if let RemoteData::Failed(error) = state {
                return Err(error.into());
            }
        }
        Ok(())
    }
}
