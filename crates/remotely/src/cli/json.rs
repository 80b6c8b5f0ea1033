use anyhow::Result;
use clap::Args;
use futures_util::StreamExt;
use remotely_data::RemoteData;
use remotely_fetch::{ReqwestClient, from_request_with_json_body};

use crate::cli::request::{RequestArgs, describe};

#[derive(Clone, Debug, Args)]
pub struct JsonArg {
    /// URL to fetch. The response must be `application/json`.
    pub url: String,

    #[command(flatten)]
    pub request: RequestArgs,
}

impl JsonArg {
    /// Print the parsed body on stdout, or the tagged error as JSON.
    ///
    /// Intermediate states go to stderr.
    pub async fn run(self) -> Result<()> {
        let stream = from_request_with_json_body(ReqwestClient::new(), self.url, self.request.options());

        let mut states = stream.subscribe();
        while let Some(state) = states.next().await {
            match state {
                RemoteData::Succeeded(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                RemoteData::Failed(error) => {
                    println!("{}", serde_json::to_string(&error)?);
                    return Err(error.into());
                }
                pending => eprintln!("{}", describe(&pending, |_| String::new())),
            }
        }
        Ok(())
    }
}
