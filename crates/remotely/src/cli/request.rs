use std::fmt::Display;
use std::time::Duration;

use clap::Args;
use remotely_data::RemoteData;
use remotely_fetch::{RequestOptions, TrackedRequestConfig};

/// Flags shared by every command that issues a request.
#[derive(Clone, Debug, Args)]
pub struct RequestArgs {
    /// Extra request header, as `name: value`. Repeatable.
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Abort the request after this many seconds.
    #[arg(short, long)]
    pub timeout: Option<u64>,
}

impl RequestArgs {
    pub fn options(&self) -> RequestOptions {
        let options = RequestOptions::default().headers(self.headers.clone());
        match self.timeout {
            Some(secs) => options.timeout(Duration::from_secs(secs)),
            None => options,
        }
    }

    pub fn tracked(&self, url: &str) -> TrackedRequestConfig {
        let config = TrackedRequestConfig::new(url).headers(self.headers.clone());
        match self.timeout {
            Some(secs) => config.timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid header `{raw}`, expected `name: value`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("invalid header `{raw}`, name is empty"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// One line describing a request state.
pub fn describe<E: Display, A>(data: &RemoteData<E, A>, success: impl FnOnce(&A) -> String) -> String {
    match data {
        RemoteData::Uninitiated => "Uninitiated".to_string(),
        RemoteData::InProgress(None) => "InProgress".to_string(),
        RemoteData::InProgress(Some(progress)) => match progress.total {
            Some(total) => format!("InProgress({}/{total} bytes)", progress.loaded),
            None => format!("InProgress({} bytes)", progress.loaded),
        },
        RemoteData::Failed(error) => format!("Failed({error})"),
        RemoteData::Succeeded(value) => format!("Succeeded({})", success(value)),
    }
}

#[cfg(test)]
mod tests {
    use remotely_data::Progress;

    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Accept: application/json"),
            Ok(("Accept".to_string(), "application/json".to_string()))
        );
        assert_eq!(
            parse_header("x-empty:"),
            Ok(("x-empty".to_string(), String::new()))
        );
        assert!(parse_header("no-separator").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn test_options_carry_flags() {
        let args = RequestArgs {
            headers: vec![("accept".into(), "text/plain".into())],
            timeout: Some(5),
        };
        let options = args.options();
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.headers.len(), 1);

        let config = args.tracked("https://example.com");
        assert_eq!(config.url, "https://example.com");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_describe() {
        let status = |code: &u16| code.to_string();
        assert_eq!(describe(&RemoteData::<String, u16>::InProgress(None), status), "InProgress");
        assert_eq!(
            describe(&RemoteData::<String, u16>::InProgress(Some(Progress::new(3, Some(9)))), status),
            "InProgress(3/9 bytes)"
        );
        assert_eq!(describe(&RemoteData::<String, u16>::Succeeded(200), status), "Succeeded(200)");
        assert_eq!(describe(&RemoteData::<String, u16>::Failed("offline".into()), status), "Failed(offline)");
    }
}
