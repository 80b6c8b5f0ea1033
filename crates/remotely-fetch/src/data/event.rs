use bytes::Bytes;
use remotely_data::Progress;
use serde::de::DeserializeOwned;

/// Which half of the exchange an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Request body going out.
    Upload,
    /// Response body coming in.
    Download,
}

/// Point in a transfer at which an event was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferStage {
    /// Nothing has been sent or received yet.
    Start,
    /// Some bytes moved.
    Progress,
    /// All bytes moved.
    ///
    /// Only raised for uploads; a finished download is reported as
    /// [`TransferEvent::Complete`].
    Load,
}

/// One event reported by a [`TrackedTransport`](crate::TrackedTransport).
#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    /// The transfer is running.
    Progress {
        direction: Direction,
        stage: TransferStage,
        progress: Progress,
    },

    /// The response was fully downloaded. Always the last event.
    Complete(TrackedResponse),
}

impl TransferEvent {
    pub fn upload(stage: TransferStage, loaded: u64, total: Option<u64>) -> Self {
        TransferEvent::Progress {
            direction: Direction::Upload,
            stage,
            progress: Progress::new(loaded, total),
        }
    }

    pub fn download(stage: TransferStage, loaded: u64, total: Option<u64>) -> Self {
        TransferEvent::Progress {
            direction: Direction::Download,
            stage,
            progress: Progress::new(loaded, total),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, TransferEvent::Complete(_))
    }
}

/// A fully downloaded response of a tracked request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedResponse {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl TrackedResponse {
    /// First value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> TrackedResponse {
        TrackedResponse {
            url: "https://example.com/post".into(),
            status: 201,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: Bytes::from_static(br#"{"id":7}"#),
        }
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = response();
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(response.header("etag"), None);
    }

    #[test]
    fn test_json_body() {
        let value: serde_json::Value = response().json().unwrap();
        assert_eq!(value["id"], 7);
        assert!(response().is_success());
    }

    #[test]
    fn test_event_constructors() {
        let event = TransferEvent::upload(TransferStage::Progress, 25, Some(100));
        assert_eq!(
            event,
            TransferEvent::Progress {
                direction: Direction::Upload,
                stage: TransferStage::Progress,
                progress: Progress::new(25, Some(100)),
            }
        );
        assert!(!event.is_complete());
        assert!(TransferEvent::Complete(response()).is_complete());
    }
}
