use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a fetch-like request.
///
/// # Examples
///
/// ```
/// use remotely_fetch::{Method, RequestOptions};
/// use std::time::Duration;
///
/// let options = RequestOptions::default()
///     .method(Method::Post)
///     .header("Content-Type", "application/json")
///     .body(r#"{"name":"remotely"}"#)
///     .timeout(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Request method.
    ///
    /// Default: `GET`
    pub method: Method,

    /// Headers sent with the request.
    ///
    /// Default: empty
    pub headers: Arc<[(String, String)]>,

    /// Request body.
    ///
    /// Default: None
    pub body: Option<Bytes>,

    /// Time allowed for the whole request.
    ///
    /// Default: None (the client's own policy applies)
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::Get,
            headers: Arc::new([]),
            body: None,
            timeout: None,
        }
    }
}

impl RequestOptions {
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a single header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers = with_header(&self.headers, key.into(), value.into());
        self
    }

    /// Replace every header at once.
    #[must_use]
    pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = Arc::from(headers);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Configuration of a request tracked through progress events.
///
/// # Examples
///
/// ```
/// use remotely_fetch::{Method, TrackedRequestConfig};
///
/// let config = TrackedRequestConfig::new("https://httpbin.org/post")
///     .method(Method::Post)
///     .body(vec![0u8; 1024]);
/// assert!(!config.include_upload_progress);
/// ```
#[derive(Debug, Clone)]
pub struct TrackedRequestConfig {
    pub url: String,
    pub method: Method,
    pub headers: Arc<[(String, String)]>,
    pub body: Option<Bytes>,
    pub timeout: Option<Duration>,

    /// Report upload progress events in addition to download ones.
    ///
    /// Default: false
    pub include_upload_progress: bool,
}

impl TrackedRequestConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::Get,
            headers: Arc::new([]),
            body: None,
            timeout: None,
            include_upload_progress: false,
        }
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers = with_header(&self.headers, key.into(), value.into());
        self
    }

    #[must_use]
    pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = Arc::from(headers);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn include_upload_progress(mut self, include: bool) -> Self {
        self.include_upload_progress = include;
        self
    }
}

fn with_header(headers: &[(String, String)], key: String, value: String) -> Arc<[(String, String)]> {
    let mut headers: Vec<_> = headers.to_vec();
    headers.push((key, value));
    Arc::from(headers)
}
