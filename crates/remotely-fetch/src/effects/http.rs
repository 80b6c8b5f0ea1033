use std::future::Future;

use bytes::Bytes;

use crate::data::RequestOptions;

/// A received response whose body has not been read yet.
pub trait HttpResponse: Send + 'static {
    /// Error raised while reading the body.
    type Error: std::error::Error + Send + Sync + 'static;

    fn status(&self) -> u16;

    /// First value of the header `name`, if present and valid UTF-8.
    fn header(&self, name: &str) -> Option<&str>;

    fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Read the whole body. The response is consumed.
    fn bytes(self) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;
}

/// Asynchronous fetch-like HTTP client abstraction.
///
/// An HTTP error status is still a response: only failures to obtain one
/// are errors. Dropping the returned future must abort the request.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    type Response: HttpResponse;

    /// Error type for transport failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue a request and resolve once the response head arrived.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received (DNS failure, refused
    /// connection, timeout, ...).
    fn fetch(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use crate::data::Method;

    impl From<Method> for reqwest::Method {
        fn from(method: Method) -> Self {
            match method {
                Method::Get => reqwest::Method::GET,
                Method::Head => reqwest::Method::HEAD,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Patch => reqwest::Method::PATCH,
                Method::Delete => reqwest::Method::DELETE,
            }
        }
    }

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Create a new ReqwestClient with default configuration.
        pub fn new() -> Self {
            Self::default()
        }

        /// Use an already configured reqwest client.
        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    impl HttpClient for ReqwestClient {
        type Response = ReqwestResponse;
        type Error = reqwest::Error;

        async fn fetch(
            &self,
            url: &str,
            options: &RequestOptions,
        ) -> Result<Self::Response, Self::Error> {
            let mut request = self.client.request(options.method.into(), url);

            for (key, value) in options.headers.iter() {
                request = request.header(key, value);
            }
            if let Some(body) = &options.body {
                request = request.body(body.clone());
            }
            if let Some(timeout) = options.timeout {
                request = request.timeout(timeout);
            }

            request.send().await.map(ReqwestResponse)
        }
    }

    /// Response returned by [`ReqwestClient`].
    #[derive(Debug)]
    pub struct ReqwestResponse(reqwest::Response);

    impl ReqwestResponse {
        pub fn into_inner(self) -> reqwest::Response {
            self.0
        }

        pub fn url(&self) -> &str {
            self.0.url().as_str()
        }
    }

    impl HttpResponse for ReqwestResponse {
        type Error = reqwest::Error;

        fn status(&self) -> u16 {
            self.0.status().as_u16()
        }

        fn header(&self, name: &str) -> Option<&str> {
            self.0.headers().get(name).and_then(|value| value.to_str().ok())
        }

        fn bytes(self) -> impl Future<Output = Result<Bytes, Self::Error>> + Send {
            self.0.bytes()
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::{ReqwestClient, ReqwestResponse};
