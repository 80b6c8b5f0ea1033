pub mod app;
pub mod get;
pub mod json;
pub mod request;
pub mod upload;
