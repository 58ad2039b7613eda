//! HTTP transport shared by the provider, book and LLM clients.

mod http;

pub use http::{build_http_client, HttpClientConfig, TransportError};
