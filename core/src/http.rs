//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! request builder constructs `HttpRequest` values and parses `HttpResponse`
//! values without ever touching the network; a [`HttpTransport`]
//! implementation is responsible for executing the actual I/O. This
//! separation keeps the builder/parser layer deterministic and easy to test,
//! and lets the session layer run against a scripted transport in tests.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved
//! freely between the builder, the session layer, and the transport.

use async_trait::async_trait;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `PortfolioClient::build_*` methods. The path is a full URL; the
/// session layer may append headers (notably `Authorization`) before handing
/// the request to a transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Produced by a transport after executing an `HttpRequest`, then passed to
/// `PortfolioClient::parse_*` methods for deserialization. Non-2xx statuses
/// are carried here as data, never as transport errors.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Executes plain-data requests against the network.
///
/// The production implementation is [`crate::transport::ReqwestTransport`];
/// tests substitute a scripted fake. Implementations must only fail for
/// transport-level problems (connect, DNS, I/O); HTTP error statuses are
/// returned as ordinary responses.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}
