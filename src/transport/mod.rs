//! Request transport for the catalog backend.
//!
//! Everything above this module talks to the backend through the
//! [`Transport`] trait, so the coordinator can run against the real HTTP
//! client or a scripted fake with controlled timing.

mod http;
#[cfg(test)]
pub mod scripted;

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ArcaloadError, Result};

pub use self::http::HttpTransport;
pub use reqwest::Method;

/// A single backend call, fully described before it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of a query parameter, if present
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A response whose body was already decoded as JSON.
///
/// Decoding happens regardless of the HTTP status: error replies carry a
/// human-readable `message` just like successful ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `message` field of the body, if the server sent one
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone()).map_err(ArcaloadError::from)
    }
}

/// Sends [`ApiRequest`]s to the backend.
///
/// An `Err` means no usable response reached the client (connection
/// failure, timeout, undecodable body). Non-2xx replies are `Ok`.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send {
        (**self).send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_success_range() {
        assert!(ApiResponse::new(200, json!({})).is_success());
        assert!(ApiResponse::new(201, json!({})).is_success());
        assert!(!ApiResponse::new(400, json!({})).is_success());
        assert!(!ApiResponse::new(500, json!({})).is_success());
    }

    #[test]
    fn test_response_message() {
        let response = ApiResponse::new(400, json!({"message": "Title required"}));
        assert_eq!(response.message(), Some("Title required"));

        let response = ApiResponse::new(400, json!({"error": 1}));
        assert_eq!(response.message(), None);
    }

    #[test]
    fn test_request_query_param() {
        let request = ApiRequest::get("/search").with_query("q", "zelda");
        assert_eq!(request.query_param("q"), Some("zelda"));
        assert_eq!(request.query_param("page"), None);
        assert_eq!(request.method, Method::GET);
    }
}
