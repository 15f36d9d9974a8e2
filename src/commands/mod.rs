//! Backend Command Wrappers
//!
//! REST bindings to the Everlive backend, organized by resource. Every
//! call goes through a `Transport`, so the list logic can run against the
//! real HTTP client or a test double.

mod grocery;
mod http;
mod user;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::context::Session;
use crate::error::{GroceryError, GroceryResult};

// Re-export all public items
pub use grocery::*;
pub use http::HttpTransport;
pub use user::*;

/// Longest response body excerpt written to the log
const LOG_BODY_LIMIT: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

// ========================
// Request / Response
// ========================

/// One backend request, path relative to the API root
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path, Some(body))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw backend response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl ApiResponse {
    /// Response with the canonical reason phrase for `status`
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("")
            .to_string();
        Self {
            status,
            status_text,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> GroceryResult<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            GroceryError::Decode(format!("{} (body: {})", e, excerpt(&self.body)))
        })
    }
}

/// Sends requests to the backend
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request; only failures to get any response are errors here
    async fn send(&self, request: ApiRequest) -> GroceryResult<ApiResponse>;
}

// ========================
// Dispatch
// ========================

/// Send with the session's bearer token; a 403 signs the session out
pub async fn send_authorized(
    transport: &dyn Transport,
    session: &Session,
    request: ApiRequest,
) -> GroceryResult<ApiResponse> {
    let token = session.bearer().await?;
    let request = request.with_header("Authorization", format!("Bearer {}", token));
    dispatch(transport, Some(session), request).await
}

/// Send without credentials (login, registration)
pub async fn send_anonymous(
    transport: &dyn Transport,
    request: ApiRequest,
) -> GroceryResult<ApiResponse> {
    dispatch(transport, None, request).await
}

async fn dispatch(
    transport: &dyn Transport,
    session: Option<&Session>,
    request: ApiRequest,
) -> GroceryResult<ApiResponse> {
    let method = request.method;
    let path = request.path.clone();
    log::debug!("{} {}", method.as_str(), path);

    let response = match transport.send(request).await {
        Ok(response) => response,
        Err(e) => {
            log::warn!("{} {} failed before a response: {}", method.as_str(), path, e);
            return Err(e);
        }
    };

    handle_errors(method, &path, session, response).await
}

/// Turn non-2xx responses into errors
async fn handle_errors(
    method: Method,
    path: &str,
    session: Option<&Session>,
    response: ApiResponse,
) -> GroceryResult<ApiResponse> {
    if response.is_success() {
        return Ok(response);
    }

    log::error!(
        "{} {} -> {} {}: {}",
        method.as_str(),
        path,
        response.status,
        response.status_text,
        excerpt(&response.body)
    );

    if response.status == 403 {
        if let Some(session) = session {
            session.sign_out().await;
            return Err(GroceryError::AuthExpired {
                status_text: response.status_text,
            });
        }
    }

    Err(GroceryError::Http {
        status: response.status,
        status_text: response.status_text,
    })
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(LOG_BODY_LIMIT) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}
