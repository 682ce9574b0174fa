use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use serde::Serialize;

use super::error::ApiError;
use crate::shared::api_utils::ApiConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
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

#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Path relative to the API base, e.g. `/companies`
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Set once the request went through a refresh cycle; never refreshed again
    pub retried: bool,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            body: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let encoded = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.set_header("Content-Type", "application/json");
        self.body = Some(encoded);
        Ok(self)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    pub fn set_bearer(&mut self, token: &str) {
        self.set_header("Authorization", &format!("Bearer {}", token));
    }

    /// Token currently attached, if any
    pub fn bearer(&self) -> Option<&str> {
        self.header("Authorization")
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("failed to send request: {0}")]
    Send(String),
    #[error("failed to read response: {0}")]
    Body(String),
}

/// Moves one request over the wire. No auth handling happens here.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Browser fetch via gloo-net
#[derive(Clone, Debug)]
pub struct GlooTransport {
    config: ApiConfig,
}

impl GlooTransport {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    fn builder(&self, request: &HttpRequest) -> RequestBuilder {
        let url = self.config.url(&request.path);
        let builder = match request.method {
            HttpMethod::Get => Request::get(&url),
            HttpMethod::Post => Request::post(&url),
            HttpMethod::Put => Request::put(&url),
            HttpMethod::Patch => Request::patch(&url),
            HttpMethod::Delete => Request::delete(&url),
        };
        request
            .headers
            .iter()
            .fold(builder, |b, (name, value)| b.header(name, value))
    }
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = self.builder(request);
        let response = match &request.body {
            Some(body) => {
                builder
                    .body(body.clone())
                    .map_err(|e| TransportError::Send(e.to_string()))?
                    .send()
                    .await
            }
            None => builder.send().await,
        }
        .map_err(|e| TransportError::Send(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;
        log::debug!("{} {} -> {}", request.method.as_str(), request.path, status);
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_replaces_previous_header() {
        let mut request = HttpRequest::get("/companies");
        request.set_bearer("old");
        request.set_bearer("new");
        assert_eq!(request.bearer(), Some("new"));
        assert_eq!(
            request
                .headers
                .iter()
                .filter(|(k, _)| k == "Authorization")
                .count(),
            1
        );
    }

    #[test]
    fn json_sets_content_type() {
        let request = HttpRequest::post("/auth/forgot")
            .json(&serde_json::json!({"email": "a@b.c"}))
            .unwrap();
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body.as_deref(), Some(r#"{"email":"a@b.c"}"#));
    }
}
