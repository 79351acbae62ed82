//! Outbound request descriptors and the raw responses they produce

use crate::error::AppError;
use serde::de::DeserializeOwned;
use tracing::error;

/// HTTP method of a [`FetchDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Immutable description of one outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchDescriptor {
    pub method: HttpMethod,
    pub url: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl FetchDescriptor {
    /// A GET request without query parameters or extra headers
    pub fn get(url: impl Into<String>) -> Self {
        FetchDescriptor {
            method: HttpMethod::Get,
            url: url.into(),
            params: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// URL with query parameters appended, for logging and error reporting
    pub fn display_url(&self) -> String {
        if self.params.is_empty() {
            return self.url.clone();
        }
        let query: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{}?{}", self.url, query.join("&"))
    }
}

/// Body and status of one successfully completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        RawResponse {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Deserializes the body as JSON, telling apart empty bodies, non-JSON
    /// bodies and JSON of an unexpected shape.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        match serde_json::from_str::<T>(&self.body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                error!("Failed to parse response: {} (URL: {})", e, self.url);
                let trimmed = self.body.trim_start();
                if trimmed.is_empty() {
                    Err(AppError::api_no_data("Response body is empty", &self.url))
                } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                    Err(AppError::api_malformed_json(
                        "Response is not valid JSON",
                        &self.url,
                    ))
                } else {
                    Err(AppError::api_unexpected_structure(e.to_string(), &self.url))
                }
            }
        }
    }

    /// Parses the body as an HTML document.
    pub fn html(&self) -> scraper::Html {
        scraper::Html::parse_document(&self.body)
    }
}
