use crate::models::{
    error::AppError,
    report::{CsrfToken, ReportRequest},
};
use reqwest::{
    RequestBuilder, StatusCode, Url,
    header::{ACCEPT, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use std::cell::RefCell;
use tracing::{debug, warn};

// CONSTANTS
/// Relative so requests go through the same origin's reverse proxy.
const DEFAULT_BASE_URL: &str = "/api";
const CSRF_HEADER: &str = "X-CSRF-Token";
const CSRF_PATH: &str = "/auth/csrf";
const REPORT_PATH: &str = "/report";

/// A request body that can be checked before it is sent.
pub trait Payload: Serialize {
    fn validate(&self) -> Result<(), AppError>;
}

impl Payload for serde_json::Value {
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }
}

// API CONFIGURATION
/// Configuration for the report gateway client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Creates a builder for constructing an `ApiConfig`.
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the base URL. A relative base is resolved against the
    /// page origin, which only exists in the browser.
    pub fn resource_url(&self, path: &str) -> Result<Url, AppError> {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let joined = format!("{base}/{path}");

        let absolute = if joined.starts_with('/') {
            format!("{}{joined}", page_origin()?)
        } else {
            joined
        };

        Url::parse(&absolute)
            .map_err(|e| AppError::ConfigError(format!("Invalid URL {absolute}: {e}")))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfigBuilder::default().build()
    }
}

#[cfg(target_arch = "wasm32")]
fn page_origin() -> Result<String, AppError> {
    let window = web_sys::window()
        .ok_or_else(|| AppError::ConfigError("No window available".to_string()))?;
    window
        .location()
        .origin()
        .map_err(|e: wasm_bindgen::JsValue| {
            AppError::ConfigError(format!("Cannot read page origin: {e:?}"))
        })
}

#[cfg(not(target_arch = "wasm32"))]
fn page_origin() -> Result<String, AppError> {
    Err(AppError::ConfigError(
        "A relative base URL needs a browser origin; configure an absolute base URL".to_string(),
    ))
}

// API CONFIGURATION BUILDER
/// Builder for constructing an `ApiConfig` with custom settings.
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    base_url: Option<String>,
}

impl ApiConfigBuilder {
    /// Sets the base URL, e.g. `https://impact.example.org/api`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the `ApiConfig`.
    pub fn build(self) -> ApiConfig {
        ApiConfig {
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

// REPORT CLIENT
/// JSON client for the report gateway. Session cookies travel with every
/// request; nothing is retried or cached here.
pub struct ReportClient {
    http: reqwest::Client,
    config: ApiConfig,
    csrf: RefCell<Option<String>>,
}

impl ReportClient {
    /// Creates a new client with default configuration.
    pub fn new() -> Result<Self, AppError> {
        Self::with_config(ApiConfig::default())
    }

    /// Creates a new client with the specified configuration.
    pub fn with_config(config: ApiConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            csrf: RefCell::new(None),
        })
    }

    /// Returns a reference to the client's configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Sets the token echoed in `X-CSRF-Token` on submits.
    pub fn set_csrf_token(&self, token: impl Into<String>) {
        *self.csrf.borrow_mut() = Some(token.into());
    }

    pub fn csrf_token(&self) -> Option<String> {
        self.csrf.borrow().clone()
    }

    /// `GET <base><path>`, returning the decoded JSON body.
    pub async fn fetch_resource<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let url = self.config.resource_url(path)?;
        debug!(%url, "GET");

        let request = self.http.get(url);
        self.send(request).await
    }

    /// `POST <base><path>` with `payload` as JSON, returning the decoded body.
    pub async fn submit_resource<P, T>(&self, path: &str, payload: &P) -> Result<T, AppError>
    where
        P: Payload + ?Sized,
        T: DeserializeOwned,
    {
        payload.validate()?;
        let url = self.config.resource_url(path)?;
        debug!(%url, "POST");

        let mut request = self.http.post(url).json(payload);
        if let Some(token) = self.csrf_token() {
            request = request.header(CSRF_HEADER, token);
        }
        self.send(request).await
    }

    /// Fetches a CSRF token from the gateway and keeps it for later submits.
    pub async fn fetch_csrf_token(&self) -> Result<String, AppError> {
        let token: CsrfToken = self.fetch_resource(CSRF_PATH).await?;
        self.set_csrf_token(token.csrf.clone());
        Ok(token.csrf)
    }

    /// Asks the gateway to generate a report for `company`.
    pub async fn request_report(&self, company: &str) -> Result<serde_json::Value, AppError> {
        self.submit_resource(REPORT_PATH, &ReportRequest::new(company))
            .await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = with_credentials(request)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), url = %response.url(), "request failed");
            return Err(error_for_status(status));
        }

        response.json().await.map_err(|e| {
            if e.is_decode() {
                AppError::DataError(format!("Failed to parse response: {e}"))
            } else {
                classify_error(e)
            }
        })
    }
}

#[cfg(target_arch = "wasm32")]
fn with_credentials(request: RequestBuilder) -> RequestBuilder {
    request.fetch_credentials_include()
}

#[cfg(not(target_arch = "wasm32"))]
fn with_credentials(request: RequestBuilder) -> RequestBuilder {
    request
}

/// Converts a reqwest error that produced no response into an `AppError`.
fn classify_error(error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::Transport(format!("Request timeout: {error}"))
    } else if error.is_request() {
        AppError::Transport(format!("Request error: {error}"))
    } else {
        AppError::Transport(format!("Network error: {error}"))
    }
}

/// Creates an error for a non-success HTTP status.
pub fn error_for_status(status: StatusCode) -> AppError {
    AppError::RemoteRequest {
        status: status.as_u16(),
    }
}
