//! Serial vault signing client.
//!
//! The vault answers with the signed assertion on success and with a JSON
//! object on failure; the response status is not consulted.

use log::{debug, error, info};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use thiserror::Error;

/// Path appended to the vault server URL.
pub const SERIAL_PATH: &str = "/serial";

/// Content type of the signing request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Header carrying the vault API key.
pub const API_KEY_HEADER: &str = "api-key";

/// Errors from the signing request.
#[derive(Error, Debug)]
pub enum VaultError {
    /// The request could not be built, sent or read.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The vault returned an error payload; the text is verbatim.
    #[error("{0}")]
    Rejected(String),
}

/// Signing endpoint for a vault server URL.
///
/// ```rust
/// use rplib_core::vault::serial_endpoint;
///
/// assert_eq!(serial_endpoint("https://vault.example.com/"), "https://vault.example.com/serial");
/// ```
pub fn serial_endpoint(server: &str) -> String {
    format!("{}{SERIAL_PATH}", server.trim_end_matches('/'))
}

/// Whether a response body parses as a JSON object.
pub fn is_json_object(body: &[u8]) -> bool {
    serde_json::from_slice::<Map<String, Value>>(body).is_ok()
}

/// Splits a vault response into a signed assertion or a rejection.
pub fn classify_response(body: Vec<u8>) -> Result<Vec<u8>, VaultError> {
    if is_json_object(&body) {
        let message = String::from_utf8_lossy(&body).into_owned();
        error!("Serial Sign error: {message}");
        return Err(VaultError::Rejected(message));
    }
    Ok(body)
}

/// Client for the vault `serial` endpoint.
#[derive(Debug, Clone)]
pub struct VaultClient {
    endpoint: String,
    api_key: Option<String>,
    http: Client,
}

impl VaultClient {
    /// Creates a client for `server`; an empty API key sends no header.
    ///
    /// Requests never time out; `sign` blocks until the vault answers or
    /// the connection fails.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Transport`] if the HTTP client cannot be built.
    pub fn new(server: &str, api_key: Option<String>) -> Result<Self, VaultError> {
        let http = Client::builder().timeout(None).build()?;
        Ok(Self {
            endpoint: serial_endpoint(server),
            api_key: api_key.filter(|key| !key.is_empty()),
            http,
        })
    }

    /// URL the signing request is posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts the unsigned assertion and returns the signed bytes.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Transport`] on any network failure (no retry)
    /// and [`VaultError::Rejected`] when the vault answers with JSON.
    pub fn sign(&self, unsigned: &str) -> Result<Vec<u8>, VaultError> {
        info!("send request to: {}", self.endpoint);
        let mut request = self
            .http
            .post(self.endpoint.as_str())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(unsigned.to_string());
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key.as_str());
        }

        let response = request.send()?;
        let status = response.status();
        let body = response.bytes()?.to_vec();
        debug!("Response status: {status}, {} bytes", body.len());

        classify_response(body)
    }
}
