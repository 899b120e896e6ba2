//! Postal code (CEP) lookup.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use vitrine::checkout::{Address, form::CEP_DIGITS};

/// Public `ViaCEP` endpoint.
pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br";

/// Errors that can occur when looking up an address.
#[derive(Debug, Error)]
pub enum AddressLookupError {
    /// The postal code does not have eight digits.
    #[error("invalid CEP: {0}")]
    InvalidCep(String),

    /// An HTTP transport or deserialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-2xx response.
    #[error("unexpected response from address service: {0}")]
    UnexpectedResponse(String),
}

/// Resolves postal codes to street addresses.
#[automock]
#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// Look up an eight-digit CEP. Unknown codes resolve to `None`.
    async fn lookup(&self, cep: &str) -> Result<Option<Address>, AddressLookupError>;
}

/// HTTP client for the `ViaCEP` web service.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    base_url: String,
    http: Client,
}

impl ViaCepClient {
    /// Create a client for the given base URL, e.g. `"https://viacep.com.br"`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

impl Default for ViaCepClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    async fn lookup(&self, cep: &str) -> Result<Option<Address>, AddressLookupError> {
        if cep.len() != CEP_DIGITS || !cep.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(AddressLookupError::InvalidCep(cep.to_string()));
        }

        let url = format!("{}/ws/{cep}/json/", self.base_url);
        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(AddressLookupError::UnexpectedResponse(format!(
                "lookup failed with status {status}: {text}"
            )));
        }

        let parsed: ViaCepResponse = response.json().await?;

        Ok(parsed.into_address())
    }
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    erro: Option<serde_json::Value>,

    #[serde(default)]
    logradouro: String,

    #[serde(default)]
    bairro: String,

    #[serde(default)]
    localidade: String,

    #[serde(default)]
    uf: String,
}

impl ViaCepResponse {
    fn into_address(self) -> Option<Address> {
        // The service has answered both `true` and `"true"` here.
        let not_found = match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            _ => false,
        };

        (!not_found).then(|| Address {
            street: self.logradouro,
            neighborhood: self.bairro,
            city: self.localidade,
            state: self.uf,
        })
    }
}
