//! Client configuration

use anyhow::anyhow;

/// Production token issuance endpoint
pub const DEFAULT_AUTH_ENDPOINT: &str = "https://api.cognitive.microsoft.com/sts/v1.0/issueToken";

/// Production Translator API base URL
pub const DEFAULT_API_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com/";

/// Translator API version spoken by this client
pub const API_VERSION: &str = "3.0";

/// Configuration for the translator client
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Subscription key presented to the issuance endpoint
    pub subscription_key: String,
    /// Token issuance URL
    pub auth_endpoint: String,
    /// Translator API base URL
    pub api_endpoint: String,
    /// `api-version` sent with every request
    pub api_version: String,
    /// Per-request timeout for the underlying HTTP client
    pub timeout_ms: u64,
}

impl TranslatorConfig {
    /// Configuration with production endpoints for the given key
    pub fn new(subscription_key: impl Into<String>) -> Self {
        Self {
            subscription_key: subscription_key.into(),
            auth_endpoint: DEFAULT_AUTH_ENDPOINT.to_string(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            api_version: API_VERSION.to_string(),
            timeout_ms: 30000,
        }
    }

    /// Override the token issuance URL
    pub fn with_auth_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.auth_endpoint = endpoint.into();
        self
    }

    /// Override the API base URL
    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }

    /// Override the per-request timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.subscription_key.is_empty() {
            return Err(anyhow!("Subscription key is required"));
        }

        if self.auth_endpoint.is_empty() {
            return Err(anyhow!("Auth endpoint is required"));
        }

        if self.api_endpoint.is_empty() {
            return Err(anyhow!("API endpoint is required"));
        }

        if self.timeout_ms == 0 {
            return Err(anyhow!("timeout_ms must be greater than 0"));
        }

        Ok(())
    }

    /// Full URL for an API action, e.g. `translate` or `detect`
    pub fn action_url(&self, action: &str) -> String {
        format!("{}/{}", self.api_endpoint.trim_end_matches('/'), action)
    }
}
