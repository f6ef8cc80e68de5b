//! Bearer token acquisition and caching

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::core::errors::{Result, TranslatorError};
use crate::core::models::IssuanceError;

/// Client-side validity window in minutes. The service issues tokens
/// valid for 10 minutes; staying under that absorbs clock and network
/// skew so a token is never presented after the service expired it.
const VALIDITY_MINUTES: i64 = 9;

/// A bearer token with its computed absolute expiry
#[derive(Debug, Clone)]
pub struct BearerToken {
    /// Raw token string, presented verbatim in `Authorization` headers
    pub value: String,
    /// Instant after which this token is no longer used
    pub expires_at: DateTime<Utc>,
}

impl BearerToken {
    fn fresh(value: String) -> Self {
        Self {
            value,
            expires_at: Utc::now() + Duration::minutes(VALIDITY_MINUTES),
        }
    }

    /// Whether the validity window has passed
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Lazily refreshing token manager, one per client instance.
///
/// Holds the subscription key and at most one cached token. Refresh is
/// lazy: nothing happens until a caller asks for a token after the
/// cached one expired. The cache lock is held across the refresh
/// request, so concurrent callers observing an expired token cannot
/// race duplicate issuance calls.
#[derive(Debug, Clone)]
pub struct TokenManager {
    subscription_key: String,
    auth_endpoint: String,
    client: reqwest::Client,
    cached: Arc<Mutex<Option<BearerToken>>>,
}

impl TokenManager {
    /// Create a manager for the given key and issuance endpoint
    pub fn new(
        subscription_key: impl Into<String>,
        auth_endpoint: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            subscription_key: subscription_key.into(),
            auth_endpoint: auth_endpoint.into(),
            client,
            cached: Arc::new(Mutex::new(None)),
        }
    }

    /// Return a currently-valid bearer string, refreshing first if the
    /// cache is empty or past its expiry.
    pub async fn token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.value.clone());
            }
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Drop the cached token so the next call re-authenticates
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    async fn request_token(&self) -> Result<BearerToken> {
        debug!(endpoint = %self.auth_endpoint, "requesting bearer token");

        let response = self
            .client
            .post(&self.auth_endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let value = response.text().await?;
            debug!("bearer token refreshed");
            return Ok(BearerToken::fresh(value));
        }

        let body = response.text().await?;
        let parsed: IssuanceError = serde_json::from_str(&body)?;
        warn!(status = status.as_u16(), "token issuance rejected");
        Err(TranslatorError::Authentication {
            status: status.as_u16(),
            message: parsed.message,
        })
    }
}
