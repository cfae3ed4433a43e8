// src/validator/client.rs

use super::model::KeySet;
use crate::config::SecurityConfig;
use crate::error::ArunaAuthError;
use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

/// Somewhere a [`KeySet`] can be fetched from.
///
/// The validator asks for a fresh set on every call; an implementation must
/// not hold on to keys between calls unless that is its stated policy.
#[async_trait]
pub trait KeySetSource: Send + Sync {
    async fn fetch(&self) -> Result<KeySet, ArunaAuthError>;
}

/// Fetches the JSON Web Key Set from the configured JWKS endpoint, once per call.
#[derive(Clone)]
pub struct JwksClient {
    http_client: reqwest::Client,
    jwk_uri: Url,
}

impl JwksClient {
    /// Creates a `JwksClient` whose requests are bounded by the configured timeout.
    pub fn new(config: &SecurityConfig) -> Result<Self, ArunaAuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(http_client, config.jwk_uri.clone()))
    }

    pub fn with_client(http_client: reqwest::Client, jwk_uri: Url) -> Self {
        Self { http_client, jwk_uri }
    }

    pub fn jwk_uri(&self) -> &Url {
        &self.jwk_uri
    }
}

#[async_trait]
impl KeySetSource for JwksClient {
    #[instrument(skip(self), fields(jwk_uri = %self.jwk_uri))]
    async fn fetch(&self) -> Result<KeySet, ArunaAuthError> {
        let response = self
            .http_client
            .get(self.jwk_uri.clone())
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let key_set: KeySet = serde_json::from_slice(&body)?;

        debug!("Fetched {} keys from JWKS endpoint", key_set.keys.len());
        Ok(key_set)
    }
}
