// src/acquirer.rs

use crate::config::SecurityConfig;
use crate::context::RequestContext;
use crate::error::ArunaAuthError;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

/// An access token obtained through the client-credentials grant.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_expires_in: i64,
    #[serde(default)]
    pub token_type: String,
    #[serde(rename = "not-before-policy", default)]
    pub not_before_policy: i64,
    #[serde(default)]
    pub scope: String,
}

/// Performs the OAuth2 client-credentials grant against a token endpoint.
///
/// Holds no per-call state; cloning is cheap and shares the HTTP connection pool.
#[derive(Clone)]
pub struct TokenAcquirer {
    http_client: reqwest::Client,
    config: Option<SecurityConfig>,
}

impl TokenAcquirer {
    /// Creates an acquirer whose outbound calls are bounded by the configured timeout.
    pub fn new(config: SecurityConfig) -> Result<Self, ArunaAuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http_client, config: Some(config) })
    }

    /// Creates an acquirer on top of an existing client, without stored credentials.
    /// Only [`acquire`](Self::acquire) is usable on such an instance.
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client, config: None }
    }

    /// Acquires a token using the credentials and token URI from the injected configuration.
    pub async fn acquire_configured(
        &self,
        ctx: &RequestContext,
    ) -> Result<AccessToken, ArunaAuthError> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| ArunaAuthError::MissingConfiguration("security".to_string()))?;
        let client_id = config
            .client_id
            .as_deref()
            .ok_or_else(|| ArunaAuthError::MissingConfiguration("client_id".to_string()))?;
        let client_secret = config
            .client_secret
            .as_deref()
            .ok_or_else(|| ArunaAuthError::MissingConfiguration("client_secret".to_string()))?;
        let token_uri = config
            .token_uri
            .as_ref()
            .ok_or_else(|| ArunaAuthError::MissingConfiguration("token_uri".to_string()))?;

        self.acquire(ctx, client_id, client_secret, token_uri.as_str()).await
    }

    /// Issues one form-encoded `POST` with `grant_type=client_credentials` and
    /// decodes the response body into an [`AccessToken`].
    ///
    /// A non-2xx answer is reported as [`ArunaAuthError::TokenEndpointStatus`]
    /// and its body is never treated as a token. Nothing is retried.
    #[instrument(
        skip(self, ctx, client_secret),
        fields(correlation_id = %ctx.correlation_id()),
        err
    )]
    pub async fn acquire(
        &self,
        ctx: &RequestContext,
        client_id: &str,
        client_secret: &str,
        token_uri: &str,
    ) -> Result<AccessToken, ArunaAuthError> {
        let required = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("token_uri", token_uri),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(ArunaAuthError::MissingConfiguration(field.to_string()));
            }
        }
        let token_uri =
            Url::parse(token_uri).map_err(|e| ArunaAuthError::InvalidUrl(e.to_string()))?;

        let request = async {
            let response = self
                .http_client
                .post(token_uri)
                .form(&[
                    ("grant_type", "client_credentials"),
                    ("client_id", client_id),
                    ("client_secret", client_secret),
                ])
                .send()
                .await?;

            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, ArunaAuthError>((status, body))
        };

        let (status, body) = ctx.run(request).await.ok_or(ArunaAuthError::DeadlineExceeded)??;

        if !status.is_success() {
            return Err(ArunaAuthError::TokenEndpointStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let token: AccessToken = serde_json::from_slice(&body)?;
        debug!(
            token_type = %token.token_type,
            expires_in = token.expires_in,
            "access token acquired"
        );
        Ok(token)
    }
}
