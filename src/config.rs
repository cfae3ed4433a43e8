// src/config.rs

use crate::error::ArunaAuthError;
use jsonwebtoken::Algorithm;
use std::time::Duration;
use url::Url;

/// RSA-family signing algorithms. These are the only algorithms a key
/// reconstructed from a JWKS can verify.
pub const RSA_ALGORITHMS: [Algorithm; 6] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

/// Returns `true` if `alg` belongs to the RSA signing family.
pub fn is_rsa_algorithm(alg: Algorithm) -> bool {
    RSA_ALGORITHMS.contains(&alg)
}

/// Security settings consumed by the token acquirer, the validator and the gate.
///
/// Values are supplied by the host application's configuration layer and
/// injected into constructors. Build it with [`SecurityConfigBuilder`].
#[derive(Clone, Debug)]
pub struct SecurityConfig {
    /// Whether authenticated routes enforce bearer token validation at all.
    pub enabled: bool,
    /// Client id presented in the client-credentials grant.
    pub client_id: Option<String>,
    /// Client secret presented in the client-credentials grant.
    pub client_secret: Option<String>,
    /// Token endpoint of the authorization server.
    pub token_uri: Option<Url>,
    /// Endpoint publishing the issuer's JSON Web Key Set.
    pub jwk_uri: Url,
    /// Algorithms a bearer token header may declare. RSA family only.
    pub algorithms: Vec<Algorithm>,
    /// Clock skew tolerance for `exp` and `nbf`.
    pub leeway: Duration,
    /// Upper bound for every outbound HTTP call.
    pub request_timeout: Duration,
}

/// A builder for creating a [`SecurityConfig`] instance.
pub struct SecurityConfigBuilder {
    enabled: bool,
    client_id: Option<String>,
    client_secret: Option<String>,
    token_uri: Option<Url>,
    jwk_uri: Option<Url>,
    algorithms: Vec<Algorithm>,
    leeway: Duration,
    request_timeout: Duration,
}

impl Default for SecurityConfigBuilder {
    fn default() -> Self {
        Self {
            enabled: true,
            client_id: None,
            client_secret: None,
            token_uri: None,
            jwk_uri: None,
            algorithms: vec![Algorithm::RS256, Algorithm::RS384, Algorithm::RS512],
            leeway: Duration::ZERO,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl SecurityConfigBuilder {
    /// Creates a new `SecurityConfigBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns bearer token enforcement on or off. Defaults to `true`.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the client id used for token acquisition.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the client secret used for token acquisition.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Sets the token endpoint URI.
    pub fn token_uri(mut self, url: &str) -> Result<Self, ArunaAuthError> {
        let parsed_url = Url::parse(url).map_err(|e| ArunaAuthError::InvalidUrl(e.to_string()))?;
        self.token_uri = Some(parsed_url);
        Ok(self)
    }

    /// Sets the JWKS endpoint URI. This is a required field.
    pub fn jwk_uri(mut self, url: &str) -> Result<Self, ArunaAuthError> {
        let parsed_url = Url::parse(url).map_err(|e| ArunaAuthError::InvalidUrl(e.to_string()))?;
        self.jwk_uri = Some(parsed_url);
        Ok(self)
    }

    /// Sets the allowed signing algorithms.
    /// Defaults to `[RS256, RS384, RS512]` if not set.
    pub fn algorithms(mut self, algorithms: Vec<Algorithm>) -> Self {
        self.algorithms = algorithms;
        self
    }

    /// Sets the clock skew tolerance. Defaults to zero.
    pub fn leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Sets the timeout applied to each outbound call. Defaults to 10 seconds.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Consumes the builder and returns a `SecurityConfig` object.
    ///
    /// # Errors
    ///
    /// Returns an error if `jwk_uri` is missing, if the algorithm list is empty
    /// or names a non-RSA algorithm, or if the request timeout is zero.
    pub fn build(self) -> Result<SecurityConfig, ArunaAuthError> {
        let jwk_uri = self
            .jwk_uri
            .ok_or_else(|| ArunaAuthError::MissingConfiguration("jwk_uri".to_string()))?;

        if self.algorithms.is_empty() {
            return Err(ArunaAuthError::InvalidConfiguration(
                "at least one signing algorithm must be allowed".to_string(),
            ));
        }
        if let Some(alg) = self.algorithms.iter().find(|alg| !is_rsa_algorithm(**alg)) {
            return Err(ArunaAuthError::InvalidConfiguration(format!(
                "{:?} is not an RSA signing algorithm",
                alg
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ArunaAuthError::InvalidConfiguration(
                "request_timeout must be greater than zero".to_string(),
            ));
        }

        Ok(SecurityConfig {
            enabled: self.enabled,
            client_id: self.client_id,
            client_secret: self.client_secret,
            token_uri: self.token_uri,
            jwk_uri,
            algorithms: self.algorithms,
            leeway: self.leeway,
            request_timeout: self.request_timeout,
        })
    }
}
