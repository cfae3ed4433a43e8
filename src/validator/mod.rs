// src/validator/mod.rs

pub mod client;
pub mod keys;
pub mod model;

use crate::config::SecurityConfig;
use crate::context::RequestContext;
use crate::error::ArunaAuthError;
use base64::engine::{general_purpose::URL_SAFE_NO_PAD, Engine};
use client::{JwksClient, KeySetSource};
use jsonwebtoken::{decode, Algorithm, Validation};
use keys::PublicKeyMaterial;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

/// Why a bearer token was judged invalid.
///
/// Only ever used for logging and assertions; callers of
/// [`JwtValidator::validate`] see a plain `false`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidReason {
    /// The token is not three base64url segments with JSON header and payload.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The header declares an algorithm outside the allowed RSA set.
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The key set could not be fetched or decoded.
    #[error("key set unavailable: {0}")]
    KeySetUnavailable(String),

    /// The request deadline passed while fetching the key set.
    #[error("deadline exceeded while fetching key set")]
    DeadlineExceeded,

    /// No published key carries the header's `kid`.
    #[error("no key found for kid {0:?}")]
    KeyNotFound(String),

    /// The matched key is not an RSA signing key.
    #[error("unusable key: {0}")]
    UnusableKey(String),

    /// The matched key's `n`/`e` members could not be turned into a public key.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Signature verification or claim checks failed.
    #[error("token rejected: {0}")]
    Rejected(String),
}

/// Outcome of validating one bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationVerdict {
    Valid,
    Invalid(InvalidReason),
}

impl ValidationVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationVerdict::Valid)
    }

    pub fn reason(&self) -> Option<&InvalidReason> {
        match self {
            ValidationVerdict::Valid => None,
            ValidationVerdict::Invalid(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenHeader {
    alg: String,
    kid: Option<String>,
}

/// Removes exactly one leading `"Bearer "`; any other value is returned as-is.
pub fn strip_bearer(value: &str) -> &str {
    value.strip_prefix("Bearer ").unwrap_or(value)
}

fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>, InvalidReason> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| InvalidReason::MalformedToken(format!("{} is not base64url: {}", name, e)))
}

fn not_an_object(name: &str, e: serde_json::Error) -> InvalidReason {
    InvalidReason::MalformedToken(format!("{} is not a JSON object: {}", name, e))
}

fn parse_header(token: &str) -> Result<TokenHeader, InvalidReason> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(InvalidReason::MalformedToken(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let header: TokenHeader = serde_json::from_slice(&decode_segment(segments[0], "header")?)
        .map_err(|e| not_an_object("header", e))?;
    let payload = decode_segment(segments[1], "payload")?;
    serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(&payload)
        .map_err(|e| not_an_object("payload", e))?;
    decode_segment(segments[2], "signature")?;

    Ok(header)
}

/// Validates bearer tokens against the issuer's published key set.
///
/// Every call fetches the key set afresh; nothing is cached between calls.
/// This struct is cheap to clone and safe to share across request tasks.
#[derive(Clone)]
pub struct JwtValidator {
    source: Arc<dyn KeySetSource>,
    algorithms: Vec<Algorithm>,
    leeway: Duration,
}

impl JwtValidator {
    /// Creates a validator that fetches keys from `config.jwk_uri`.
    pub fn new(config: &SecurityConfig) -> Result<Self, ArunaAuthError> {
        Ok(Self::with_source(config, JwksClient::new(config)?))
    }

    /// Creates a validator backed by an arbitrary key set source.
    pub fn with_source(config: &SecurityConfig, source: impl KeySetSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            algorithms: config.algorithms.clone(),
            leeway: config.leeway,
        }
    }

    /// Validates an `Authorization` header value, with or without the `Bearer ` scheme.
    ///
    /// Never fails: every problem collapses to `false` and is logged with the
    /// request's correlation id.
    pub async fn validate(&self, ctx: &RequestContext, bearer: &str) -> bool {
        self.verdict(ctx, bearer).await.is_valid()
    }

    /// Same as [`validate`](Self::validate) but keeps the reason for rejection.
    #[instrument(skip_all, fields(correlation_id = %ctx.correlation_id()))]
    pub async fn verdict(&self, ctx: &RequestContext, bearer: &str) -> ValidationVerdict {
        match self.check(ctx, strip_bearer(bearer)).await {
            Ok(()) => {
                debug!("bearer token accepted");
                ValidationVerdict::Valid
            }
            Err(reason) => {
                match &reason {
                    InvalidReason::KeySetUnavailable(_) | InvalidReason::DeadlineExceeded => {
                        error!(%reason, "error calling jwk uri")
                    }
                    InvalidReason::UnusableKey(_) | InvalidReason::InvalidKeyMaterial(_) => {
                        warn!(%reason, "published key cannot verify tokens")
                    }
                    _ => debug!(%reason, "bearer token rejected"),
                }
                ValidationVerdict::Invalid(reason)
            }
        }
    }

    async fn check(&self, ctx: &RequestContext, token: &str) -> Result<(), InvalidReason> {
        // 1. Decode all three segments; the header yields alg and kid.
        let header = parse_header(token)?;

        // 2. Only allowed RSA algorithms get as far as a network call.
        let alg = Algorithm::from_str(&header.alg)
            .ok()
            .filter(|alg| self.algorithms.contains(alg))
            .ok_or_else(|| InvalidReason::UnsupportedAlgorithm(header.alg.clone()))?;

        // 3. Fetch the key set.
        let key_set = match ctx.run(self.source.fetch()).await {
            None => return Err(InvalidReason::DeadlineExceeded),
            Some(Err(e)) => return Err(InvalidReason::KeySetUnavailable(e.to_string())),
            Some(Ok(key_set)) => key_set,
        };

        // 4. Match the key by kid. A header without one matches nothing.
        let kid = header.kid.ok_or_else(|| InvalidReason::KeyNotFound(String::new()))?;
        let signing_key = key_set
            .find(&kid)
            .ok_or_else(|| InvalidReason::KeyNotFound(kid.clone()))?;

        // 5. Rebuild the public key from n and e.
        let decoding_key = PublicKeyMaterial::from_signing_key(signing_key)?.to_decoding_key()?;

        // 6. Verify the signature and the time-based claims that are present.
        let mut validation = Validation::new(alg);
        validation.leeway = self.leeway.as_secs();
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<serde_json::Value>(token, &decoding_key, &validation)
            .map_err(|e| InvalidReason::Rejected(e.to_string()))?;

        Ok(())
    }
}
