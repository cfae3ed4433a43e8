// src/gate.rs

use crate::config::SecurityConfig;
use crate::context::RequestContext;
use crate::validator::{InvalidReason, JwtValidator};
use reqwest::StatusCode;
use tracing::warn;

/// Why the gate turned a request away.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DenyReason {
    /// No `Authorization` header, or an empty one.
    MissingCredentials,
    /// The bearer token did not validate.
    InvalidToken(InvalidReason),
}

/// What the HTTP layer should do with an inbound request on an authenticated route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// The status to abort with, `403 Forbidden` for every denial.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::Deny(_) => Some(StatusCode::FORBIDDEN),
        }
    }
}

/// Enforcement point for authenticated routes, run before any business logic.
#[derive(Clone)]
pub struct AccessGate {
    enabled: bool,
    validator: JwtValidator,
}

impl AccessGate {
    pub fn new(config: &SecurityConfig, validator: JwtValidator) -> Self {
        Self { enabled: config.enabled, validator }
    }

    /// Decides on a request given its raw `Authorization` header value.
    ///
    /// With security disabled every request is allowed and the header is not looked at.
    pub async fn check(&self, ctx: &RequestContext, authorization: Option<&str>) -> AccessDecision {
        if !self.enabled {
            return AccessDecision::Allow;
        }

        let header = match authorization {
            Some(value) if !value.is_empty() => value,
            _ => {
                warn!(
                    correlation_id = %ctx.correlation_id(),
                    "request without Authorization header"
                );
                return AccessDecision::Deny(DenyReason::MissingCredentials);
            }
        };

        match self.validator.verdict(ctx, header).await.reason() {
            None => AccessDecision::Allow,
            Some(reason) => AccessDecision::Deny(DenyReason::InvalidToken(reason.clone())),
        }
    }
}
