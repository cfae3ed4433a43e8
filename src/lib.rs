// src/lib.rs

pub mod acquirer;
pub mod config;
pub mod context;
pub mod error;
pub mod gate;
pub mod telemetry;
pub mod validator;

/// The public prelude for the `aruna-auth` crate.
///
/// This module re-exports the most commonly used types for convenience.
pub mod prelude {
    pub use crate::acquirer::{AccessToken, TokenAcquirer};
    pub use crate::config::{SecurityConfig, SecurityConfigBuilder};
    pub use crate::context::RequestContext;
    pub use crate::error::ArunaAuthError;
    pub use crate::gate::{AccessDecision, AccessGate, DenyReason};
    pub use crate::validator::{InvalidReason, JwtValidator, ValidationVerdict};
    pub use jsonwebtoken::Algorithm;
}
