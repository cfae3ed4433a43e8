#![allow(dead_code)]

use aruna_auth::prelude::*;
use base64::engine::{general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{encode, EncodingKey, Header};
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{pkcs8::DecodePrivateKey, RsaPrivateKey};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const JWKS_PATH: &str = "/protocol/openid-connect/certs";

/// The key whose public half is published in the served key set.
pub fn signing_key() -> RsaPrivateKey {
    RsaPrivateKey::from_pkcs8_pem(include_str!("../fixtures/signing_key.pem")).unwrap()
}

/// A key the issuer never published.
pub fn rogue_key() -> RsaPrivateKey {
    RsaPrivateKey::from_pkcs8_pem(include_str!("../fixtures/rogue_key.pem")).unwrap()
}

pub fn now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
}

pub fn default_claims() -> Value {
    json!({
        "iss": "https://id.test.local/realms/aruna",
        "sub": "service-account-orders",
        "aud": "account",
        "iat": now(),
        "exp": now() + 3600,
    })
}

pub fn sign(key: &RsaPrivateKey, alg: Algorithm, kid: Option<&str>, claims: &Value) -> String {
    let pkcs1_der = key.to_pkcs1_der().unwrap();
    let encoding_key = EncodingKey::from_rsa_der(pkcs1_der.as_bytes());
    let mut header = Header::new(alg);
    header.kid = kid.map(str::to_string);
    encode(&header, claims, &encoding_key).unwrap()
}

/// An RS256 token carrying `kid` and the default claims.
pub fn token(key: &RsaPrivateKey, kid: &str) -> String {
    sign(key, Algorithm::RS256, Some(kid), &default_claims())
}

pub fn jwk(key: &RsaPrivateKey, kid: &str) -> Value {
    let public_key = key.to_public_key();
    json!({
        "kid": kid,
        "kty": "RSA",
        "alg": "RS256",
        "use": "sig",
        "n": URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
        "e": URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
    })
}

/// Starts a mock issuer serving `jwks` at [`JWKS_PATH`].
pub async fn serve_jwks(jwks: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(jwks))
        .mount(&server)
        .await;
    server
}

pub fn config_for(jwk_uri: &str) -> SecurityConfig {
    SecurityConfigBuilder::new()
        .jwk_uri(jwk_uri)
        .unwrap()
        .build()
        .unwrap()
}

pub fn validator_for(server: &MockServer) -> JwtValidator {
    JwtValidator::new(&config_for(&format!("{}{}", server.uri(), JWKS_PATH))).unwrap()
}
