// src/validator/model.rs

use serde::Deserialize;

/// Represents a JSON Web Key Set (JWKS), which is a collection of JWKs.
#[derive(Debug, Deserialize)]
pub struct KeySet {
    pub keys: Vec<SigningKey>,
}

impl KeySet {
    /// Linear scan for the first key whose `kid` equals `kid` exactly.
    pub fn find(&self, kid: &str) -> Option<&SigningKey> {
        self.keys.iter().find(|key| key.kid.as_deref() == Some(kid))
    }
}

/// Represents a single JSON Web Key (JWK) as defined in RFC 7517.
///
/// Every member is optional at decode time so that one incomplete key does
/// not poison the whole set; missing members are reported when the matched
/// key is turned into key material.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SigningKey {
    pub kid: Option<String>,
    pub kty: Option<String>,
    pub alg: Option<String>,
    #[serde(rename = "use")]
    pub use_purpose: Option<String>,
    pub n: Option<String>,
    pub e: Option<String>,
    #[serde(default, alias = "x5C")]
    pub x5c: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_key_set_with_partial_keys() {
        let jwks: KeySet = serde_json::from_str(
            r#"{"keys":[
                {"kid":"enc-1","kty":"RSA","use":"enc"},
                {"kid":"k1","kty":"RSA","alg":"RS256","use":"sig",
                 "n":"sXch","e":"AQAB","x5C":["MIIC"]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(jwks.keys.len(), 2);
        assert!(jwks.keys[0].n.is_none());

        let key = jwks.find("k1").unwrap();
        assert_eq!(key.alg.as_deref(), Some("RS256"));
        assert_eq!(key.use_purpose.as_deref(), Some("sig"));
        assert_eq!(key.x5c, vec!["MIIC".to_string()]);
    }

    #[test]
    fn find_requires_exact_kid() {
        let jwks: KeySet =
            serde_json::from_str(r#"{"keys":[{"kid":"K1"},{"kty":"RSA"}]}"#).unwrap();
        assert!(jwks.find("k1").is_none());
        assert!(jwks.find("").is_none());
        assert!(jwks.find("K1").is_some());
    }

    #[test]
    fn missing_keys_member_is_an_error() {
        assert!(serde_json::from_str::<KeySet>(r#"{"error":"not found"}"#).is_err());
    }
}
