// src/validator/keys.rs

use super::model::SigningKey;
use super::InvalidReason;
use base64::engine::{general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::DecodingKey;
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::{BigUint, RsaPublicKey};

/// An RSA public key rebuilt from the `n` and `e` members of a JWK.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKeyMaterial {
    pub modulus: BigUint,
    pub exponent: u64,
}

impl PublicKeyMaterial {
    /// Reconstructs the key from a published JWK.
    ///
    /// Both members are base64url without padding and encode big-endian
    /// unsigned integers (RFC 7518 section 6.3.1).
    pub fn from_signing_key(key: &SigningKey) -> Result<Self, InvalidReason> {
        ensure_rsa_signing_key(key)?;

        let e = key
            .e
            .as_deref()
            .ok_or_else(|| invalid_material("RSA key missing 'e' component"))?;
        let n = key
            .n
            .as_deref()
            .ok_or_else(|| invalid_material("RSA key missing 'n' component"))?;

        let exponent_bytes = URL_SAFE_NO_PAD
            .decode(e)
            .map_err(|err| invalid_material(format!("exponent is not base64url: {}", err)))?;
        let exponent = exponent_from_be_bytes(&exponent_bytes)?;

        let modulus_bytes = URL_SAFE_NO_PAD
            .decode(n)
            .map_err(|err| invalid_material(format!("modulus is not base64url: {}", err)))?;
        if modulus_bytes.iter().all(|byte| *byte == 0) {
            return Err(invalid_material("modulus must be positive"));
        }

        Ok(Self { modulus: BigUint::from_bytes_be(&modulus_bytes), exponent })
    }

    /// Produces a `jsonwebtoken` verification key.
    ///
    /// The components are checked by `rsa` first, so an exponent below 2 or
    /// an oversized modulus is refused here rather than at signature time.
    pub fn to_decoding_key(&self) -> Result<DecodingKey, InvalidReason> {
        let public_key = RsaPublicKey::new(self.modulus.clone(), BigUint::from(self.exponent))
            .map_err(|err| InvalidReason::InvalidKeyMaterial(err.to_string()))?;
        let der = public_key
            .to_pkcs1_der()
            .map_err(|err| InvalidReason::InvalidKeyMaterial(err.to_string()))?;
        Ok(DecodingKey::from_rsa_der(der.as_bytes()))
    }
}

fn ensure_rsa_signing_key(key: &SigningKey) -> Result<(), InvalidReason> {
    if key.kty.as_deref() != Some("RSA") {
        return Err(InvalidReason::UnusableKey(format!(
            "key type {:?} is not RSA",
            key.kty.as_deref().unwrap_or("")
        )));
    }
    match key.alg.as_deref() {
        None | Some("") => Ok(()),
        Some(alg) if alg.starts_with("RS") || alg.starts_with("PS") => Ok(()),
        Some(alg) => Err(InvalidReason::UnusableKey(format!(
            "key algorithm {} is not an RSA signing algorithm",
            alg
        ))),
    }
}

fn invalid_material(msg: impl Into<String>) -> InvalidReason {
    InvalidReason::InvalidKeyMaterial(msg.into())
}

// `e` must fit a machine word.
fn exponent_from_be_bytes(bytes: &[u8]) -> Result<u64, InvalidReason> {
    let significant = match bytes.iter().position(|byte| *byte != 0) {
        Some(first) => &bytes[first..],
        None => &[][..],
    };
    if significant.len() > 8 {
        return Err(InvalidReason::InvalidKeyMaterial(format!(
            "exponent is {} bytes wide, larger than 64 bits",
            significant.len()
        )));
    }
    Ok(significant.iter().fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)))
}
