// bcrypt кодировщик
// Конверт целиком принадлежит примитиву: $2b$<cost>$<salt+hash>

use crate::crypto::provider::{PasswordEncoder, BCRYPT_ID};
use crate::crypto::suites::non_zero_or;
use crate::error::{PasswordError, Result};
use ::bcrypt::BcryptError;
use serde::{Deserialize, Serialize};

/// The `bcrypt` crate's documented default cost.
pub const DEFAULT_COST: u32 = ::bcrypt::DEFAULT_COST;
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BcryptParams {
    pub cost: u32,
}

impl Default for BcryptParams {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

/// Thin pass-through to the bcrypt primitive, which owns salt and format.
#[derive(Debug, Clone, Default)]
pub struct BcryptPasswordEncoder {
    params: BcryptParams,
}

impl BcryptPasswordEncoder {
    pub fn new(params: BcryptParams) -> Result<Self> {
        let cost = non_zero_or(params.cost, DEFAULT_COST);
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordError::Configuration(format!(
                "bcrypt cost must be in {MIN_COST}..={MAX_COST}, got {cost}"
            )));
        }
        Ok(Self {
            params: BcryptParams { cost },
        })
    }

    pub fn with_cost(cost: u32) -> Result<Self> {
        Self::new(BcryptParams { cost })
    }

    pub fn params(&self) -> &BcryptParams {
        &self.params
    }
}

fn map_bcrypt_error(err: BcryptError) -> PasswordError {
    match err {
        BcryptError::InvalidPrefix(_)
        | BcryptError::InvalidHash(_)
        | BcryptError::InvalidBase64(_) => PasswordError::InvalidFormat,
        BcryptError::Rand(e) => PasswordError::RandomSource(e.to_string()),
        other => PasswordError::Primitive(format!("bcrypt failed: {other}")),
    }
}

impl PasswordEncoder for BcryptPasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String> {
        ::bcrypt::hash(raw_password, self.params.cost).map_err(map_bcrypt_error)
    }

    fn verify(&self, raw_password: &str, encoded_password: &str) -> Result<bool> {
        // mismatch already comes back as Ok(false)
        ::bcrypt::verify(raw_password, encoded_password).map_err(map_bcrypt_error)
    }

    fn name(&self) -> &str {
        BCRYPT_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_encoder() -> BcryptPasswordEncoder {
        BcryptPasswordEncoder::with_cost(MIN_COST).unwrap()
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(BcryptPasswordEncoder::default().params().cost, ::bcrypt::DEFAULT_COST);
        assert_eq!(BcryptPasswordEncoder::with_cost(0).unwrap().params().cost, DEFAULT_COST);
    }

    #[test]
    fn test_encode_is_native_format() {
        let encoded = fast_encoder().encode("password123").unwrap();
        assert!(encoded.starts_with("$2b$04$"));
        assert_eq!(encoded.len(), 60);
        assert_ne!(encoded, "password123");
    }

    #[test]
    fn test_verify() {
        let encoder = fast_encoder();
        for password in ["password123", "", "p@$$w0rd!", "contraseña"] {
            let encoded = encoder.encode(password).unwrap();
            assert!(encoder.verify(password, &encoded).unwrap());
            assert!(!encoder.verify(&format!("wrong{password}"), &encoded).unwrap());
        }
    }

    #[test]
    fn test_cost_out_of_range() {
        assert!(matches!(
            BcryptPasswordEncoder::with_cost(3),
            Err(PasswordError::Configuration(_))
        ));
        assert!(matches!(
            BcryptPasswordEncoder::with_cost(32),
            Err(PasswordError::Configuration(_))
        ));
    }

    #[test]
    fn test_malformed_hash() {
        assert_eq!(
            fast_encoder().verify("password", "not-a-bcrypt-hash"),
            Err(PasswordError::InvalidFormat)
        );
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            map_bcrypt_error(BcryptError::Rand(getrandom::Error::UNSUPPORTED)),
            PasswordError::RandomSource(getrandom::Error::UNSUPPORTED.to_string())
        );
        assert_eq!(
            map_bcrypt_error(BcryptError::InvalidPrefix("3x".to_string())),
            PasswordError::InvalidFormat
        );
        assert!(matches!(
            map_bcrypt_error(BcryptError::CostNotAllowed(2)),
            PasswordError::Primitive(_)
        ));
    }

    #[test]
    fn test_name() {
        assert_eq!(fast_encoder().name(), "bcrypt");
    }
}
