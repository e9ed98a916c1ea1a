// PBKDF2-HMAC кодировщик
// Формат: iterations=<n>,keyLen=<n>,hashFunc=<name>$<salt>$<hash>

use crate::crypto::envelope::{self, CompositeParts};
use crate::crypto::provider::{PasswordEncoder, PBKDF2_ID};
use crate::crypto::suites::non_zero_or;
use crate::error::{PasswordError, Result};
use crate::utils::crypto_utils::{constant_time_eq, generate_salt};
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha512};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

pub const DEFAULT_ITERATIONS: u32 = 10_000;
pub const DEFAULT_KEY_LEN: usize = 32;
pub const DEFAULT_SALT_LEN: usize = 16;

const PARAM_KEYS: [&str; 3] = ["iterations", "keyLen", "hashFunc"];

/// HMAC hash function used inside PBKDF2. Serialized by its envelope name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pbkdf2Hash {
    #[default]
    Sha256,
    Sha512,
}

impl Pbkdf2Hash {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pbkdf2Hash::Sha256 => "sha256",
            Pbkdf2Hash::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for Pbkdf2Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pbkdf2Hash {
    type Err = PasswordError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "sha256" => Ok(Pbkdf2Hash::Sha256),
            "sha512" => Ok(Pbkdf2Hash::Sha512),
            other => Err(PasswordError::UnsupportedAlgorithm(format!(
                "unsupported hash function: {other}"
            ))),
        }
    }
}

/// PBKDF2 parameters. Zero fields are replaced by the defaults above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pbkdf2Params {
    pub iterations: u32,
    pub key_len: usize,
    pub salt_len: usize,
    pub hash: Pbkdf2Hash,
}

impl Default for Pbkdf2Params {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            key_len: DEFAULT_KEY_LEN,
            salt_len: DEFAULT_SALT_LEN,
            hash: Pbkdf2Hash::Sha256,
        }
    }
}

impl Pbkdf2Params {
    fn resolved(self) -> Self {
        Self {
            iterations: non_zero_or(self.iterations, DEFAULT_ITERATIONS),
            key_len: non_zero_or(self.key_len, DEFAULT_KEY_LEN),
            salt_len: non_zero_or(self.salt_len, DEFAULT_SALT_LEN),
            hash: self.hash,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pbkdf2PasswordEncoder {
    params: Pbkdf2Params,
}

impl Pbkdf2PasswordEncoder {
    pub fn new(params: Pbkdf2Params) -> Result<Self> {
        Ok(Self {
            params: params.resolved(),
        })
    }

    pub fn params(&self) -> &Pbkdf2Params {
        &self.params
    }
}

impl Default for Pbkdf2PasswordEncoder {
    fn default() -> Self {
        Self {
            params: Pbkdf2Params::default(),
        }
    }
}

fn derive(
    hash: Pbkdf2Hash,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    if iterations == 0 || key_len == 0 {
        return Err(PasswordError::Primitive(
            "pbkdf2 iterations and key length must be positive".to_string(),
        ));
    }

    let mut key = Zeroizing::new(vec![0u8; key_len]);
    match hash {
        Pbkdf2Hash::Sha256 => pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key),
        Pbkdf2Hash::Sha512 => pbkdf2_hmac::<Sha512>(password, salt, iterations, &mut key),
    }
    Ok(key)
}

impl PasswordEncoder for Pbkdf2PasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String> {
        let p = &self.params;
        let salt = generate_salt(p.salt_len)?;
        let key = derive(p.hash, raw_password.as_bytes(), &salt, p.iterations, p.key_len)?;

        Ok(envelope::format_composite(
            &[
                ("iterations", p.iterations.to_string()),
                ("keyLen", p.key_len.to_string()),
                ("hashFunc", p.hash.to_string()),
            ],
            &salt,
            &key,
        ))
    }

    fn verify(&self, raw_password: &str, encoded_password: &str) -> Result<bool> {
        let parts = CompositeParts::split(encoded_password)?;
        let [iterations, key_len, hash_func] = envelope::parse_params(parts.params, PARAM_KEYS)?;
        let iterations: u32 = envelope::parse_number(iterations)?;
        let key_len: usize = envelope::parse_number(key_len)?;
        let hash: Pbkdf2Hash = hash_func.parse()?;

        let salt = parts.decode_salt()?;
        let stored = parts.decode_hash()?;
        if stored.len() != key_len {
            return Ok(false);
        }

        let computed = derive(hash, raw_password.as_bytes(), &salt, iterations, key_len)?;
        Ok(constant_time_eq(&stored, &computed))
    }

    fn name(&self) -> &str {
        PBKDF2_ID
    }
}
