// Argon2id кодировщик
// Формат: time=<n>,memory=<KiB>,threads=<n>,keyLen=<n>$<salt>$<hash>

use crate::crypto::envelope::{self, CompositeParts};
use crate::crypto::provider::{PasswordEncoder, ARGON2_ID};
use crate::crypto::suites::non_zero_or;
use crate::error::{PasswordError, Result};
use crate::utils::crypto_utils::{constant_time_eq, generate_salt};
use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

pub const DEFAULT_TIME: u32 = 1;
/// 64 MiB, expressed in KiB.
pub const DEFAULT_MEMORY: u32 = 64 * 1024;
pub const DEFAULT_THREADS: u8 = 4;
pub const DEFAULT_KEY_LEN: u32 = 32;
pub const DEFAULT_SALT_LEN: u32 = 16;
/// Shortest salt the primitive accepts.
pub const MIN_SALT_LEN: u32 = 8;
/// Upper bound on `memory` (4 GiB in KiB). Stored envelopes above it are refused
/// before anything is allocated.
pub const MAX_MEMORY: u32 = 4 * 1024 * 1024;

const PARAM_KEYS: [&str; 4] = ["time", "memory", "threads", "keyLen"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Argon2Params {
    /// Number of passes over memory.
    pub time: u32,
    /// Memory size in KiB.
    pub memory: u32,
    pub threads: u8,
    pub key_len: u32,
    pub salt_len: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            time: DEFAULT_TIME,
            memory: DEFAULT_MEMORY,
            threads: DEFAULT_THREADS,
            key_len: DEFAULT_KEY_LEN,
            salt_len: DEFAULT_SALT_LEN,
        }
    }
}

impl Argon2Params {
    fn resolved(self) -> Self {
        Self {
            time: non_zero_or(self.time, DEFAULT_TIME),
            memory: non_zero_or(self.memory, DEFAULT_MEMORY),
            threads: non_zero_or(self.threads, DEFAULT_THREADS),
            key_len: non_zero_or(self.key_len, DEFAULT_KEY_LEN),
            salt_len: non_zero_or(self.salt_len, DEFAULT_SALT_LEN),
        }
    }
}

/// Builds an Argon2id v1.3 context for the given cost parameters.
fn context(time: u32, memory: u32, threads: u8, key_len: u32) -> Result<Argon2<'static>> {
    if memory > MAX_MEMORY {
        return Err(PasswordError::Primitive(format!(
            "argon2 memory {memory} KiB exceeds the {MAX_MEMORY} KiB limit"
        )));
    }
    let params = Params::new(memory, time, u32::from(threads), Some(key_len as usize))
        .map_err(|e| PasswordError::Primitive(format!("argon2 parameters rejected: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn derive(
    ctx: &Argon2<'_>,
    password: &[u8],
    salt: &[u8],
    key_len: u32,
) -> Result<Zeroizing<Vec<u8>>> {
    let mut key = Zeroizing::new(vec![0u8; key_len as usize]);
    ctx.hash_password_into(password, salt, &mut key)
        .map_err(|e| PasswordError::Primitive(format!("argon2 failed: {e}")))?;
    Ok(key)
}

#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordEncoder {
    params: Argon2Params,
}

impl Argon2PasswordEncoder {
    pub fn new(params: Argon2Params) -> Result<Self> {
        let params = params.resolved();
        context(params.time, params.memory, params.threads, params.key_len)
            .map_err(PasswordError::into_configuration)?;
        if params.salt_len < MIN_SALT_LEN {
            return Err(PasswordError::Configuration(format!(
                "argon2 salt must be at least {MIN_SALT_LEN} bytes"
            )));
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &Argon2Params {
        &self.params
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String> {
        let p = &self.params;
        let ctx = context(p.time, p.memory, p.threads, p.key_len)?;
        let salt = generate_salt(p.salt_len as usize)?;
        let key = derive(&ctx, raw_password.as_bytes(), &salt, p.key_len)?;

        Ok(envelope::format_composite(
            &[
                ("time", p.time.to_string()),
                ("memory", p.memory.to_string()),
                ("threads", p.threads.to_string()),
                ("keyLen", p.key_len.to_string()),
            ],
            &salt,
            &key,
        ))
    }

    fn verify(&self, raw_password: &str, encoded_password: &str) -> Result<bool> {
        let parts = CompositeParts::split(encoded_password)?;
        let [time, memory, threads, key_len] = envelope::parse_params(parts.params, PARAM_KEYS)?;
        let time: u32 = envelope::parse_number(time)?;
        let memory: u32 = envelope::parse_number(memory)?;
        let threads: u8 = envelope::parse_number(threads)?;
        let key_len: u32 = envelope::parse_number(key_len)?;

        let salt = parts.decode_salt()?;
        let stored = parts.decode_hash()?;
        if stored.len() != key_len as usize {
            return Ok(false);
        }

        let ctx = context(time, memory, threads, key_len)?;
        let computed = derive(&ctx, raw_password.as_bytes(), &salt, key_len)?;
        Ok(constant_time_eq(&stored, &computed))
    }

    fn name(&self) -> &str {
        ARGON2_ID
    }
}
