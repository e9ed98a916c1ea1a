//! Централизованная конфигурация кодировщиков паролей
//!
//! One place that names the default scheme and the cost parameters of every scheme,
//! and turns them into a ready [`DelegatingPasswordEncoder`].

use crate::crypto::delegating::{DelegatingPasswordEncoder, EncoderRegistry};
use crate::crypto::provider::{ARGON2_ID, BCRYPT_ID, NOOP_ID, PBKDF2_ID, SCRYPT_ID};
use crate::crypto::suites::argon2::{Argon2Params, Argon2PasswordEncoder};
use crate::crypto::suites::bcrypt::{BcryptParams, BcryptPasswordEncoder};
use crate::crypto::suites::noop::NoOpPasswordEncoder;
use crate::crypto::suites::pbkdf2::{Pbkdf2Params, Pbkdf2PasswordEncoder};
use crate::crypto::suites::scrypt::{ScryptParams, ScryptPasswordEncoder};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

/// Основная структура конфигурации
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Scheme used to encode new passwords. Must be one of the registered ids.
    pub default_scheme: String,

    /// Register the plaintext `noop` scheme. Never enable in production.
    pub enable_noop: bool,

    pub bcrypt: BcryptParams,
    pub scrypt: ScryptParams,
    pub argon2: Argon2Params,
    pub pbkdf2: Pbkdf2Params,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_scheme: BCRYPT_ID.to_string(),
            enable_noop: false,
            bcrypt: BcryptParams::default(),
            scrypt: ScryptParams::default(),
            argon2: Argon2Params::default(),
            pbkdf2: Pbkdf2Params::default(),
        }
    }
}

impl Config {
    /// Создать конфигурацию из переменных окружения
    ///
    /// Starts from the defaults; unset variables keep them, unparsable ones are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("PASSFORGE_DEFAULT_SCHEME") {
            config.default_scheme = val;
        }
        override_from_env("PASSFORGE_ENABLE_NOOP", &mut config.enable_noop);

        override_from_env("BCRYPT_COST", &mut config.bcrypt.cost);

        override_from_env("SCRYPT_N", &mut config.scrypt.n);
        override_from_env("SCRYPT_R", &mut config.scrypt.r);
        override_from_env("SCRYPT_P", &mut config.scrypt.p);

        override_from_env("ARGON2_TIME", &mut config.argon2.time);
        override_from_env("ARGON2_MEMORY", &mut config.argon2.memory);
        override_from_env("ARGON2_THREADS", &mut config.argon2.threads);

        override_from_env("PBKDF2_ITERATIONS", &mut config.pbkdf2.iterations);
        override_from_env("PBKDF2_HASH", &mut config.pbkdf2.hash);

        config
    }

    /// Разобрать конфигурацию из JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Строит диспетчер со всеми схемами
    ///
    /// # Errors
    ///
    /// `Configuration` if any scheme's parameters are out of range or
    /// `default_scheme` is not among the registered ids.
    pub fn build(&self) -> Result<DelegatingPasswordEncoder> {
        let bcrypt = BcryptPasswordEncoder::new(self.bcrypt)?;
        let scrypt = ScryptPasswordEncoder::new(self.scrypt)?;
        let argon2 = Argon2PasswordEncoder::new(self.argon2)?;
        let pbkdf2 = Pbkdf2PasswordEncoder::new(self.pbkdf2)?;

        let mut encoders: EncoderRegistry = HashMap::new();
        encoders.insert(BCRYPT_ID.to_string(), Arc::new(bcrypt));
        encoders.insert(SCRYPT_ID.to_string(), Arc::new(scrypt));
        encoders.insert(ARGON2_ID.to_string(), Arc::new(argon2));
        encoders.insert(PBKDF2_ID.to_string(), Arc::new(pbkdf2));
        if self.enable_noop {
            encoders.insert(NOOP_ID.to_string(), Arc::new(NoOpPasswordEncoder::new()));
        }

        tracing::debug!(
            default_scheme = %self.default_scheme,
            schemes = encoders.len(),
            "building delegating password encoder"
        );
        DelegatingPasswordEncoder::new(self.default_scheme.clone(), encoders)
    }
}

fn override_from_env<T: FromStr>(name: &str, target: &mut T) {
    if let Ok(val) = std::env::var(name) {
        match val.parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!(variable = name, "ignoring unparsable environment override"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::provider::PasswordEncoder;
    use crate::crypto::suites::pbkdf2::Pbkdf2Hash;
    use crate::error::PasswordError;

    const FAST_JSON: &str = r#"{
        "defaultScheme": "pbkdf2",
        "enableNoop": true,
        "bcrypt": { "cost": 4 },
        "scrypt": { "n": 1024 },
        "argon2": { "memory": 1024, "threads": 1 },
        "pbkdf2": { "iterations": 1000, "hash": "sha512" }
    }"#;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_scheme, "bcrypt");
        assert!(!config.enable_noop);
        assert_eq!(config.pbkdf2.iterations, 10_000);
        assert_eq!(config.scrypt.n, 16_384);
        assert_eq!(config.argon2.memory, 64 * 1024);
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = Config::from_json(FAST_JSON).unwrap();
        assert_eq!(config.default_scheme, "pbkdf2");
        assert_eq!(config.scrypt.n, 1024);
        assert_eq!(config.scrypt.r, 8);
        assert_eq!(config.argon2.time, 1);
        assert_eq!(config.argon2.key_len, 32);
        assert_eq!(config.pbkdf2.hash, Pbkdf2Hash::Sha512);
        assert_eq!(config.pbkdf2.salt_len, 16);

        let empty = Config::from_json("{}").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(Config::from_json("not json"), Err(PasswordError::Configuration(_))));
        assert!(matches!(
            Config::from_json(r#"{"pbkdf2": {"hash": "md5"}}"#),
            Err(PasswordError::Configuration(_))
        ));
    }

    #[test]
    fn test_build_registers_all_schemes() {
        let delegating = Config::from_json(FAST_JSON).unwrap().build().unwrap();
        assert_eq!(delegating.default_id(), "pbkdf2");
        assert_eq!(
            delegating.schemes(),
            vec!["argon2", "bcrypt", "noop", "pbkdf2", "scrypt"]
        );

        let encoded = delegating.encode("hunter2").unwrap();
        assert!(encoded.starts_with("{pbkdf2}iterations=1000,keyLen=32,hashFunc=sha512$"));
        assert!(delegating.verify("hunter2", &encoded).unwrap());
    }

    #[test]
    fn test_build_without_noop() {
        let delegating = Config::default().build().unwrap();
        assert!(delegating.encoder("noop").is_none());
        assert_eq!(delegating.verify("pw", "{noop}pw"), Err(PasswordError::UnknownEncoding));
    }

    #[test]
    fn test_build_rejects_bad_config() {
        let config = Config {
            default_scheme: "md5".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.build(), Err(PasswordError::Configuration(_))));

        let config = Config {
            bcrypt: BcryptParams { cost: 40 },
            ..Config::default()
        };
        assert!(matches!(config.build(), Err(PasswordError::Configuration(_))));
    }

    #[test]
    fn test_from_env_overrides() {
        std::env::set_var("PASSFORGE_DEFAULT_SCHEME", "argon2");
        std::env::set_var("PBKDF2_ITERATIONS", "2000");
        std::env::set_var("SCRYPT_R", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.default_scheme, "argon2");
        assert_eq!(config.pbkdf2.iterations, 2000);
        assert_eq!(config.scrypt.r, 8);

        std::env::remove_var("PASSFORGE_DEFAULT_SCHEME");
        std::env::remove_var("PBKDF2_ITERATIONS");
        std::env::remove_var("SCRYPT_R");
    }
}
