// scrypt кодировщик
// Формат: N=<n>,r=<n>,p=<n>,keyLen=<n>$<salt>$<hash>

use crate::crypto::envelope::{self, CompositeParts};
use crate::crypto::provider::{PasswordEncoder, SCRYPT_ID};
use crate::crypto::suites::non_zero_or;
use crate::error::{PasswordError, Result};
use crate::utils::crypto_utils::{constant_time_eq, generate_salt};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// CPU/memory cost, 2^14.
pub const DEFAULT_N: u64 = 16_384;
pub const DEFAULT_R: u32 = 8;
pub const DEFAULT_P: u32 = 1;
pub const DEFAULT_KEY_LEN: usize = 32;
pub const DEFAULT_SALT_LEN: usize = 16;

const PARAM_KEYS: [&str; 4] = ["N", "r", "p", "keyLen"];

/// scrypt parameters. `n` is the cost itself (a power of two), not its logarithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScryptParams {
    pub n: u64,
    pub r: u32,
    pub p: u32,
    pub key_len: usize,
    pub salt_len: usize,
}

impl Default for ScryptParams {
    fn default() -> Self {
        Self {
            n: DEFAULT_N,
            r: DEFAULT_R,
            p: DEFAULT_P,
            key_len: DEFAULT_KEY_LEN,
            salt_len: DEFAULT_SALT_LEN,
        }
    }
}

impl ScryptParams {
    fn resolved(self) -> Self {
        Self {
            n: non_zero_or(self.n, DEFAULT_N),
            r: non_zero_or(self.r, DEFAULT_R),
            p: non_zero_or(self.p, DEFAULT_P),
            key_len: non_zero_or(self.key_len, DEFAULT_KEY_LEN),
            salt_len: non_zero_or(self.salt_len, DEFAULT_SALT_LEN),
        }
    }
}

/// Maps envelope parameters onto the primitive's, which takes log2(N).
///
/// The primitive's own length field only bounds its PHC output; the derived key length
/// is taken from the output buffer in [`derive`].
fn primitive_params(n: u64, r: u32, p: u32) -> Result<::scrypt::Params> {
    if n < 2 || !n.is_power_of_two() {
        return Err(PasswordError::Primitive(format!(
            "scrypt N must be a power of two greater than 1, got {n}"
        )));
    }
    let log_n = n.trailing_zeros() as u8;
    ::scrypt::Params::new(log_n, r, p, ::scrypt::Params::RECOMMENDED_LEN)
        .map_err(|e| PasswordError::Primitive(format!("scrypt parameters rejected: {e}")))
}

#[derive(Debug, Clone, Default)]
pub struct ScryptPasswordEncoder {
    params: ScryptParams,
}

impl ScryptPasswordEncoder {
    pub fn new(params: ScryptParams) -> Result<Self> {
        let params = params.resolved();
        primitive_params(params.n, params.r, params.p)
            .map_err(PasswordError::into_configuration)?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ScryptParams {
        &self.params
    }
}

fn derive(
    password: &[u8],
    salt: &[u8],
    params: &::scrypt::Params,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    let mut key = Zeroizing::new(vec![0u8; key_len]);
    ::scrypt::scrypt(password, salt, params, &mut key)
        .map_err(|e| PasswordError::Primitive(format!("scrypt failed: {e}")))?;
    Ok(key)
}

impl PasswordEncoder for ScryptPasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String> {
        let p = &self.params;
        let params = primitive_params(p.n, p.r, p.p)?;
        let salt = generate_salt(p.salt_len)?;
        let key = derive(raw_password.as_bytes(), &salt, &params, p.key_len)?;

        Ok(envelope::format_composite(
            &[
                ("N", p.n.to_string()),
                ("r", p.r.to_string()),
                ("p", p.p.to_string()),
                ("keyLen", p.key_len.to_string()),
            ],
            &salt,
            &key,
        ))
    }

    fn verify(&self, raw_password: &str, encoded_password: &str) -> Result<bool> {
        let parts = CompositeParts::split(encoded_password)?;
        let [n, r, p, key_len] = envelope::parse_params(parts.params, PARAM_KEYS)?;
        let n: u64 = envelope::parse_number(n)?;
        let r: u32 = envelope::parse_number(r)?;
        let p: u32 = envelope::parse_number(p)?;
        let key_len: usize = envelope::parse_number(key_len)?;

        let salt = parts.decode_salt()?;
        let stored = parts.decode_hash()?;
        if stored.len() != key_len {
            return Ok(false);
        }

        let params = primitive_params(n, r, p)?;
        let computed = derive(raw_password.as_bytes(), &salt, &params, key_len)?;
        Ok(constant_time_eq(&stored, &computed))
    }

    fn name(&self) -> &str {
        SCRYPT_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_encoder() -> ScryptPasswordEncoder {
        ScryptPasswordEncoder::new(ScryptParams {
            n: 1024,
            ..ScryptParams::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_params() {
        let encoder = ScryptPasswordEncoder::default();
        assert_eq!(encoder.params().n, 16_384);
        assert_eq!(encoder.params().r, 8);
        assert_eq!(encoder.params().p, 1);
        assert_eq!(encoder.params().key_len, 32);
        assert_eq!(encoder.params().salt_len, 16);
    }

    #[test]
    fn test_encode_format() {
        let encoded = fast_encoder().encode("password123").unwrap();
        let parts = CompositeParts::split(&encoded).unwrap();

        assert_eq!(parts.params, "N=1024,r=8,p=1,keyLen=32");
        assert_eq!(parts.decode_salt().unwrap().len(), 16);
        assert_eq!(parts.decode_hash().unwrap().len(), 32);
    }

    #[test]
    fn test_round_trip() {
        let encoder = fast_encoder();
        for password in ["password123", "", "p@$$w0rd!", "пароль"] {
            let encoded = encoder.encode(password).unwrap();
            assert!(encoder.verify(password, &encoded).unwrap());
            assert!(!encoder.verify(&format!("wrong{password}"), &encoded).unwrap());
        }
    }

    #[test]
    fn test_known_vector() {
        // RFC 7914 §12: P="password", S="NaCl", N=1024, r=8, p=16, dkLen=64
        let hash = hex::decode(
            "fdbabe1c9d3472007856e7190d01e9fe7c6ad7cbc8237830e77376634b373162\
             2eaf30d92e22a3886ff109279d9830dac727afb94a83ee6d8360cbdfa2cc0640",
        )
        .unwrap();
        let envelope = format!(
            "N=1024,r=8,p=16,keyLen=64${}${}",
            crate::utils::b64::encode(b"NaCl"),
            crate::utils::b64::encode(&hash)
        );

        assert!(fast_encoder().verify("password", &envelope).unwrap());
        assert!(!fast_encoder().verify("Password", &envelope).unwrap());
    }

    #[test]
    fn test_invalid_cost_is_rejected() {
        let result = ScryptPasswordEncoder::new(ScryptParams {
            n: 1000,
            ..ScryptParams::default()
        });
        assert!(matches!(result, Err(PasswordError::Configuration(_))));

        let verify = fast_encoder().verify("p", "N=1000,r=8,p=1,keyLen=4$c2FsdA==$aGFzaA==");
        assert!(matches!(verify, Err(PasswordError::Primitive(_))));
    }

    #[test]
    fn test_key_len_outside_phc_range() {
        for key_len in [8, 65, 128] {
            let encoder = ScryptPasswordEncoder::new(ScryptParams {
                n: 1024,
                key_len,
                ..ScryptParams::default()
            })
            .unwrap();

            let encoded = encoder.encode("password123").unwrap();
            let parts = CompositeParts::split(&encoded).unwrap();
            assert_eq!(parts.params, format!("N=1024,r=8,p=1,keyLen={key_len}"));
            assert_eq!(parts.decode_hash().unwrap().len(), key_len);

            assert!(encoder.verify("password123", &encoded).unwrap());
            assert!(!encoder.verify("password124", &encoded).unwrap());
            // stored envelopes carry their own keyLen
            assert!(fast_encoder().verify("password123", &encoded).unwrap());
        }
    }

    #[test]
    fn test_configuration_error_message() {
        let err = ScryptPasswordEncoder::new(ScryptParams {
            n: 1000,
            ..ScryptParams::default()
        })
        .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("invalid configuration: scrypt N"), "{message}");
        assert!(!message.contains("primitive failure"), "{message}");
    }

    #[test]
    fn test_invalid_envelopes() {
        let encoder = fast_encoder();
        assert_eq!(encoder.verify("p", "invalid-format"), Err(PasswordError::InvalidFormat));
        assert_eq!(
            encoder.verify("p", "N=1024,r=8,p=1,keyLen=32$c2FsdA=="),
            Err(PasswordError::InvalidFormat)
        );
        assert_eq!(
            encoder.verify("p", "r=8,N=1024,p=1,keyLen=32$c2FsdA==$aGFzaA=="),
            Err(PasswordError::InvalidFormat)
        );
    }

    #[test]
    fn test_name() {
        assert_eq!(fast_encoder().name(), "scrypt");
    }
}
