//! Defines the PasswordEncoder trait shared by every hashing scheme.

use crate::error::Result;
use core::fmt::Debug;

/// Stable scheme identifiers. These appear inside `{...}` in routed envelopes,
/// so they must never change once credentials have been stored with them.
pub const BCRYPT_ID: &str = "bcrypt";
pub const SCRYPT_ID: &str = "scrypt";
pub const ARGON2_ID: &str = "argon2";
pub const PBKDF2_ID: &str = "pbkdf2";
pub const NOOP_ID: &str = "noop";
pub const DELEGATING_ID: &str = "delegating";

/// Uniform operation set every password hashing scheme implements.
///
/// Implementations hold only immutable parameters, so a single instance can be
/// shared across threads behind an `Arc<dyn PasswordEncoder>`.
pub trait PasswordEncoder: Debug + Send + Sync {
    /// Hashes `raw_password` with a fresh salt and returns the storable envelope.
    fn encode(&self, raw_password: &str) -> Result<String>;

    /// Recomputes the hash of `raw_password` from the parameters and salt carried by
    /// `encoded_password` and compares it in constant time.
    ///
    /// A mismatch is `Ok(false)`; only malformed input or a failing primitive is an error.
    fn verify(&self, raw_password: &str, encoded_password: &str) -> Result<bool>;

    /// Returns the stable identifier of this scheme.
    fn name(&self) -> &str;
}
