// NoOp кодировщик: пароль хранится как есть. Только для тестов!

use crate::crypto::provider::{PasswordEncoder, NOOP_ID};
use crate::error::Result;

/// Stores passwords verbatim.
///
/// **Not for production.** Exists to exercise the dispatcher and for test fixtures.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPasswordEncoder;

impl NoOpPasswordEncoder {
    pub fn new() -> Self {
        tracing::warn!("noop password encoder in use; passwords are stored in plaintext");
        Self
    }
}

impl PasswordEncoder for NoOpPasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String> {
        Ok(raw_password.to_string())
    }

    fn verify(&self, raw_password: &str, encoded_password: &str) -> Result<bool> {
        Ok(raw_password == encoded_password)
    }

    fn name(&self) -> &str {
        NOOP_ID
    }
}
