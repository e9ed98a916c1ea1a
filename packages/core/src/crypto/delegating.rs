//! Algorithm-agile dispatcher.
//!
//! New passwords are encoded with the default scheme and tagged `{id}`; stored envelopes
//! are routed back to whichever registered scheme their tag names. Changing the default
//! therefore never breaks verification of older credentials, as long as their scheme
//! stays registered.

use crate::crypto::envelope;
use crate::crypto::provider::{PasswordEncoder, DELEGATING_ID};
use crate::error::{PasswordError, Result};
use std::collections::HashMap;
use std::sync::Arc;

pub type EncoderRegistry = HashMap<String, Arc<dyn PasswordEncoder>>;

#[derive(Debug, Clone)]
pub struct DelegatingPasswordEncoder {
    default_id: String,
    default_encoder: Arc<dyn PasswordEncoder>,
    encoders: EncoderRegistry,
}

impl DelegatingPasswordEncoder {
    /// Builds a dispatcher from a registry keyed by scheme id.
    ///
    /// # Errors
    ///
    /// [`PasswordError::Configuration`] if the registry is empty, `default_id` is empty or
    /// not registered, or a key is empty or contains `{` / `}`.
    pub fn new(default_id: impl Into<String>, encoders: EncoderRegistry) -> Result<Self> {
        let default_id = default_id.into();

        if encoders.is_empty() {
            return Err(PasswordError::Configuration(
                "encoder registry must not be empty".to_string(),
            ));
        }
        if default_id.is_empty() {
            return Err(PasswordError::Configuration(
                "default encoder id must not be empty".to_string(),
            ));
        }
        if let Some(bad) = encoders.keys().find(|id| !is_valid_id(id)) {
            return Err(PasswordError::Configuration(format!(
                "invalid encoder id {bad:?}: must be non-empty and free of braces"
            )));
        }

        let default_encoder = encoders.get(&default_id).cloned().ok_or_else(|| {
            PasswordError::Configuration(format!("default encoder {default_id:?} is not registered"))
        })?;

        Ok(Self {
            default_id,
            default_encoder,
            encoders,
        })
    }

    /// Id used to tag newly encoded passwords.
    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// Registered scheme ids, sorted.
    pub fn schemes(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.encoders.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn encoder(&self, id: &str) -> Option<&Arc<dyn PasswordEncoder>> {
        self.encoders.get(id)
    }

    /// True when `encoded_password` was produced by a scheme other than the current default,
    /// i.e. the caller should re-encode after a successful verification.
    pub fn needs_upgrade(&self, encoded_password: &str) -> Result<bool> {
        let (id, _) = envelope::split_routed(encoded_password)?;
        Ok(id != self.default_id)
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(|c: char| c == '{' || c == '}')
}

impl PasswordEncoder for DelegatingPasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String> {
        let inner = self.default_encoder.encode(raw_password).map_err(|e| {
            tracing::warn!(scheme = %self.default_id, error = %e, "password encoding failed");
            e
        })?;
        tracing::debug!(scheme = %self.default_id, "password encoded");
        Ok(envelope::format_routed(&self.default_id, &inner))
    }

    fn verify(&self, raw_password: &str, encoded_password: &str) -> Result<bool> {
        let (id, inner) = envelope::split_routed(encoded_password)?;

        let Some(encoder) = self.encoders.get(id) else {
            tracing::warn!(scheme = %id, "no encoder registered for scheme");
            return Err(PasswordError::UnknownEncoding);
        };

        let matched = encoder.verify(raw_password, inner)?;
        tracing::debug!(scheme = %id, matched, "password verified");
        Ok(matched)
    }

    fn name(&self) -> &str {
        DELEGATING_ID
    }
}
