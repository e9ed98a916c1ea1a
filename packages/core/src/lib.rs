// Passforge Core
// Self-describing password envelopes with algorithm-agile verification

#![warn(clippy::all)]

// Модули
pub mod config;
pub mod crypto;
pub mod error;
pub mod utils;

// Re-exports для удобства
pub use config::Config;
pub use crypto::{DelegatingPasswordEncoder, EncoderRegistry, PasswordEncoder};
pub use error::{PasswordError, Result};
